/// Probe errors for the health domain.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("health.database_unreachable")]
    Unreachable,
    #[error("health.query_failed")]
    QueryFailed,
}
