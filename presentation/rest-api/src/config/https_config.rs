use super::configuration::HttpsRedirectionSection;
use crate::api::https_redirection::HttpsRedirection;

/// Settings for redirecting plain requests to HTTPS.
///
/// Without a port the redirection stage is mounted but lets every request
/// through, since there is no encrypted endpoint to send clients to.
#[derive(Debug, Clone, Default)]
pub struct HttpsConfig {
    pub https_port: Option<u16>,
}

impl HttpsConfig {
    /// Keys:
    /// - HttpsRedirection:HttpsPort: port of the encrypted endpoint (optional)
    pub fn from_section(section: &HttpsRedirectionSection) -> Self {
        Self {
            https_port: section.https_port,
        }
    }

    pub fn redirection(&self) -> HttpsRedirection {
        HttpsRedirection::new(self.https_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::configuration::Configuration;
    use serde_json::json;

    #[test]
    fn should_leave_port_unset_by_default() {
        let config = HttpsConfig::from_section(&HttpsRedirectionSection::default());

        assert_eq!(config.https_port, None);
        assert!(!config.redirection().is_active());
    }

    #[test]
    fn should_read_https_port() {
        let configuration = Configuration::from_document(json!({
            "HttpsRedirection": {"HttpsPort": 8443}
        }));

        let config = HttpsConfig::from_section(&configuration.https_redirection);

        assert_eq!(config.https_port, Some(8443));
        assert!(config.redirection().is_active());
    }
}
