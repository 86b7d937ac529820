use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use poem::http::{StatusCode, header};
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use poem_openapi::payload::Json;
use serde::Deserialize;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("auth.missing_bearer")]
    MissingBearer,
    #[error("auth.token_validation_failed")]
    InvalidToken,
}

impl IntoErrorResponse for AuthError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("Unauthorized", &self)),
        )
    }
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Claims {
    sub: String,
    exp: u64,
}

/// Authenticated caller, attached to the request for downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
}

/// Validates HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn hs256(secret: &str, issuer: Option<&str>, audience: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        let token_data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::warn!("Bearer token rejected: {e}");
            AuthError::InvalidToken
        })?;

        Ok(Principal {
            subject: token_data.claims.sub,
        })
    }
}

/// Decides which requests need a bearer token.
///
/// Only paths under the protected prefix are guarded, minus the anonymous
/// list. Without a validator every request is let through.
#[derive(Clone)]
pub struct AuthorizationPolicy {
    protected_prefix: String,
    anonymous_paths: Vec<String>,
    validator: Option<TokenValidator>,
}

impl AuthorizationPolicy {
    pub fn new(protected_prefix: &str, anonymous_paths: Vec<String>) -> Self {
        Self {
            protected_prefix: protected_prefix.trim_end_matches('/').to_string(),
            anonymous_paths,
            validator: None,
        }
    }

    pub fn with_validator(mut self, validator: TokenValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn is_enforcing(&self) -> bool {
        self.validator.is_some()
    }

    fn validator_for(&self, path: &str) -> Option<&TokenValidator> {
        let validator = self.validator.as_ref()?;
        let protected = is_within(path, &self.protected_prefix);
        let anonymous = self
            .anonymous_paths
            .iter()
            .any(|anonymous| is_within(path, anonymous));
        (protected && !anonymous).then_some(validator)
    }
}

fn is_within(path: &str, prefix: &str) -> bool {
    prefix.is_empty()
        || path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Rejects requests failing the policy before they reach any endpoint.
pub struct Authorization {
    policy: Arc<AuthorizationPolicy>,
}

impl Authorization {
    pub fn new(policy: AuthorizationPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

impl<E: Endpoint> Middleware<E> for Authorization {
    type Output = AuthorizationEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        AuthorizationEndpoint {
            inner: ep,
            policy: self.policy.clone(),
        }
    }
}

pub struct AuthorizationEndpoint<E> {
    inner: E,
    policy: Arc<AuthorizationPolicy>,
}

impl<E: Endpoint> Endpoint for AuthorizationEndpoint<E> {
    type Output = Response;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        if let Some(validator) = self.policy.validator_for(req.uri().path()) {
            let outcome = bearer_token(&req)
                .ok_or(AuthError::MissingBearer)
                .and_then(|token| validator.validate(token));

            match outcome {
                Ok(principal) => {
                    req.extensions_mut().insert(principal);
                }
                Err(err) => {
                    tracing::info!(path = %req.uri().path(), "Unauthorized request: {err}");
                    return Ok(unauthorized(err));
                }
            }
        }

        self.inner.call(req).await.map(IntoResponse::into_response)
    }
}

fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.header(header::AUTHORIZATION)?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn unauthorized(err: AuthError) -> Response {
    let (status, body) = err.into_error_response();
    body.with_status(status)
        .with_header(header::WWW_AUTHENTICATE, "Bearer")
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use poem::test::TestClient;
    use poem::web::Data;
    use poem::{EndpointExt, handler};
    use serde::Serialize;
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "test-secret";

    #[derive(Serialize)]
    struct TestClaims<'a> {
        sub: &'a str,
        exp: u64,
        iss: &'a str,
    }

    fn token(secret: &str, issuer: &str, expires_in: i64) -> String {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() as i64;
        let claims = TestClaims {
            sub: "user-1",
            exp: (now + expires_in) as u64,
            iss: issuer,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn enforcing_policy() -> AuthorizationPolicy {
        AuthorizationPolicy::new("/api", vec!["/api/health".to_string()])
            .with_validator(TokenValidator::hs256(SECRET, Some("studymate"), None))
    }

    #[handler]
    fn whoami(principal: Option<Data<&Principal>>) -> String {
        principal
            .map(|principal| principal.subject.clone())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    #[test]
    fn should_protect_only_paths_under_prefix() {
        let policy = enforcing_policy();

        assert!(policy.validator_for("/api/notes").is_some());
        assert!(policy.validator_for("/api").is_some());
        assert!(policy.validator_for("/api/health").is_none());
        assert!(policy.validator_for("/api/health/ready").is_none());
        assert!(policy.validator_for("/apis").is_none());
        assert!(policy.validator_for("/docs").is_none());
    }

    #[test]
    fn should_not_require_authentication_without_validator() {
        let policy = AuthorizationPolicy::new("/api", Vec::new());

        assert!(!policy.is_enforcing());
        assert!(policy.validator_for("/api/notes").is_none());
    }

    #[test]
    fn should_reject_token_signed_with_other_secret() {
        let validator = TokenValidator::hs256(SECRET, None, None);

        let result = validator.validate(&token("other-secret", "studymate", 600));

        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn should_reject_expired_token() {
        let validator = TokenValidator::hs256(SECRET, None, None);

        let result = validator.validate(&token(SECRET, "studymate", -3600));

        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn should_reject_token_from_unexpected_issuer() {
        let validator = TokenValidator::hs256(SECRET, Some("studymate"), None);

        let result = validator.validate(&token(SECRET, "someone-else", 600));

        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn should_reject_protected_request_without_bearer() {
        // Arrange
        let cli = TestClient::new(whoami.with(Authorization::new(enforcing_policy())));

        // Act
        let resp = cli.get("/api/notes").send().await;

        // Assert
        resp.assert_status(StatusCode::UNAUTHORIZED);
        resp.assert_header("www-authenticate", "Bearer");
    }

    #[tokio::test]
    async fn should_reject_protected_request_with_invalid_bearer() {
        let cli = TestClient::new(whoami.with(Authorization::new(enforcing_policy())));

        let resp = cli
            .get("/api/notes")
            .header("authorization", "Bearer not-a-jwt")
            .send()
            .await;

        resp.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_attach_principal_for_valid_bearer() {
        // Arrange
        let cli = TestClient::new(whoami.with(Authorization::new(enforcing_policy())));
        let bearer = format!("Bearer {}", token(SECRET, "studymate", 600));

        // Act
        let resp = cli
            .get("/api/notes")
            .header("authorization", bearer)
            .send()
            .await;

        // Assert
        resp.assert_status_is_ok();
        resp.assert_text("user-1").await;
    }

    #[tokio::test]
    async fn should_let_anonymous_paths_through() {
        let cli = TestClient::new(whoami.with(Authorization::new(enforcing_policy())));

        let resp = cli.get("/api/health").send().await;

        resp.assert_status_is_ok();
        resp.assert_text("anonymous").await;
    }
}
