use std::fmt::Display;

use poem::http::StatusCode;
use poem_openapi::{Object, payload::Json};

/// Error body returned by middleware and controllers.
///
/// `message` carries a code-style identifier such as `auth.missing_bearer`.
#[derive(Object, Debug)]
pub struct ErrorResponse {
    pub name: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(name: &str, error: &impl Display) -> Self {
        Self {
            name: name.to_string(),
            message: error.to_string(),
        }
    }
}

pub trait IntoErrorResponse {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>);
}
