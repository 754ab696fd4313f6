use validator::ValidationErrors;

use crate::types::DbId;

/// Domain-level failures shared by every layer above `core`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Credentials did not match a usable account.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// A bearer or refresh token was expired, malformed, or of the wrong kind.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The caller did not present credentials for a protected resource.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for CoreError {
    /// Flatten field errors into a single `field: message` list.
    fn from(errors: ValidationErrors) -> Self {
        let mut parts: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{field}: {msg}"),
                    None => format!("{field}: invalid value ({})", e.code),
                })
            })
            .collect();
        parts.sort();
        CoreError::Validation(parts.join("; "))
    }
}
