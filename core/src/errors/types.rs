//! Domain-specific error types for authentication and token operations
//!
//! Messages stay generic: token failures never say which check
//! failed, and credential failures never say whether the account exists.

use dm_shared::errors::{error_codes, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

use super::DomainError;

/// Authentication flow failures surfaced to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("User not found or disabled")]
    UserNotFoundOrDisabled,

    #[error("Password change rejected")]
    PasswordChangeRejected,
}

/// Token failures surfaced to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Invalid signing key configuration: {message}")]
    KeyConfiguration { message: String },
}

/// Input validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid length for field: {field} (min: {min}, max: {max})")]
    InvalidLength { field: String, min: u64, max: u64 },

    #[error("Invalid value for field: {field}")]
    InvalidField { field: String },
}

impl AuthError {
    /// Stable error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::DuplicateEmail => error_codes::DUPLICATE_EMAIL,
            AuthError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            AuthError::AccountDisabled => error_codes::ACCOUNT_DISABLED,
            AuthError::UserNotFoundOrDisabled => error_codes::USER_NOT_FOUND_OR_DISABLED,
            AuthError::PasswordChangeRejected => error_codes::PASSWORD_CHANGE_REJECTED,
        }
    }
}

impl TokenError {
    /// Stable error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidToken => error_codes::INVALID_TOKEN,
            TokenError::TokenExpired => error_codes::TOKEN_EXPIRED,
            TokenError::InvalidRefreshToken => error_codes::INVALID_REFRESH_TOKEN,
            TokenError::TokenGenerationFailed | TokenError::KeyConfiguration { .. } => {
                error_codes::INTERNAL_ERROR
            }
        }
    }
}

/// Convert AuthError to ErrorResponse
impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        ErrorResponse::new(err.code(), err.to_string())
    }
}

/// Convert TokenError to ErrorResponse
impl From<TokenError> for ErrorResponse {
    fn from(err: TokenError) -> Self {
        match err {
            // Key material problems are operator errors; keep them out of responses.
            TokenError::KeyConfiguration { .. } | TokenError::TokenGenerationFailed => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
            }
            other => ErrorResponse::new(other.code(), other.to_string()),
        }
    }
}

/// Convert ValidationError to ErrorResponse
impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        let response = ErrorResponse::new(error_codes::VALIDATION_ERROR, err.to_string());
        match err {
            ValidationError::InvalidEmail => response.add_detail("field", "email"),
            ValidationError::InvalidLength { field, .. } | ValidationError::InvalidField { field } => {
                response.add_detail("field", field)
            }
        }
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            DomainError::Auth(e) => e.clone().into(),
            DomainError::Token(e) => e.clone().into(),
            DomainError::ValidationErr(e) => e.clone().into(),
            DomainError::Validation { message } => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, message.clone())
            }
            DomainError::NotFound { resource } => {
                ErrorResponse::new(error_codes::NOT_FOUND, format!("{} not found", resource))
            }
            DomainError::Internal { .. } => {
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
            }
        }
    }
}

/// Map the first field failure reported by `validator` onto a typed error
impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by_key(|(name, _)| **name);

        let Some((field, failures)) = fields.into_iter().next() else {
            return DomainError::Validation {
                message: errors.to_string(),
            };
        };

        let failure = failures.first();
        let code = failure.map(|f| f.code.as_ref()).unwrap_or_default();
        let error = match code {
            "email" => ValidationError::InvalidEmail,
            "length" => {
                let bound = |key: &str| {
                    failure
                        .and_then(|f| f.params.get(key))
                        .and_then(|v| v.as_u64())
                        .unwrap_or_default()
                };
                ValidationError::InvalidLength {
                    field: field.to_string(),
                    min: bound("min"),
                    max: bound("max"),
                }
            }
            _ => ValidationError::InvalidField {
                field: field.to_string(),
            },
        };

        DomainError::ValidationErr(error)
    }
}
