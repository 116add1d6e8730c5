//! Validated inputs for the authentication flows

use validator::Validate;

use crate::domain::entities::user::normalize_email;

/// Registration input after normalization
#[derive(Debug, Clone, Validate)]
pub struct RegisterCommand {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
}

impl RegisterCommand {
    /// Normalizes the email and trims the display name; the password is kept verbatim
    pub fn new(email: &str, password: &str, full_name: &str) -> Self {
        Self {
            email: normalize_email(email),
            password: password.to_string(),
            full_name: full_name.trim().to_string(),
        }
    }
}

/// Password change input
#[derive(Debug, Clone, Validate)]
pub struct ChangePasswordCommand {
    #[validate(length(min = 1))]
    pub current_password: String,

    #[validate(length(min = 6, max = 100))]
    pub new_password: String,
}

impl ChangePasswordCommand {
    pub fn new(current_password: &str, new_password: &str) -> Self {
        Self {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        }
    }
}
