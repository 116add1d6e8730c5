//! Configuration for the authentication service

use crate::domain::entities::user::Role;

/// Revocation reason recorded by a single-session logout
pub const REVOKE_REASON_LOGOUT: &str = "logout";

/// Revocation reason recorded by logout from every device
pub const REVOKE_REASON_LOGOUT_ALL: &str = "logout all devices";

/// Revocation reason recorded after a password change
pub const REVOKE_REASON_PASSWORD_CHANGED: &str = "password changed";

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Whether to allow registration of new users
    pub allow_registration: bool,
    /// Role given to self-registered accounts
    pub default_role: Role,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            allow_registration: true,
            default_role: Role::DEFAULT,
        }
    }
}
