//! Authentication service module
//!
//! This module provides the account-facing flows:
//! - Registration with input validation
//! - Login with generic credential failures
//! - Refresh token rotation
//! - Logout, logout from every device and password change

mod commands;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use commands::{ChangePasswordCommand, RegisterCommand};
pub use config::{
    AuthServiceConfig, REVOKE_REASON_LOGOUT, REVOKE_REASON_LOGOUT_ALL,
    REVOKE_REASON_PASSWORD_CHANGED,
};
pub use service::AuthService;
