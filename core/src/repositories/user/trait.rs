//! User store trait: the identity capability the auth flows depend on.
//!
//! Password hashing and identity storage live behind this boundary. The
//! authentication services only ever see verified `User` values.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::user::{Role, User};
use crate::errors::DomainError;

/// Identity store consumed by the authentication services
///
/// Emails passed in are already normalized (trimmed, lowercase).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by normalized email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Check a password against the stored hash
    ///
    /// # Returns
    /// * `Ok(Some(User))` - Credentials match (the user may still be inactive)
    /// * `Ok(None)` - Unknown email or wrong password, indistinguishably
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError>;

    /// Create an active user
    ///
    /// # Returns
    /// * `Err(DomainError::Auth(AuthError::DuplicateEmail))` - Email already registered
    async fn create(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        roles: &[Role],
    ) -> Result<User, DomainError>;

    /// Replace the password after checking the current one
    ///
    /// # Returns
    /// * `Ok(true)` - Password changed
    /// * `Ok(false)` - Unknown user or wrong current password
    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool, DomainError>;

    /// Record a successful login
    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Check whether an email is registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
