//! Mock implementation of UserStore for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::{Role, User};
use crate::errors::{AuthError, DomainError};

use super::trait_::UserStore;

struct StoredUser {
    user: User,
    password: String,
}

/// In-memory user store; passwords are compared as plain text
pub struct MockUserStore {
    users: Arc<RwLock<HashMap<Uuid, StoredUser>>>,
}

impl MockUserStore {
    /// Create a new mock store
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed an existing account
    pub async fn insert(&self, user: User, password: &str) {
        let mut users = self.users.write().await;
        users.insert(
            user.id,
            StoredUser {
                user,
                password: password.to_string(),
            },
        );
    }

    /// Flip the active flag of an account
    pub async fn set_active(&self, user_id: Uuid, active: bool) {
        let mut users = self.users.write().await;
        if let Some(stored) = users.get_mut(&user_id) {
            stored.user.is_active = active;
        }
    }

    /// Remove an account
    pub async fn remove(&self, user_id: Uuid) {
        self.users.write().await.remove(&user_id);
    }
}

impl Default for MockUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MockUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).map(|s| s.user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|s| s.user.email == email)
            .map(|s| s.user.clone()))
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|s| s.user.email == email && s.password == password)
            .map(|s| s.user.clone()))
    }

    async fn create(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        roles: &[Role],
    ) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        if users.values().any(|s| s.user.email == email) {
            return Err(AuthError::DuplicateEmail.into());
        }

        let user = User::new(email, full_name, roles);
        users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        Ok(user)
    }

    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<bool, DomainError> {
        let mut users = self.users.write().await;

        match users.get_mut(&user_id) {
            Some(stored) if stored.password == current_password => {
                stored.password = new_password.to_string();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn record_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if let Some(stored) = users.get_mut(&user_id) {
            stored.user.update_last_login(at);
        }
        Ok(())
    }
}
