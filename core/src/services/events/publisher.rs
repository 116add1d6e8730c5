use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// Events emitted by the authentication flows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthEvent {
    UserRegistered {
        user_id: Uuid,
        email: String,
        at: DateTime<Utc>,
    },
    UserLoggedIn {
        user_id: Uuid,
        at: DateTime<Utc>,
    },
    TokenRefreshed {
        user_id: Uuid,
        at: DateTime<Utc>,
    },
    LoggedOut {
        user_id: Uuid,
        at: DateTime<Utc>,
    },
    AllSessionsRevoked {
        user_id: Uuid,
        revoked: usize,
        at: DateTime<Utc>,
    },
    PasswordChanged {
        user_id: Uuid,
        at: DateTime<Utc>,
    },
}

impl AuthEvent {
    /// Subject of the event
    pub fn user_id(&self) -> Uuid {
        match self {
            AuthEvent::UserRegistered { user_id, .. }
            | AuthEvent::UserLoggedIn { user_id, .. }
            | AuthEvent::TokenRefreshed { user_id, .. }
            | AuthEvent::LoggedOut { user_id, .. }
            | AuthEvent::AllSessionsRevoked { user_id, .. }
            | AuthEvent::PasswordChanged { user_id, .. } => *user_id,
        }
    }

    /// Short event name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            AuthEvent::UserRegistered { .. } => "user_registered",
            AuthEvent::UserLoggedIn { .. } => "user_logged_in",
            AuthEvent::TokenRefreshed { .. } => "token_refreshed",
            AuthEvent::LoggedOut { .. } => "logged_out",
            AuthEvent::AllSessionsRevoked { .. } => "all_sessions_revoked",
            AuthEvent::PasswordChanged { .. } => "password_changed",
        }
    }
}

/// Sink for authentication events
#[async_trait]
pub trait AuthEventPublisher: Send + Sync {
    async fn publish(&self, event: AuthEvent) -> Result<(), DomainError>;
}

/// Publisher that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpEventPublisher;

#[async_trait]
impl AuthEventPublisher for NoOpEventPublisher {
    async fn publish(&self, _event: AuthEvent) -> Result<(), DomainError> {
        Ok(())
    }
}
