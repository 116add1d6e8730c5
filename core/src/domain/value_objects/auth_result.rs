//! Authentication result value object returned by login, register and refresh.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{TokenPair, User};

/// Public projection of a user, safe to hand to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub roles: Vec<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            roles: user.role_names().into_iter().collect(),
        }
    }
}

/// Authentication response containing tokens and user metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResult {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Opaque refresh secret for obtaining a new pair
    pub refresh_token: String,

    /// Access token expiration time in seconds
    pub expires_in: i64,

    /// Refresh token expiration time in seconds
    pub refresh_expires_in: i64,

    /// The authenticated user
    pub user: UserView,
}

impl AuthResult {
    /// Creates an authentication result from a token pair and the user it was issued to
    pub fn from_token_pair(pair: TokenPair, user: &User) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.access_expires_in,
            refresh_expires_in: pair.refresh_expires_in,
            user: UserView::from(user),
        }
    }
}
