//! Public view of an active login session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::RefreshToken;

/// One active refresh token as reported to its owner
///
/// Never carries the secret or its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
}

impl From<&RefreshToken> for SessionInfo {
    fn from(token: &RefreshToken) -> Self {
        Self {
            id: token.id,
            created_at: token.created_at,
            expires_at: token.expires_at,
            device_info: token.device_info.clone(),
            ip_address: token.ip_address.clone(),
        }
    }
}
