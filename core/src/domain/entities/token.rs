//! Token entities for JWT-based authentication.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;
use crate::domain::value_objects::ClientContext;

/// Default access token lifetime (60 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 60;

/// Default refresh token lifetime (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Default JWT issuer
pub const JWT_ISSUER: &str = "doc-manager";

/// Default JWT audience
pub const JWT_AUDIENCE: &str = "doc-manager-web";

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// JWT ID, binds the access token to its refresh token
    pub jti: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// User email
    pub email: String,

    /// User display name
    pub name: String,

    /// Role names
    #[serde(default)]
    pub roles: BTreeSet<String>,
}

impl Claims {
    /// Builds access token claims for a user
    ///
    /// `exp` is `iat + ttl` saturating at `i64::MAX`, and `nbf` equals `iat`.
    pub fn for_user(
        user: &User,
        jwt_id: Uuid,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: user.id.to_string(),
            jti: jwt_id.to_string(),
            iat,
            nbf: iat,
            exp: iat.saturating_add(ttl.num_seconds()),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            email: user.email.clone(),
            name: user.full_name.clone(),
            roles: user.role_names(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Checks whether the claims carry a role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

/// A signed access token together with the claims it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Compact JWS (`header.claims.signature`)
    pub token: String,

    /// Claims encoded into the token
    pub claims: Claims,
}

impl AccessToken {
    /// The `jti` claim
    pub fn jwt_id(&self) -> &str {
        &self.claims.jti
    }

    /// Expiration time as a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.claims.exp, 0)
    }
}

/// Refresh token record stored in the database
///
/// The raw secret never lives here; only its SHA-256 hex digest does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// Hashed secret value
    pub token_hash: String,

    /// `jti` of the access token issued alongside this refresh token
    pub jwt_id: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been redeemed
    pub is_used: bool,

    /// Whether the token has been revoked
    pub is_revoked: bool,

    /// Timestamp of redemption
    pub used_at: Option<DateTime<Utc>>,

    /// Timestamp of revocation
    pub revoked_at: Option<DateTime<Utc>>,

    /// Free-form revocation reason
    pub revoke_reason: Option<String>,

    /// Client device description (at most 500 characters)
    pub device_info: Option<String>,

    /// Client IP address (at most 45 characters)
    pub ip_address: Option<String>,
}

impl RefreshToken {
    /// Creates a new active refresh token
    pub fn new(
        user_id: Uuid,
        token_hash: String,
        jwt_id: impl Into<String>,
        ttl: Duration,
        client: &ClientContext,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            jwt_id: jwt_id.into(),
            created_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            is_used: false,
            is_revoked: false,
            used_at: None,
            revoked_at: None,
            revoke_reason: None,
            device_info: client.device_info.clone(),
            ip_address: client.ip_address.clone(),
        }
    }

    /// Checks if the token has expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Active means not revoked, not used and not expired at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked && !self.is_used && !self.is_expired_at(now)
    }

    /// Checks if the token is currently active
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Marks the token as redeemed
    pub fn mark_used(&mut self, at: DateTime<Utc>) {
        self.is_used = true;
        self.used_at = Some(at);
    }

    /// Revokes the token
    pub fn revoke(&mut self, reason: impl Into<String>, at: DateTime<Utc>) {
        self.is_revoked = true;
        self.revoked_at = Some(at);
        self.revoke_reason = Some(reason.into());
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// Opaque refresh secret
    pub refresh_token: String,

    /// `jti` shared by both halves of the pair
    pub jwt_id: String,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}
