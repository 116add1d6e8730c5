//! Configuration for the token service

use std::str::FromStr;

use chrono::Duration;
use dm_shared::config::{JwtConfig, DEFAULT_JWT_SECRET};
use jsonwebtoken::Algorithm;

use crate::domain::entities::token::{
    ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE, JWT_ISSUER, REFRESH_TOKEN_EXPIRY_DAYS,
};
use crate::errors::{DomainError, TokenError};

/// Minimum HMAC secret length in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted access token lifetime (one day)
pub const MAX_ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh token lifetime (one year)
pub const MAX_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 365;

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm
    pub algorithm: Algorithm,
    /// `iss` claim written and required
    pub issuer: String,
    /// `aud` claim written and required
    pub audience: String,
    /// Access token expiry in minutes
    pub access_token_expiry_minutes: i64,
    /// Refresh token expiry in days
    pub refresh_token_expiry_days: i64,
}

impl TokenServiceConfig {
    /// Build from the shared JWT configuration section
    pub fn from_jwt_config(config: &JwtConfig) -> Result<Self, DomainError> {
        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|_| {
            TokenError::KeyConfiguration {
                message: format!("unknown algorithm '{}'", config.algorithm),
            }
        })?;

        let token_config = Self {
            jwt_secret: config.secret.clone(),
            algorithm,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_token_expiry_minutes: config.access_token_expiry_minutes,
            refresh_token_expiry_days: config.refresh_token_expiry_days,
        };
        token_config.validate_lifetimes()?;
        Ok(token_config)
    }

    /// Check both token lifetimes are positive and within their caps
    ///
    /// # Returns
    ///
    /// * `Err(TokenError::KeyConfiguration)` - A lifetime is zero, negative or
    ///   above `MAX_ACCESS_TOKEN_EXPIRY_MINUTES` / `MAX_REFRESH_TOKEN_EXPIRY_DAYS`
    pub fn validate_lifetimes(&self) -> Result<(), DomainError> {
        if !(1..=MAX_ACCESS_TOKEN_EXPIRY_MINUTES).contains(&self.access_token_expiry_minutes) {
            return Err(TokenError::KeyConfiguration {
                message: format!(
                    "access token expiry must be between 1 and {} minutes, got {}",
                    MAX_ACCESS_TOKEN_EXPIRY_MINUTES, self.access_token_expiry_minutes
                ),
            }
            .into());
        }

        if !(1..=MAX_REFRESH_TOKEN_EXPIRY_DAYS).contains(&self.refresh_token_expiry_days) {
            return Err(TokenError::KeyConfiguration {
                message: format!(
                    "refresh token expiry must be between 1 and {} days, got {}",
                    MAX_REFRESH_TOKEN_EXPIRY_DAYS, self.refresh_token_expiry_days
                ),
            }
            .into());
        }

        Ok(())
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_minutes)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_expiry_days)
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
            issuer: JWT_ISSUER.to_string(),
            audience: JWT_AUDIENCE.to_string(),
            access_token_expiry_minutes: ACCESS_TOKEN_EXPIRY_MINUTES,
            refresh_token_expiry_days: REFRESH_TOKEN_EXPIRY_DAYS,
        }
    }
}
