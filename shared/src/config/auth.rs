//! Authentication configuration consumed by the token layer

use serde::{Deserialize, Serialize};

/// Secret shipped in the default configuration. Never valid outside development.
pub const DEFAULT_JWT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing and lifetime configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Symmetric signing secret
    pub secret: String,

    /// `iss` claim written into and required from access tokens
    pub issuer: String,

    /// `aud` claim written into and required from access tokens
    pub audience: String,

    /// Access token lifetime in minutes
    pub access_token_expiry_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_token_expiry_days: i64,

    /// Signing algorithm (only HMAC variants are accepted by the signer)
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            issuer: String::from("doc-manager"),
            audience: String::from("doc-manager-web"),
            access_token_expiry_minutes: 60,
            refresh_token_expiry_days: 7,
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry_minutes = minutes;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_days = days;
        self
    }

    /// Set issuer and audience
    pub fn with_issuer_audience(mut self, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self.audience = audience.into();
        self
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.access_token_expiry_minutes * 60
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.refresh_token_expiry_days * 86400
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
}

fn default_algorithm() -> String {
    String::from("HS256")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry_minutes, 60);
        assert_eq!(config.refresh_token_expiry_days, 7);
        assert_eq!(config.algorithm, "HS256");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14)
            .with_issuer_audience("issuer", "audience");

        assert_eq!(config.secret, "my-secret");
        assert_eq!(config.access_token_expiry_seconds(), 1800);
        assert_eq!(config.refresh_token_expiry_seconds(), 14 * 86400);
        assert_eq!(config.issuer, "issuer");
        assert_eq!(config.audience, "audience");
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: JwtConfig = serde_json::from_str(r#"{"secret":"abc"}"#).unwrap();
        assert_eq!(config.secret, "abc");
        assert_eq!(config.issuer, "doc-manager");
        assert_eq!(config.access_token_expiry_minutes, 60);
    }
}
