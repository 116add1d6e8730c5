//! Access token signing and verification

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::token::{AccessToken, Claims};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};

use super::config::{TokenServiceConfig, MIN_SECRET_LENGTH};

const REQUIRED_CLAIMS: [&str; 5] = ["exp", "iat", "iss", "aud", "sub"];

/// Stateless HMAC signer for access tokens
///
/// Holds immutable key material only and may be shared freely across tasks.
pub struct TokenSigner {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    /// Full validation including expiry
    strict: Validation,
    /// Signature, issuer, audience and algorithm only
    ignore_expiry: Validation,
}

impl TokenSigner {
    /// Creates a signer from configuration
    ///
    /// # Returns
    ///
    /// * `Err(TokenError::KeyConfiguration)` - The secret is shorter than 32
    ///   bytes, the algorithm is not an HMAC variant, or a token lifetime is
    ///   out of range
    pub fn new(config: &TokenServiceConfig) -> Result<Self, DomainError> {
        if !matches!(
            config.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::KeyConfiguration {
                message: format!("{:?} is not an HMAC algorithm", config.algorithm),
            }
            .into());
        }

        if config.jwt_secret.len() < MIN_SECRET_LENGTH {
            return Err(TokenError::KeyConfiguration {
                message: format!("secret must be at least {} bytes", MIN_SECRET_LENGTH),
            }
            .into());
        }

        config.validate_lifetimes()?;

        let mut strict = Validation::new(config.algorithm);
        strict.set_issuer(&[config.issuer.as_str()]);
        strict.set_audience(&[config.audience.as_str()]);
        strict.set_required_spec_claims(&REQUIRED_CLAIMS);
        strict.validate_nbf = true;
        strict.leeway = 0;

        let mut ignore_expiry = strict.clone();
        ignore_expiry.validate_exp = false;
        ignore_expiry.validate_nbf = false;

        Ok(Self {
            algorithm: config.algorithm,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl: config.access_token_ttl(),
            strict,
            ignore_expiry,
        })
    }

    /// Issues a signed access token with a fresh random `jti`
    pub fn issue(&self, user: &User) -> Result<AccessToken, DomainError> {
        let claims = Claims::for_user(
            user,
            Uuid::new_v4(),
            Utc::now(),
            self.access_ttl,
            &self.issuer,
            &self.audience,
        );
        let token = self.encode(&claims)?;
        Ok(AccessToken { token, claims })
    }

    /// Verifies a token that may already be expired
    ///
    /// Checks signature, algorithm, issuer and audience. Expiry is ignored so
    /// the caller can read claims during refresh. Every failure collapses to
    /// `InvalidToken`.
    pub fn validate_expired(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.ignore_expiry)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(kind = ?e.kind(), "Rejected access token during refresh");
                TokenError::InvalidToken.into()
            })
    }

    /// Verifies a token including its expiry
    ///
    /// # Returns
    ///
    /// * `Err(TokenError::TokenExpired)` - Valid token past its `exp`
    /// * `Err(TokenError::InvalidToken)` - Any other failure
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        decode::<Claims>(token, &self.decoding_key, &self.strict)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::TokenExpired.into(),
                kind => {
                    debug!(kind = ?kind, "Rejected access token");
                    TokenError::InvalidToken.into()
                }
            })
    }

    /// Access token lifetime in seconds
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode(&self, claims: &Claims) -> Result<String, DomainError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed.into())
    }
}
