//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - HS256 access token signing and verification
//! - Refresh token issuance, redemption and revocation
//! - Background cleanup of expired tokens

mod cleanup;
mod config;
mod service;
mod signer;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::{
    TokenServiceConfig, MAX_ACCESS_TOKEN_EXPIRY_MINUTES, MAX_REFRESH_TOKEN_EXPIRY_DAYS,
    MIN_SECRET_LENGTH,
};
pub use service::{hash_token, JwtService, REFRESH_SECRET_BYTES};
pub use signer::TokenSigner;
