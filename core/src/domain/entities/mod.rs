//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{
    AccessToken, Claims, RefreshToken, TokenPair, ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE,
    JWT_ISSUER, REFRESH_TOKEN_EXPIRY_DAYS,
};
pub use user::{normalize_email, Role, User};
