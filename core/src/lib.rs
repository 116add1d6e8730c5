//! # DocManager Core
//!
//! Domain layer of the DocManager authentication subsystem: entities, the
//! repository contracts, access token signing, the refresh token lifecycle
//! and the account flows built on top of them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    AccessToken, AuthResult, Claims, ClientContext, RefreshToken, Role, SessionInfo, TokenPair,
    User, UserView,
};
pub use errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
pub use repositories::{RefreshTokenRepository, UserStore};
pub use services::{
    AuthEvent, AuthEventPublisher, AuthService, AuthServiceConfig, CleanupResult, JwtService,
    NoOpEventPublisher, TokenCleanupConfig, TokenCleanupService, TokenServiceConfig, TokenSigner,
};
