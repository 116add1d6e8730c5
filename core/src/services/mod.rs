//! Business services containing domain logic and use cases.

pub mod auth;
pub mod events;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig};
pub use events::{AuthEvent, AuthEventPublisher, NoOpEventPublisher};
pub use token::{
    CleanupResult, JwtService, TokenCleanupConfig, TokenCleanupService, TokenServiceConfig,
    TokenSigner,
};
