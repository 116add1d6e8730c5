//! Shared configuration and error envelope for the DocManager server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and the layered loader
//! - The error response structure handed to the API boundary

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CleanupConfig, DatabaseConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig,
};
pub use errors::{error_codes, ApiResult, ErrorResponse, IntoErrorResponse};
