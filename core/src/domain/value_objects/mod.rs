//! Value objects representing immutable domain concepts.

pub mod auth_result;
pub mod client_context;
pub mod session;

// Re-export commonly used types
pub use auth_result::{AuthResult, UserView};
pub use client_context::{ClientContext, MAX_DEVICE_INFO_LENGTH, MAX_IP_ADDRESS_LENGTH};
pub use session::SessionInfo;
