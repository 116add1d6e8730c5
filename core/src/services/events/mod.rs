//! Authentication events handed to the real-time hub
//!
//! Publishing is fire-and-forget: a missing publisher and a failing one are
//! treated the same by the auth flows.

mod publisher;

pub use publisher::{AuthEvent, AuthEventPublisher, NoOpEventPublisher};
