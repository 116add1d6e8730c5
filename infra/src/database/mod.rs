//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and embedded migrations
//! - `RefreshTokenRepository` and `UserStore` implementations

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlRefreshTokenRepository, MySqlUserStore};
