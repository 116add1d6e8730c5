//! MySQL implementations of the core repository traits

mod refresh_token_repository;
mod user_store;

pub use refresh_token_repository::MySqlRefreshTokenRepository;
pub use user_store::MySqlUserStore;

use dm_core::errors::DomainError;

/// Row decoding failure for `column`
fn column_error(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to get {}: {}", column, e),
    }
}

/// Logged query failure while trying to `action`
fn query_error(action: &str, e: sqlx::Error) -> DomainError {
    tracing::error!(error = %e, "Failed to {}", action);
    DomainError::Internal {
        message: format!("Failed to {}: {}", action, e),
    }
}
