//! Error types for the persistence gateway.

use thiserror::Error;

/// Errors raised while opening or querying the prompt store.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The connection string is missing, malformed, or points at an
    /// unreachable store. Fatal at startup.
    #[error("connection error: {0}")]
    Connection(String),

    /// A statement failed inside SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A previous holder of the connection panicked.
    #[error("database lock poisoned")]
    LockPoisoned,
}

/// Convenience alias for results with [`GatewayError`].
pub type Result<T> = std::result::Result<T, GatewayError>;
