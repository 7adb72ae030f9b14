use sea_orm::DbErr;
use thiserror::Error;

/// Unified error type for every layer of the tracker.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed input, rejected before the store is touched
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// No stock matches the given id or key
    #[error("Stock not found: {key}")]
    StockNotFound {
        /// The id or business key that was looked up
        key: String,
    },

    /// A deduction would drive the box count below zero
    #[error("Insufficient stock: {available} boxes available, {requested} requested")]
    InsufficientStock {
        /// Boxes currently in stock
        available: i64,
        /// Boxes the caller asked to remove
        requested: i64,
    },

    /// An edit would give a row the key of another existing row
    #[error("Stock already exists: {company} - {tile_name} ({tile_size})")]
    DuplicateStock {
        /// Company of the conflicting key
        company: String,
        /// Tile name of the conflicting key
        tile_name: String,
        /// Tile size of the conflicting key
        tile_size: String,
    },

    /// No audit entry has the given id
    #[error("Log entry not found: {id}")]
    LogEntryNotFound {
        /// The audit entry id that was requested
        id: i64,
    },

    /// The request carried no user identity where one is required
    #[error("Authentication required")]
    Unauthorized,

    /// The caller is authenticated but not allowed to perform the action
    #[error("Access denied for user '{username}'")]
    Forbidden {
        /// The authenticated caller
        username: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What could not be loaded or parsed
        message: String,
    },

    /// Failure reported by the database driver
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Socket or filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
