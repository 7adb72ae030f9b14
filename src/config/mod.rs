/// Database configuration and connection management
pub mod database;

/// Server settings loaded from config.toml
pub mod server;

/// Admin user configuration from environment variables
pub mod users;
