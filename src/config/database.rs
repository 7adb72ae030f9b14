//! Database configuration module for the tile stock tracker.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs.
//! The one thing the entities cannot express, the composite unique key on
//! `(company, tile_name, tile_size)`, is created here as an explicit index.

use crate::entities::{AuditLog, Stock, stock};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Fallback used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/tile_stock.sqlite?mode=rwc";

/// Name of the unique index guarding the stock business key.
pub const STOCK_KEY_INDEX: &str = "idx_stocks_company_tile_name_tile_size";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// The directory holding a file-backed `SQLite` database, if the URL names one.
fn sqlite_parent_dir(database_url: &str) -> Option<&Path> {
    let path = database_url.strip_prefix("sqlite://")?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.contains(":memory:") {
        return None;
    }
    Path::new(path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
}

/// Establishes a connection to the database at `database_url`.
///
/// For a file-backed `SQLite` URL the containing directory is created first.
/// The returned handle is the process-wide connection pool. It is passed
/// explicitly to everything that needs it and closed by the caller on shutdown.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    if let Some(dir) = sqlite_parent_dir(database_url) {
        std::fs::create_dir_all(dir)?;
    }
    debug!("Connecting to database");
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables and the stock key index if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut stock_table = schema.create_table_from_entity(Stock);
    stock_table.if_not_exists();
    let mut audit_log_table = schema.create_table_from_entity(AuditLog);
    audit_log_table.if_not_exists();

    db.execute(builder.build(&stock_table)).await?;
    db.execute(builder.build(&audit_log_table)).await?;

    let stock_key_index = Index::create()
        .name(STOCK_KEY_INDEX)
        .table(Stock)
        .col(stock::Column::Company)
        .col(stock::Column::TileName)
        .col(stock::Column::TileSize)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&stock_key_index)).await?;

    info!("Database tables ensured");
    Ok(())
}
