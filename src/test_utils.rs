//! Shared test utilities for the tile stock tracker.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    core::stock::{self, StockInput},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Inserts a stock record directly, bypassing reconciliation and audit.
///
/// # Defaults
/// * `pieces_per_box`: 0
/// * `location`: None
/// * prices and coverage: 0.0
pub async fn create_test_stock(
    db: &DatabaseConnection,
    company: &str,
    tile_name: &str,
    tile_size: &str,
    box_count: i64,
) -> Result<entities::stock::Model> {
    stock::insert(db, StockInput::new(company, tile_name, tile_size, box_count)).await
}
