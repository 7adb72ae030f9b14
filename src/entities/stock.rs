//! Stock entity - One stock-keeping record per tile line a company carries.
//!
//! A record is identified by its numeric `id` but looked up for reconciliation by
//! its business key: `company`, `tile_name` and `tile_size`. The store keeps a
//! unique index over that triple (see [`crate::config::database::create_tables`]).
//!
//! Columns are snake_case in the database while the JSON boundary is camelCase;
//! the rename lives here so no query has to care about it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stocks")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Store-assigned identifier, immutable after creation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Supplying company (e.g., "Kajaria")
    pub company: String,
    /// Tile design name (e.g., "Marble White")
    pub tile_name: String,
    /// Tile dimensions as entered (e.g., "2x2", "600x1200")
    pub tile_size: String,
    /// Boxes currently in stock, never negative
    pub box_count: i64,
    /// Pieces packed in one box
    pub pieces_per_box: i64,
    /// Optional warehouse or shelf location
    pub location: Option<String>,
    /// Selling price for one box
    pub price_per_box: f64,
    /// Selling price per square foot
    pub price_per_sqft: f64,
    /// Square feet covered by one box
    pub sqft_per_box: f64,
    /// When the record was created
    pub created_at: DateTimeUtc,
    /// When the record was last mutated
    pub updated_at: DateTimeUtc,
}

/// Stock records have no foreign-key relationships; audit entries refer to
/// them by description only.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Human-readable label used in audit details, e.g. `Acme - Marble (2x2)`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {} ({})", self.company, self.tile_name, self.tile_size)
    }
}
