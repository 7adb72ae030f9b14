//! Stock repository - Owns every read and write against the `stocks` table.
//!
//! Functions here are deliberately dumb: they persist exactly what they are given and
//! know nothing about audit entries. Deciding what to write, and recording it, is the
//! job of [`crate::core::reconcile`]. All functions are generic over
//! [`ConnectionTrait`] so they run the same on a plain connection or inside a
//! database transaction.

use crate::{
    entities::{Stock, stock},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{
    Condition, QueryOrder, Set, SqlErr,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Company filter value that disables filtering in [`list_by_company`].
pub const ALL_COMPANIES: &str = "ALL";

/// The business key of a stock record. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockKey {
    /// Supplying company
    pub company: String,
    /// Tile design name
    pub tile_name: String,
    /// Tile dimensions
    pub tile_size: String,
}

impl StockKey {
    /// Builds a key from its three parts.
    pub fn new(
        company: impl Into<String>,
        tile_name: impl Into<String>,
        tile_size: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            tile_name: tile_name.into(),
            tile_size: tile_size.into(),
        }
    }

    /// Trims surrounding whitespace from every part.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            company: self.company.trim().to_string(),
            tile_name: self.tile_name.trim().to_string(),
            tile_size: self.tile_size.trim().to_string(),
        }
    }

    fn condition(&self) -> Condition {
        Condition::all()
            .add(stock::Column::Company.eq(self.company.as_str()))
            .add(stock::Column::TileName.eq(self.tile_name.as_str()))
            .add(stock::Column::TileSize.eq(self.tile_size.as_str()))
    }
}

impl fmt::Display for StockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} ({})", self.company, self.tile_name, self.tile_size)
    }
}

/// Incoming stock attributes, as submitted for creation, reconciliation or edit.
///
/// Every field defaults when omitted so that a missing key part surfaces as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockInput {
    /// Supplying company (required)
    pub company: String,
    /// Tile design name (required)
    pub tile_name: String,
    /// Tile dimensions (required)
    pub tile_size: String,
    /// Boxes; a delta when reconciling, the absolute count when editing
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
}

impl StockInput {
    /// Convenience constructor for the key fields plus a box count; everything else defaults.
    pub fn new(
        company: impl Into<String>,
        tile_name: impl Into<String>,
        tile_size: impl Into<String>,
        box_count: i64,
    ) -> Self {
        Self {
            company: company.into(),
            tile_name: tile_name.into(),
            tile_size: tile_size.into(),
            box_count,
            ..Self::default()
        }
    }

    /// Trims the key and location; a blank location becomes `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        let key = self.key().normalized();
        let location = self
            .location
            .map(|loc| loc.trim().to_string())
            .filter(|loc| !loc.is_empty());
        Self {
            company: key.company,
            tile_name: key.tile_name,
            tile_size: key.tile_size,
            location,
            ..self
        }
    }

    /// The business key these attributes describe.
    #[must_use]
    pub fn key(&self) -> StockKey {
        StockKey::new(&self.company, &self.tile_name, &self.tile_size)
    }

    fn into_active_model(self, now: DateTime<Utc>) -> stock::ActiveModel {
        stock::ActiveModel {
            company: Set(self.company),
            tile_name: Set(self.tile_name),
            tile_size: Set(self.tile_size),
            box_count: Set(self.box_count),
            pieces_per_box: Set(self.pieces_per_box),
            location: Set(self.location),
            price_per_box: Set(self.price_per_box),
            price_per_sqft: Set(self.price_per_sqft),
            sqft_per_box: Set(self.sqft_per_box),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

/// Turns a unique-index violation on the stock key into [`Error::DuplicateStock`].
fn map_key_conflict(err: DbErr, key: &StockKey) -> Error {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        Error::DuplicateStock {
            company: key.company.clone(),
            tile_name: key.tile_name.clone(),
            tile_size: key.tile_size.clone(),
        }
    } else {
        err.into()
    }
}

/// Finds the record with exactly this business key.
pub async fn find_by_key<C>(db: &C, key: &StockKey) -> Result<Option<stock::Model>>
where
    C: ConnectionTrait,
{
    Stock::find()
        .filter(key.condition())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a record by its id.
pub async fn get_by_id<C>(db: &C, stock_id: i64) -> Result<Option<stock::Model>>
where
    C: ConnectionTrait,
{
    Stock::find_by_id(stock_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists records, newest id first. `"ALL"` or an empty filter returns every company.
pub async fn list_by_company<C>(db: &C, company: &str) -> Result<Vec<stock::Model>>
where
    C: ConnectionTrait,
{
    let mut query = Stock::find();
    let company = company.trim();
    if !company.is_empty() && company != ALL_COMPANIES {
        query = query.filter(stock::Column::Company.eq(company));
    }
    query
        .order_by_desc(stock::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts a new record with all supplied attributes.
///
/// This is the low-level insert; it does not merge. A second insert for an
/// existing key fails with [`Error::DuplicateStock`].
pub async fn insert<C>(db: &C, input: StockInput) -> Result<stock::Model>
where
    C: ConnectionTrait,
{
    let key = input.key();
    input
        .into_active_model(Utc::now())
        .insert(db)
        .await
        .map_err(|e| map_key_conflict(e, &key))
}

/// Inserts a new record, or adds `input.box_count` to the existing one when the
/// key is already taken. One statement; the unique key index decides which.
///
/// Returns the number of rows written. 0 means the key was taken and the sum
/// would not fit in an `i64`; the existing record is left untouched.
pub async fn insert_or_increment<C>(db: &C, input: StockInput, now: DateTime<Utc>) -> Result<u64>
where
    C: ConnectionTrait,
{
    let delta = input.box_count;
    let on_conflict = OnConflict::columns([
        stock::Column::Company,
        stock::Column::TileName,
        stock::Column::TileSize,
    ])
    .value(
        stock::Column::BoxCount,
        Expr::col((Stock, stock::Column::BoxCount)).add(delta),
    )
    .value(stock::Column::UpdatedAt, Expr::value(now))
    .action_and_where(
        Expr::col((Stock, stock::Column::BoxCount)).lte(max_before_increment(delta)),
    )
    .to_owned();

    Stock::insert(input.into_active_model(now))
        .on_conflict(on_conflict)
        .exec_without_returning(db)
        .await
        .map_err(Into::into)
}

/// Largest stored count that can still take `delta` more boxes.
const fn max_before_increment(delta: i64) -> i64 {
    i64::MAX.saturating_sub(delta)
}

/// Atomically adds `delta` boxes to the record with this key.
///
/// Runs as a single `UPDATE stocks SET box_count = box_count + delta` so concurrent
/// callers never lose each other's increments. Returns the number of rows touched:
/// 0 when no record has the key, or when the sum would not fit in an `i64`.
pub async fn increment_box_count<C>(
    db: &C,
    key: &StockKey,
    delta: i64,
    now: DateTime<Utc>,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Stock::update_many()
        .col_expr(
            stock::Column::BoxCount,
            Expr::col(stock::Column::BoxCount).add(delta),
        )
        .col_expr(stock::Column::UpdatedAt, Expr::value(now))
        .filter(key.condition())
        .filter(stock::Column::BoxCount.lte(max_before_increment(delta)))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Atomically removes `boxes` from the record with this key, but only if at least
/// that many are in stock. Returns the number of rows touched; 0 means the key is
/// unknown or the stock is insufficient.
pub async fn decrement_box_count_if_available<C>(
    db: &C,
    key: &StockKey,
    boxes: i64,
    now: DateTime<Utc>,
) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = Stock::update_many()
        .col_expr(
            stock::Column::BoxCount,
            Expr::col(stock::Column::BoxCount).sub(boxes),
        )
        .col_expr(stock::Column::UpdatedAt, Expr::value(now))
        .filter(key.condition())
        .filter(stock::Column::BoxCount.gte(boxes))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Sets the box count of a record to an absolute value and refreshes `updated_at`.
pub async fn update_box_count<C>(db: &C, stock_id: i64, new_count: i64) -> Result<stock::Model>
where
    C: ConnectionTrait,
{
    let mut record: stock::ActiveModel = get_by_id(db, stock_id)
        .await?
        .ok_or_else(|| Error::StockNotFound {
            key: stock_id.to_string(),
        })?
        .into();

    record.box_count = Set(new_count);
    record.updated_at = Set(Utc::now());

    record.update(db).await.map_err(Into::into)
}

/// Overwrites every attribute of an existing record except `id` and `created_at`.
pub async fn replace<C>(db: &C, stock_id: i64, input: StockInput) -> Result<stock::Model>
where
    C: ConnectionTrait,
{
    let key = input.key();
    let mut record: stock::ActiveModel = get_by_id(db, stock_id)
        .await?
        .ok_or_else(|| Error::StockNotFound {
            key: stock_id.to_string(),
        })?
        .into();

    record.company = Set(input.company);
    record.tile_name = Set(input.tile_name);
    record.tile_size = Set(input.tile_size);
    record.box_count = Set(input.box_count);
    record.pieces_per_box = Set(input.pieces_per_box);
    record.location = Set(input.location);
    record.price_per_box = Set(input.price_per_box);
    record.price_per_sqft = Set(input.price_per_sqft);
    record.sqft_per_box = Set(input.sqft_per_box);
    record.updated_at = Set(Utc::now());

    record
        .update(db)
        .await
        .map_err(|e| map_key_conflict(e, &key))
}

/// Physically deletes a record. Returns whether a row was removed.
pub async fn delete_by_id<C>(db: &C, stock_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Stock::delete_by_id(stock_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_stock_input_uses_camel_case_fields() {
        let json = r#"{
            "company": "Acme",
            "tileName": "Marble",
            "tileSize": "2x2",
            "boxCount": 10,
            "piecesPerBox": 4,
            "location": "Rack B",
            "pricePerBox": 1200.5,
            "pricePerSqft": 75.0,
            "sqftPerBox": 16.0
        }"#;
        let input: StockInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.tile_name, "Marble");
        assert_eq!(input.tile_size, "2x2");
        assert_eq!(input.box_count, 10);
        assert_eq!(input.pieces_per_box, 4);
        assert_eq!(input.location.as_deref(), Some("Rack B"));
        assert_eq!(input.price_per_box, 1200.5);
        assert_eq!(input.sqft_per_box, 16.0);
    }

    #[test]
    fn test_stock_input_defaults_omitted_fields() {
        let input: StockInput =
            serde_json::from_str(r#"{"company": "Acme", "tileName": "Marble"}"#).unwrap();
        assert_eq!(input.tile_size, "");
        assert_eq!(input.box_count, 0);
        assert_eq!(input.location, None);
        assert_eq!(input.price_per_sqft, 0.0);
    }

    #[test]
    fn test_stock_input_normalized() {
        let input = StockInput {
            location: Some("   ".to_string()),
            ..StockInput::new(" Acme ", "Marble\t", " 2x2", 3)
        }
        .normalized();
        assert_eq!(input.key(), StockKey::new("Acme", "Marble", "2x2"));
        assert_eq!(input.location, None);
        assert_eq!(input.box_count, 3);
    }

    #[tokio::test]
    async fn test_model_serializes_with_camel_case_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let record = create_test_stock(&db, "Acme", "Marble", "2x2", 10).await?;

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tileName"], "Marble");
        assert_eq!(value["tileSize"], "2x2");
        assert_eq!(value["boxCount"], 10);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("tile_name").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_and_find_by_key() -> Result<()> {
        let db = setup_test_db().await?;
        let record = create_test_stock(&db, "Acme", "Marble", "2x2", 10).await?;

        let found = find_by_key(&db, &StockKey::new("Acme", "Marble", "2x2")).await?;
        assert_eq!(found.unwrap().id, record.id);

        // Matching is case-sensitive
        let not_found = find_by_key(&db, &StockKey::new("acme", "Marble", "2x2")).await?;
        assert!(not_found.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_duplicate_key_fails() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_stock(&db, "Acme", "Marble", "2x2", 10).await?;

        let result = insert(&db, StockInput::new("Acme", "Marble", "2x2", 5)).await;
        assert!(matches!(result, Err(Error::DuplicateStock { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_increment_box_count() -> Result<()> {
        let db = setup_test_db().await?;
        let record = create_test_stock(&db, "Acme", "Marble", "2x2", 10).await?;
        let key = StockKey::new("Acme", "Marble", "2x2");

        assert_eq!(increment_box_count(&db, &key, 5, Utc::now()).await?, 1);
        let updated = get_by_id(&db, record.id).await?.unwrap();
        assert_eq!(updated.box_count, 15);
        assert!(updated.updated_at >= record.updated_at);

        let missing = StockKey::new("Acme", "Granite", "2x2");
        assert_eq!(increment_box_count(&db, &missing, 5, Utc::now()).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_or_increment() -> Result<()> {
        let db = setup_test_db().await?;

        insert_or_increment(&db, StockInput::new("Acme", "Marble", "2x2", 10), Utc::now()).await?;
        insert_or_increment(&db, StockInput::new("Acme", "Marble", "2x2", 7), Utc::now()).await?;

        let all = list_by_company(&db, ALL_COMPANIES).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].box_count, 17);
        Ok(())
    }

    #[tokio::test]
    async fn test_increments_refuse_to_overflow() -> Result<()> {
        let db = setup_test_db().await?;
        let record = create_test_stock(&db, "Acme", "Marble", "2x2", i64::MAX - 1).await?;
        let key = StockKey::new("Acme", "Marble", "2x2");

        assert_eq!(increment_box_count(&db, &key, 2, Utc::now()).await?, 0);
        let input = StockInput::new("Acme", "Marble", "2x2", 2);
        assert_eq!(insert_or_increment(&db, input, Utc::now()).await?, 0);
        assert_eq!(get_by_id(&db, record.id).await?.unwrap().box_count, i64::MAX - 1);

        assert_eq!(increment_box_count(&db, &key, 1, Utc::now()).await?, 1);
        assert_eq!(get_by_id(&db, record.id).await?.unwrap().box_count, i64::MAX);
        Ok(())
    }

    #[tokio::test]
    async fn test_decrement_box_count_if_available() -> Result<()> {
        let db = setup_test_db().await?;
        let record = create_test_stock(&db, "Acme", "Marble", "2x2", 10).await?;
        let key = StockKey::new("Acme", "Marble", "2x2");

        assert_eq!(decrement_box_count_if_available(&db, &key, 11, Utc::now()).await?, 0);
        assert_eq!(get_by_id(&db, record.id).await?.unwrap().box_count, 10);

        assert_eq!(decrement_box_count_if_available(&db, &key, 10, Utc::now()).await?, 1);
        assert_eq!(get_by_id(&db, record.id).await?.unwrap().box_count, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_box_count() -> Result<()> {
        let db = setup_test_db().await?;
        let record = create_test_stock(&db, "Acme", "Marble", "2x2", 10).await?;

        let updated = update_box_count(&db, record.id, 42).await?;
        assert_eq!(updated.id, record.id);
        assert_eq!(updated.box_count, 42);
        assert_eq!(updated.tile_name, "Marble");

        let result = update_box_count(&db, 999, 1).await;
        assert!(matches!(result, Err(Error::StockNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_replace() -> Result<()> {
        let db = setup_test_db().await?;
        let record = create_test_stock(&db, "Acme", "Marble", "2x2", 10).await?;

        let replaced = replace(
            &db,
            record.id,
            StockInput {
                location: Some("Yard".to_string()),
                price_per_box: 900.0,
                ..StockInput::new("Acme", "Marble", "4x4", 3)
            },
        )
        .await?;
        assert_eq!(replaced.id, record.id);
        assert_eq!(replaced.tile_size, "4x4");
        assert_eq!(replaced.box_count, 3);
        assert_eq!(replaced.location.as_deref(), Some("Yard"));
        assert_eq!(replaced.price_per_box, 900.0);
        assert_eq!(replaced.created_at, record.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_onto_existing_key_fails() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_stock(&db, "Acme", "Marble", "2x2", 10).await?;
        let other = create_test_stock(&db, "Acme", "Granite", "2x2", 4).await?;

        let result = replace(&db, other.id, StockInput::new("Acme", "Marble", "2x2", 4)).await;
        assert!(matches!(result, Err(Error::DuplicateStock { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_by_company() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_stock(&db, "Acme", "Marble", "2x2", 1).await?;
        let second = create_test_stock(&db, "Bolt", "Slate", "1x1", 2).await?;
        let third = create_test_stock(&db, "Acme", "Granite", "2x2", 3).await?;

        let all = list_by_company(&db, ALL_COMPANIES).await?;
        let ids: Vec<i64> = all.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let acme = list_by_company(&db, "Acme").await?;
        let ids: Vec<i64> = acme.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);

        assert_eq!(list_by_company(&db, "").await?.len(), 3);
        assert!(list_by_company(&db, "Nobody").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_by_id() -> Result<()> {
        let db = setup_test_db().await?;
        let record = create_test_stock(&db, "Acme", "Marble", "2x2", 1).await?;

        assert!(delete_by_id(&db, record.id).await?);
        assert!(get_by_id(&db, record.id).await?.is_none());
        assert!(!delete_by_id(&db, record.id).await?);
        Ok(())
    }
}
