//! Audit log - Append-only history of stock mutations.
//!
//! [`append`] never fails from the caller's point of view: a write error is logged
//! and dropped, so a stock mutation that already succeeded is still reported as
//! successful. Reading and clearing the log are admin operations exposed through
//! the HTTP layer.
//!
//! The `*_details` functions produce the human-readable text stored with each entry.

use crate::{
    entities::{ActionType, AuditLog, audit_log, stock},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, error};

/// Username recorded when the caller supplied no identity.
pub const UNKNOWN_ACTOR: &str = "Unknown";

/// Resolves the actor name to record, substituting [`UNKNOWN_ACTOR`] for a
/// missing or blank identity.
#[must_use]
pub fn actor_or_unknown(actor: Option<&str>) -> &str {
    actor
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_ACTOR)
}

/// Records one audit entry. Persistence failures are logged and swallowed.
pub async fn append<C>(db: &C, action_type: ActionType, actor: Option<&str>, details: &str)
where
    C: ConnectionTrait,
{
    let username = actor_or_unknown(actor);
    let entry = audit_log::ActiveModel {
        timestamp: Set(Utc::now()),
        action_type: Set(action_type),
        username: Set(username.to_string()),
        details: Set(details.to_string()),
        ..Default::default()
    };

    match entry.insert(db).await {
        Ok(saved) => debug!(id = saved.id, %action_type, username, "audit entry recorded"),
        Err(e) => error!(%action_type, username, details, "Failed to write audit entry: {e}"),
    }
}

/// Returns every entry, most recent first.
///
/// Ids increase with insertion, so ordering by id is ordering by timestamp
/// without depending on how the backend stores datetimes.
pub async fn list<C>(db: &C) -> Result<Vec<audit_log::Model>>
where
    C: ConnectionTrait,
{
    AuditLog::find()
        .order_by_desc(audit_log::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Removes every entry. Returns how many were deleted.
pub async fn clear_all<C>(db: &C) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = AuditLog::delete_many().exec(db).await?;
    Ok(result.rows_affected)
}

/// Removes a single entry. Returns whether it existed.
pub async fn delete_one<C>(db: &C, entry_id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = AuditLog::delete_by_id(entry_id).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Details for a freshly inserted record.
#[must_use]
pub fn add_details(record: &stock::Model) -> String {
    format!(
        "Added new stock {}: {} boxes",
        record.label(),
        record.box_count
    )
}

/// Details for boxes merged into an existing record.
#[must_use]
pub fn merge_details(record: &stock::Model, boxes_added: i64) -> String {
    format!(
        "Merged {boxes_added} boxes into {}. New total: {} boxes",
        record.label(),
        record.box_count
    )
}

/// Details for an in-place edit, listing the fields that changed.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn update_details(before: &stock::Model, after: &stock::Model) -> String {
    let mut changes = Vec::new();
    if before.label() != after.label() {
        changes.push(format!("item {} -> {}", before.label(), after.label()));
    }
    if before.box_count != after.box_count {
        changes.push(format!("boxes {} -> {}", before.box_count, after.box_count));
    }
    if before.pieces_per_box != after.pieces_per_box {
        changes.push(format!(
            "pieces/box {} -> {}",
            before.pieces_per_box, after.pieces_per_box
        ));
    }
    if before.location != after.location {
        changes.push(format!(
            "location {} -> {}",
            before.location.as_deref().unwrap_or("-"),
            after.location.as_deref().unwrap_or("-")
        ));
    }
    if before.price_per_box != after.price_per_box {
        changes.push(format!(
            "price/box {} -> {}",
            before.price_per_box, after.price_per_box
        ));
    }
    if before.price_per_sqft != after.price_per_sqft {
        changes.push(format!(
            "price/sqft {} -> {}",
            before.price_per_sqft, after.price_per_sqft
        ));
    }
    if before.sqft_per_box != after.sqft_per_box {
        changes.push(format!(
            "sqft/box {} -> {}",
            before.sqft_per_box, after.sqft_per_box
        ));
    }

    if changes.is_empty() {
        format!("Updated stock ID {} ({}): no changes", after.id, after.label())
    } else {
        format!(
            "Updated stock ID {} ({}): {}",
            after.id,
            after.label(),
            changes.join(", ")
        )
    }
}

/// Details for a deletion. Falls back to the bare id when the record could not
/// be read beforehand.
#[must_use]
pub fn delete_details(stock_id: i64, record: Option<&stock::Model>) -> String {
    record.map_or_else(
        || format!("Deleted stock ID: {stock_id}"),
        |record| format!("Deleted stock ID {stock_id}: {}", record.label()),
    )
}

/// Details for a deduction.
#[must_use]
pub fn deduct_details(record: &stock::Model, boxes_removed: i64) -> String {
    format!(
        "Deducted {boxes_removed} boxes from {}. Remaining: {} boxes",
        record.label(),
        record.box_count
    )
}
