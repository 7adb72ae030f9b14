//! Reconciliation engine - Every stock mutation that users trigger goes through here.
//!
//! Each operation validates its input, performs the write against
//! [`crate::core::stock`], and then appends exactly one entry to
//! [`crate::core::audit`]. The audit write happens after the stock write has been
//! committed and cannot undo it.
//!
//! Creation never inserts blindly. [`reconcile`] looks the incoming
//! `(company, tile_name, tile_size)` up and either merges the incoming boxes into
//! the existing record or inserts a new one. Both branches are single atomic
//! statements inside one database transaction, and the unique key index makes a
//! duplicate row impossible even when two requests race on the same key.

use crate::{
    core::{
        audit,
        stock::{self, StockInput, StockKey},
        validate,
    },
    entities::{ActionType, stock as stock_entity},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Outcome of [`reconcile`]: the canonical record and which action produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// [`ActionType::Add`] for a new record, [`ActionType::AddMerge`] for a merge
    pub action: ActionType,
    /// The record as stored after the operation
    pub stock: stock_entity::Model,
}

impl Reconciliation {
    /// Whether the incoming boxes were merged into an existing record.
    #[must_use]
    pub fn merged(&self) -> bool {
        self.action == ActionType::AddMerge
    }
}

/// Outcome of [`deduct`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deduction {
    /// Human-readable summary for the user
    pub message: String,
    /// The record after the deduction
    pub stock: stock_entity::Model,
}

/// Adds stock, merging into an existing record with the same key.
///
/// When a record with the same `(company, tile_name, tile_size)` exists, its box
/// count grows by `input.box_count` and nothing else about it changes; location and
/// pricing in `input` are ignored. Otherwise a new record is inserted with every
/// supplied attribute. One `ADD` or `ADD (MERGE)` audit entry is written.
///
/// # Errors
/// Returns [`Error::Validation`] for a blank key, negative values, or a merged
/// total that would not fit in an `i64`, or a database error if the write fails.
#[instrument(skip(db, input), fields(key = %input.key()))]
pub async fn reconcile(
    db: &DatabaseConnection,
    input: StockInput,
    actor: Option<&str>,
) -> Result<Reconciliation> {
    let input = input.normalized();
    validate::validate_stock_input(&input)?;

    let key = input.key();
    let boxes = input.box_count;
    let now = Utc::now();

    let txn = db.begin().await?;

    // Increment before insert: on SQLite this takes the write lock for the txn.
    let merged = stock::increment_box_count(&txn, &key, boxes, now).await? > 0;
    if !merged
        && (stock::find_by_key(&txn, &key).await?.is_some()
            || stock::insert_or_increment(&txn, input, now).await? == 0)
    {
        // The key exists but the increment was refused: the total would overflow.
        return Err(Error::Validation {
            message: format!(
                "Adding {boxes} boxes to {key} would exceed the maximum box count"
            ),
        });
    }

    let record = stock::find_by_key(&txn, &key)
        .await?
        .ok_or_else(|| Error::StockNotFound {
            key: key.to_string(),
        })?;

    txn.commit().await?;

    let (action, details) = if merged {
        (ActionType::AddMerge, audit::merge_details(&record, boxes))
    } else {
        (ActionType::Add, audit::add_details(&record))
    };
    info!(
        id = record.id,
        %action,
        box_count = record.box_count,
        "stock reconciled"
    );
    audit::append(db, action, actor, &details).await;

    Ok(Reconciliation {
        action,
        stock: record,
    })
}

/// Removes boxes from the record with the given key.
///
/// The deduction is all-or-nothing: if fewer than `boxes_to_deduct` boxes are in
/// stock the record is left untouched and no audit entry is written.
///
/// # Errors
/// - [`Error::Validation`] for a blank key or a non-positive amount
/// - [`Error::StockNotFound`] if no record has the key
/// - [`Error::InsufficientStock`] if the count would go negative
#[instrument(skip(db))]
pub async fn deduct(
    db: &DatabaseConnection,
    key: StockKey,
    boxes_to_deduct: i64,
    actor: Option<&str>,
) -> Result<Deduction> {
    let key = key.normalized();
    validate::validate_key(&key)?;
    validate::validate_deduction(boxes_to_deduct)?;

    let txn = db.begin().await?;

    let deducted =
        stock::decrement_box_count_if_available(&txn, &key, boxes_to_deduct, Utc::now()).await?
            > 0;

    let record = stock::find_by_key(&txn, &key)
        .await?
        .ok_or_else(|| Error::StockNotFound {
            key: key.to_string(),
        })?;

    if !deducted {
        return Err(Error::InsufficientStock {
            available: record.box_count,
            requested: boxes_to_deduct,
        });
    }

    txn.commit().await?;

    info!(
        id = record.id,
        boxes_to_deduct,
        remaining = record.box_count,
        "stock deducted"
    );
    audit::append(
        db,
        ActionType::Deduct,
        actor,
        &audit::deduct_details(&record, boxes_to_deduct),
    )
    .await;

    Ok(Deduction {
        message: format!(
            "Successfully deducted {boxes_to_deduct} boxes. Remaining: {} boxes",
            record.box_count
        ),
        stock: record,
    })
}

/// Edits a record in place, replacing every attribute including the box count.
///
/// # Errors
/// - [`Error::Validation`] for a blank key or negative values
/// - [`Error::StockNotFound`] if the id does not exist
/// - [`Error::DuplicateStock`] if the new key belongs to another record
#[instrument(skip(db, input))]
pub async fn update(
    db: &DatabaseConnection,
    stock_id: i64,
    input: StockInput,
    actor: Option<&str>,
) -> Result<stock_entity::Model> {
    let input = input.normalized();
    validate::validate_stock_input(&input)?;

    let before = stock::get_by_id(db, stock_id)
        .await?
        .ok_or_else(|| Error::StockNotFound {
            key: stock_id.to_string(),
        })?;
    let after = stock::replace(db, stock_id, input).await?;

    info!(id = after.id, "stock updated");
    audit::append(
        db,
        ActionType::Update,
        actor,
        &audit::update_details(&before, &after),
    )
    .await;

    Ok(after)
}

/// Physically deletes a record and records a `DELETE` entry.
///
/// The record is read first so the entry can describe it. If it is already gone,
/// or the read fails, the entry names the id only. Deleting an absent id is not
/// an error.
///
/// # Errors
/// Returns a database error if the delete statement itself fails.
#[instrument(skip(db))]
pub async fn delete(db: &DatabaseConnection, stock_id: i64, actor: Option<&str>) -> Result<()> {
    let existing = match stock::get_by_id(db, stock_id).await {
        Ok(existing) => existing,
        Err(e) => {
            warn!("Could not read stock {stock_id} before deleting it: {e}");
            None
        }
    };

    let removed = stock::delete_by_id(db, stock_id).await?;
    info!(id = stock_id, removed, "stock deleted");

    audit::append(
        db,
        ActionType::Delete,
        actor,
        &audit::delete_details(stock_id, existing.as_ref()),
    )
    .await;

    Ok(())
}
