//! Input validation shared by the reconciliation engine and the HTTP layer.
//!
//! Everything here runs before the store is touched and fails with
//! [`Error::Validation`].

use crate::{
    core::stock::{StockInput, StockKey},
    errors::{Error, Result},
};

fn invalid(message: impl Into<String>) -> Error {
    Error::Validation {
        message: message.into(),
    }
}

/// Requires all three key parts to be non-blank.
pub fn validate_key(key: &StockKey) -> Result<()> {
    if key.company.trim().is_empty() {
        return Err(invalid("Company is required"));
    }
    if key.tile_name.trim().is_empty() {
        return Err(invalid("Tile name is required"));
    }
    if key.tile_size.trim().is_empty() {
        return Err(invalid("Tile size is required"));
    }
    Ok(())
}

fn validate_price(label: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!(
            "{label} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}

/// Checks the key and that every count and price is non-negative and finite.
pub fn validate_stock_input(input: &StockInput) -> Result<()> {
    validate_key(&input.key())?;

    if input.box_count < 0 {
        return Err(invalid(format!(
            "Box count cannot be negative, got {}",
            input.box_count
        )));
    }
    if input.pieces_per_box < 0 {
        return Err(invalid(format!(
            "Pieces per box cannot be negative, got {}",
            input.pieces_per_box
        )));
    }
    validate_price("Price per box", input.price_per_box)?;
    validate_price("Price per sqft", input.price_per_sqft)?;
    validate_price("Sqft per box", input.sqft_per_box)?;
    Ok(())
}

/// A deduction must remove at least one box.
pub fn validate_deduction(boxes_to_deduct: i64) -> Result<()> {
    if boxes_to_deduct <= 0 {
        return Err(invalid(format!(
            "Boxes to deduct must be positive, got {boxes_to_deduct}"
        )));
    }
    Ok(())
}
