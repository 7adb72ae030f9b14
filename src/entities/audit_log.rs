//! Audit log entity - Append-only record of every stock mutation.
//!
//! Entries reference stock only through their `details` text, so they outlive
//! the record they describe.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_logs")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier, increasing with insertion order
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Server clock at insertion
    pub timestamp: DateTimeUtc,
    /// What kind of mutation this entry records
    pub action_type: ActionType,
    /// Who performed it (`"Unknown"` when no identity was supplied)
    pub username: String,
    /// Free-text description of the change
    pub details: String,
}

/// The fixed set of mutation tags. Stored as their literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ActionType {
    /// A new stock row was inserted
    #[sea_orm(string_value = "ADD")]
    #[serde(rename = "ADD")]
    Add,
    /// Incoming boxes were merged into an existing row
    #[sea_orm(string_value = "ADD (MERGE)")]
    #[serde(rename = "ADD (MERGE)")]
    AddMerge,
    /// A row was edited in place
    #[sea_orm(string_value = "UPDATE")]
    #[serde(rename = "UPDATE")]
    Update,
    /// A row was physically removed
    #[sea_orm(string_value = "DELETE")]
    #[serde(rename = "DELETE")]
    Delete,
    /// Boxes were taken out of a row
    #[sea_orm(string_value = "DEDUCT")]
    #[serde(rename = "DEDUCT")]
    Deduct,
}

impl ActionType {
    /// The tag exactly as stored and displayed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::AddMerge => "ADD (MERGE)",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Deduct => "DEDUCT",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit entries have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_action_type_serializes_as_stored_tag() {
        assert_eq!(
            serde_json::to_string(&ActionType::AddMerge).unwrap(),
            "\"ADD (MERGE)\""
        );
        assert_eq!(ActionType::AddMerge.to_value(), "ADD (MERGE)");
        assert_eq!(ActionType::Deduct.to_string(), "DEDUCT");
    }
}
