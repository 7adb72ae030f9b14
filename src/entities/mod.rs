//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod audit_log;
pub mod stock;

// Re-export specific types to avoid conflicts
pub use audit_log::{
    ActionType, Column as AuditLogColumn, Entity as AuditLog, Model as AuditLogModel,
};
pub use stock::{Column as StockColumn, Entity as Stock, Model as StockModel};
