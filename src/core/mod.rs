//! Core business logic - framework-agnostic stock and audit operations.
//!
//! The HTTP layer only parses requests and renders responses; everything with
//! semantics lives here.

/// Audit log reads, writes, and entry text
pub mod audit;
/// Reconciliation engine: merge-or-create, deduction, edit, and delete
pub mod reconcile;
/// Stock repository over the `stocks` table
pub mod stock;
/// Input validation
pub mod validate;
