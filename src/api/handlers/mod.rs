//! Route handlers

/// Audit log endpoints, admin only
pub mod admin;
/// Liveness and database reachability
pub mod health;
/// Stock CRUD, reconciliation, and deduction endpoints
pub mod stocks;
