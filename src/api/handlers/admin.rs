//! Audit log endpoints under `/api/admin/logs`. Every handler requires [`Admin`].

use crate::{
    api::{AppState, actor::Admin},
    core::audit,
    entities::audit_log,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::info;

/// `GET /api/admin/logs` - newest first.
pub async fn list_logs(
    State(state): State<AppState>,
    _admin: Admin,
) -> Result<Json<Vec<audit_log::Model>>> {
    let entries = audit::list(&state.database).await?;
    Ok(Json(entries))
}

/// `DELETE /api/admin/logs` - removes every entry.
pub async fn clear_logs(
    State(state): State<AppState>,
    Admin(username): Admin,
) -> Result<Json<Value>> {
    let deleted = audit::clear_all(&state.database).await?;
    info!(%username, deleted, "audit log cleared");
    Ok(Json(json!({
        "message": format!("Cleared {deleted} log entries"),
        "deleted": deleted,
    })))
}

/// `DELETE /api/admin/logs/:id`
pub async fn delete_log(
    State(state): State<AppState>,
    Admin(username): Admin,
    Path(entry_id): Path<i64>,
) -> Result<Json<Value>> {
    if !audit::delete_one(&state.database, entry_id).await? {
        return Err(Error::LogEntryNotFound { id: entry_id });
    }
    info!(%username, entry_id, "audit log entry deleted");
    Ok(Json(json!({ "success": true })))
}
