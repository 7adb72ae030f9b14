//! Stock endpoints under `/api/stocks`.
//!
//! Creation always goes through [`reconcile::reconcile`]; there is no endpoint
//! that inserts without merging.

use crate::{
    api::{AppState, actor::Actor, json::ApiJson},
    core::{
        reconcile::{self, Deduction},
        stock::{self, ALL_COMPANIES, StockInput, StockKey},
    },
    entities::stock as stock_entity,
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

/// Query string for [`list_stocks`].
#[derive(Debug, Default, Deserialize)]
pub struct ListStocksQuery {
    /// Company to filter on; omitted or `ALL` lists everything
    pub company: Option<String>,
}

/// Body of `POST /api/stocks/deduct`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeductRequest {
    /// Supplying company
    pub company: String,
    /// Tile design name
    pub tile_name: String,
    /// Tile dimensions
    pub tile_size: String,
    /// Boxes to remove; must be positive
    pub boxes_to_deduct: i64,
}

/// `GET /api/stocks[?company=...]`
pub async fn list_stocks(
    State(state): State<AppState>,
    Query(query): Query<ListStocksQuery>,
) -> Result<Json<Vec<stock_entity::Model>>> {
    let company = query.company.as_deref().unwrap_or(ALL_COMPANIES);
    let stocks = stock::list_by_company(&state.database, company).await?;
    Ok(Json(stocks))
}

/// `GET /api/stocks/:id`
pub async fn get_stock(
    State(state): State<AppState>,
    Path(stock_id): Path<i64>,
) -> Result<Json<stock_entity::Model>> {
    stock::get_by_id(&state.database, stock_id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::StockNotFound {
            key: stock_id.to_string(),
        })
}

/// `POST /api/stocks` - merge-or-create. Answers 201 for a new record and 200
/// for a merge.
pub async fn create_stock(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(input): ApiJson<StockInput>,
) -> Result<(StatusCode, Json<stock_entity::Model>)> {
    let outcome = reconcile::reconcile(&state.database, input, actor.username()).await?;
    let status = if outcome.merged() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(outcome.stock)))
}

/// `POST /api/stocks/deduct`
pub async fn deduct_stock(
    State(state): State<AppState>,
    actor: Actor,
    ApiJson(request): ApiJson<DeductRequest>,
) -> Result<Json<Deduction>> {
    let key = StockKey::new(request.company, request.tile_name, request.tile_size);
    let deduction = reconcile::deduct(
        &state.database,
        key,
        request.boxes_to_deduct,
        actor.username(),
    )
    .await?;
    Ok(Json(deduction))
}

/// `PUT /api/stocks/:id`
pub async fn update_stock(
    State(state): State<AppState>,
    actor: Actor,
    Path(stock_id): Path<i64>,
    ApiJson(input): ApiJson<StockInput>,
) -> Result<Json<stock_entity::Model>> {
    let updated = reconcile::update(&state.database, stock_id, input, actor.username()).await?;
    Ok(Json(updated))
}

/// `DELETE /api/stocks/:id` - succeeds whether or not the record still existed.
pub async fn delete_stock(
    State(state): State<AppState>,
    actor: Actor,
    Path(stock_id): Path<i64>,
) -> Result<Json<Value>> {
    reconcile::delete(&state.database, stock_id, actor.username()).await?;
    Ok(Json(json!({ "success": true })))
}
