use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Caller;
use crate::categories::service;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::category::CategoryRow;
use crate::state::AppState;
use crate::validation::parse_id;

#[derive(Debug, Deserialize)]
pub struct CategoryNameRequest {
    pub name: Option<String>,
}

/// GET /categories
pub async fn handle_list_categories(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<Vec<CategoryRow>>, AppError> {
    let categories = service::list_categories(&caller.scope(&state)).await?;
    Ok(Json(categories))
}

/// POST /categories
pub async fn handle_create_category(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(req): ApiJson<CategoryNameRequest>,
) -> Result<Json<CategoryRow>, AppError> {
    let category = service::create_category(&caller.scope(&state), req.name).await?;
    Ok(Json(category))
}

/// PUT /categories/:id
pub async fn handle_update_category(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CategoryNameRequest>,
) -> Result<Json<CategoryRow>, AppError> {
    let id = parse_id(&id)?;
    let category = service::rename_category(&caller.scope(&state), id, req.name).await?;
    Ok(Json(category))
}

/// DELETE /categories/:id
pub async fn handle_delete_category(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id)?;
    service::delete_category(&caller.scope(&state), id).await?;
    Ok(Json(json!({ "success": true })))
}
