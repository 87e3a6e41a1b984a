//! Handlers for the `/items` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use stockroom_core::error::CoreError;
use stockroom_core::types::ItemId;
use stockroom_db::models::item::{CreateItem, Item, UpdateItem};
use stockroom_db::repositories::ItemRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

/// Body returned by a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
    pub id: ItemId,
}

fn not_found(id: ItemId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Item", id })
}

/// GET /api/items
///
/// Every item, newest first. No pagination.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Item>>> {
    let items = ItemRepo::list(&state.pool).await?;
    Ok(Json(items))
}

/// GET /api/items/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<ItemId>,
) -> AppResult<Json<Item>> {
    let item = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(item))
}

/// POST /api/items
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    let item = ItemRepo::create(&state.pool, input).await?;
    tracing::info!(item_id = %item.id, name = %item.name, "Item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/items/{id}
///
/// Accepts any subset of item fields. Present fields overwrite, absent
/// fields are preserved, `null` clears an optional field.
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<ItemId>,
    AppJson(input): AppJson<UpdateItem>,
) -> AppResult<Json<Item>> {
    let item = ItemRepo::update(&state.pool, id, input)
        .await?
        .ok_or_else(|| not_found(id))?;
    tracing::info!(item_id = %id, "Item updated");
    Ok(Json(item))
}

/// DELETE /api/items/{id}
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<ItemId>,
) -> AppResult<Json<DeleteResponse>> {
    if !ItemRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(item_id = %id, "Item deleted");
    Ok(Json(DeleteResponse {
        message: "Item deleted",
        id,
    }))
}
