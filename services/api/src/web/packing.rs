//! services/api/src/web/packing.rs
//!
//! Packing list endpoints. Each item is stored and changed on its own.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use trip_planner_core::{
    domain::{NewPackingItem, PackingCategory},
    ports::PortError,
};

use crate::web::{
    protocol::{NewPackingItemRequest, PackingItemResponse, UpdatePackingItemRequest},
    rest::port_error,
    state::AppState,
};

/// GET /packing-items - The whole packing list
#[utoipa::path(
    get,
    path = "/packing-items",
    responses(
        (status = 200, description = "Packing list", body = [PackingItemResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_packing_items_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PackingItemResponse>>, (StatusCode, String)> {
    let items = state
        .db
        .list_packing_items()
        .await
        .map_err(|e| port_error("Failed to list packing items", e))?;
    Ok(Json(items.into_iter().map(PackingItemResponse::from).collect()))
}

/// POST /packing-items - Add an item (always starts unpacked)
#[utoipa::path(
    post,
    path = "/packing-items",
    request_body = NewPackingItemRequest,
    responses(
        (status = 201, description = "Item added", body = PackingItemResponse),
        (status = 400, description = "Unknown category or quantity below 1")
    )
)]
pub async fn add_packing_item_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewPackingItemRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let new_item = new_packing_item(req).map_err(|e| port_error("Invalid packing item", e))?;

    let item = state
        .db
        .add_packing_item(&new_item)
        .await
        .map_err(|e| port_error("Failed to add packing item", e))?;

    Ok((StatusCode::CREATED, Json(PackingItemResponse::from(item))))
}

/// PATCH /packing-items/{id} - Mark an item packed or unpacked
#[utoipa::path(
    patch,
    path = "/packing-items/{id}",
    params(("id" = i64, Path, description = "Packing item id")),
    request_body = UpdatePackingItemRequest,
    responses(
        (status = 200, description = "Item updated", body = PackingItemResponse),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_packing_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePackingItemRequest>,
) -> Result<Json<PackingItemResponse>, (StatusCode, String)> {
    let item = state
        .db
        .set_item_packed(id, req.packed)
        .await
        .map_err(|e| port_error("Failed to update packing item", e))?;
    Ok(Json(item.into()))
}

/// DELETE /packing-items/{id} - Remove an item
#[utoipa::path(
    delete,
    path = "/packing-items/{id}",
    params(("id" = i64, Path, description = "Packing item id")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn delete_packing_item_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .db
        .delete_packing_item(id)
        .await
        .map_err(|e| port_error("Failed to delete packing item", e))?;
    Ok(StatusCode::NO_CONTENT)
}

fn new_packing_item(req: NewPackingItemRequest) -> Result<NewPackingItem, PortError> {
    let category = req.category.parse::<PackingCategory>()?;
    let quantity = u32::try_from(req.quantity)
        .map_err(|_| PortError::InvalidInput(format!("Invalid quantity {}", req.quantity)))?;
    NewPackingItem::new(req.item, category, quantity)
}
