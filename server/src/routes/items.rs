//! Inventory routes.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::header,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use crate::error::Result;
use crate::handlers::{
    handle_add_delivery, handle_clear_all, handle_consume, handle_delete_consumption,
    handle_delete_delivery, handle_export, handle_list_items, handle_trend, ConsumptionRequest,
    DeliveryRequest, ItemsResponse, MutationResponse, TrendResponse,
};
use crate::AppState;

/// Name of the downloaded report.
const EXPORT_FILENAME: &str = "inventory.csv";

/// Extractor results whose rejections are reported through `AppError`.
type Body<T> = std::result::Result<Json<T>, JsonRejection>;
type Params<T> = std::result::Result<Path<T>, PathRejection>;

/// Create inventory routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deliveries", post(add_delivery))
        .route("/consumption", post(consume))
        .route("/items", get(list_items).delete(clear_all))
        .route("/items/{item}/deliveries/{index}", delete(delete_delivery))
        .route("/items/{item}/consumption/{date}", delete(delete_consumption))
        .route("/items/{item}/trend", get(trend))
        .route("/export", get(export))
}

/// POST /deliveries - Record a delivery.
async fn add_delivery(
    State(state): State<AppState>,
    body: Body<DeliveryRequest>,
) -> Result<Json<MutationResponse>> {
    let Json(request) = body?;
    let mut inventory = state.inventory.lock().await;
    let response = handle_add_delivery(&mut inventory, request).await?;
    Ok(Json(response))
}

/// POST /consumption - Record consumption.
async fn consume(
    State(state): State<AppState>,
    body: Body<ConsumptionRequest>,
) -> Result<Json<MutationResponse>> {
    let Json(request) = body?;
    let mut inventory = state.inventory.lock().await;
    let response = handle_consume(&mut inventory, request).await?;
    Ok(Json(response))
}

/// DELETE /items/{item}/deliveries/{index} - Delete a delivery.
async fn delete_delivery(
    State(state): State<AppState>,
    params: Params<(String, i64)>,
) -> Result<Json<MutationResponse>> {
    let Path((item, index)) = params?;
    let mut inventory = state.inventory.lock().await;
    let response = handle_delete_delivery(&mut inventory, &item, index).await?;
    Ok(Json(response))
}

/// DELETE /items/{item}/consumption/{date} - Delete a day's consumption.
async fn delete_consumption(
    State(state): State<AppState>,
    params: Params<(String, String)>,
) -> Result<Json<MutationResponse>> {
    let Path((item, date)) = params?;
    let mut inventory = state.inventory.lock().await;
    let response = handle_delete_consumption(&mut inventory, &item, &date).await?;
    Ok(Json(response))
}

/// DELETE /items - Clear the inventory.
async fn clear_all(State(state): State<AppState>) -> Result<Json<MutationResponse>> {
    let mut inventory = state.inventory.lock().await;
    let response = handle_clear_all(&mut inventory).await?;
    Ok(Json(response))
}

/// GET /items - List balances and histories.
async fn list_items(State(state): State<AppState>) -> Json<ItemsResponse> {
    let inventory = state.inventory.lock().await;
    Json(handle_list_items(inventory.ledger()))
}

/// GET /items/{item}/trend - Consumption series of one item.
async fn trend(
    State(state): State<AppState>,
    params: Params<String>,
) -> Result<Json<TrendResponse>> {
    let Path(item) = params?;
    let inventory = state.inventory.lock().await;
    let response = handle_trend(inventory.ledger(), &item)?;
    Ok(Json(response))
}

/// GET /export - Download the CSV report.
async fn export(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = {
        let inventory = state.inventory.lock().await;
        handle_export(inventory.ledger())?
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        body,
    ))
}
