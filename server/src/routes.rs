use std::sync::Arc;

use axum::{Json, extract::State as AppState, response::IntoResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use store::{DeliveryLedger, model::DeliveryStatus};

use crate::{error::AppError, state::State};

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok", "message": "Tiffin Manager API" }))
}

pub async fn status_handler(
    AppState(state): AppState<Arc<State>>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.scheduler.status_report().await?;

    Ok(Json(report))
}

#[derive(Deserialize)]
pub struct MarkDeliveredPayload {
    pub user_id: String,
    pub delivery_date: String,
    pub vendor_id: String,
}

/// The one fulfillment writer: the scheduler never touches these fields on
/// existing records.
pub async fn mark_delivered_handler(
    AppState(state): AppState<Arc<State>>,
    Json(payload): Json<MarkDeliveredPayload>,
) -> Result<impl IntoResponse, AppError> {
    let Some(mut record) = state
        .store
        .find_delivery(&payload.user_id, &payload.delivery_date, &payload.vendor_id)
        .await?
    else {
        return Err(AppError::DeliveryNotFound);
    };

    record.delivered = true;
    record.delivered_at = Some(Utc::now());
    record.status = DeliveryStatus::Delivered;
    state.store.update_delivery(&record).await?;

    Ok(Json(json!({ "message": "Marked as delivered", "delivery": record })))
}

pub async fn auto_mark_handler(
    AppState(state): AppState<Arc<State>>,
) -> Result<impl IntoResponse, AppError> {
    let marked = state.scheduler.auto_mark().await?;

    Ok(Json(json!({ "message": "Auto-mark complete", "marked": marked })))
}
