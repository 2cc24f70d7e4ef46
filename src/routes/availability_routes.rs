use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::controllers::availability_controller::AvailabilityController;
use crate::dto::availability_dto::{
    AvailabilityQuery, AvailabilityResponse, AvailabilityStatsResponse, BatchSetAvailabilityRequest,
    BatchUpdateResponse, SetAvailabilityRequest,
};
use crate::dto::common_dto::ApiResponse;
use crate::models::availability::ResourceKind;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_availability_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_availability))
        .route("/", post(set_availability))
        .route("/batch", post(batch_set_availability))
        .route("/stats", get(availability_stats))
        .route("/:resource_kind/:resource_id/:date", delete(delete_availability))
}

async fn list_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<AvailabilityResponse>>, AppError> {
    let controller = AvailabilityController::new(&state);
    let response = controller.list(query).await?;
    Ok(Json(response))
}

async fn set_availability(
    State(state): State<AppState>,
    Json(request): Json<SetAvailabilityRequest>,
) -> Result<Json<ApiResponse<AvailabilityResponse>>, AppError> {
    let controller = AvailabilityController::new(&state);
    let response = controller.set(request).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Disponibilidad actualizada exitosamente".to_string(),
    )))
}

async fn batch_set_availability(
    State(state): State<AppState>,
    Json(request): Json<BatchSetAvailabilityRequest>,
) -> Result<Json<BatchUpdateResponse>, AppError> {
    let controller = AvailabilityController::new(&state);
    let response = controller.batch_set(request).await?;
    Ok(Json(response))
}

async fn availability_stats(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityStatsResponse>, AppError> {
    let controller = AvailabilityController::new(&state);
    let response = controller.stats(query).await?;
    Ok(Json(response))
}

async fn delete_availability(
    State(state): State<AppState>,
    Path((resource_kind, resource_id, date)): Path<(ResourceKind, Uuid, NaiveDate)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = AvailabilityController::new(&state);
    controller.delete(resource_kind, resource_id, date).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Disponibilidad eliminada"
    })))
}
