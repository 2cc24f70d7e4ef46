use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_driver_controller::VehicleDriverController;
use crate::dto::assignment_dto::AssignmentConflictResponse;
use crate::dto::common_dto::ApiResponse;
use crate::dto::vehicle_driver_dto::{BindDriverRequest, DriverBindingResponse};
use crate::services::assignment_service::DriverBindingOutcome;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_driver_router() -> Router<AppState> {
    Router::new()
        .route("/:vehicle_id/driver", get(list_drivers))
        .route("/:vehicle_id/driver", post(bind_driver))
        .route("/:vehicle_id/driver/:employee_id", delete(unbind_driver))
}

async fn list_drivers(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<Json<Vec<DriverBindingResponse>>, AppError> {
    let controller = VehicleDriverController::new(&state);
    let response = controller.list(vehicle_id).await?;
    Ok(Json(response))
}

async fn bind_driver(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Json(request): Json<BindDriverRequest>,
) -> Result<Response, AppError> {
    let controller = VehicleDriverController::new(&state);

    match controller.bind(vehicle_id, request).await? {
        DriverBindingOutcome::Ok(binding) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success_with_message(
                DriverBindingResponse::from(binding),
                "Conductor vinculado exitosamente".to_string(),
            )),
        )
            .into_response()),
        DriverBindingOutcome::Conflict { kind, message } => Ok((
            StatusCode::CONFLICT,
            Json(AssignmentConflictResponse {
                success: false,
                conflict_kind: kind.as_str().to_string(),
                message,
            }),
        )
            .into_response()),
    }
}

async fn unbind_driver(
    State(state): State<AppState>,
    Path((vehicle_id, employee_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = VehicleDriverController::new(&state);
    controller.unbind(vehicle_id, employee_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Conductor desvinculado exitosamente"
    })))
}
