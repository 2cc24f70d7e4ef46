use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::assignment_controller::AssignmentController;
use crate::dto::assignment_dto::{
    AssignmentConflictResponse, AssignmentFilters, AssignmentResponse, AssignmentStatsQuery,
    AssignmentWarningResponse, BatchAssignmentItemResponse, BatchCreateAssignmentRequest,
    CreateAssignmentRequest, DayAssignmentsQuery, DayRangeQuery, ResourceAssignmentsQuery,
    UpdateAssignmentRequest,
};
use crate::dto::common_dto::ApiResponse;
use crate::services::assignment_service::AssignmentOutcome;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_assignment_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_assignment))
        .route("/", get(list_assignments))
        .route("/batch", post(batch_create_assignments))
        .route("/stats", get(assignment_stats))
        .route("/date/:date", get(assignments_by_day))
        .route("/range", get(assignments_by_range))
        .route("/destination/:destination", get(assignments_by_destination))
        .route("/guide/:guide_id", get(assignments_by_guide))
        .route("/vehicle/:vehicle_id", get(assignments_by_vehicle))
        .route("/:id", get(get_assignment))
        .route("/:id", put(update_assignment))
        .route("/:id", delete(delete_assignment))
        .route("/:id/confirm", put(confirm_assignment))
        .route("/:id/cancel", put(cancel_assignment))
}

/// Traducir el resultado tipado del servicio a la respuesta HTTP:
/// 201/200 para éxito, 200 con aviso para advertencias blandas y 409 con
/// cuerpo propio para conflictos duros.
fn outcome_response(outcome: AssignmentOutcome, created: bool) -> Response {
    match outcome {
        AssignmentOutcome::Ok(assignment) => {
            let status = if created { StatusCode::CREATED } else { StatusCode::OK };
            let message = if created {
                "Asignación creada exitosamente"
            } else {
                "Asignación actualizada exitosamente"
            };
            (
                status,
                Json(ApiResponse::success_with_message(
                    AssignmentResponse::from(assignment),
                    message.to_string(),
                )),
            )
                .into_response()
        }
        AssignmentOutcome::Warning { kind, message } => (
            StatusCode::OK,
            Json(AssignmentWarningResponse {
                success: false,
                warning_kind: kind.as_str().to_string(),
                message,
            }),
        )
            .into_response(),
        AssignmentOutcome::Conflict { kind, message } => (
            StatusCode::CONFLICT,
            Json(AssignmentConflictResponse {
                success: false,
                conflict_kind: kind.as_str().to_string(),
                message,
            }),
        )
            .into_response(),
    }
}

async fn create_assignment(
    State(state): State<AppState>,
    Json(request): Json<CreateAssignmentRequest>,
) -> Result<Response, AppError> {
    let controller = AssignmentController::new(&state);
    let outcome = controller.create(request).await?;
    Ok(outcome_response(outcome, true))
}

async fn batch_create_assignments(
    State(state): State<AppState>,
    Json(request): Json<BatchCreateAssignmentRequest>,
) -> Result<Json<Vec<BatchAssignmentItemResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let results = controller.batch_create(request.assignments).await?;

    let items = results
        .into_iter()
        .enumerate()
        .map(|(index, result)| match result {
            Ok(AssignmentOutcome::Ok(assignment)) => BatchAssignmentItemResponse {
                index,
                outcome: "created".to_string(),
                assignment: Some(AssignmentResponse::from(assignment)),
                conflict_kind: None,
                warning_kind: None,
                message: None,
            },
            Ok(AssignmentOutcome::Warning { kind, message }) => BatchAssignmentItemResponse {
                index,
                outcome: "warning".to_string(),
                assignment: None,
                conflict_kind: None,
                warning_kind: Some(kind.as_str().to_string()),
                message: Some(message),
            },
            Ok(AssignmentOutcome::Conflict { kind, message }) => BatchAssignmentItemResponse {
                index,
                outcome: "conflict".to_string(),
                assignment: None,
                conflict_kind: Some(kind.as_str().to_string()),
                warning_kind: None,
                message: Some(message),
            },
            Err(e) => BatchAssignmentItemResponse {
                index,
                outcome: "error".to_string(),
                assignment: None,
                conflict_kind: None,
                warning_kind: None,
                message: Some(e.to_string()),
            },
        })
        .collect();

    Ok(Json(items))
}

async fn list_assignments(
    State(state): State<AppState>,
    Query(filters): Query<AssignmentFilters>,
) -> Result<Response, AppError> {
    let controller = AssignmentController::new(&state);
    let page = controller.page(filters).await?;
    Ok(Json(page).into_response())
}

async fn get_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssignmentResponse>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn assignments_by_day(
    State(state): State<AppState>,
    Path(date): Path<chrono::NaiveDate>,
    Query(query): Query<DayAssignmentsQuery>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller
        .by_day(date, query.include_cancelled.unwrap_or(false))
        .await?;
    Ok(Json(response))
}

async fn assignments_by_range(
    State(state): State<AppState>,
    Query(query): Query<DayRangeQuery>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.by_day_range(query.start_date, query.end_date).await?;
    Ok(Json(response))
}

async fn assignments_by_destination(
    State(state): State<AppState>,
    Path(destination): Path<String>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.by_destination(&destination).await?;
    Ok(Json(response))
}

async fn assignments_by_guide(
    State(state): State<AppState>,
    Path(guide_id): Path<Uuid>,
    Query(query): Query<ResourceAssignmentsQuery>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.by_guide(guide_id, query.date).await?;
    Ok(Json(response))
}

async fn assignments_by_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Query(query): Query<ResourceAssignmentsQuery>,
) -> Result<Json<Vec<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.by_vehicle(vehicle_id, query.date).await?;
    Ok(Json(response))
}

async fn assignment_stats(
    State(state): State<AppState>,
    Query(query): Query<AssignmentStatsQuery>,
) -> Result<Response, AppError> {
    let controller = AssignmentController::new(&state);
    let stats = controller.stats(query.date).await?;
    Ok(Json(stats).into_response())
}

async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAssignmentRequest>,
) -> Result<Response, AppError> {
    let controller = AssignmentController::new(&state);
    let outcome = controller.update(id, request).await?;
    Ok(outcome_response(outcome, false))
}

async fn confirm_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AssignmentResponse>>, AppError> {
    let controller = AssignmentController::new(&state);
    let response = controller.confirm(id).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Asignación confirmada exitosamente".to_string(),
    )))
}

async fn cancel_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = AssignmentController::new(&state);
    controller.cancel(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Asignación cancelada"
    })))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = AssignmentController::new(&state);
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Asignación eliminada exitosamente"
    })))
}
