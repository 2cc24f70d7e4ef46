use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::assignment::{Assignment, AssignmentStatus};

// Request para crear una asignación
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssignmentRequest {
    pub tour_id: Uuid,
    pub date: NaiveDate,

    #[validate(length(min = 1, max = 200))]
    pub destination: String,

    pub guide_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,

    /// Conductor a vincular de forma permanente al vehículo (opcional)
    pub driver_employee_id: Option<Uuid>,

    /// Override explícito del operador ante una advertencia previa
    pub force_assign: Option<bool>,
}

// Request para crear asignaciones en lote (best-effort por elemento)
#[derive(Debug, Deserialize)]
pub struct BatchCreateAssignmentRequest {
    pub assignments: Vec<CreateAssignmentRequest>,
}

// Request para actualizar una asignación (reasignar guía/vehículo, cambiar fecha)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAssignmentRequest {
    pub date: Option<NaiveDate>,

    #[validate(length(min = 1, max = 200))]
    pub destination: Option<String>,

    pub guide_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub force_assign: Option<bool>,
}

// Filtros para el listado paginado de asignaciones
#[derive(Debug, Deserialize)]
pub struct AssignmentFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub destination: Option<String>,
    pub guide_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub status: Option<AssignmentStatus>,
    pub include_cancelled: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// Query para los listados por guía/vehículo
#[derive(Debug, Deserialize)]
pub struct ResourceAssignmentsQuery {
    pub date: Option<NaiveDate>,
}

// Query para el listado por fecha
#[derive(Debug, Deserialize)]
pub struct DayAssignmentsQuery {
    pub include_cancelled: Option<bool>,
}

// Query para el listado por rango de fechas inclusivo
#[derive(Debug, Deserialize)]
pub struct DayRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Query para estadísticas de asignación
#[derive(Debug, Deserialize)]
pub struct AssignmentStatsQuery {
    pub date: NaiveDate,
}

// Response de asignación para la API
#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub date: NaiveDate,
    pub destination: String,
    pub guide_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub status: AssignmentStatus,
    pub force_assigned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Assignment> for AssignmentResponse {
    fn from(assignment: Assignment) -> Self {
        Self {
            id: assignment.id,
            tour_id: assignment.tour_id,
            date: assignment.day,
            destination: assignment.destination,
            guide_id: assignment.guide_id,
            vehicle_id: assignment.vehicle_id,
            status: assignment.status,
            force_assigned: assignment.force_assigned,
            created_at: assignment.created_at,
            updated_at: assignment.updated_at,
        }
    }
}

// Response de conflicto duro (409) - forma distinta de un error genérico
// para que la consola pueda ramificar su comportamiento
#[derive(Debug, Serialize)]
pub struct AssignmentConflictResponse {
    pub success: bool,
    pub conflict_kind: String,
    pub message: String,
}

// Response de advertencia blanda (200 con aviso): el operador puede
// reenviar con force_assign=true. Reemplaza la convención code===2
// del sistema original.
#[derive(Debug, Serialize)]
pub struct AssignmentWarningResponse {
    pub success: bool,
    pub warning_kind: String,
    pub message: String,
}

// Resultado por elemento de un lote de asignaciones
#[derive(Debug, Serialize)]
pub struct BatchAssignmentItemResponse {
    pub index: usize,
    pub outcome: String, // created | warning | conflict | error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<AssignmentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Conteo de asignaciones por destino
#[derive(Debug, Serialize)]
pub struct DestinationCount {
    pub destination: String,
    pub count: i64,
}

// Response de estadísticas de asignación para una fecha
#[derive(Debug, Serialize)]
pub struct AssignmentStatsResponse {
    pub date: NaiveDate,
    pub total_assignments: i64,
    pub by_destination: Vec<DestinationCount>,
    pub unassigned_guide_count: i64,
    pub unassigned_vehicle_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserializes() {
        let json = r#"{
            "tour_id": "550e8400-e29b-41d4-a716-446655440000",
            "date": "2024-06-01",
            "destination": "Valle Sagrado",
            "guide_id": "550e8400-e29b-41d4-a716-446655440001",
            "force_assign": true
        }"#;

        let request: CreateAssignmentRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(request.destination, "Valle Sagrado");
        assert!(request.guide_id.is_some());
        assert!(request.vehicle_id.is_none());
        assert_eq!(request.force_assign, Some(true));
    }

    #[test]
    fn test_create_request_validates_destination() {
        let request = CreateAssignmentRequest {
            tour_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            destination: String::new(),
            guide_id: Some(Uuid::new_v4()),
            vehicle_id: None,
            driver_employee_id: None,
            force_assign: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&AssignmentStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }
}
