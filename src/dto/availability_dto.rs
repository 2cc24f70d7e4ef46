use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::availability::{AvailabilityRecord, AvailabilityStatus, ResourceKind};

// Request para fijar la disponibilidad de un recurso en una fecha
#[derive(Debug, Deserialize, Validate)]
pub struct SetAvailabilityRequest {
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
    pub date: NaiveDate,
    pub status: AvailabilityStatus,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

// Request para fijar la disponibilidad sobre un rango de fechas inclusivo.
// La operación es atómica: o se escriben todas las fechas o ninguna.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchSetAvailabilityRequest {
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: AvailabilityStatus,

    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

// Query para consultar disponibilidad
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// Response de un registro de disponibilidad
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
    pub date: NaiveDate,
    pub status: AvailabilityStatus,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AvailabilityRecord> for AvailabilityResponse {
    fn from(record: AvailabilityRecord) -> Self {
        Self {
            id: record.id,
            resource_id: record.resource_id,
            resource_kind: record.resource_kind,
            date: record.day,
            status: record.status,
            start_time: record.start_time,
            end_time: record.end_time,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

// Response de una actualización en lote
#[derive(Debug, Serialize)]
pub struct BatchUpdateResponse {
    pub updated_count: u64,
}

// Response de estadísticas de disponibilidad
#[derive(Debug, Serialize)]
pub struct AvailabilityStatsResponse {
    pub available_days: i64,
    pub unavailable_days: i64,
    pub current_assignments: i64,
    pub availability_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_request_deserializes() {
        let json = r#"{
            "resource_id": "550e8400-e29b-41d4-a716-446655440000",
            "resource_kind": "vehicle",
            "date": "2024-06-01",
            "status": "unavailable",
            "notes": "Mantenimiento programado"
        }"#;

        let request: SetAvailabilityRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.resource_kind, ResourceKind::Vehicle);
        assert_eq!(request.status, AvailabilityStatus::Unavailable);
        assert!(request.start_time.is_none());
    }

    #[test]
    fn test_status_roundtrip_snake_case() {
        let json = serde_json::to_string(&AvailabilityStatus::OutOfService).unwrap();
        assert_eq!(json, "\"out_of_service\"");
        let parsed: AvailabilityStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, AvailabilityStatus::OutOfService);
    }
}
