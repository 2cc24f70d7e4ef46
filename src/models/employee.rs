//! Modelos del directorio externo de empleados y vehículos
//!
//! Estos tipos se deserializan de las respuestas del componente de gestión
//! de empleados y del directorio de vehículos; nunca se persisten aquí.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Estado laboral de un empleado/guía según el directorio externo
///
/// Es una señal consultiva para el chequeo de conflictos, no una restricción
/// dura: la UI muestra una confirmación en lugar de un rechazo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    Idle,
    Busy,
    OnLeave,
    OnTour,
    Standby,
}

impl WorkStatus {
    /// Estados que disparan la advertencia de asignación (soft conflict)
    pub fn requires_caution(&self) -> bool {
        matches!(self, WorkStatus::Busy | WorkStatus::OnLeave | WorkStatus::OnTour)
    }
}

/// Información de un empleado/guía del directorio externo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeInfo {
    pub id: Uuid,
    pub full_name: String,
    pub work_status: WorkStatus,
}

/// Información de un vehículo del directorio externo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub id: Uuid,
    pub license_plate: Option<String>,
    /// Cupo de conductores permanentes del vehículo
    pub max_drivers: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caution_statuses() {
        assert!(WorkStatus::Busy.requires_caution());
        assert!(WorkStatus::OnLeave.requires_caution());
        assert!(WorkStatus::OnTour.requires_caution());
        assert!(!WorkStatus::Idle.requires_caution());
        assert!(!WorkStatus::Standby.requires_caution());
    }

    #[test]
    fn test_work_status_serde() {
        let json = "\"on_tour\"";
        let status: WorkStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status, WorkStatus::OnTour);
        assert_eq!(serde_json::to_string(&status).unwrap(), json);
    }
}
