//! Modelo de disponibilidad de recursos
//!
//! Este módulo contiene los registros de disponibilidad por recurso y fecha
//! (guías y vehículos). Mapea exactamente a la tabla resource_availability.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Tipo de recurso - mapea al ENUM resource_kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "resource_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Guide,
    Vehicle,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Guide => "guide",
            ResourceKind::Vehicle => "vehicle",
        }
    }
}

/// Estado de disponibilidad - mapea al ENUM availability_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "availability_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    InUse,
    /// Mantenimiento (vehículos) o permiso/vacaciones (guías)
    Unavailable,
    OutOfService,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::InUse => "in_use",
            AvailabilityStatus::Unavailable => "unavailable",
            AvailabilityStatus::OutOfService => "out_of_service",
        }
    }
}

/// Registro de disponibilidad - mapea exactamente a la tabla resource_availability
///
/// Un registro sin start_time/end_time cubre el día completo; como máximo
/// existe uno por (recurso, fecha). Los registros con rango horario conviven
/// en el mismo día siempre que no se solapen con estados contradictorios.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AvailabilityRecord {
    pub id: Uuid,
    pub resource_id: Uuid,
    pub resource_kind: ResourceKind,
    pub day: NaiveDate,
    pub status: AvailabilityStatus,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityRecord {
    /// Verificar si el registro cubre el día completo
    pub fn is_day_level(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }
}

/// Verificar si dos rangos horarios intra-día se solapan
pub fn time_ranges_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_overlapping_ranges() {
        assert!(time_ranges_overlap(t(8, 0), t(12, 0), t(10, 0), t(14, 0)));
        assert!(time_ranges_overlap(t(10, 0), t(14, 0), t(8, 0), t(12, 0)));
        // contenido dentro de otro
        assert!(time_ranges_overlap(t(8, 0), t(18, 0), t(10, 0), t(11, 0)));
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        assert!(!time_ranges_overlap(t(8, 0), t(12, 0), t(12, 0), t(14, 0)));
        assert!(!time_ranges_overlap(t(12, 0), t(14, 0), t(8, 0), t(12, 0)));
    }

    #[test]
    fn test_disjoint_ranges() {
        assert!(!time_ranges_overlap(t(8, 0), t(9, 0), t(15, 0), t(16, 0)));
    }
}
