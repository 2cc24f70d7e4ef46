//! Modelo de Assignment
//!
//! Este módulo contiene el struct Assignment (el libro mayor de asignaciones)
//! y su máquina de estados. Mapea exactamente a la tabla tour_assignments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la asignación - mapea al ENUM assignment_status
///
/// Máquina de estados: pending --confirmar--> active;
/// {pending, active} --cancelar--> cancelled; cancelled es terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "assignment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    Active,
    Cancelled,
}

impl AssignmentStatus {
    /// Verificar si la transición de estado es válida
    pub fn can_transition_to(&self, next: AssignmentStatus) -> bool {
        use AssignmentStatus::*;
        matches!(
            (self, next),
            (Pending, Active) | (Pending, Cancelled) | (Active, Cancelled)
        )
    }

    /// Un estado terminal no admite más transiciones
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssignmentStatus::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Pending => "pending",
            AssignmentStatus::Active => "active",
            AssignmentStatus::Cancelled => "cancelled",
        }
    }
}

/// Assignment principal - mapea exactamente a la tabla tour_assignments
///
/// Una asignación vincula un tour en una fecha con un guía y/o un vehículo.
/// Al menos uno de guide_id/vehicle_id está presente (CHECK en el schema).
/// La cancelación es soft-delete: la fila se conserva para auditoría y
/// estadísticas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub day: NaiveDate,
    pub destination: String,
    pub guide_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub status: AssignmentStatus,
    pub force_assigned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn is_cancelled(&self) -> bool {
        self.status == AssignmentStatus::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_confirms_to_active() {
        assert!(AssignmentStatus::Pending.can_transition_to(AssignmentStatus::Active));
    }

    #[test]
    fn test_pending_and_active_cancel() {
        assert!(AssignmentStatus::Pending.can_transition_to(AssignmentStatus::Cancelled));
        assert!(AssignmentStatus::Active.can_transition_to(AssignmentStatus::Cancelled));
    }

    #[test]
    fn test_cancelled_is_terminal() {
        assert!(AssignmentStatus::Cancelled.is_terminal());
        assert!(!AssignmentStatus::Cancelled.can_transition_to(AssignmentStatus::Pending));
        assert!(!AssignmentStatus::Cancelled.can_transition_to(AssignmentStatus::Active));
    }

    #[test]
    fn test_no_active_to_pending() {
        assert!(!AssignmentStatus::Active.can_transition_to(AssignmentStatus::Pending));
    }
}
