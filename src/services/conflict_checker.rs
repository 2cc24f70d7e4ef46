//! Chequeo de conflictos de asignación
//!
//! Este módulo concentra la lógica de decisión del subsistema: dado un
//! intento de asignación y los hechos ya leídos (libro mayor, disponibilidad,
//! directorio de empleados), decide si procede, si requiere confirmación del
//! operador o si se rechaza.
//!
//! Los chequeos se evalúan en orden fijo y se devuelve el primer resultado
//! bloqueante (fail-fast): la consola confirma de a un aviso por vez.
//! La exclusión definitiva de doble reserva la da el índice único parcial
//! del schema; este chequeo es la primera línea y produce los mensajes.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::availability::AvailabilityStatus;
use crate::models::employee::WorkStatus;

/// Conflicto duro: bloquea la asignación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    GuideDoubleBooked,
    VehicleDoubleBooked,
    VehicleUnavailable,
    VehicleDriverCapacityExceeded,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::GuideDoubleBooked => "guide_double_booked",
            ConflictKind::VehicleDoubleBooked => "vehicle_double_booked",
            ConflictKind::VehicleUnavailable => "vehicle_unavailable",
            ConflictKind::VehicleDriverCapacityExceeded => "vehicle_driver_capacity_exceeded",
        }
    }
}

/// Advertencia blanda: el operador puede reenviar con force_assign=true
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    GuideStatusCaution,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::GuideStatusCaution => "guide_status_caution",
        }
    }
}

/// Resultado del chequeo de conflictos
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentCheck {
    Ok,
    Warning { kind: WarningKind, message: String },
    Conflict { kind: ConflictKind, message: String },
}

impl AssignmentCheck {
    pub fn is_ok(&self) -> bool {
        matches!(self, AssignmentCheck::Ok)
    }
}

/// Intento de asignación a evaluar
#[derive(Debug, Clone)]
pub struct AssignmentProposal {
    pub guide_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub day: NaiveDate,
    /// Override explícito del operador tras una advertencia
    pub force_assign: bool,
    /// El intento incluye vincular un conductor nuevo al vehículo
    pub binds_new_driver: bool,
}

/// Hechos leídos antes del chequeo
///
/// El servicio de asignación los reúne desde el libro mayor, el almacén de
/// disponibilidad y los directorios externos; el chequeo en sí no toca I/O.
#[derive(Debug, Clone, Default)]
pub struct ConflictSnapshot {
    pub guide_already_assigned: bool,
    pub vehicle_already_assigned: bool,
    /// Estado laboral del guía según el directorio; None si no se consultó
    /// o el directorio no respondió (señal consultiva)
    pub guide_work_status: Option<WorkStatus>,
    /// Estado de día completo del vehículo en la fecha
    pub vehicle_day_status: Option<AvailabilityStatus>,
    pub vehicle_driver_count: i64,
    /// Cupo de conductores según el directorio de vehículos
    pub vehicle_max_drivers: Option<i32>,
}

/// Evaluar un intento de asignación contra los hechos leídos
pub fn check(proposal: &AssignmentProposal, snapshot: &ConflictSnapshot) -> AssignmentCheck {
    // 1. Doble reserva del guía
    if proposal.guide_id.is_some()
        && snapshot.guide_already_assigned
        && !proposal.force_assign
    {
        return AssignmentCheck::Conflict {
            kind: ConflictKind::GuideDoubleBooked,
            message: format!("El guía ya tiene una asignación para el {}", proposal.day),
        };
    }

    // 2. Doble reserva del vehículo
    if proposal.vehicle_id.is_some()
        && snapshot.vehicle_already_assigned
        && !proposal.force_assign
    {
        return AssignmentCheck::Conflict {
            kind: ConflictKind::VehicleDoubleBooked,
            message: format!("El vehículo ya tiene una asignación para el {}", proposal.day),
        };
    }

    // 3. Estado laboral del guía (señal consultiva, no restricción dura)
    if proposal.guide_id.is_some() && !proposal.force_assign {
        if let Some(status) = snapshot.guide_work_status {
            if status.requires_caution() {
                return AssignmentCheck::Warning {
                    kind: WarningKind::GuideStatusCaution,
                    message:
                        "El guía figura ocupado, de permiso o en tour; reenviar con force_assign para confirmar"
                            .to_string(),
                };
            }
        }
    }

    // 4. Disponibilidad del vehículo en la fecha. Fuera de servicio nunca es
    // asignable; un bloque de mantenimiento/permiso sí admite override.
    if proposal.vehicle_id.is_some() {
        match snapshot.vehicle_day_status {
            Some(AvailabilityStatus::OutOfService) => {
                return AssignmentCheck::Conflict {
                    kind: ConflictKind::VehicleUnavailable,
                    message: format!(
                        "El vehículo está fuera de servicio el {}",
                        proposal.day
                    ),
                };
            }
            Some(AvailabilityStatus::Unavailable) if !proposal.force_assign => {
                return AssignmentCheck::Conflict {
                    kind: ConflictKind::VehicleUnavailable,
                    message: format!(
                        "El vehículo no está disponible el {} (mantenimiento o bloqueo)",
                        proposal.day
                    ),
                };
            }
            _ => {}
        }
    }

    // 5. Cupo de conductores permanentes del vehículo (duro: sin el cupo no
    // se puede vincular otro conductor, con o sin override)
    if proposal.binds_new_driver && proposal.vehicle_id.is_some() {
        if let Some(max_drivers) = snapshot.vehicle_max_drivers {
            if snapshot.vehicle_driver_count >= max_drivers as i64 {
                return AssignmentCheck::Conflict {
                    kind: ConflictKind::VehicleDriverCapacityExceeded,
                    message: format!(
                        "El vehículo ya alcanzó su cupo de {} conductores",
                        max_drivers
                    ),
                };
            }
        }
    }

    // 6. Sin conflictos
    AssignmentCheck::Ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn proposal_with_guide() -> AssignmentProposal {
        AssignmentProposal {
            guide_id: Some(Uuid::new_v4()),
            vehicle_id: None,
            day: d(2024, 6, 1),
            force_assign: false,
            binds_new_driver: false,
        }
    }

    fn proposal_with_vehicle() -> AssignmentProposal {
        AssignmentProposal {
            guide_id: None,
            vehicle_id: Some(Uuid::new_v4()),
            day: d(2024, 6, 1),
            force_assign: false,
            binds_new_driver: false,
        }
    }

    #[test]
    fn test_clean_proposal_passes() {
        let check_result = check(&proposal_with_guide(), &ConflictSnapshot::default());
        assert!(check_result.is_ok());
    }

    #[test]
    fn test_guide_double_booked_is_conflict() {
        let snapshot = ConflictSnapshot {
            guide_already_assigned: true,
            ..Default::default()
        };

        match check(&proposal_with_guide(), &snapshot) {
            AssignmentCheck::Conflict { kind, .. } => {
                assert_eq!(kind, ConflictKind::GuideDoubleBooked)
            }
            other => panic!("se esperaba conflicto de doble reserva, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_force_overrides_double_booking() {
        let mut proposal = proposal_with_guide();
        proposal.force_assign = true;
        let snapshot = ConflictSnapshot {
            guide_already_assigned: true,
            ..Default::default()
        };

        assert!(check(&proposal, &snapshot).is_ok());
    }

    #[test]
    fn test_vehicle_double_booked_is_conflict() {
        let snapshot = ConflictSnapshot {
            vehicle_already_assigned: true,
            ..Default::default()
        };

        match check(&proposal_with_vehicle(), &snapshot) {
            AssignmentCheck::Conflict { kind, .. } => {
                assert_eq!(kind, ConflictKind::VehicleDoubleBooked)
            }
            other => panic!("se esperaba conflicto de doble reserva, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_busy_guide_is_soft_warning() {
        let snapshot = ConflictSnapshot {
            guide_work_status: Some(WorkStatus::Busy),
            ..Default::default()
        };

        match check(&proposal_with_guide(), &snapshot) {
            AssignmentCheck::Warning { kind, .. } => {
                assert_eq!(kind, WarningKind::GuideStatusCaution)
            }
            other => panic!("se esperaba advertencia, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_force_silences_guide_status_warning() {
        let mut proposal = proposal_with_guide();
        proposal.force_assign = true;
        let snapshot = ConflictSnapshot {
            guide_work_status: Some(WorkStatus::OnTour),
            ..Default::default()
        };

        assert!(check(&proposal, &snapshot).is_ok());
    }

    #[test]
    fn test_idle_guide_is_not_a_warning() {
        let snapshot = ConflictSnapshot {
            guide_work_status: Some(WorkStatus::Idle),
            ..Default::default()
        };
        assert!(check(&proposal_with_guide(), &snapshot).is_ok());
    }

    #[test]
    fn test_out_of_service_vehicle_cannot_be_forced() {
        let mut proposal = proposal_with_vehicle();
        proposal.force_assign = true;
        let snapshot = ConflictSnapshot {
            vehicle_day_status: Some(AvailabilityStatus::OutOfService),
            ..Default::default()
        };

        match check(&proposal, &snapshot) {
            AssignmentCheck::Conflict { kind, .. } => {
                assert_eq!(kind, ConflictKind::VehicleUnavailable)
            }
            other => panic!("fuera de servicio debe bloquear siempre, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_vehicle_blocks_without_force() {
        let snapshot = ConflictSnapshot {
            vehicle_day_status: Some(AvailabilityStatus::Unavailable),
            ..Default::default()
        };

        match check(&proposal_with_vehicle(), &snapshot) {
            AssignmentCheck::Conflict { kind, .. } => {
                assert_eq!(kind, ConflictKind::VehicleUnavailable)
            }
            other => panic!("se esperaba conflicto de disponibilidad, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_vehicle_admits_force() {
        let mut proposal = proposal_with_vehicle();
        proposal.force_assign = true;
        let snapshot = ConflictSnapshot {
            vehicle_day_status: Some(AvailabilityStatus::Unavailable),
            ..Default::default()
        };

        assert!(check(&proposal, &snapshot).is_ok());
    }

    #[test]
    fn test_in_use_day_status_alone_does_not_block() {
        // la doble reserva la detecta el libro mayor, no la marca in_use
        let snapshot = ConflictSnapshot {
            vehicle_day_status: Some(AvailabilityStatus::InUse),
            ..Default::default()
        };
        assert!(check(&proposal_with_vehicle(), &snapshot).is_ok());
    }

    #[test]
    fn test_driver_capacity_exceeded() {
        let mut proposal = proposal_with_vehicle();
        proposal.binds_new_driver = true;
        let snapshot = ConflictSnapshot {
            vehicle_driver_count: 2,
            vehicle_max_drivers: Some(2),
            ..Default::default()
        };

        match check(&proposal, &snapshot) {
            AssignmentCheck::Conflict { kind, .. } => {
                assert_eq!(kind, ConflictKind::VehicleDriverCapacityExceeded)
            }
            other => panic!("se esperaba conflicto de cupo, se obtuvo {:?}", other),
        }
    }

    #[test]
    fn test_driver_capacity_not_exceeded() {
        let mut proposal = proposal_with_vehicle();
        proposal.binds_new_driver = true;
        let snapshot = ConflictSnapshot {
            vehicle_driver_count: 1,
            vehicle_max_drivers: Some(2),
            ..Default::default()
        };

        assert!(check(&proposal, &snapshot).is_ok());
    }

    #[test]
    fn test_force_does_not_bypass_driver_capacity() {
        let mut proposal = proposal_with_vehicle();
        proposal.binds_new_driver = true;
        proposal.force_assign = true;
        let snapshot = ConflictSnapshot {
            vehicle_driver_count: 3,
            vehicle_max_drivers: Some(3),
            ..Default::default()
        };

        assert!(!check(&proposal, &snapshot).is_ok());
    }

    #[test]
    fn test_fail_fast_reports_double_booking_before_status() {
        // guía doblemente reservado Y ocupado: gana el chequeo 1
        let snapshot = ConflictSnapshot {
            guide_already_assigned: true,
            guide_work_status: Some(WorkStatus::Busy),
            ..Default::default()
        };

        match check(&proposal_with_guide(), &snapshot) {
            AssignmentCheck::Conflict { kind, .. } => {
                assert_eq!(kind, ConflictKind::GuideDoubleBooked)
            }
            other => panic!("el orden de chequeos no es fail-fast: {:?}", other),
        }
    }

    #[test]
    fn test_fail_fast_reports_guide_conflict_before_vehicle() {
        let proposal = AssignmentProposal {
            guide_id: Some(Uuid::new_v4()),
            vehicle_id: Some(Uuid::new_v4()),
            day: d(2024, 6, 1),
            force_assign: false,
            binds_new_driver: false,
        };
        let snapshot = ConflictSnapshot {
            guide_already_assigned: true,
            vehicle_already_assigned: true,
            ..Default::default()
        };

        match check(&proposal, &snapshot) {
            AssignmentCheck::Conflict { kind, .. } => {
                assert_eq!(kind, ConflictKind::GuideDoubleBooked)
            }
            other => panic!("el orden de chequeos no es fail-fast: {:?}", other),
        }
    }
}
