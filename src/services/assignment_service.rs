//! Servicio de asignaciones
//!
//! Orquesta el flujo completo de creación/actualización/cancelación:
//! reúne los hechos, invoca el chequeo de conflictos y aplica las
//! mutaciones del libro mayor y del almacén de disponibilidad dentro de
//! una única transacción. Ante Warning o Conflict no se muta nada.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::assignment_dto::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::models::assignment::{Assignment, AssignmentStatus};
use crate::models::availability::ResourceKind;
use crate::models::vehicle_driver::VehicleDriverBinding;
use crate::repositories::assignment_repository::{
    is_unique_violation, AssignmentDayStats, AssignmentRepository, NewAssignment,
};
use crate::repositories::availability_repository::AvailabilityRepository;
use crate::repositories::vehicle_driver_repository::VehicleDriverRepository;
use crate::services::conflict_checker::{
    self, AssignmentCheck, AssignmentProposal, ConflictKind, ConflictSnapshot, WarningKind,
};
use crate::services::guide_directory_service::GuideDirectoryService;
use crate::services::vehicle_directory_service::VehicleDirectoryService;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError};

/// Resultado tipado de una operación de asignación
///
/// Warning y Conflict son resultados del dominio, no errores: la consola
/// ramifica su comportamiento según la variante (reenviar con force_assign,
/// mostrar el conflicto).
#[derive(Debug)]
pub enum AssignmentOutcome {
    Ok(Assignment),
    Warning { kind: WarningKind, message: String },
    Conflict { kind: ConflictKind, message: String },
}

/// Resultado tipado de un vínculo vehículo-conductor
#[derive(Debug)]
pub enum DriverBindingOutcome {
    Ok(VehicleDriverBinding),
    Conflict { kind: ConflictKind, message: String },
}

pub struct AssignmentService {
    pool: PgPool,
    assignments: AssignmentRepository,
    availability: AvailabilityRepository,
    drivers: VehicleDriverRepository,
    guide_directory: GuideDirectoryService,
    vehicle_directory: VehicleDirectoryService,
}

impl AssignmentService {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            assignments: AssignmentRepository::new(state.pool.clone()),
            availability: AvailabilityRepository::new(state.pool.clone()),
            drivers: VehicleDriverRepository::new(state.pool.clone()),
            guide_directory: GuideDirectoryService::new(
                state.http_client.clone(),
                state.config.employee_api_url.clone(),
                state.guide_cache.clone(),
            ),
            vehicle_directory: VehicleDirectoryService::new(
                state.http_client.clone(),
                state.config.vehicle_api_url.clone(),
                state.redis.clone(),
            ),
        }
    }

    /// Crear una asignación
    pub async fn create(
        &self,
        request: &CreateAssignmentRequest,
    ) -> Result<AssignmentOutcome, AppError> {
        if request.guide_id.is_none() && request.vehicle_id.is_none() {
            return Err(validation_error(
                "assignment",
                "guide_id or vehicle_id must be set",
            ));
        }
        if request.driver_employee_id.is_some() && request.vehicle_id.is_none() {
            return Err(validation_error(
                "driver_employee_id",
                "driver binding requires a vehicle_id",
            ));
        }

        let force = request.force_assign.unwrap_or(false);
        let proposal = AssignmentProposal {
            guide_id: request.guide_id,
            vehicle_id: request.vehicle_id,
            day: request.date,
            force_assign: force,
            binds_new_driver: false, // se completa al armar el snapshot
        };
        let (proposal, snapshot) = self
            .build_snapshot(proposal, request.driver_employee_id, None)
            .await?;

        match conflict_checker::check(&proposal, &snapshot) {
            AssignmentCheck::Warning { kind, message } => {
                log::info!("⚠️ Asignación con advertencia ({}): {}", kind.as_str(), message);
                return Ok(AssignmentOutcome::Warning { kind, message });
            }
            AssignmentCheck::Conflict { kind, message } => {
                log::info!("❌ Asignación rechazada ({}): {}", kind.as_str(), message);
                return Ok(AssignmentOutcome::Conflict { kind, message });
            }
            AssignmentCheck::Ok => {}
        }

        // Commit: libro mayor + disponibilidad + vínculo de conductor en una
        // sola transacción. La violación del índice único es el conflicto
        // detectado por otra petición concurrente.
        let mut tx = self.pool.begin().await?;

        let new = NewAssignment {
            tour_id: request.tour_id,
            day: request.date,
            destination: request.destination.clone(),
            guide_id: request.guide_id,
            vehicle_id: request.vehicle_id,
            force_assigned: force,
        };
        let assignment = match AssignmentRepository::create_tx(&mut tx, &new).await {
            Ok(assignment) => assignment,
            Err(e) => {
                if is_unique_violation(&e, "uq_assignments_guide_day") {
                    return Ok(AssignmentOutcome::Conflict {
                        kind: ConflictKind::GuideDoubleBooked,
                        message: format!("El guía ya tiene una asignación para el {}", request.date),
                    });
                }
                if is_unique_violation(&e, "uq_assignments_vehicle_day") {
                    return Ok(AssignmentOutcome::Conflict {
                        kind: ConflictKind::VehicleDoubleBooked,
                        message: format!(
                            "El vehículo ya tiene una asignación para el {}",
                            request.date
                        ),
                    });
                }
                return Err(e.into());
            }
        };

        if let Some(guide_id) = request.guide_id {
            AvailabilityRepository::mark_in_use_tx(&mut tx, ResourceKind::Guide, guide_id, request.date)
                .await?;
        }
        if let Some(vehicle_id) = request.vehicle_id {
            AvailabilityRepository::mark_in_use_tx(
                &mut tx,
                ResourceKind::Vehicle,
                vehicle_id,
                request.date,
            )
            .await?;
        }

        if let (Some(vehicle_id), Some(employee_id)) =
            (request.vehicle_id, request.driver_employee_id)
        {
            VehicleDriverRepository::bind_tx(&mut tx, vehicle_id, employee_id, false).await?;
        }

        tx.commit().await?;

        if let Some(guide_id) = request.guide_id {
            self.guide_directory.invalidate(guide_id).await;
        }

        log::info!(
            "✅ Asignación {} creada para el {} ({})",
            assignment.id,
            assignment.day,
            assignment.destination
        );
        Ok(AssignmentOutcome::Ok(assignment))
    }

    /// Crear asignaciones en lote
    ///
    /// Best-effort por elemento: cada petición es una reserva independiente
    /// y el fallo de una no revierte a las demás (a diferencia del lote de
    /// disponibilidad, que es una única acción del operador y es atómico).
    pub async fn batch_create(
        &self,
        requests: &[CreateAssignmentRequest],
    ) -> Vec<Result<AssignmentOutcome, AppError>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.create(request).await);
        }
        results
    }

    /// Confirmar una asignación pendiente (pending -> active)
    pub async fn confirm(&self, id: Uuid) -> Result<Assignment, AppError> {
        let assignment = self
            .assignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asignación {} no encontrada", id)))?;

        if !assignment.status.can_transition_to(AssignmentStatus::Active) {
            return Err(AppError::Conflict(format!(
                "No se puede confirmar una asignación en estado {}",
                assignment.status.as_str()
            )));
        }

        let mut tx = self.pool.begin().await?;
        let confirmed =
            AssignmentRepository::set_status_tx(&mut tx, id, AssignmentStatus::Active).await?;
        tx.commit().await?;

        log::info!("✅ Asignación {} confirmada", id);
        Ok(confirmed)
    }

    /// Actualizar una asignación (reasignar guía/vehículo, cambiar fecha)
    ///
    /// Vuelve a correr el chequeo de conflictos sobre la tupla nueva
    /// excluyendo la propia fila de los chequeos de doble reserva.
    pub async fn update(
        &self,
        id: Uuid,
        changes: &UpdateAssignmentRequest,
    ) -> Result<AssignmentOutcome, AppError> {
        let existing = self
            .assignments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asignación {} no encontrada", id)))?;

        if existing.is_cancelled() {
            return Err(AppError::Conflict(
                "No se puede actualizar una asignación cancelada".to_string(),
            ));
        }

        let day = changes.date.unwrap_or(existing.day);
        let destination = changes
            .destination
            .clone()
            .unwrap_or_else(|| existing.destination.clone());
        let guide_id = changes.guide_id.or(existing.guide_id);
        let vehicle_id = changes.vehicle_id.or(existing.vehicle_id);
        let force = changes.force_assign.unwrap_or(false);

        let proposal = AssignmentProposal {
            guide_id,
            vehicle_id,
            day,
            force_assign: force,
            binds_new_driver: false,
        };
        let (proposal, snapshot) = self.build_snapshot(proposal, None, Some(id)).await?;

        match conflict_checker::check(&proposal, &snapshot) {
            AssignmentCheck::Warning { kind, message } => {
                return Ok(AssignmentOutcome::Warning { kind, message });
            }
            AssignmentCheck::Conflict { kind, message } => {
                return Ok(AssignmentOutcome::Conflict { kind, message });
            }
            AssignmentCheck::Ok => {}
        }

        let mut tx = self.pool.begin().await?;

        // Liberar las marcas de uso anteriores y estampar las nuevas
        if let Some(old_guide) = existing.guide_id {
            AvailabilityRepository::release_in_use_tx(
                &mut tx,
                ResourceKind::Guide,
                old_guide,
                existing.day,
            )
            .await?;
        }
        if let Some(old_vehicle) = existing.vehicle_id {
            AvailabilityRepository::release_in_use_tx(
                &mut tx,
                ResourceKind::Vehicle,
                old_vehicle,
                existing.day,
            )
            .await?;
        }

        let updated = match AssignmentRepository::update_tx(
            &mut tx,
            id,
            day,
            &destination,
            guide_id,
            vehicle_id,
            force || existing.force_assigned,
        )
        .await
        {
            Ok(updated) => updated,
            Err(e) => {
                if is_unique_violation(&e, "uq_assignments_guide_day") {
                    return Ok(AssignmentOutcome::Conflict {
                        kind: ConflictKind::GuideDoubleBooked,
                        message: format!("El guía ya tiene una asignación para el {}", day),
                    });
                }
                if is_unique_violation(&e, "uq_assignments_vehicle_day") {
                    return Ok(AssignmentOutcome::Conflict {
                        kind: ConflictKind::VehicleDoubleBooked,
                        message: format!("El vehículo ya tiene una asignación para el {}", day),
                    });
                }
                return Err(e.into());
            }
        };

        if let Some(new_guide) = guide_id {
            AvailabilityRepository::mark_in_use_tx(&mut tx, ResourceKind::Guide, new_guide, day)
                .await?;
        }
        if let Some(new_vehicle) = vehicle_id {
            AvailabilityRepository::mark_in_use_tx(&mut tx, ResourceKind::Vehicle, new_vehicle, day)
                .await?;
        }

        tx.commit().await?;

        for guide in [existing.guide_id, guide_id].into_iter().flatten() {
            self.guide_directory.invalidate(guide).await;
        }

        log::info!("✅ Asignación {} actualizada", id);
        Ok(AssignmentOutcome::Ok(updated))
    }

    /// Cancelar una asignación (soft-delete)
    ///
    /// Idempotente: cancelar una asignación ya cancelada o inexistente no es
    /// un error. Libera las marcas in_use del día hacia available.
    pub async fn cancel(&self, id: Uuid) -> Result<(), AppError> {
        let assignment = match self.assignments.find_by_id(id).await? {
            Some(assignment) => assignment,
            None => return Ok(()),
        };

        if assignment.is_cancelled() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        AssignmentRepository::set_status_tx(&mut tx, id, AssignmentStatus::Cancelled).await?;

        if let Some(guide_id) = assignment.guide_id {
            AvailabilityRepository::release_in_use_tx(
                &mut tx,
                ResourceKind::Guide,
                guide_id,
                assignment.day,
            )
            .await?;
        }
        if let Some(vehicle_id) = assignment.vehicle_id {
            AvailabilityRepository::release_in_use_tx(
                &mut tx,
                ResourceKind::Vehicle,
                vehicle_id,
                assignment.day,
            )
            .await?;
        }

        tx.commit().await?;

        if let Some(guide_id) = assignment.guide_id {
            self.guide_directory.invalidate(guide_id).await;
        }

        log::info!("🗑️ Asignación {} cancelada", id);
        Ok(())
    }

    /// Purga administrativa de una asignación
    ///
    /// A diferencia de cancel, elimina la fila del libro mayor. Idempotente.
    pub async fn delete_hard(&self, id: Uuid) -> Result<(), AppError> {
        let assignment = match self.assignments.find_by_id(id).await? {
            Some(assignment) => assignment,
            None => return Ok(()),
        };

        let mut tx = self.pool.begin().await?;

        if !assignment.is_cancelled() {
            if let Some(guide_id) = assignment.guide_id {
                AvailabilityRepository::release_in_use_tx(
                    &mut tx,
                    ResourceKind::Guide,
                    guide_id,
                    assignment.day,
                )
                .await?;
            }
            if let Some(vehicle_id) = assignment.vehicle_id {
                AvailabilityRepository::release_in_use_tx(
                    &mut tx,
                    ResourceKind::Vehicle,
                    vehicle_id,
                    assignment.day,
                )
                .await?;
            }
        }

        AssignmentRepository::delete_hard_tx(&mut tx, id).await?;
        tx.commit().await?;

        if let Some(guide_id) = assignment.guide_id {
            self.guide_directory.invalidate(guide_id).await;
        }

        log::info!("🗑️ Asignación {} purgada", id);
        Ok(())
    }

    /// Estadísticas de asignación para una fecha
    pub async fn stats_for_day(&self, day: NaiveDate) -> Result<AssignmentDayStats, AppError> {
        self.assignments.stats_for_day(day).await
    }

    /// Vincular un conductor permanente a un vehículo
    ///
    /// Pasa por el mismo chequeo de conflictos que las asignaciones: el cupo
    /// max_drivers del directorio de vehículos es una restricción dura.
    pub async fn bind_driver(
        &self,
        vehicle_id: Uuid,
        employee_id: Uuid,
        is_primary: bool,
    ) -> Result<DriverBindingOutcome, AppError> {
        let vehicle_info = self
            .vehicle_directory
            .get_vehicle_info(vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Vehículo {} no figura en el directorio", vehicle_id))
            })?;

        let already_bound = self.drivers.exists(vehicle_id, employee_id).await?;
        let driver_count = self.drivers.count_for_vehicle(vehicle_id).await?;

        let proposal = AssignmentProposal {
            guide_id: None,
            vehicle_id: Some(vehicle_id),
            day: chrono::Utc::now().date_naive(),
            force_assign: false,
            binds_new_driver: !already_bound,
        };
        let snapshot = ConflictSnapshot {
            vehicle_driver_count: driver_count,
            vehicle_max_drivers: Some(vehicle_info.max_drivers),
            ..Default::default()
        };

        if let AssignmentCheck::Conflict { kind, message } =
            conflict_checker::check(&proposal, &snapshot)
        {
            return Ok(DriverBindingOutcome::Conflict { kind, message });
        }

        let mut tx = self.pool.begin().await?;
        let binding =
            VehicleDriverRepository::bind_tx(&mut tx, vehicle_id, employee_id, is_primary).await?;
        tx.commit().await?;

        log::info!(
            "✅ Conductor {} vinculado al vehículo {} (principal: {})",
            employee_id,
            vehicle_id,
            is_primary
        );

        Ok(DriverBindingOutcome::Ok(binding))
    }

    /// Reunir los hechos del chequeo de conflictos
    ///
    /// Lecturas previas a la transacción: la carrera restante la cierra el
    /// índice único en el INSERT/UPDATE.
    async fn build_snapshot(
        &self,
        mut proposal: AssignmentProposal,
        driver_employee_id: Option<Uuid>,
        exclude: Option<Uuid>,
    ) -> Result<(AssignmentProposal, ConflictSnapshot), AppError> {
        let mut snapshot = ConflictSnapshot::default();

        if let Some(guide_id) = proposal.guide_id {
            snapshot.guide_already_assigned = self
                .assignments
                .exists_for_guide_on_day(guide_id, proposal.day, exclude)
                .await?;

            // Señal consultiva: solo se consulta si aún puede producir una
            // advertencia (con force el aviso ya fue confirmado)
            if !proposal.force_assign {
                snapshot.guide_work_status = self.guide_directory.get_work_status(guide_id).await;
            }
        }

        if let Some(vehicle_id) = proposal.vehicle_id {
            snapshot.vehicle_already_assigned = self
                .assignments
                .exists_for_vehicle_on_day(vehicle_id, proposal.day, exclude)
                .await?;

            snapshot.vehicle_day_status = self
                .availability
                .day_status(ResourceKind::Vehicle, vehicle_id, proposal.day)
                .await?;

            if let Some(employee_id) = driver_employee_id {
                let already_bound = self.drivers.exists(vehicle_id, employee_id).await?;
                proposal.binds_new_driver = !already_bound;

                if proposal.binds_new_driver {
                    snapshot.vehicle_driver_count =
                        self.drivers.count_for_vehicle(vehicle_id).await?;
                    let info = self
                        .vehicle_directory
                        .get_vehicle_info(vehicle_id)
                        .await?
                        .ok_or_else(|| {
                            AppError::NotFound(format!(
                                "Vehículo {} no figura en el directorio",
                                vehicle_id
                            ))
                        })?;
                    snapshot.vehicle_max_drivers = Some(info.max_drivers);
                }
            }
        }

        Ok((proposal, snapshot))
    }
}
