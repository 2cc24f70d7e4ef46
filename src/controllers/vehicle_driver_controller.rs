use uuid::Uuid;

use crate::dto::vehicle_driver_dto::{BindDriverRequest, DriverBindingResponse};
use crate::repositories::vehicle_driver_repository::VehicleDriverRepository;
use crate::services::assignment_service::{AssignmentService, DriverBindingOutcome};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct VehicleDriverController {
    service: AssignmentService,
    repository: VehicleDriverRepository,
}

impl VehicleDriverController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: AssignmentService::new(state),
            repository: VehicleDriverRepository::new(state.pool.clone()),
        }
    }

    pub async fn list(&self, vehicle_id: Uuid) -> Result<Vec<DriverBindingResponse>, AppError> {
        let bindings = self.repository.find_by_vehicle(vehicle_id).await?;
        Ok(bindings.into_iter().map(DriverBindingResponse::from).collect())
    }

    pub async fn bind(
        &self,
        vehicle_id: Uuid,
        request: BindDriverRequest,
    ) -> Result<DriverBindingOutcome, AppError> {
        self.service
            .bind_driver(
                vehicle_id,
                request.employee_id,
                request.is_primary.unwrap_or(false),
            )
            .await
    }

    pub async fn unbind(&self, vehicle_id: Uuid, employee_id: Uuid) -> Result<(), AppError> {
        self.repository.unbind(vehicle_id, employee_id).await
    }
}
