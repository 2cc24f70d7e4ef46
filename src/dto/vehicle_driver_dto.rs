use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::vehicle_driver::VehicleDriverBinding;

// Request para vincular un conductor a un vehículo
#[derive(Debug, Deserialize)]
pub struct BindDriverRequest {
    pub employee_id: Uuid,
    pub is_primary: Option<bool>,
}

// Response de un vínculo vehículo-conductor
#[derive(Debug, Serialize)]
pub struct DriverBindingResponse {
    pub vehicle_id: Uuid,
    pub employee_id: Uuid,
    pub is_primary: bool,
    pub assigned_at: DateTime<Utc>,
}

impl From<VehicleDriverBinding> for DriverBindingResponse {
    fn from(binding: VehicleDriverBinding) -> Self {
        Self {
            vehicle_id: binding.vehicle_id,
            employee_id: binding.employee_id,
            is_primary: binding.is_primary,
            assigned_at: binding.assigned_at,
        }
    }
}
