//! Modelo de vínculo vehículo-conductor
//!
//! Este módulo contiene la relación permanente entre un vehículo y sus
//! conductores habituales. Mapea exactamente a la tabla vehicle_drivers.
//! A diferencia de Assignment, este vínculo no lleva fecha: es una relación
//! estable que se crea al asignar el conductor y se elimina al desasignarlo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Vínculo vehículo-conductor - mapea exactamente a la tabla vehicle_drivers
///
/// Invariantes (respaldadas por el schema): como máximo max_drivers vínculos
/// concurrentes por vehículo (max_drivers viene del directorio de vehículos)
/// y como máximo un vínculo con is_primary=true por vehículo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VehicleDriverBinding {
    pub vehicle_id: Uuid,
    pub employee_id: Uuid,
    pub is_primary: bool,
    pub assigned_at: DateTime<Utc>,
}
