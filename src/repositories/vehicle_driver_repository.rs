//! Repositorio de vínculos vehículo-conductor
//!
//! Relación permanente (sin fecha) entre un vehículo y sus conductores.
//! El cupo máximo (max_drivers) lo define el directorio de vehículos y lo
//! hace cumplir el chequeo de conflictos antes de insertar.

use chrono::Utc;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::vehicle_driver::VehicleDriverBinding;
use crate::utils::errors::AppError;

pub struct VehicleDriverRepository {
    pool: PgPool,
}

impl VehicleDriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_vehicle(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Vec<VehicleDriverBinding>, AppError> {
        let bindings = sqlx::query_as::<_, VehicleDriverBinding>(
            r#"
            SELECT * FROM vehicle_drivers
            WHERE vehicle_id = $1
            ORDER BY is_primary DESC, assigned_at
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bindings)
    }

    pub async fn count_for_vehicle(&self, vehicle_id: Uuid) -> Result<i64, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM vehicle_drivers WHERE vehicle_id = $1")
                .bind(vehicle_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    pub async fn exists(&self, vehicle_id: Uuid, employee_id: Uuid) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM vehicle_drivers WHERE vehicle_id = $1 AND employee_id = $2)",
        )
        .bind(vehicle_id)
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Vincular un conductor dentro de una transacción
    ///
    /// Un nuevo conductor principal degrada al principal anterior en la
    /// misma transacción; el índice parcial del schema respalda que nunca
    /// haya dos principales.
    pub async fn bind_tx(
        tx: &mut Transaction<'_, Postgres>,
        vehicle_id: Uuid,
        employee_id: Uuid,
        is_primary: bool,
    ) -> Result<VehicleDriverBinding, sqlx::Error> {
        if is_primary {
            sqlx::query(
                "UPDATE vehicle_drivers SET is_primary = FALSE WHERE vehicle_id = $1 AND is_primary",
            )
            .bind(vehicle_id)
            .execute(&mut **tx)
            .await?;
        }

        let binding = sqlx::query_as::<_, VehicleDriverBinding>(
            r#"
            INSERT INTO vehicle_drivers (vehicle_id, employee_id, is_primary, assigned_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (vehicle_id, employee_id)
            DO UPDATE SET is_primary = EXCLUDED.is_primary
            RETURNING *
            "#,
        )
        .bind(vehicle_id)
        .bind(employee_id)
        .bind(is_primary)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(binding)
    }

    /// Desvincular un conductor
    ///
    /// Idempotente: desvincular un conductor no vinculado no es un error.
    pub async fn unbind(&self, vehicle_id: Uuid, employee_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM vehicle_drivers WHERE vehicle_id = $1 AND employee_id = $2")
            .bind(vehicle_id)
            .bind(employee_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
