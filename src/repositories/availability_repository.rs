//! Repositorio de disponibilidad (Availability Store)
//!
//! Almacenamiento y consulta de la disponibilidad por recurso y fecha.
//! Las escrituras en lote son atómicas: una sola transacción cubre todo
//! el rango de fechas.

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::availability::{
    time_ranges_overlap, AvailabilityRecord, AvailabilityStatus, ResourceKind,
};
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::{validate_date_range, validate_time_range};

/// Ventana por defecto para consultas sin rango explícito
const DEFAULT_WINDOW_DAYS: i64 = 90;

/// Límite superior de un lote: un año inclusive
const MAX_BATCH_DAYS: i64 = 366;

/// Estadísticas derivadas de disponibilidad para un recurso
#[derive(Debug, Clone)]
pub struct AvailabilityStats {
    pub available_days: i64,
    pub unavailable_days: i64,
    pub current_assignments: i64,
    pub availability_rate: f64,
}

/// Resolver el rango consultado; sin rango se aplica la ventana por defecto
pub fn resolve_range(
    range: Option<(NaiveDate, NaiveDate)>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    match range {
        Some((start, end)) => (start, end),
        None => (today, today + chrono::Duration::days(DEFAULT_WINDOW_DAYS - 1)),
    }
}

/// Tasa de disponibilidad: días disponibles sobre el total del rango.
/// Un rango vacío o invertido da 0, nunca NaN.
pub fn availability_rate(available_days: i64, total_days: i64) -> f64 {
    if total_days <= 0 {
        0.0
    } else {
        available_days as f64 / total_days as f64
    }
}

pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Consultar registros de disponibilidad de un recurso
    pub async fn find(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<Vec<AvailabilityRecord>, AppError> {
        let (start, end) = resolve_range(range, Utc::now().date_naive());
        validate_date_range(start, end).map_err(|_| {
            validation_error("date_range", "start_date must not be after end_date")
        })?;

        let records = sqlx::query_as::<_, AvailabilityRecord>(
            r#"
            SELECT * FROM resource_availability
            WHERE resource_kind = $1 AND resource_id = $2 AND day BETWEEN $3 AND $4
            ORDER BY day, start_time NULLS FIRST
            "#,
        )
        .bind(kind)
        .bind(resource_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Fijar la disponibilidad de un recurso en una fecha (upsert)
    ///
    /// Sin rango horario el registro cubre el día completo y reemplaza al
    /// existente. Con rango horario se añade un bloque intra-día, rechazando
    /// solapes con estado contradictorio.
    pub async fn set(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        day: NaiveDate,
        status: AvailabilityStatus,
        time_range: Option<(NaiveTime, NaiveTime)>,
        notes: Option<String>,
    ) -> Result<AvailabilityRecord, AppError> {
        match time_range {
            None => {
                let record = sqlx::query_as::<_, AvailabilityRecord>(
                    r#"
                    INSERT INTO resource_availability
                        (id, resource_id, resource_kind, day, status, start_time, end_time, notes, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, NULL, NULL, $6, $7, $7)
                    ON CONFLICT (resource_kind, resource_id, day) WHERE start_time IS NULL
                    DO UPDATE SET status = EXCLUDED.status, notes = EXCLUDED.notes, updated_at = EXCLUDED.updated_at
                    RETURNING *
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(resource_id)
                .bind(kind)
                .bind(day)
                .bind(status)
                .bind(notes)
                .bind(Utc::now())
                .fetch_one(&self.pool)
                .await?;

                Ok(record)
            }
            Some((start_time, end_time)) => {
                validate_time_range(start_time, end_time).map_err(|_| {
                    validation_error("time_range", "start_time must be before end_time")
                })?;

                // Un bloque horario no puede contradecir a otro ya registrado
                let existing = sqlx::query_as::<_, AvailabilityRecord>(
                    r#"
                    SELECT * FROM resource_availability
                    WHERE resource_kind = $1 AND resource_id = $2 AND day = $3
                      AND start_time IS NOT NULL
                    "#,
                )
                .bind(kind)
                .bind(resource_id)
                .bind(day)
                .fetch_all(&self.pool)
                .await?;

                for record in &existing {
                    let (b_start, b_end) = (record.start_time.unwrap(), record.end_time.unwrap());
                    if time_ranges_overlap(start_time, end_time, b_start, b_end)
                        && record.status != status
                    {
                        return Err(AppError::Conflict(format!(
                            "Rango horario solapado con estado contradictorio ({})",
                            record.status.as_str()
                        )));
                    }
                }

                let record = sqlx::query_as::<_, AvailabilityRecord>(
                    r#"
                    INSERT INTO resource_availability
                        (id, resource_id, resource_kind, day, status, start_time, end_time, notes, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
                    RETURNING *
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(resource_id)
                .bind(kind)
                .bind(day)
                .bind(status)
                .bind(start_time)
                .bind(end_time)
                .bind(notes)
                .bind(Utc::now())
                .fetch_one(&self.pool)
                .await?;

                Ok(record)
            }
        }
    }

    /// Fijar el mismo estado sobre un rango de fechas inclusivo
    ///
    /// Todo el rango se escribe dentro de una única transacción: un fallo a
    /// mitad de rango no deja escrituras parciales.
    pub async fn batch_set(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: AvailabilityStatus,
        notes: Option<String>,
    ) -> Result<u64, AppError> {
        validate_date_range(start_date, end_date).map_err(|_| {
            validation_error("date_range", "start_date must not be after end_date")
        })?;

        let total_days = (end_date - start_date).num_days() + 1;
        if total_days > MAX_BATCH_DAYS {
            return Err(validation_error(
                "date_range",
                "batch range must not exceed one year",
            ));
        }

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let mut day = start_date;
        let mut updated: u64 = 0;
        while day <= end_date {
            sqlx::query(
                r#"
                INSERT INTO resource_availability
                    (id, resource_id, resource_kind, day, status, start_time, end_time, notes, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, NULL, NULL, $6, $7, $7)
                ON CONFLICT (resource_kind, resource_id, day) WHERE start_time IS NULL
                DO UPDATE SET status = EXCLUDED.status, notes = EXCLUDED.notes, updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(resource_id)
            .bind(kind)
            .bind(day)
            .bind(status)
            .bind(notes.clone())
            .bind(now)
            .execute(&mut *tx)
            .await?;

            updated += 1;
            day += chrono::Duration::days(1);
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Eliminar la disponibilidad de un recurso en una fecha
    ///
    /// Idempotente: eliminar un registro inexistente no es un error.
    pub async fn delete(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        day: NaiveDate,
    ) -> Result<(), AppError> {
        sqlx::query(
            "DELETE FROM resource_availability WHERE resource_kind = $1 AND resource_id = $2 AND day = $3",
        )
        .bind(kind)
        .bind(resource_id)
        .bind(day)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Estadísticas derivadas de disponibilidad para un recurso
    pub async fn stats(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> Result<AvailabilityStats, AppError> {
        let (start, end) = resolve_range(range, Utc::now().date_naive());
        let total_days = (end - start).num_days() + 1;

        // Rango vacío o invertido: estadísticas en cero, nunca un error
        if total_days <= 0 {
            return Ok(AvailabilityStats {
                available_days: 0,
                unavailable_days: 0,
                current_assignments: 0,
                availability_rate: 0.0,
            });
        }

        let counts = sqlx::query_as::<_, (AvailabilityStatus, i64)>(
            r#"
            SELECT status, COUNT(DISTINCT day)
            FROM resource_availability
            WHERE resource_kind = $1 AND resource_id = $2 AND day BETWEEN $3 AND $4
              AND start_time IS NULL
            GROUP BY status
            "#,
        )
        .bind(kind)
        .bind(resource_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut available_days = 0;
        let mut unavailable_days = 0;
        for (status, count) in counts {
            match status {
                AvailabilityStatus::Available => available_days += count,
                AvailabilityStatus::Unavailable | AvailabilityStatus::OutOfService => {
                    unavailable_days += count
                }
                AvailabilityStatus::InUse => {}
            }
        }

        let resource_column = match kind {
            ResourceKind::Guide => "guide_id",
            ResourceKind::Vehicle => "vehicle_id",
        };
        let (current_assignments,): (i64,) = sqlx::query_as(&format!(
            r#"
            SELECT COUNT(*) FROM tour_assignments
            WHERE {} = $1 AND day BETWEEN $2 AND $3 AND status <> 'cancelled'
            "#,
            resource_column
        ))
        .bind(resource_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(AvailabilityStats {
            available_days,
            unavailable_days,
            current_assignments,
            availability_rate: availability_rate(available_days, total_days),
        })
    }

    /// Leer el estado de día completo de un recurso en una fecha
    pub async fn day_status(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        day: NaiveDate,
    ) -> Result<Option<AvailabilityStatus>, AppError> {
        let row = sqlx::query_as::<_, (AvailabilityStatus,)>(
            r#"
            SELECT status FROM resource_availability
            WHERE resource_kind = $1 AND resource_id = $2 AND day = $3 AND start_time IS NULL
            "#,
        )
        .bind(kind)
        .bind(resource_id)
        .bind(day)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(status,)| status))
    }

    /// Marcar un recurso como en uso para una fecha (dentro de la transacción
    /// de asignación)
    ///
    /// Solo reclama días sin registro o marcados available: una marca manual
    /// del operador (mantenimiento, permiso) sobrevive intacta a una
    /// asignación forzada y a su posterior cancelación.
    pub async fn mark_in_use_tx(
        tx: &mut Transaction<'_, Postgres>,
        kind: ResourceKind,
        resource_id: Uuid,
        day: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO resource_availability
                (id, resource_id, resource_kind, day, status, start_time, end_time, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 'in_use', NULL, NULL, NULL, $5, $5)
            ON CONFLICT (resource_kind, resource_id, day) WHERE start_time IS NULL
            DO UPDATE SET status = 'in_use', updated_at = EXCLUDED.updated_at
            WHERE resource_availability.status = 'available'
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(resource_id)
        .bind(kind)
        .bind(day)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Liberar la marca de uso de un recurso para una fecha
    ///
    /// Solo revierte registros en in_use; una marca manual (mantenimiento,
    /// permiso) nunca fue sobreescrita por mark_in_use_tx y tampoco se
    /// pisa aquí.
    pub async fn release_in_use_tx(
        tx: &mut Transaction<'_, Postgres>,
        kind: ResourceKind,
        resource_id: Uuid,
        day: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE resource_availability
            SET status = 'available', updated_at = $4
            WHERE resource_kind = $1 AND resource_id = $2 AND day = $3
              AND start_time IS NULL AND status = 'in_use'
            "#,
        )
        .bind(kind)
        .bind(resource_id)
        .bind(day)
        .bind(Utc::now())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_availability_rate_normal() {
        assert!((availability_rate(15, 30) - 0.5).abs() < f64::EPSILON);
        assert!((availability_rate(30, 30) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_availability_rate_empty_range_is_zero() {
        // nunca NaN ni error para rangos vacíos
        assert_eq!(availability_rate(0, 0), 0.0);
        assert_eq!(availability_rate(5, 0), 0.0);
        assert_eq!(availability_rate(0, -3), 0.0);
    }

    #[test]
    fn test_availability_rate_no_data() {
        assert_eq!(availability_rate(0, 30), 0.0);
    }

    #[test]
    fn test_resolve_range_explicit() {
        let range = Some((d(2024, 6, 1), d(2024, 6, 30)));
        assert_eq!(
            resolve_range(range, d(2024, 1, 1)),
            (d(2024, 6, 1), d(2024, 6, 30))
        );
    }

    #[test]
    fn test_resolve_range_default_window() {
        let (start, end) = resolve_range(None, d(2024, 6, 1));
        assert_eq!(start, d(2024, 6, 1));
        assert_eq!((end - start).num_days() + 1, DEFAULT_WINDOW_DAYS);
    }
}
