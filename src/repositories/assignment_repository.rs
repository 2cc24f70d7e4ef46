//! Repositorio de asignaciones (Assignment Ledger)
//!
//! Acceso a datos puro sobre tour_assignments: sin lógica de conflictos.
//! Las consultas por fecha incluyen el día indicado y excluyen las filas
//! canceladas salvo que se pida lo contrario.

use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::dto::assignment_dto::AssignmentFilters;
use crate::models::assignment::{Assignment, AssignmentStatus};
use crate::utils::errors::AppError;

/// Datos para insertar una nueva asignación
#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub tour_id: Uuid,
    pub day: NaiveDate,
    pub destination: String,
    pub guide_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub force_assigned: bool,
}

/// Estadísticas del libro mayor para una fecha
#[derive(Debug, Clone)]
pub struct AssignmentDayStats {
    pub total_assignments: i64,
    pub by_destination: Vec<(String, i64)>,
    pub unassigned_guide_count: i64,
    pub unassigned_vehicle_count: i64,
}

/// Verificar si un error de sqlx es una violación del índice único indicado
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
    } else {
        false
    }
}

pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Assignment>, AppError> {
        let assignment =
            sqlx::query_as::<_, Assignment>("SELECT * FROM tour_assignments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(assignment)
    }

    pub async fn find_by_day(
        &self,
        day: NaiveDate,
        include_cancelled: bool,
    ) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT * FROM tour_assignments
            WHERE day = $1 AND ($2 OR status <> 'cancelled')
            ORDER BY created_at
            "#,
        )
        .bind(day)
        .bind(include_cancelled)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    pub async fn find_by_day_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT * FROM tour_assignments
            WHERE day BETWEEN $1 AND $2 AND status <> 'cancelled'
            ORDER BY day, created_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    pub async fn find_by_destination(
        &self,
        destination: &str,
    ) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT * FROM tour_assignments
            WHERE destination = $1 AND status <> 'cancelled'
            ORDER BY day DESC
            "#,
        )
        .bind(destination)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    pub async fn find_by_guide(
        &self,
        guide_id: Uuid,
        day: Option<NaiveDate>,
    ) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT * FROM tour_assignments
            WHERE guide_id = $1 AND ($2::date IS NULL OR day = $2) AND status <> 'cancelled'
            ORDER BY day
            "#,
        )
        .bind(guide_id)
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    pub async fn find_by_vehicle(
        &self,
        vehicle_id: Uuid,
        day: Option<NaiveDate>,
    ) -> Result<Vec<Assignment>, AppError> {
        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT * FROM tour_assignments
            WHERE vehicle_id = $1 AND ($2::date IS NULL OR day = $2) AND status <> 'cancelled'
            ORDER BY day
            "#,
        )
        .bind(vehicle_id)
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments)
    }

    /// Listado paginado con filtros combinables
    pub async fn page(
        &self,
        filters: &AssignmentFilters,
    ) -> Result<(Vec<Assignment>, i64), AppError> {
        let limit = filters.limit.unwrap_or(50).clamp(1, 200);
        let offset = filters.offset.unwrap_or(0).max(0);
        let include_cancelled = filters.include_cancelled.unwrap_or(false);

        let assignments = sqlx::query_as::<_, Assignment>(
            r#"
            SELECT * FROM tour_assignments
            WHERE ($1::date IS NULL OR day >= $1)
              AND ($2::date IS NULL OR day <= $2)
              AND ($3::text IS NULL OR destination = $3)
              AND ($4::uuid IS NULL OR guide_id = $4)
              AND ($5::uuid IS NULL OR vehicle_id = $5)
              AND ($6::assignment_status IS NULL OR status = $6)
              AND ($7 OR status <> 'cancelled')
            ORDER BY day DESC, created_at DESC
            LIMIT $8 OFFSET $9
            "#,
        )
        .bind(filters.start_date)
        .bind(filters.end_date)
        .bind(filters.destination.clone())
        .bind(filters.guide_id)
        .bind(filters.vehicle_id)
        .bind(filters.status)
        .bind(include_cancelled)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM tour_assignments
            WHERE ($1::date IS NULL OR day >= $1)
              AND ($2::date IS NULL OR day <= $2)
              AND ($3::text IS NULL OR destination = $3)
              AND ($4::uuid IS NULL OR guide_id = $4)
              AND ($5::uuid IS NULL OR vehicle_id = $5)
              AND ($6::assignment_status IS NULL OR status = $6)
              AND ($7 OR status <> 'cancelled')
            "#,
        )
        .bind(filters.start_date)
        .bind(filters.end_date)
        .bind(filters.destination.clone())
        .bind(filters.guide_id)
        .bind(filters.vehicle_id)
        .bind(filters.status)
        .bind(include_cancelled)
        .fetch_one(&self.pool)
        .await?;

        Ok((assignments, total))
    }

    pub async fn count_by_day(&self, day: NaiveDate) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tour_assignments WHERE day = $1 AND status <> 'cancelled'",
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Verificar si un guía ya tiene una asignación no cancelada en la fecha
    ///
    /// En actualizaciones se excluye la propia fila (`exclude`).
    pub async fn exists_for_guide_on_day(
        &self,
        guide_id: Uuid,
        day: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM tour_assignments
                WHERE guide_id = $1 AND day = $2 AND status <> 'cancelled'
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(guide_id)
        .bind(day)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Verificar si un vehículo ya tiene una asignación no cancelada en la fecha
    pub async fn exists_for_vehicle_on_day(
        &self,
        vehicle_id: Uuid,
        day: NaiveDate,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM tour_assignments
                WHERE vehicle_id = $1 AND day = $2 AND status <> 'cancelled'
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(vehicle_id)
        .bind(day)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Estadísticas del libro mayor para una fecha
    pub async fn stats_for_day(&self, day: NaiveDate) -> Result<AssignmentDayStats, AppError> {
        let total_assignments = self.count_by_day(day).await?;

        let by_destination = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT destination, COUNT(*) FROM tour_assignments
            WHERE day = $1 AND status <> 'cancelled'
            GROUP BY destination
            ORDER BY COUNT(*) DESC, destination
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        let (unassigned_guide_count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM tour_assignments
            WHERE day = $1 AND status <> 'cancelled' AND guide_id IS NULL
            "#,
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await?;

        let (unassigned_vehicle_count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM tour_assignments
            WHERE day = $1 AND status <> 'cancelled' AND vehicle_id IS NULL
            "#,
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await?;

        Ok(AssignmentDayStats {
            total_assignments,
            by_destination,
            unassigned_guide_count,
            unassigned_vehicle_count,
        })
    }

    /// Insertar una asignación dentro de la transacción de asignación
    ///
    /// El llamador traduce la violación de los índices únicos parciales
    /// (SQLSTATE 23505) al conflicto de doble reserva correspondiente.
    pub async fn create_tx(
        tx: &mut Transaction<'_, Postgres>,
        new: &NewAssignment,
    ) -> Result<Assignment, sqlx::Error> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            INSERT INTO tour_assignments
                (id, tour_id, day, destination, guide_id, vehicle_id, status, force_assigned, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.tour_id)
        .bind(new.day)
        .bind(new.destination.clone())
        .bind(new.guide_id)
        .bind(new.vehicle_id)
        .bind(new.force_assigned)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(assignment)
    }

    /// Reescribir los campos mutables de una asignación
    pub async fn update_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        day: NaiveDate,
        destination: &str,
        guide_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
        force_assigned: bool,
    ) -> Result<Assignment, sqlx::Error> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE tour_assignments
            SET day = $2, destination = $3, guide_id = $4, vehicle_id = $5,
                force_assigned = $6, updated_at = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(day)
        .bind(destination)
        .bind(guide_id)
        .bind(vehicle_id)
        .bind(force_assigned)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(assignment)
    }

    /// Cambiar el estado de una asignación validando la transición
    pub async fn set_status_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: AssignmentStatus,
    ) -> Result<Assignment, sqlx::Error> {
        let assignment = sqlx::query_as::<_, Assignment>(
            r#"
            UPDATE tour_assignments
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await?;

        Ok(assignment)
    }

    /// Purga administrativa de una fila del libro mayor
    pub async fn delete_hard_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tour_assignments WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}
