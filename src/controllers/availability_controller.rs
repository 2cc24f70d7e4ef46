use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

use crate::dto::availability_dto::{
    AvailabilityQuery, AvailabilityResponse, AvailabilityStatsResponse, BatchSetAvailabilityRequest,
    BatchUpdateResponse, SetAvailabilityRequest,
};
use crate::models::availability::ResourceKind;
use crate::repositories::availability_repository::AvailabilityRepository;
use crate::state::AppState;
use crate::utils::errors::{validation_error, AppError};

pub struct AvailabilityController {
    repository: AvailabilityRepository,
}

impl AvailabilityController {
    pub fn new(state: &AppState) -> Self {
        Self {
            repository: AvailabilityRepository::new(state.pool.clone()),
        }
    }

    pub async fn list(
        &self,
        query: AvailabilityQuery,
    ) -> Result<Vec<AvailabilityResponse>, AppError> {
        let range = match (query.start_date, query.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => {
                return Err(validation_error(
                    "date_range",
                    "start_date and end_date must be provided together",
                ))
            }
        };

        let records = self
            .repository
            .find(query.resource_kind, query.resource_id, range)
            .await?;

        Ok(records.into_iter().map(AvailabilityResponse::from).collect())
    }

    pub async fn set(
        &self,
        request: SetAvailabilityRequest,
    ) -> Result<AvailabilityResponse, AppError> {
        request.validate()?;

        let time_range = match (request.start_time, request.end_time) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => {
                return Err(validation_error(
                    "time_range",
                    "start_time and end_time must be provided together",
                ))
            }
        };

        let record = self
            .repository
            .set(
                request.resource_kind,
                request.resource_id,
                request.date,
                request.status,
                time_range,
                request.notes,
            )
            .await?;

        Ok(AvailabilityResponse::from(record))
    }

    pub async fn batch_set(
        &self,
        request: BatchSetAvailabilityRequest,
    ) -> Result<BatchUpdateResponse, AppError> {
        request.validate()?;

        let updated_count = self
            .repository
            .batch_set(
                request.resource_kind,
                request.resource_id,
                request.start_date,
                request.end_date,
                request.status,
                request.notes,
            )
            .await?;

        Ok(BatchUpdateResponse { updated_count })
    }

    pub async fn delete(
        &self,
        kind: ResourceKind,
        resource_id: Uuid,
        date: NaiveDate,
    ) -> Result<(), AppError> {
        self.repository.delete(kind, resource_id, date).await
    }

    pub async fn stats(
        &self,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityStatsResponse, AppError> {
        let range = match (query.start_date, query.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => {
                return Err(validation_error(
                    "date_range",
                    "start_date and end_date must be provided together",
                ))
            }
        };

        let stats = self
            .repository
            .stats(query.resource_kind, query.resource_id, range)
            .await?;

        Ok(AvailabilityStatsResponse {
            available_days: stats.available_days,
            unavailable_days: stats.unavailable_days,
            current_assignments: stats.current_assignments,
            availability_rate: stats.availability_rate,
        })
    }
}
