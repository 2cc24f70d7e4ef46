use uuid::Uuid;
use validator::Validate;

use crate::dto::assignment_dto::{
    AssignmentFilters, AssignmentResponse, AssignmentStatsResponse, CreateAssignmentRequest,
    DestinationCount, UpdateAssignmentRequest,
};
use crate::dto::common_dto::PagedResponse;
use crate::repositories::assignment_repository::AssignmentRepository;
use crate::services::assignment_service::{AssignmentOutcome, AssignmentService};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct AssignmentController {
    service: AssignmentService,
    repository: AssignmentRepository,
}

impl AssignmentController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: AssignmentService::new(state),
            repository: AssignmentRepository::new(state.pool.clone()),
        }
    }

    pub async fn create(
        &self,
        request: CreateAssignmentRequest,
    ) -> Result<AssignmentOutcome, AppError> {
        request.validate()?;
        self.service.create(&request).await
    }

    pub async fn batch_create(
        &self,
        requests: Vec<CreateAssignmentRequest>,
    ) -> Result<Vec<Result<AssignmentOutcome, AppError>>, AppError> {
        for request in &requests {
            request.validate()?;
        }
        Ok(self.service.batch_create(&requests).await)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<AssignmentResponse, AppError> {
        let assignment = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asignación {} no encontrada", id)))?;

        Ok(AssignmentResponse::from(assignment))
    }

    pub async fn page(
        &self,
        filters: AssignmentFilters,
    ) -> Result<PagedResponse<AssignmentResponse>, AppError> {
        let limit = filters.limit.unwrap_or(50).clamp(1, 200);
        let offset = filters.offset.unwrap_or(0).max(0);
        let (assignments, total) = self.repository.page(&filters).await?;

        Ok(PagedResponse {
            items: assignments.into_iter().map(AssignmentResponse::from).collect(),
            total,
            limit,
            offset,
        })
    }

    pub async fn by_day(
        &self,
        date: chrono::NaiveDate,
        include_cancelled: bool,
    ) -> Result<Vec<AssignmentResponse>, AppError> {
        let assignments = self.repository.find_by_day(date, include_cancelled).await?;
        Ok(assignments.into_iter().map(AssignmentResponse::from).collect())
    }

    pub async fn by_day_range(
        &self,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Result<Vec<AssignmentResponse>, AppError> {
        crate::utils::validation::validate_date_range(start, end).map_err(|_| {
            crate::utils::errors::validation_error(
                "date_range",
                "start_date must not be after end_date",
            )
        })?;
        let assignments = self.repository.find_by_day_range(start, end).await?;
        Ok(assignments.into_iter().map(AssignmentResponse::from).collect())
    }

    pub async fn by_destination(
        &self,
        destination: &str,
    ) -> Result<Vec<AssignmentResponse>, AppError> {
        let assignments = self.repository.find_by_destination(destination).await?;
        Ok(assignments.into_iter().map(AssignmentResponse::from).collect())
    }

    pub async fn by_guide(
        &self,
        guide_id: Uuid,
        date: Option<chrono::NaiveDate>,
    ) -> Result<Vec<AssignmentResponse>, AppError> {
        let assignments = self.repository.find_by_guide(guide_id, date).await?;
        Ok(assignments.into_iter().map(AssignmentResponse::from).collect())
    }

    pub async fn by_vehicle(
        &self,
        vehicle_id: Uuid,
        date: Option<chrono::NaiveDate>,
    ) -> Result<Vec<AssignmentResponse>, AppError> {
        let assignments = self.repository.find_by_vehicle(vehicle_id, date).await?;
        Ok(assignments.into_iter().map(AssignmentResponse::from).collect())
    }

    pub async fn stats(&self, date: chrono::NaiveDate) -> Result<AssignmentStatsResponse, AppError> {
        let stats = self.service.stats_for_day(date).await?;

        Ok(AssignmentStatsResponse {
            date,
            total_assignments: stats.total_assignments,
            by_destination: stats
                .by_destination
                .into_iter()
                .map(|(destination, count)| DestinationCount { destination, count })
                .collect(),
            unassigned_guide_count: stats.unassigned_guide_count,
            unassigned_vehicle_count: stats.unassigned_vehicle_count,
        })
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateAssignmentRequest,
    ) -> Result<AssignmentOutcome, AppError> {
        request.validate()?;
        self.service.update(id, &request).await
    }

    pub async fn confirm(&self, id: Uuid) -> Result<AssignmentResponse, AppError> {
        let assignment = self.service.confirm(id).await?;
        Ok(AssignmentResponse::from(assignment))
    }

    pub async fn cancel(&self, id: Uuid) -> Result<(), AppError> {
        self.service.cancel(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.service.delete_hard(id).await
    }
}
