use crate::domain::entities::deadline::{Deadline, DeadlineStatus, DEADLINE_DATE_FORMAT};
use crate::domain::error::DomainError;
use crate::domain::ports::deadline_repository::DeadlineRepository;
use chrono::{Local, NaiveDate};
use std::sync::Arc;

pub struct DeadlineUseCase {
    repo: Arc<dyn DeadlineRepository>,
}

impl DeadlineUseCase {
    pub fn new(repo: Arc<dyn DeadlineRepository>) -> Self {
        Self { repo }
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Sets or moves the deadline of a roadmap. `date` must be `YYYY-MM-DD`.
    pub fn set(&self, roadmap_id: &str, date: &str) -> Result<DeadlineStatus, DomainError> {
        if roadmap_id.trim().is_empty() {
            return Err(DomainError::InvalidInput("roadmap id must not be empty".into()));
        }
        let date = NaiveDate::parse_from_str(date.trim(), DEADLINE_DATE_FORMAT)
            .map_err(|e| DomainError::InvalidInput(format!("Invalid deadline {date:?}, expected YYYY-MM-DD: {e}")))?;

        let deadline = match self.repo.get(roadmap_id)? {
            Some(mut existing) => {
                existing.reschedule(date);
                existing
            }
            None => Deadline::new(roadmap_id.to_string(), date),
        };
        self.repo.save(&deadline)?;
        Ok(deadline.status(Self::today()))
    }

    pub fn get(&self, roadmap_id: &str) -> Result<Option<DeadlineStatus>, DomainError> {
        Ok(self.repo.get(roadmap_id)?.map(|d| d.status(Self::today())))
    }

    pub fn delete(&self, roadmap_id: &str) -> Result<bool, DomainError> {
        self.repo.delete(roadmap_id)
    }
}
