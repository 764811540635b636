use crate::domain::entities::deadline::Deadline;
use crate::domain::error::DomainError;

pub trait DeadlineRepository: Send + Sync {
    fn save(&self, deadline: &Deadline) -> Result<(), DomainError>;
    fn get(&self, roadmap_id: &str) -> Result<Option<Deadline>, DomainError>;
    /// Returns `true` when a deadline was removed.
    fn delete(&self, roadmap_id: &str) -> Result<bool, DomainError>;
}
