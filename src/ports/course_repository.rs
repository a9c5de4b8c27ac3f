//! Course repository port.

use async_trait::async_trait;

use crate::domain::enrollment::Course;
use crate::domain::foundation::{CourseId, DomainError};

/// Port for course lookups.
///
/// Course lifecycle (creation, publishing) is outside this service; the
/// reconciliation flow only reads courses and writes their roster through
/// the enrollment unit of work.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Look up a course by id.
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;
}
