//! Enrollment unit-of-work port.

use async_trait::async_trait;

use crate::domain::enrollment::{Course, Purchase, User};
use crate::domain::foundation::DomainError;

/// Port for the all-or-nothing completion write.
///
/// A completed checkout mutates three entities: the purchase status, the
/// user's enrollment list, and the course roster. Persisting them as three
/// independent saves leaves a window where interleaved duplicate deliveries
/// lose an update; implementations must span all three writes with a single
/// transaction and keep the set-membership checks conditional per entity.
#[async_trait]
pub trait EnrollmentUnitOfWork: Send + Sync {
    /// Atomically persist the completion outcome for all three entities.
    async fn commit_completion(
        &self,
        purchase: &Purchase,
        user: &User,
        course: &Course,
    ) -> Result<(), DomainError>;
}
