//! User repository port.

use async_trait::async_trait;

use crate::domain::enrollment::User;
use crate::domain::foundation::{DomainError, UserId};

/// Port for user persistence.
///
/// Profile writes come from the identity-sync flow; the enrollment core only
/// reads users here and writes them through the enrollment unit of work.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Look up a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Insert a user record, updating profile fields if the id already
    /// exists (identity webhooks are delivered at-least-once).
    async fn upsert(&self, user: &User) -> Result<(), DomainError>;

    /// Update profile fields by id, leaving the enrollment list untouched.
    async fn update_profile(&self, user: &User) -> Result<(), DomainError>;

    /// Delete a user record. Deleting an absent user is a no-op.
    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;
}
