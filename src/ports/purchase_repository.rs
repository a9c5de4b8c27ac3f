//! Purchase repository port.

use async_trait::async_trait;

use crate::domain::enrollment::Purchase;
use crate::domain::foundation::{DomainError, PurchaseId};

/// Port for purchase persistence.
///
/// Purchases are created at checkout initiation, outside this service's
/// write path; reconciliation only reads them and updates their status.
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Look up a purchase by id.
    async fn find_by_id(&self, id: &PurchaseId) -> Result<Option<Purchase>, DomainError>;

    /// Persist an updated purchase.
    ///
    /// Implementations must only move a purchase out of `pending`: a
    /// conditional write so concurrent duplicate deliveries cannot overwrite
    /// a terminal status.
    async fn update(&self, purchase: &Purchase) -> Result<(), DomainError>;
}
