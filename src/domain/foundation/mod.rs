//! Foundation - Shared value objects and error types for the domain layer.

mod errors;
mod ids;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CourseId, PurchaseId, UserId};
