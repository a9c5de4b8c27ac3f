//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! domain and the outside world. Adapters implement these ports.

mod course_repository;
mod enrollment_unit_of_work;
mod payment_provider;
mod purchase_repository;
mod user_repository;

pub use course_repository::CourseRepository;
pub use enrollment_unit_of_work::EnrollmentUnitOfWork;
pub use payment_provider::{PaymentError, PaymentErrorCode, PaymentProvider};
pub use purchase_repository::PurchaseRepository;
pub use user_repository::UserRepository;
