//! PostgreSQL adapters - Database implementations of the repository ports.

mod course_repository;
mod enrollment_unit_of_work;
mod purchase_repository;
mod user_repository;

pub use course_repository::PostgresCourseRepository;
pub use enrollment_unit_of_work::PostgresEnrollmentUnitOfWork;
pub use purchase_repository::PostgresPurchaseRepository;
pub use user_repository::PostgresUserRepository;
