//! PostgreSQL implementation of EnrollmentUnitOfWork.
//!
//! Spans the three completion writes with one transaction. Each statement is
//! additionally conditional on current database state (pending-only status
//! flip, absent-only array append) so that two interleaved deliveries for
//! the same purchase cannot double-credit an enrollment or resurrect a
//! settled status.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::enrollment::{Course, Purchase, User};
use crate::domain::foundation::DomainError;
use crate::ports::EnrollmentUnitOfWork;

/// PostgreSQL implementation of the EnrollmentUnitOfWork port.
pub struct PostgresEnrollmentUnitOfWork {
    pool: PgPool,
}

impl PostgresEnrollmentUnitOfWork {
    /// Creates a new unit of work with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnrollmentUnitOfWork for PostgresEnrollmentUnitOfWork {
    async fn commit_completion(
        &self,
        purchase: &Purchase,
        user: &User,
        course: &Course,
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE purchases
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(purchase.id.as_str())
        .bind(purchase.status.as_str())
        .bind(purchase.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE users
            SET enrolled_courses = array_append(enrolled_courses, $2), updated_at = $3
            WHERE id = $1 AND NOT ($2 = ANY(enrolled_courses))
            "#,
        )
        .bind(user.id.as_str())
        .bind(course.id.as_str())
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        sqlx::query(
            r#"
            UPDATE courses
            SET enrolled_students = array_append(enrolled_students, $2), updated_at = $3
            WHERE id = $1 AND NOT ($2 = ANY(enrolled_students))
            "#,
        )
        .bind(course.id.as_str())
        .bind(user.id.as_str())
        .bind(course.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| DomainError::database(e.to_string()))
    }
}
