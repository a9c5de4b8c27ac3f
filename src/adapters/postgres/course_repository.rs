//! PostgreSQL implementation of CourseRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::enrollment::Course;
use crate::domain::foundation::{CourseId, DomainError, UserId};
use crate::ports::CourseRepository;

/// PostgreSQL implementation of the CourseRepository port.
pub struct PostgresCourseRepository {
    pool: PgPool,
}

impl PostgresCourseRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a course.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CourseRow {
    pub id: String,
    pub title: String,
    pub enrolled_students: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CourseRow> for Course {
    type Error = DomainError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let enrolled_students = row
            .enrolled_students
            .into_iter()
            .map(UserId::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Course {
            id: CourseId::new(row.id)?,
            title: row.title,
            enrolled_students,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CourseRepository for PostgresCourseRepository {
    async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(
            r#"
            SELECT id, title, enrolled_students, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        row.map(Course::try_from).transpose()
    }
}
