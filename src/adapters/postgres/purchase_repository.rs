//! PostgreSQL implementation of PurchaseRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::enrollment::{Purchase, PurchaseStatus};
use crate::domain::foundation::{CourseId, DomainError, ErrorCode, PurchaseId, UserId};
use crate::ports::PurchaseRepository;

/// PostgreSQL implementation of the PurchaseRepository port.
pub struct PostgresPurchaseRepository {
    pool: PgPool,
}

impl PostgresPurchaseRepository {
    /// Creates a new repository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a purchase.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PurchaseRow {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = DomainError;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        Ok(Purchase {
            id: PurchaseId::new(row.id)?,
            user_id: UserId::new(row.user_id)?,
            course_id: CourseId::new(row.course_id)?,
            amount: row.amount,
            status: parse_status(&row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(crate) fn parse_status(s: &str) -> Result<PurchaseStatus, DomainError> {
    match s {
        "pending" => Ok(PurchaseStatus::Pending),
        "completed" => Ok(PurchaseStatus::Completed),
        "failed" => Ok(PurchaseStatus::Failed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid purchase status: {}", s),
        )),
    }
}

#[async_trait]
impl PurchaseRepository for PostgresPurchaseRepository {
    async fn find_by_id(&self, id: &PurchaseId) -> Result<Option<Purchase>, DomainError> {
        let row: Option<PurchaseRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, course_id, amount, status, created_at, updated_at
            FROM purchases
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        row.map(Purchase::try_from).transpose()
    }

    async fn update(&self, purchase: &Purchase) -> Result<(), DomainError> {
        // Pending-only guard: a terminal status is never overwritten, even if
        // two deliveries race between read and write.
        let result = sqlx::query(
            r#"
            UPDATE purchases
            SET status = $2, updated_at = $3
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(purchase.id.as_str())
        .bind(purchase.status.as_str())
        .bind(purchase.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(e.to_string()))?;

        if result.rows_affected() == 0 {
            // Another delivery already settled this purchase.
            tracing::debug!(purchase_id = %purchase.id, "purchase status already settled");
        }

        Ok(())
    }
}
