use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{PaymentInput, PaymentRecord};

const PAYMENT_COLUMNS: &str =
    "id, worker_id, period_start, period_end, amount, notes, paid_at, created_at";

/// Per-worker disbursement total over payment windows overlapping a range.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PaidTotals {
    pub worker_id: Uuid,
    pub amount: i64,
}

/// Append-and-delete ledger of disbursements. No derived state lives here;
/// balances are recomputed by the reconciliation service on every request.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, input: &PaymentInput) -> Result<PaymentRecord, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, PaymentRecord>(&format!(
            r#"
            INSERT INTO payment_records (id, worker_id, period_start, period_end, amount, notes, paid_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PAYMENT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(input.worker_id)
        .bind(input.period_start)
        .bind(input.period_end)
        .bind(input.amount)
        .bind(input.notes.clone())
        .bind(input.paid_at.unwrap_or(now))
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    /// Administrative correction; reversing a payment is just removing it.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payment_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// History listing; a record matches when its window overlaps the queried
    /// range. Newest first, bounded page.
    pub async fn list(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        worker_id: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<PaymentRecord>, sqlx::Error> {
        sqlx::query_as::<_, PaymentRecord>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS} FROM payment_records
            WHERE ($1 IS NULL OR period_end >= $1)
              AND ($2 IS NULL OR period_start <= $2)
              AND ($3 IS NULL OR worker_id = $3)
            ORDER BY paid_at DESC, created_at DESC
            LIMIT $4
            "#
        ))
        .bind(start)
        .bind(end)
        .bind(worker_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Sums amounts per worker for records whose window overlaps the range
    /// (`period_end >= start AND period_start <= end`). Overlap matching, not
    /// exact-match: a window reaching slightly outside the range is counted
    /// in full, never pro-rated.
    pub async fn paid_totals_overlapping(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<PaidTotals>, sqlx::Error> {
        sqlx::query_as::<_, PaidTotals>(
            r#"
            SELECT worker_id, COALESCE(SUM(amount), 0) AS amount
            FROM payment_records
            WHERE ($1 IS NULL OR period_end >= $1)
              AND ($2 IS NULL OR period_start <= $2)
            GROUP BY worker_id
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }
}
