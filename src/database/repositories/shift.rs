use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::{Shift, ShiftStatus};

const SHIFT_COLUMNS: &str = "id, worker_id, opened_at, expected_end, closed_at, status, \
     hourly_rate_snapshot, minutes_worked, payout, notes, created_at, updated_at";

/// Per-worker totals over closed shifts, one row per worker with at least one
/// closed shift in the queried range.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClosedShiftTotals {
    pub worker_id: Uuid,
    pub shift_count: i64,
    pub minutes_worked: i64,
    pub payout: i64,
}

#[derive(Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a new open shift. The partial unique index on
    /// `shifts (worker_id) WHERE status = 'open'` is the authoritative guard
    /// for the single-open-shift invariant; a concurrent insert for the same
    /// worker fails here with a uniqueness violation.
    pub async fn insert_open(
        &self,
        worker_id: Uuid,
        opened_at: DateTime<Utc>,
        expected_end: Option<DateTime<Utc>>,
        hourly_rate_snapshot: i64,
        notes: Option<String>,
    ) -> Result<Shift, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Shift>(&format!(
            r#"
            INSERT INTO shifts (id, worker_id, opened_at, expected_end, status, hourly_rate_snapshot, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {SHIFT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(worker_id)
        .bind(opened_at)
        .bind(expected_end)
        .bind(ShiftStatus::Open)
        .bind(hourly_rate_snapshot)
        .bind(notes)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Shift>, sqlx::Error> {
        sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_open_for_worker(&self, worker_id: Uuid) -> Result<Option<Shift>, sqlx::Error> {
        sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE worker_id = $1 AND status = $2"
        ))
        .bind(worker_id)
        .bind(ShiftStatus::Open)
        .fetch_optional(&self.pool)
        .await
    }

    /// One-way transition to closed. The `status = 'open'` guard in the WHERE
    /// clause makes a second close a no-row update rather than an overwrite,
    /// so closed fields stay immutable even under a racing double close.
    pub async fn close(
        &self,
        id: Uuid,
        closed_at: DateTime<Utc>,
        minutes_worked: i64,
        payout: i64,
        notes: Option<String>,
    ) -> Result<Option<Shift>, sqlx::Error> {
        sqlx::query_as::<_, Shift>(&format!(
            r#"
            UPDATE shifts
            SET status = $1, closed_at = $2, minutes_worked = $3, payout = $4,
                notes = COALESCE($5, notes), updated_at = $6
            WHERE id = $7 AND status = $8
            RETURNING {SHIFT_COLUMNS}
            "#
        ))
        .bind(ShiftStatus::Closed)
        .bind(closed_at)
        .bind(minutes_worked)
        .bind(payout)
        .bind(notes)
        .bind(Utc::now())
        .bind(id)
        .bind(ShiftStatus::Open)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list_for_worker(&self, worker_id: Uuid, limit: i64) -> Result<Vec<Shift>, sqlx::Error> {
        sqlx::query_as::<_, Shift>(&format!(
            "SELECT {SHIFT_COLUMNS} FROM shifts WHERE worker_id = $1 ORDER BY opened_at DESC LIMIT $2"
        ))
        .bind(worker_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Admin listing by `opened_at`, either bound optional, newest first.
    pub async fn list_in_range(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        worker_id: Option<Uuid>,
    ) -> Result<Vec<Shift>, sqlx::Error> {
        sqlx::query_as::<_, Shift>(&format!(
            r#"
            SELECT {SHIFT_COLUMNS} FROM shifts
            WHERE ($1 IS NULL OR opened_at >= $1)
              AND ($2 IS NULL OR opened_at <= $2)
              AND ($3 IS NULL OR worker_id = $3)
            ORDER BY opened_at DESC
            "#
        ))
        .bind(start)
        .bind(end)
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Groups closed shifts whose `closed_at` falls inside the inclusive
    /// range; an absent bound selects unboundedly on that side.
    pub async fn closed_totals_in_range(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<ClosedShiftTotals>, sqlx::Error> {
        sqlx::query_as::<_, ClosedShiftTotals>(
            r#"
            SELECT worker_id,
                   COUNT(*) AS shift_count,
                   COALESCE(SUM(minutes_worked), 0) AS minutes_worked,
                   COALESCE(SUM(payout), 0) AS payout
            FROM shifts
            WHERE status = $1
              AND ($2 IS NULL OR closed_at >= $2)
              AND ($3 IS NULL OR closed_at <= $3)
            GROUP BY worker_id
            "#,
        )
        .bind(ShiftStatus::Closed)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
    }
}
