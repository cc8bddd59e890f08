use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::Worker;

/// Read side of the worker directory. The directory itself (hiring, role
/// changes, rate changes) is managed outside this service; the core only
/// needs point-in-time reads plus the rate update used by payroll admin.
#[derive(Clone)]
pub struct WorkerRepository {
    pool: SqlitePool,
}

impl WorkerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_worker(&self, worker: &Worker) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO workers (id, email, name, password_hash, role, hourly_rate, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(worker.id)
        .bind(&worker.email)
        .bind(&worker.name)
        .bind(&worker.password_hash)
        .bind(worker.role)
        .bind(worker.hourly_rate)
        .bind(worker.created_at)
        .bind(worker.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Worker>, sqlx::Error> {
        sqlx::query_as::<_, Worker>(
            "SELECT id, email, name, password_hash, role, hourly_rate, created_at, updated_at FROM workers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Worker>, sqlx::Error> {
        sqlx::query_as::<_, Worker>(
            "SELECT id, email, name, password_hash, role, hourly_rate, created_at, updated_at FROM workers WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    /// Live rate change. Past shifts keep their snapshot untouched.
    pub async fn update_hourly_rate(&self, id: Uuid, hourly_rate: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE workers SET hourly_rate = $1, updated_at = $2 WHERE id = $3")
            .bind(hourly_rate)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
