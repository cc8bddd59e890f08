use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use timeclock::auth;
use timeclock::config::Config;
use timeclock::database::init_database;
use timeclock::database::models::{Role, Worker};
use timeclock::database::repositories::{PaymentRepository, ShiftRepository, WorkerRepository};
use timeclock::services::{ReconciliationService, ShiftService};

pub const TEST_PASSWORD: &str = "password123";

// Test database wrapper
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url).await?;

        Ok(TestDb {
            pool,
            _temp_dir: temp_dir,
        })
    }
}

// Shared test fixture: tempfile database, repositories, config
pub struct TestContext {
    pub db: TestDb,
    pub config: Config,
    pub workers: WorkerRepository,
    pub shifts: ShiftRepository,
    pub payments: PaymentRepository,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let db = TestDb::new().await?;

        let config = Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_hours: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
        };

        let workers = WorkerRepository::new(db.pool.clone());
        let shifts = ShiftRepository::new(db.pool.clone());
        let payments = PaymentRepository::new(db.pool.clone());

        Ok(TestContext {
            db,
            config,
            workers,
            shifts,
            payments,
        })
    }

    pub fn shift_service(&self) -> ShiftService<WorkerRepository> {
        ShiftService::new(self.shifts.clone(), self.workers.clone())
    }

    pub fn reconciliation(&self) -> ReconciliationService {
        ReconciliationService::new(
            self.shifts.clone(),
            self.payments.clone(),
            self.workers.clone(),
        )
    }

    pub async fn seed_worker(
        &self,
        name: &str,
        email: &str,
        role: Role,
        hourly_rate: i64,
    ) -> Result<Worker> {
        let now = Utc::now();
        let worker = Worker {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            // Minimum cost keeps the suite fast
            password_hash: bcrypt::hash(TEST_PASSWORD, 4)?,
            role,
            hourly_rate,
            created_at: now,
            updated_at: now,
        };
        self.workers.create_worker(&worker).await?;

        Ok(worker)
    }

    pub fn token_for(&self, worker: &Worker) -> String {
        auth::generate_token(worker, &self.config).expect("token generation failed")
    }
}

/// RFC 3339 timestamp literal for fixture data.
pub fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("invalid test timestamp")
        .with_timezone(&Utc)
}
