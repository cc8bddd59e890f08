use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// One disbursement event covering a worker and a payroll window. Pure
/// history: no foreign key to shifts, no running balance. Reconciliation
/// recomputes everything from this ledger on demand.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// Minor currency units, never negative.
    pub amount: i64,
    pub notes: Option<String>,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub worker_id: Uuid,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub amount: i64,
    pub notes: Option<String>,
    /// Defaults to record creation time when omitted.
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.period_start > self.period_end {
            return Err(AppError::Validation(
                "period start must not be after period end".to_string(),
            ));
        }
        if self.amount < 0 {
            return Err(AppError::Validation(
                "payment amount must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
