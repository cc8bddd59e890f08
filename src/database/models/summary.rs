use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::WorkerInfo;

/// Per-worker reconciliation line for one queried range. Derived on every
/// request from the two ledgers, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSummary {
    pub worker_id: Uuid,
    pub worker: Option<WorkerInfo>,
    pub shift_count: i64,
    pub minutes_worked: i64,
    /// Display convenience derived from minutes; money math never uses it.
    pub hours_worked: f64,
    pub payout: i64,
    pub paid: i64,
    /// max(payout - paid, 0); overpayment never reports a negative balance.
    pub pending: i64,
}
