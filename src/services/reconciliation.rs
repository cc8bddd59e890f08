use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::WorkerSummary;
use crate::database::repositories::{PaymentRepository, ShiftRepository, WorkerRepository};
use crate::error::AppError;

/// Rolls closed shifts and payment records up into per-worker summaries for
/// an arbitrary range. Everything is recomputed from the two ledgers on each
/// call; no balance is cached anywhere, so there is no dual-write to keep
/// consistent.
pub struct ReconciliationService {
    shifts: ShiftRepository,
    payments: PaymentRepository,
    workers: WorkerRepository,
}

impl ReconciliationService {
    pub fn new(
        shifts: ShiftRepository,
        payments: PaymentRepository,
        workers: WorkerRepository,
    ) -> Self {
        Self {
            shifts,
            payments,
            workers,
        }
    }

    /// One summary per worker with at least one shift closed inside the
    /// inclusive range. Payments are matched by window overlap and counted in
    /// full; a worker with payments but no closed shifts in range is omitted.
    /// Ordering of the result is unspecified.
    pub async fn summarize(
        &self,
        range_start: Option<DateTime<Utc>>,
        range_end: Option<DateTime<Utc>>,
    ) -> Result<Vec<WorkerSummary>, AppError> {
        let totals = self
            .shifts
            .closed_totals_in_range(range_start, range_end)
            .await?;

        if totals.is_empty() {
            return Ok(Vec::new());
        }

        let paid_by_worker: HashMap<Uuid, i64> = self
            .payments
            .paid_totals_overlapping(range_start, range_end)
            .await?
            .into_iter()
            .map(|t| (t.worker_id, t.amount))
            .collect();

        let mut summaries = Vec::with_capacity(totals.len());
        for row in totals {
            let worker = self
                .workers
                .find_by_id(row.worker_id)
                .await?
                .map(Into::into);
            let paid = paid_by_worker.get(&row.worker_id).copied().unwrap_or(0);

            summaries.push(WorkerSummary {
                worker_id: row.worker_id,
                worker,
                shift_count: row.shift_count,
                minutes_worked: row.minutes_worked,
                hours_worked: row.minutes_worked as f64 / 60.0,
                payout: row.payout,
                paid,
                pending: (row.payout - paid).max(0),
            });
        }

        Ok(summaries)
    }
}
