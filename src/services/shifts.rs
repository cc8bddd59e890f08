use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::{CloseShiftInput, OpenShiftInput, Role, Shift, ShiftStatus};
use crate::database::repositories::{ShiftRepository, WorkerRepository};
use crate::error::AppError;

/// Acting principal as resolved by the identity boundary. The core trusts
/// this pair and does no credential work of its own.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub worker_id: Uuid,
    pub role: Role,
}

/// Read-through lookup into the worker directory. Injected rather than read
/// from an ambient global so the snapshot-once-at-open rule stays enforceable
/// and testable with a stub directory.
#[async_trait]
pub trait RateLookup: Send + Sync {
    /// Current hourly rate in minor units, or None when the worker is absent.
    async fn hourly_rate(&self, worker_id: Uuid) -> Result<Option<i64>, AppError>;
}

#[async_trait]
impl RateLookup for WorkerRepository {
    async fn hourly_rate(&self, worker_id: Uuid) -> Result<Option<i64>, AppError> {
        Ok(self.find_by_id(worker_id).await?.map(|w| w.hourly_rate))
    }
}

/// Owns the open -> closed shift state machine and the payout computation
/// performed at close.
pub struct ShiftService<R: RateLookup> {
    shifts: ShiftRepository,
    rates: R,
}

impl<R: RateLookup> ShiftService<R> {
    pub fn new(shifts: ShiftRepository, rates: R) -> Self {
        Self { shifts, rates }
    }

    /// Clock in. Captures the worker's current rate as the shift's snapshot.
    /// `opened_at` accepts a caller-clock override and defaults to now.
    pub async fn open_shift(
        &self,
        worker_id: Uuid,
        input: OpenShiftInput,
    ) -> Result<Shift, AppError> {
        let hourly_rate = self
            .rates
            .hourly_rate(worker_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Worker not found".to_string()))?;

        // Fast-path check for a friendlier error; the partial unique index is
        // the authority when two opens race past this.
        if self.shifts.find_open_for_worker(worker_id).await?.is_some() {
            return Err(AppError::Conflict(
                "Worker already has an open shift".to_string(),
            ));
        }

        let opened_at = input.opened_at.unwrap_or_else(Utc::now);

        self.shifts
            .insert_open(
                worker_id,
                opened_at,
                input.expected_end,
                hourly_rate,
                input.notes,
            )
            .await
            .map_err(|e| {
                if AppError::is_unique_violation(&e) {
                    AppError::Conflict("Worker already has an open shift".to_string())
                } else {
                    e.into()
                }
            })
    }

    /// Clock out. Workers may close only their own shift; admins may close
    /// any. Closing is deliberately not idempotent: a second close is a
    /// conflict and the first close's result stands.
    pub async fn close_shift(
        &self,
        shift_id: Uuid,
        actor: Actor,
        input: CloseShiftInput,
    ) -> Result<Shift, AppError> {
        let shift = self
            .shifts
            .find_by_id(shift_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Shift not found".to_string()))?;

        if !actor.role.is_admin() && actor.worker_id != shift.worker_id {
            return Err(AppError::Forbidden(
                "Cannot close shifts for other workers".to_string(),
            ));
        }

        if shift.status == ShiftStatus::Closed {
            return Err(AppError::Conflict("Shift is already closed".to_string()));
        }

        let closed_at = input.closed_at.unwrap_or_else(Utc::now);
        let minutes_worked = minutes_between(shift.opened_at, closed_at);
        let payout = payout_for(shift.hourly_rate_snapshot, minutes_worked);

        // The status guard in the UPDATE catches a close that raced us past
        // the check above.
        self.shifts
            .close(shift_id, closed_at, minutes_worked, payout, input.notes)
            .await?
            .ok_or_else(|| AppError::Conflict("Shift is already closed".to_string()))
    }
}

/// Whole minutes between open and close, rounded to the nearest minute and
/// floored at 1. The floor guards against zero or negative durations from
/// clock anomalies; a shift never closes with zero payout.
pub fn minutes_between(opened_at: DateTime<Utc>, closed_at: DateTime<Utc>) -> i64 {
    let seconds = (closed_at - opened_at).num_seconds();
    ((seconds + 30).div_euclid(60)).max(1)
}

/// Payout in minor units: rate/hour x minutes / 60, integer arithmetic
/// rounded half-up. Money never touches binary floating point.
pub fn payout_for(hourly_rate_snapshot: i64, minutes_worked: i64) -> i64 {
    (hourly_rate_snapshot * minutes_worked + 30).div_euclid(60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, s).unwrap()
    }

    #[test]
    fn minutes_are_rounded_to_nearest() {
        assert_eq!(minutes_between(at(9, 0, 0), at(13, 30, 0)), 270);
        assert_eq!(minutes_between(at(9, 0, 0), at(9, 10, 29)), 10);
        assert_eq!(minutes_between(at(9, 0, 0), at(9, 10, 30)), 11);
    }

    #[test]
    fn minutes_never_drop_below_one() {
        // Zero-length and clock-skewed negative durations both floor at 1.
        assert_eq!(minutes_between(at(9, 0, 0), at(9, 0, 0)), 1);
        assert_eq!(minutes_between(at(9, 0, 0), at(8, 55, 0)), 1);
    }

    #[test]
    fn payout_matches_rate_times_hours() {
        // 5000/hr for 4h30m.
        assert_eq!(payout_for(5000, 270), 22500);
        // 6000/hr for 3h.
        assert_eq!(payout_for(6000, 180), 18000);
    }

    #[test]
    fn payout_rounds_half_up_on_partial_minutes() {
        // 100/hr for 1 minute = 1.67 minor units.
        assert_eq!(payout_for(100, 1), 2);
        // 90/hr for 1 minute = 1.5, rounds up.
        assert_eq!(payout_for(90, 1), 2);
        // 80/hr for 1 minute = 1.33, rounds down.
        assert_eq!(payout_for(80, 1), 1);
    }
}
