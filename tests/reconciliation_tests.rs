use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use timeclock::database::models::{CloseShiftInput, OpenShiftInput, PaymentInput, Role, Worker};
use timeclock::services::Actor;

mod common;
use common::{ts, TestContext};

/// Opens and closes one shift for `worker` over the given interval.
async fn closed_shift(ctx: &TestContext, worker: &Worker, opened: &str, closed: &str) {
    let service = ctx.shift_service();
    let shift = service
        .open_shift(
            worker.id,
            OpenShiftInput {
                opened_at: Some(ts(opened)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    service
        .close_shift(
            shift.id,
            Actor {
                worker_id: worker.id,
                role: worker.role,
            },
            CloseShiftInput {
                closed_at: Some(ts(closed)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

fn payment(worker_id: Uuid, start: &str, end: &str, amount: i64) -> PaymentInput {
    PaymentInput {
        worker_id,
        period_start: ts(start),
        period_end: ts(end),
        amount,
        notes: None,
        paid_at: None,
    }
}

const WEEK_START: &str = "2025-03-10T00:00:00Z";
const WEEK_END: &str = "2025-03-16T23:59:59Z";

fn week() -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    (Some(ts(WEEK_START)), Some(ts(WEEK_END)))
}

#[actix_web::test]
async fn summary_rolls_up_shifts_and_overlapping_payments() {
    let ctx = TestContext::new().await.unwrap();
    let worker = ctx
        .seed_worker("Wanda", "wanda@example.com", Role::Worker, 5000)
        .await
        .unwrap();

    // Two closed shifts at 5000/hr: 4h30m (22500) and 3h36m (18000).
    closed_shift(&ctx, &worker, "2025-03-10T09:00:00Z", "2025-03-10T13:30:00Z").await;
    closed_shift(&ctx, &worker, "2025-03-11T09:00:00Z", "2025-03-11T12:36:00Z").await;

    // One payment of 30000 overlapping the week
    ctx.payments
        .insert(&payment(
            worker.id,
            "2025-03-10T00:00:00Z",
            "2025-03-12T00:00:00Z",
            30000,
        ))
        .await
        .unwrap();

    let (start, end) = week();
    let summaries = ctx.reconciliation().summarize(start, end).await.unwrap();
    assert_eq!(summaries.len(), 1);

    let line = &summaries[0];
    assert_eq!(line.worker_id, worker.id);
    assert_eq!(line.shift_count, 2);
    assert_eq!(line.minutes_worked, 270 + 216);
    assert_eq!(line.payout, 40500);
    assert_eq!(line.paid, 30000);
    assert_eq!(line.pending, 10500);
    assert_eq!(line.worker.as_ref().unwrap().name, "Wanda");
}

#[actix_web::test]
async fn deleting_the_payment_restores_the_full_pending_balance() {
    let ctx = TestContext::new().await.unwrap();
    let worker = ctx
        .seed_worker("Wanda", "wanda@example.com", Role::Worker, 5000)
        .await
        .unwrap();

    closed_shift(&ctx, &worker, "2025-03-10T09:00:00Z", "2025-03-10T13:30:00Z").await;
    closed_shift(&ctx, &worker, "2025-03-11T09:00:00Z", "2025-03-11T12:36:00Z").await;

    let record = ctx
        .payments
        .insert(&payment(
            worker.id,
            "2025-03-10T00:00:00Z",
            "2025-03-12T00:00:00Z",
            30000,
        ))
        .await
        .unwrap();

    let deleted = ctx.payments.delete(record.id).await.unwrap();
    assert!(deleted);

    let (start, end) = week();
    let summaries = ctx.reconciliation().summarize(start, end).await.unwrap();
    assert_eq!(summaries[0].paid, 0);
    assert_eq!(summaries[0].pending, 40500);

    // Deleting again reports absence
    assert!(!ctx.payments.delete(record.id).await.unwrap());
}

#[actix_web::test]
async fn workers_with_payments_but_no_closed_shifts_are_omitted() {
    let ctx = TestContext::new().await.unwrap();
    let wanda = ctx
        .seed_worker("Wanda", "wanda@example.com", Role::Worker, 5000)
        .await
        .unwrap();
    let pedro = ctx
        .seed_worker("Pedro", "pedro@example.com", Role::Worker, 6000)
        .await
        .unwrap();

    closed_shift(&ctx, &wanda, "2025-03-10T09:00:00Z", "2025-03-10T13:30:00Z").await;

    // Pedro only has a payment in the window, no shift activity
    ctx.payments
        .insert(&payment(
            pedro.id,
            "2025-03-10T00:00:00Z",
            "2025-03-16T00:00:00Z",
            10000,
        ))
        .await
        .unwrap();

    let (start, end) = week();
    let summaries = ctx.reconciliation().summarize(start, end).await.unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].worker_id, wanda.id);
}

#[actix_web::test]
async fn pending_is_floored_at_zero_when_overpaid() {
    let ctx = TestContext::new().await.unwrap();
    let worker = ctx
        .seed_worker("Wanda", "wanda@example.com", Role::Worker, 5000)
        .await
        .unwrap();

    closed_shift(&ctx, &worker, "2025-03-10T09:00:00Z", "2025-03-10T13:30:00Z").await;

    ctx.payments
        .insert(&payment(
            worker.id,
            "2025-03-10T00:00:00Z",
            "2025-03-16T00:00:00Z",
            99000,
        ))
        .await
        .unwrap();

    let (start, end) = week();
    let summaries = ctx.reconciliation().summarize(start, end).await.unwrap();
    assert_eq!(summaries[0].payout, 22500);
    assert_eq!(summaries[0].paid, 99000);
    assert_eq!(summaries[0].pending, 0);
}

#[actix_web::test]
async fn payments_partially_overlapping_the_range_count_in_full() {
    let ctx = TestContext::new().await.unwrap();
    let worker = ctx
        .seed_worker("Wanda", "wanda@example.com", Role::Worker, 5000)
        .await
        .unwrap();

    closed_shift(&ctx, &worker, "2025-03-10T09:00:00Z", "2025-03-10T13:30:00Z").await;

    // Window starts before the queried week but reaches into it; it is
    // counted whole, never pro-rated.
    ctx.payments
        .insert(&payment(
            worker.id,
            "2025-03-03T00:00:00Z",
            "2025-03-10T12:00:00Z",
            5000,
        ))
        .await
        .unwrap();

    // Window entirely before the week; not counted.
    ctx.payments
        .insert(&payment(
            worker.id,
            "2025-03-01T00:00:00Z",
            "2025-03-08T00:00:00Z",
            7000,
        ))
        .await
        .unwrap();

    let (start, end) = week();
    let summaries = ctx.reconciliation().summarize(start, end).await.unwrap();
    assert_eq!(summaries[0].paid, 5000);
    assert_eq!(summaries[0].pending, 22500 - 5000);
}

#[actix_web::test]
async fn range_bounds_are_inclusive_and_optional() {
    let ctx = TestContext::new().await.unwrap();
    let worker = ctx
        .seed_worker("Wanda", "wanda@example.com", Role::Worker, 5000)
        .await
        .unwrap();

    closed_shift(&ctx, &worker, "2025-03-10T09:00:00Z", "2025-03-10T13:30:00Z").await;

    // closed_at exactly on both bounds still matches
    let exact = ctx
        .reconciliation()
        .summarize(
            Some(ts("2025-03-10T13:30:00Z")),
            Some(ts("2025-03-10T13:30:00Z")),
        )
        .await
        .unwrap();
    assert_eq!(exact.len(), 1);

    // Unbounded on both sides selects everything
    let all = ctx.reconciliation().summarize(None, None).await.unwrap();
    assert_eq!(all.len(), 1);

    // A disjoint week selects nothing
    let other = ctx
        .reconciliation()
        .summarize(Some(ts("2025-03-17T00:00:00Z")), Some(ts("2025-03-23T23:59:59Z")))
        .await
        .unwrap();
    assert!(other.is_empty());
}

#[actix_web::test]
async fn open_shifts_never_contribute_to_summaries() {
    let ctx = TestContext::new().await.unwrap();
    let worker = ctx
        .seed_worker("Wanda", "wanda@example.com", Role::Worker, 5000)
        .await
        .unwrap();

    let service = ctx.shift_service();
    service
        .open_shift(
            worker.id,
            OpenShiftInput {
                opened_at: Some(ts("2025-03-10T09:00:00Z")),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let summaries = ctx.reconciliation().summarize(None, None).await.unwrap();
    assert!(summaries.is_empty());
}

#[actix_web::test]
async fn summaries_group_per_worker() {
    let ctx = TestContext::new().await.unwrap();
    let wanda = ctx
        .seed_worker("Wanda", "wanda@example.com", Role::Worker, 5000)
        .await
        .unwrap();
    let pedro = ctx
        .seed_worker("Pedro", "pedro@example.com", Role::Worker, 6000)
        .await
        .unwrap();

    closed_shift(&ctx, &wanda, "2025-03-10T09:00:00Z", "2025-03-10T13:30:00Z").await;
    closed_shift(&ctx, &pedro, "2025-03-10T14:00:00Z", "2025-03-10T17:00:00Z").await;

    let (start, end) = week();
    let mut summaries = ctx.reconciliation().summarize(start, end).await.unwrap();
    summaries.sort_by_key(|s| s.minutes_worked);

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].worker_id, pedro.id);
    assert_eq!(summaries[0].payout, 18000);
    assert_eq!(summaries[1].worker_id, wanda.id);
    assert_eq!(summaries[1].payout, 22500);
}
