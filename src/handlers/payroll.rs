use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::PaymentInput;
use crate::database::repositories::{PaymentRepository, WorkerRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::ReconciliationService;

/// Page size for payment history listings.
const PAYMENT_HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentListQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub worker_id: Option<Uuid>,
}

pub async fn summary(
    claims: Claims,
    query: web::Query<RangeQuery>,
    reconciliation: web::Data<ReconciliationService>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let summaries = reconciliation.summarize(query.start, query.end).await?;

    Ok(ApiResponse::success(summaries))
}

pub async fn record_payment(
    claims: Claims,
    input: web::Json<PaymentInput>,
    payment_repo: web::Data<PaymentRepository>,
    worker_repo: web::Data<WorkerRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let input = input.into_inner();
    input.validate()?;

    if worker_repo.find_by_id(input.worker_id).await?.is_none() {
        return Err(AppError::NotFound("Worker not found".to_string()));
    }

    let record = payment_repo.insert(&input).await?;

    Ok(ApiResponse::created(record))
}

pub async fn delete_payment(
    claims: Claims,
    path: web::Path<Uuid>,
    payment_repo: web::Data<PaymentRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let deleted = payment_repo.delete(path.into_inner()).await?;
    if !deleted {
        return Err(AppError::NotFound("Payment record not found".to_string()));
    }

    Ok(ApiResponse::success_message("Payment record deleted"))
}

pub async fn payment_history(
    claims: Claims,
    query: web::Query<PaymentListQuery>,
    payment_repo: web::Data<PaymentRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let payments = payment_repo
        .list(query.start, query.end, query.worker_id, PAYMENT_HISTORY_LIMIT)
        .await?;

    Ok(ApiResponse::success(payments))
}
