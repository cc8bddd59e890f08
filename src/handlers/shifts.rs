use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::{CloseShiftInput, OpenShiftInput};
use crate::database::repositories::{ShiftRepository, WorkerRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::ShiftService;

/// Page size for a worker's own recent-shifts listing.
const RECENT_SHIFTS_LIMIT: i64 = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftListQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub worker_id: Option<Uuid>,
}

pub async fn open_shift(
    claims: Claims,
    input: web::Json<OpenShiftInput>,
    shift_service: web::Data<ShiftService<WorkerRepository>>,
) -> Result<HttpResponse, AppError> {
    let shift = shift_service
        .open_shift(claims.worker_id(), input.into_inner())
        .await?;

    Ok(ApiResponse::created(shift))
}

pub async fn close_shift(
    claims: Claims,
    path: web::Path<Uuid>,
    input: web::Json<CloseShiftInput>,
    shift_service: web::Data<ShiftService<WorkerRepository>>,
) -> Result<HttpResponse, AppError> {
    let shift = shift_service
        .close_shift(path.into_inner(), claims.actor(), input.into_inner())
        .await?;

    Ok(ApiResponse::success(shift))
}

pub async fn my_shifts(
    claims: Claims,
    shift_repo: web::Data<ShiftRepository>,
) -> Result<HttpResponse, AppError> {
    let shifts = shift_repo
        .list_for_worker(claims.worker_id(), RECENT_SHIFTS_LIMIT)
        .await?;

    Ok(ApiResponse::success(shifts))
}

pub async fn list_shifts(
    claims: Claims,
    query: web::Query<ShiftListQuery>,
    shift_repo: web::Data<ShiftRepository>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let shifts = shift_repo
        .list_in_range(query.start, query.end, query.worker_id)
        .await?;

    Ok(ApiResponse::success(shifts))
}
