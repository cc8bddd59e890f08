use actix_web::{web, HttpResponse};

use crate::auth::{Claims, LoginInput};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::AppState;

pub async fn login(
    input: web::Json<LoginInput>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let response = app_state.auth_service.login(input.into_inner()).await?;
    Ok(ApiResponse::success(response))
}

pub async fn me(claims: Claims, app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let worker = app_state.auth_service.me(claims.worker_id()).await?;
    Ok(ApiResponse::success(worker))
}
