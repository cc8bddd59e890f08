use actix_web::{
    dev::Payload, error::ErrorUnauthorized, web::Data, Error as ActixError, FromRequest,
    HttpRequest,
};
use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{Role, Worker, WorkerInfo};
use crate::database::repositories::WorkerRepository;
use crate::error::AppError;
use crate::services::Actor;

/// Resolved identity handed to every core operation: a worker id and a role,
/// nothing else. Handlers never look at credentials.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // worker id
    pub email: String,
    pub role: Role,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn worker_id(&self) -> Uuid {
        self.sub
    }

    pub fn actor(&self) -> Actor {
        Actor {
            worker_id: self.sub,
            role: self.role,
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ))
        }
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if auth_str.starts_with("Bearer ") {
                    let token = &auth_str[7..]; // Remove "Bearer " prefix

                    // Get the config from app data
                    if let Some(config) = req.app_data::<Data<Config>>() {
                        match decode::<Claims>(
                            token,
                            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
                            &Validation::new(Algorithm::HS256),
                        ) {
                            Ok(token_data) => {
                                return ready(Ok(token_data.claims));
                            }
                            Err(_) => {
                                return ready(Err(ErrorUnauthorized("Invalid token")));
                            }
                        }
                    }
                }
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub worker: WorkerInfo,
}

/// Signs a bearer token carrying the resolved (worker id, role) pair.
pub fn generate_token(worker: &Worker, config: &Config) -> Result<String, AppError> {
    let expiration = Utc::now() + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: worker.id,
        email: worker.email.clone(),
        role: worker.role,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::internal_server_error_message(format!("Token signing failed: {}", e)))
}

#[derive(Clone)]
pub struct AuthService {
    workers: WorkerRepository,
    config: Config,
}

impl AuthService {
    pub fn new(workers: WorkerRepository, config: Config) -> Self {
        Self { workers, config }
    }

    pub async fn login(&self, input: LoginInput) -> Result<AuthResponse, AppError> {
        let worker = self
            .workers
            .find_by_email(&input.email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let valid = verify(&input.password, &worker.password_hash)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;
        if !valid {
            return Err(AppError::Unauthorized);
        }

        let token = generate_token(&worker, &self.config)?;

        Ok(AuthResponse {
            token,
            worker: worker.into(),
        })
    }

    pub async fn me(&self, worker_id: Uuid) -> Result<WorkerInfo, AppError> {
        let worker = self
            .workers
            .find_by_id(worker_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Worker not found".to_string()))?;

        Ok(worker.into())
    }
}
