use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;

use timeclock::database::{
    init_database,
    repositories::{PaymentRepository, ShiftRepository, WorkerRepository},
};
use timeclock::handlers::{auth, payroll, shifts};
use timeclock::services::{ReconciliationService, ShiftService};
use timeclock::{AppState, AuthService, Config};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Timeclock API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Timeclock API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    // Initialize repositories and services
    let worker_repository = WorkerRepository::new(pool.clone());
    let shift_repository = ShiftRepository::new(pool.clone());
    let payment_repository = PaymentRepository::new(pool.clone());

    let auth_service = AuthService::new(worker_repository.clone(), config.clone());
    let shift_service = ShiftService::new(shift_repository.clone(), worker_repository.clone());
    let reconciliation_service = ReconciliationService::new(
        shift_repository.clone(),
        payment_repository.clone(),
        worker_repository.clone(),
    );

    let app_state = web::Data::new(AppState { auth_service });
    let worker_repo_data = web::Data::new(worker_repository);
    let shift_repo_data = web::Data::new(shift_repository);
    let payment_repo_data = web::Data::new(payment_repository);
    let shift_service_data = web::Data::new(shift_service);
    let reconciliation_data = web::Data::new(reconciliation_service);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(worker_repo_data.clone())
            .app_data(shift_repo_data.clone())
            .app_data(payment_repo_data.clone())
            .app_data(shift_service_data.clone())
            .app_data(reconciliation_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin("http://localhost:3000")
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(hello)
            .service(health)
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/auth")
                            .route("/login", web::post().to(auth::login))
                            .route("/me", web::get().to(auth::me)),
                    )
                    .service(
                        web::scope("/shifts")
                            .route("/open", web::post().to(shifts::open_shift))
                            .route("/mine", web::get().to(shifts::my_shifts))
                            .route("", web::get().to(shifts::list_shifts))
                            .route("/{id}/close", web::post().to(shifts::close_shift)),
                    )
                    .service(
                        web::scope("/payroll")
                            .route("/summary", web::get().to(payroll::summary))
                            .route("/payments", web::get().to(payroll::payment_history))
                            .route("/payments", web::post().to(payroll::record_payment))
                            .route(
                                "/payments/{id}",
                                web::delete().to(payroll::delete_payment),
                            ),
                    ),
            )
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
