//! ReadOps Server - Library Management System
//!
//! REST API server for digital access, payments, borrowing and fines.

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use readops_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("readops_server={},tower_http=debug", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ReadOps Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config);

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Digital catalog
        .route("/digital-books", get(api::items::list_items))
        .route("/digital-books/:id", get(api::items::get_item))
        // Digital access
        .route("/digital-books/:id/access", post(api::access::request_access))
        .route("/digital-books/:id/read", post(api::access::read_book))
        .route("/digital-books/:id/download", post(api::access::download_book))
        .route("/users/:id/digital-access", get(api::access::get_user_access))
        // Payments
        .route("/payments/:id", get(api::payments::get_payment))
        .route("/payments/:id/status", get(api::payments::payment_status))
        .route("/payments/:id/confirm", post(api::payments::confirm_payment))
        // Borrows
        .route("/borrows", post(api::borrows::create_borrow))
        .route("/borrows/:id/return", post(api::borrows::return_borrow))
        .route("/borrows/:id/extend", post(api::borrows::extend_borrow))
        .route("/borrows/overdue", get(api::borrows::list_overdue))
        .route("/borrows/overdue/remind", post(api::borrows::remind_overdue))
        .route("/users/:id/borrows", get(api::borrows::get_user_borrows))
        // Fines
        .route("/users/:id/fines", get(api::fines::get_user_fines))
        .route("/fines/:id/pay", post(api::fines::pay_fine))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
