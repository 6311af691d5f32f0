//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use auth::application::{SeedAdminUseCase, SeedOutcome};
use auth::domain::repository::UserRepository;
use auth::presentation::AuthAppState;
use auth::{AuthConfig, InMemoryUserRepository, PgUserRepository, auth_router, request_gate};
use axum::middleware::from_fn_with_state;
use kernel::error::app_error::AppError;
use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,platform=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Missing or weak signing secret aborts startup
    let config = AuthConfig::from_env()?;

    let cors = cors_layer();

    let app = match env::var("DATABASE_URL") {
        Ok(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(&database_url)
                .await?;

            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            build_app(PgUserRepository::new(pool), config).await?
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory user store; accounts are lost on restart");
            build_app(InMemoryUserRepository::new(), config).await?
        }
    };

    let app = app.layer(TraceLayer::new_for_http()).layer(cors);

    // Start server
    let addr: SocketAddr = env::var("LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Auth API plus the request gate in front of everything else
async fn build_app<R>(repo: R, config: AuthConfig) -> anyhow::Result<Router>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let admin_seed = config.admin_seed.clone();
    let state = AuthAppState::new(repo, config)?;

    // Seeding problems should not prevent server startup
    if let Some(seed) = admin_seed {
        let use_case = SeedAdminUseCase::new(state.repo.clone(), state.hasher.clone());
        match use_case.execute(&seed).await {
            Ok(SeedOutcome::Created) => {
                tracing::info!("Admin seed applied");
            }
            Ok(SeedOutcome::AlreadyPresent) => {
                tracing::info!("Admin account already present, seed skipped");
            }
            Ok(SeedOutcome::Conflict) => {
                tracing::warn!("Admin seed email is taken by a non-admin account, no admin created");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Admin seed failed, continuing anyway");
            }
        }
    }

    Ok(Router::new()
        .nest("/api/auth", auth_router(state.clone()))
        .fallback(not_found)
        .layer(from_fn_with_state(state.gate_state(), request_gate)))
}

/// Pages are served elsewhere; a request that clears the gate and reaches here has no handler
async fn not_found() -> AppError {
    AppError::not_found("Not found")
}

fn cors_layer() -> CorsLayer {
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}
