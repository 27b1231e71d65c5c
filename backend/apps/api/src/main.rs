//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request-level errors are
//! `auth::AuthError` rendered through `kernel::error::AppError`.

use anyhow::{Context, anyhow, bail};
use auth::config::access_token_ttl_from_minutes;
use auth::store::IdentityRepository;
use auth::{
    AdminProvision, AuthConfig, InMemoryIdentityRepository, PgIdentityRepository, SignUpUseCase,
    auth_router, auth_router_generic,
};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use records::PgTableStore;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "userhub=info,auth=info,records=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let auth_config = load_auth_config()?;
    tracing::info!(
        access_token_ttl_secs = auth_config.access_token_ttl.as_secs(),
        pepper = auth_config.password_pepper.is_some(),
        "Auth configuration loaded"
    );

    // Credential store
    let auth_routes = match env_nonempty("DATABASE_URL") {
        Some(database_url) => {
            let max_connections = env_or("DATABASE_MAX_CONNECTIONS", 5u32)?;

            let pool = PgPoolOptions::new()
                .max_connections(max_connections)
                .connect(&database_url)
                .await?;

            PgTableStore::new(pool.clone())
                .check_connection()
                .await
                .context("Database connection check failed")?;

            tracing::info!(max_connections, "Connected to database");

            // Run migrations
            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await?;

            tracing::info!("Migrations completed");

            let repo = PgIdentityRepository::new(pool);
            bootstrap_admin(repo.clone(), &auth_config).await?;
            auth_router(repo, auth_config)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory credential store");
            let repo = InMemoryIdentityRepository::new();
            bootstrap_admin(repo.clone(), &auth_config).await?;
            auth_router_generic(repo, auth_config)
        }
    };

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .merge(auth_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8000)))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the auth configuration from the environment
///
/// Release builds refuse to start without `AUTH_TOKEN_SECRET`; debug builds
/// fall back to a per-process random secret.
fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = match env_nonempty("AUTH_TOKEN_SECRET") {
        Some(secret_b64) => {
            let secret_bytes = general_purpose::STANDARD
                .decode(secret_b64.trim())
                .context("AUTH_TOKEN_SECRET is not valid base64")?;
            let secret: [u8; 32] = secret_bytes.as_slice().try_into().map_err(|_| {
                anyhow!(
                    "AUTH_TOKEN_SECRET must decode to 32 bytes, got {}",
                    secret_bytes.len()
                )
            })?;
            AuthConfig {
                token_secret: secret,
                ..AuthConfig::default()
            }
        }
        None if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_TOKEN_SECRET not set, using a random secret for this process");
            AuthConfig::with_random_secret()
        }
        None => bail!("AUTH_TOKEN_SECRET must be set in production"),
    };

    let ttl_minutes: u64 = env_or("AUTH_TOKEN_TTL_MINUTES", 30)?;
    config.access_token_ttl = access_token_ttl_from_minutes(ttl_minutes)
        .context("Invalid AUTH_TOKEN_TTL_MINUTES")?;

    config.password_pepper = env_nonempty("AUTH_PASSWORD_PEPPER").map(String::into_bytes);

    Ok(config)
}

/// Create the configured administrator if it is missing
async fn bootstrap_admin<R>(repo: R, config: &AuthConfig) -> anyhow::Result<()>
where
    R: IdentityRepository,
{
    let (Some(username), Some(password)) = (
        env_nonempty("BOOTSTRAP_ADMIN_USERNAME"),
        env_nonempty("BOOTSTRAP_ADMIN_PASSWORD"),
    ) else {
        tracing::info!("No bootstrap admin configured");
        return Ok(());
    };

    let use_case = SignUpUseCase::new(Arc::new(repo), Arc::new(config.clone()));
    let outcome = use_case
        .provision_admin(username, password)
        .await
        .context("Admin bootstrap failed")?;

    match outcome {
        AdminProvision::Created => {}
        AdminProvision::AlreadyAdmin => tracing::info!("Bootstrap admin already exists"),
        AdminProvision::NameHeldByNonAdmin => tracing::warn!(
            "BOOTSTRAP_ADMIN_USERNAME belongs to a regular user, no administrator is available"
        ),
    }

    Ok(())
}

/// Read an environment variable, treating an empty value as unset
fn env_nonempty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment variable, falling back to `default` when unset
fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env_nonempty(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Invalid {}: {}", key, e)),
        None => Ok(default),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
