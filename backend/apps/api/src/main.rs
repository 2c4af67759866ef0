//! API Server Entry Point
//!
//! Wires configuration, the database pool and the users/recipes routers
//! together. Startup failures surface through `anyhow`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, bail};
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
};
use base64::Engine;
use base64::engine::general_purpose;
use recipes::{PgRecipeRepository, RecipesConfig, recipes_router};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use users::domain::repository::SessionRepository;
use users::{PgUserRepository, SessionState, UsersConfig, authenticate, users_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,users=info,recipes=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = max_connections(env::var("DB_MAX_CONNECTIONS").ok().as_deref())?;

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections, "Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let user_repo = Arc::new(PgUserRepository::new(pool.clone()));
    let recipe_repo = Arc::new(PgRecipeRepository::new(pool));

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    if let Err(e) = user_repo.cleanup_expired().await {
        tracing::warn!(
            error = %e,
            "Session cleanup failed, continuing anyway"
        );
    }

    let users_config = Arc::new(users_config()?);
    let recipes_config = Arc::new(RecipesConfig::default());

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
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let api = Router::new()
        .merge(users_router(user_repo.clone(), users_config.clone()))
        .merge(recipes_router(recipe_repo, recipes_config))
        .layer(middleware::from_fn_with_state(
            SessionState::new(user_repo, users_config),
            authenticate::<PgUserRepository>,
        ));

    let app = Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Pool size from `DB_MAX_CONNECTIONS`, 5 when unset
fn max_connections(raw: Option<&str>) -> anyhow::Result<u32> {
    let Some(raw) = raw else {
        return Ok(5);
    };
    let value: u32 = raw
        .trim()
        .parse()
        .with_context(|| format!("DB_MAX_CONNECTIONS must be a positive integer, got {raw:?}"))?;
    if value == 0 {
        bail!("DB_MAX_CONNECTIONS must be at least 1");
    }
    Ok(value)
}

/// Users configuration from the environment
///
/// Debug builds fall back to a random session secret and a non-Secure
/// cookie; release builds require `SESSION_SECRET`.
fn users_config() -> anyhow::Result<UsersConfig> {
    let mut config = match env::var("SESSION_SECRET") {
        Ok(secret_b64) => {
            let secret_bytes = general_purpose::STANDARD
                .decode(secret_b64.trim())
                .context("SESSION_SECRET must be base64")?;
            let Ok(session_secret) = <[u8; 32]>::try_from(secret_bytes.as_slice()) else {
                bail!("SESSION_SECRET must decode to 32 bytes");
            };
            UsersConfig {
                session_secret,
                cookie_secure: !cfg!(debug_assertions),
                ..UsersConfig::default()
            }
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set, using a random development secret");
            UsersConfig::development()
        }
        Err(_) => bail!("SESSION_SECRET must be set in production"),
    };

    config.password_pepper = env::var("PASSWORD_PEPPER")
        .ok()
        .filter(|pepper| !pepper.is_empty())
        .map(String::into_bytes);

    Ok(config)
}
