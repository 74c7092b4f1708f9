//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use accounts::{
    AccountsConfig, AssetStore, InMemoryUserRepository, PgUserRepository, StorageConfig,
    accounts_router, accounts_router_generic,
};
use axum::{
    Router, http,
    http::{Method, header},
};
use platform::cloudinary::CloudinaryConfig;
use platform::token::parse_ttl;
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,accounts=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let accounts_config = load_accounts_config()?;
    let storage_config = load_storage_config();
    let assets = AssetStore::from_config(&storage_config)?;
    let local_mount = assets.local_mount();

    tracing::info!(
        local_upload = storage_config.local_upload,
        upload_dir = %storage_config.upload_dir.display(),
        "Avatar storage configured"
    );

    // Database connection; without one the service runs on an in-memory store
    let accounts = match env::var("DATABASE_URL") {
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

            accounts_router(PgUserRepository::new(pool), assets, accounts_config)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set, using in-memory user store");
            accounts_router_generic(InMemoryUserRepository::new(), assets, accounts_config)
        }
    };

    // CORS configuration
    let cors_origins =
        env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = cors_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            http::HeaderName::from_static("username"),
            http::HeaderName::from_static("password"),
            http::HeaderName::from_static("page"),
            http::HeaderName::from_static("limit"),
        ]))
        .allow_credentials(true);

    // Build router
    let mut app = Router::new().nest("/api", accounts);

    // Only the upload directory is served
    if let Some((route, dir)) = local_mount {
        tracing::info!(route = %route, dir = %dir.display(), "Serving local uploads");
        app = app.nest_service(&route, ServeDir::new(dir));
    }

    let app = app.layer(TraceLayer::new_for_http()).layer(cors);

    // Start server
    let port = match env::var("PORT") {
        Ok(port) => port.parse()?,
        Err(_) => 8000,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_accounts_config() -> anyhow::Result<AccountsConfig> {
    let base = if cfg!(debug_assertions) {
        AccountsConfig::development()
    } else {
        AccountsConfig::default()
    };

    let token_secret = match env::var("TOKEN_SECRET") {
        Ok(secret) if !secret.is_empty() => secret.into_bytes(),
        _ if cfg!(debug_assertions) => {
            tracing::warn!("TOKEN_SECRET not set, using a random secret");
            base.token_secret.clone()
        }
        _ => anyhow::bail!("TOKEN_SECRET must be set in production"),
    };

    let token_ttl = match env::var("TOKEN_EXPIRY") {
        Ok(ttl) => parse_ttl(&ttl)?,
        Err(_) => base.token_ttl,
    };

    let password_pepper = env::var("PASSWORD_PEPPER")
        .ok()
        .filter(|p| !p.is_empty())
        .map(String::into_bytes);

    Ok(AccountsConfig {
        token_secret,
        token_ttl,
        password_pepper,
        ..base
    })
}

fn load_storage_config() -> StorageConfig {
    let defaults = StorageConfig::default();

    let cloudinary = match (
        env::var("CLOUDINARY_CLOUD_NAME"),
        env::var("CLOUDINARY_API_KEY"),
        env::var("CLOUDINARY_API_SECRET"),
    ) {
        (Ok(cloud_name), Ok(api_key), Ok(api_secret)) => {
            Some(CloudinaryConfig::new(cloud_name, api_key, api_secret))
        }
        _ => None,
    };

    StorageConfig {
        local_upload: env::var("LOCAL_UPLOAD").is_ok_and(|v| v.eq_ignore_ascii_case("true")),
        upload_dir: env::var("UPLOAD_DIR")
            .map(Into::into)
            .unwrap_or(defaults.upload_dir),
        cloudinary,
    }
}
