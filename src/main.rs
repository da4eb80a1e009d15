//! Stage Service - feature process stages
//!
//! Creates, reads, updates and archives the stages of a feature. Each new
//! stage receives the review gate its feature's process calls for; updates
//! are applied field by field with an audit log of what changed, and
//! subscribers are notified once the write has been persisted.
//!
//! Without a DATABASE_URL the service runs on an in-memory store.

mod auth;
mod config;
mod effects;
mod error;
mod models;
mod routes;
mod stages;
mod state;
mod store;

use crate::auth::FeatureEditPermission;
use crate::config::{DatabaseConfig, Settings};
use crate::effects::{FeatureCache, LogNotifier, SideEffectDispatcher};
use crate::routes::create_router;
use crate::stages::{GatePolicy, StageService};
use crate::state::AppState;
use crate::store::{Datastore, MemoryStore, PgStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Stage Service...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    if std::env::var("JWT_SECRET").is_err() {
        warn!("⚠️  JWT_SECRET not set, using default (INSECURE - set in production!)");
    }

    let datastore = match &settings.database {
        Some(db) => {
            let pool = init_database_pool(db).await?;
            info!("✅ Database pool created successfully");

            let store = PgStore::new(pool);
            store.init_schema().await?;
            Datastore::Postgres(store)
        }
        None => {
            warn!("⚠️  DATABASE_URL not set, using the in-memory store (data is lost on exit)");
            Datastore::Memory(MemoryStore::new())
        }
    };

    // Side effects run on a background worker
    let cache = Arc::new(FeatureCache::new());
    let (dispatcher, worker) = SideEffectDispatcher::spawn(cache.clone(), Arc::new(LogNotifier));

    let stages = StageService::new(
        datastore,
        GatePolicy::standard(),
        Arc::new(FeatureEditPermission),
        Arc::new(dispatcher),
    )
    .with_trusted_domains(settings.stages.trusted_domains.clone())
    .with_cache_namespace(settings.stages.cache_namespace.clone());

    let state = Arc::new(AppState::new(stages, cache, settings.auth.jwt_secret.clone()));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   GET    /health                                     - Liveness");
    info!("   GET    /api/v0/features/{{feature_id}}               - Get feature (cached)");
    info!("   POST   /api/v0/features/{{feature_id}}/stages        - Create stage");
    info!("   GET    /api/v0/features/{{feature_id}}/stages/{{id}}   - Get stage");
    info!("   PATCH  /api/v0/features/{{feature_id}}/stages/{{id}}   - Update stage");
    info!("   DELETE /api/v0/features/{{feature_id}}/stages/{{id}}   - Archive stage");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the last dispatcher handle) is gone; let the
    // worker drain what is still queued
    if let Err(e) = worker.await {
        warn!("⚠️  Side effect worker ended abnormally: {}", e);
    }

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stage_service=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Initialize the database pool from the parsed DATABASE_URL
async fn init_database_pool(db: &DatabaseConfig) -> anyhow::Result<deadpool_postgres::Pool> {
    use deadpool_postgres::{Config, ManagerConfig, PoolConfig, RecyclingMethod, Runtime};

    let mut cfg = Config::new();
    cfg.host = Some(db.host.clone());
    cfg.port = Some(db.port);
    cfg.user = Some(db.user.clone());
    cfg.password = Some(db.password.clone());
    cfg.dbname = Some(db.database.clone());
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });
    cfg.pool = Some(PoolConfig::new(db.max_pool_size));

    // Create pool with TLS support if needed
    let pool = if db.require_tls {
        let certs = rustls_native_certs::load_native_certs();
        let mut root_store = rustls::RootCertStore::empty();
        for cert in certs.certs {
            root_store.add(cert).ok();
        }

        let tls_config = rustls::ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let tls = tokio_postgres_rustls::MakeRustlsConnect::new(tls_config);

        cfg.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| anyhow::anyhow!("Failed to create TLS pool: {}", e))?
    } else {
        cfg.create_pool(Some(Runtime::Tokio1), tokio_postgres::NoTls)
            .map_err(|e| anyhow::anyhow!("Failed to create pool: {}", e))?
    };

    // Test the connection
    let client = pool
        .get()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to get pool connection: {}", e))?;

    client
        .query_one("SELECT 1 as ok", &[])
        .await
        .map_err(|e| anyhow::anyhow!("Failed to verify database connection: {}", e))?;

    info!(
        "✅ Database connection successful ({}:{}/{}, TLS: {})",
        db.host, db.port, db.database, db.require_tls
    );
    Ok(pool)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️  Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("⚠️  Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
