use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use featmgr_api::config::ServerConfig;
use featmgr_api::router::build_app_router;
use featmgr_api::state::{AppState, Catalog};
use featmgr_db::stores::PgCatalog;
use featmgr_db::tables::Tables;
use featmgr_db::DbPool;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "featmgr_api=debug,featmgr_db=info,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        table_prefix = %config.table_prefix,
        default_lang_id = config.default_lang_id,
        default_shop_id = config.default_shop_id,
        "Feature manager configuration loaded",
    );

    // Reject a bad prefix before any SQL is built with it.
    let tables = Tables::new(&config.table_prefix).expect("TABLE_PREFIX is invalid");
    let pool = connect_database(&config).await;

    let state = AppState {
        config: Arc::new(config.clone()),
        catalog: Catalog::postgres(PgCatalog::new(pool.clone(), tables)),
    };
    let app = build_app_router(state, &config);

    let ip = config.host.parse().expect("Invalid HOST address");
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Feature manager listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    close_pool(pool, Duration::from_secs(config.shutdown_timeout_secs)).await;
    tracing::info!("Feature manager stopped");
}

/// Install the global subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Open the pool and make sure the catalog database answers.
async fn connect_database(config: &ServerConfig) -> DbPool {
    let pool = featmgr_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    featmgr_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!(
        max_connections = config.db_max_connections,
        "Catalog database reachable"
    );

    if config.run_migrations {
        featmgr_db::run_migrations(&pool)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Catalog schema migrations applied");
    }
    pool
}

async fn close_pool(pool: DbPool, limit: Duration) {
    if tokio::time::timeout(limit, pool.close()).await.is_err() {
        tracing::warn!(?limit, "Database pool did not close in time");
    }
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
        "SIGINT"
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
        "SIGTERM"
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    let received = tokio::select! {
        name = interrupt => name,
        name = terminate => name,
    };
    tracing::info!(signal = received, "Shutting down");
}
