// SQL Desk - browser-based ad-hoc SQL over a local SQLite file
// Core library

pub mod api;
pub mod config;
pub mod engine;
pub mod export;
pub mod interceptor;
pub mod observability;
pub mod seed;

use std::error::Error;
use std::io;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use config::GatewayConfig;
use engine::drivers::SqliteDriver;
use interceptor::{AuditStore, QueryExecutor};
use sqldesk_core::DataEngine;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: GatewayConfig,
    pub engine: Arc<dyn DataEngine>,
    pub executor: Arc<QueryExecutor>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Self {
        let engine: Arc<dyn DataEngine> = Arc::new(SqliteDriver::new(&config.database_path));
        let audit = Arc::new(AuditStore::new(&config.audit_log_path));
        let executor = Arc::new(QueryExecutor::new(Arc::clone(&engine), audit));

        Self {
            config,
            engine,
            executor,
        }
    }
}

const EXAMPLE_QUERIES: &[&str] = &[
    "SELECT * FROM users",
    "SELECT * FROM orders WHERE status = 'completed'",
    "SELECT u.name, o.product, o.amount FROM users u JOIN orders o ON u.id = o.user_id",
];

pub async fn run(config: GatewayConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    if config.seed_demo_data {
        if let Err(e) = seed::init_database(&config.database_path).await {
            warn!("Demo data not seeded: {}", e);
        }
    }

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
            error!(
                "Address {} is already in use; set SQLDESK_BIND to another address",
                config.bind_addr
            );
            return Err(e.into());
        }
        Err(e) => {
            error!("Failed to bind {}: {}", config.bind_addr, e);
            return Err(e.into());
        }
    };

    info!("SQL Desk listening on http://{}", config.bind_addr);
    info!("Database: {:?}", config.database_path);
    info!("Audit log: {:?}", config.audit_log_path);
    for query in EXAMPLE_QUERIES {
        info!("Example: {}", query);
    }

    let state: SharedState = Arc::new(AppState::new(config));
    let router = api::create_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("SQL Desk stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
