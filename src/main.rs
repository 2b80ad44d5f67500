//! Campus API server: reads config from env, prepares the store, serves until SIGINT/SIGTERM.

use campus_api::{app, ensure_database_exists, ensure_schema, AppState, Config, MemoryGateway, PgGateway, StoreKind};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("campus_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let listener = TcpListener::bind(config.bind_addr).await?;

    match config.store {
        StoreKind::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;
            ensure_schema(&pool).await?;

            let gateway = PgGateway::new(pool);
            let state = AppState::new(gateway.clone());
            tracing::info!("listening on {}", listener.local_addr()?);
            axum::serve(listener, app(state, config.body_limit))
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            gateway.pool().close().await;
            tracing::info!("database pool closed");
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            let state = AppState::new(MemoryGateway::new());
            tracing::info!("listening on {}", listener.local_addr()?);
            axum::serve(listener, app(state, config.body_limit))
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
