//! Server binary: reads settings from the environment (and `.env`), bootstraps the database, serves the API.

use std::sync::Arc;

use marksheet_api::{app, ensure_database_exists, ensure_tables, AppState, PgStore, Settings, TokenService};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marksheet_api=info,marksheet_server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    ensure_database_exists(&settings.database_url).await?;
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .connect(&settings.database_url)
        .await?;
    ensure_tables(&pool).await?;

    let tokens = TokenService::new(&settings.jwt_secret, settings.token_ttl);
    let state = AppState::new(Arc::new(PgStore::new(pool)), tokens);
    let app = app(state, &settings);

    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!(env = %settings.app_env, "listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = until_signal("ctrl-c", tokio::signal::ctrl_c());

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

/// Resolves when `signal` fires. A handler that fails to install never resolves.
async fn until_signal<F>(name: &'static str, signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        tracing::error!(error = %e, signal = name, "failed to install signal handler");
        std::future::pending::<()>().await;
    }
}
