//! # NoteGreen API Server
//!
//! Serves the notes/folders/tags REST API and, when `STATIC_DIR` is set, the
//! built web client.
//!
//! Startup creates the SQLite database if it is missing and applies the
//! embedded migrations.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=sqlite://notegreen.db cargo run -p notegreen-api
//! ```

use anyhow::Context;
use notegreen_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use notegreen_shared::db::{
    migrations::{ensure_database_exists, get_migration_status, run_migrations},
    pool::{close_pool, create_pool},
};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;

    init_tracing(config.log_format);

    tracing::info!(
        "NoteGreen API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    if let Some(static_dir) = &config.api.static_dir {
        if !static_dir.is_dir() {
            anyhow::bail!(
                "Could not find the client build directory {}; build the client first",
                static_dir.display()
            );
        }
        tracing::info!(path = %static_dir.display(), "Serving web client");
    }

    ensure_database_exists(&config.database.url)
        .await
        .context("Failed to create database")?;

    let pool = create_pool(config.database.pool_config())
        .await
        .context("Failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let status = get_migration_status(&pool).await?;
    tracing::info!(
        applied = status.applied_migrations,
        latest = ?status.latest_version,
        "Database schema is up to date"
    );

    let address = config.bind_address();
    let app = build_router(AppState::new(pool.clone(), config));

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    close_pool(pool).await;
    tracing::info!("Shutdown complete");

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "notegreen_api=debug,notegreen_shared=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received, draining connections...");
}
