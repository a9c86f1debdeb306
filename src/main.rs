//! Account lifecycle worker entry point.
//!
//! Connects to PostgreSQL, wires the cascade targets and runs the
//! schedule dispatcher until SIGINT or SIGTERM.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::info;

use account_lifecycle::adapters::{
    HttpIdentityProvider, LocalObjectStore, PostgresPrimaryStore, PostgresScheduler, SystemClock,
};
use account_lifecycle::application::{DeletionWorker, ScheduleDispatcher};
use account_lifecycle::config::AppConfig;

/// Waits for SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.logging.init();
    config.validate()?;

    info!(
        grace_period_days = config.deletion.grace_period_days,
        schedule_group = %config.deletion.schedule_group,
        "Starting account lifecycle worker"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    info!("Connected to database");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");
    }

    let identity = HttpIdentityProvider::new(config.identity.http_config())?;
    let worker = DeletionWorker::new(
        Arc::new(identity),
        Arc::new(PostgresPrimaryStore::new(pool.clone())),
        Arc::new(LocalObjectStore::new(config.storage.root.clone())),
    )
    .with_avatar_prefix(config.storage.avatar_prefix.clone());

    let dispatcher = ScheduleDispatcher::with_config(
        Arc::new(PostgresScheduler::new(pool.clone())),
        Arc::new(worker),
        Arc::new(SystemClock),
        config.dispatcher_config(),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let dispatcher_task = tokio::spawn(async move { dispatcher.run(shutdown_rx).await });

    shutdown_signal().await;
    shutdown_tx.send(true)?;
    dispatcher_task.await?;

    pool.close().await;
    info!("Shutdown complete");
    Ok(())
}
