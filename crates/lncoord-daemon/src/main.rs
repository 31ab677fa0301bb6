//! lncoord daemon binary entry point.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lncoord_daemon::{
    cli::Cli,
    config::{default_app_dir, DaemonConfig, DEFAULT_CONFIG_FILENAME},
    error::Result,
    routes::router,
    shutdown::shutdown_signal,
};
use lncoord_ops::Coordinator;
use lncoord_store::MissionControlDb;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Resolve the application directory and load (or create) the config.
    let app_dir = cli.data_dir.clone().unwrap_or_else(default_app_dir);
    std::fs::create_dir_all(&app_dir)?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| app_dir.join(DEFAULT_CONFIG_FILENAME));
    let config = DaemonConfig::load_or_init(&config_path, &app_dir)?;

    init_tracing(&config, cli.verbose);
    tracing::info!(config = %config_path.display(), "configuration loaded");

    // Open the store; a held file lock fails startup after the timeout.
    let db = Arc::new(MissionControlDb::open(&config.store_config())?);
    let coordinator = Arc::new(Coordinator::new(Arc::clone(&db), config.engine_config()));

    // Start the staleness sweeper.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let sweeper = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.run_cleanup_routine(shutdown_rx).await })
    };

    // Serve the JSON gateway until a shutdown signal arrives.
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "starting JSON gateway");
    axum::serve(listener, router(Arc::clone(&coordinator)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("HTTP server stopped");

    // Stop the sweeper, drain in-flight batches, close the store.
    let _ = shutdown_tx.send(true);
    if sweeper.await.is_err() {
        tracing::error!("sweeper task panicked");
    }
    db.close();

    tracing::info!("exited gracefully");
    Ok(())
}

fn init_tracing(config: &DaemonConfig, verbose: bool) {
    let level = if verbose { "debug" } else { &config.log.level };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
