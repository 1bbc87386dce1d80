//! # UserCache Server
//!
//! Main entry point for the UserCache lookup service.

use shaku::HasComponent;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use usercache_config::ConfigLoader;
use usercache_core::{init_logging, UserCacheError, UserCacheResult};
use usercache_repository::ConnectionProvider;
use usercache_rest::create_router;
use usercache_server::{di, observability, startup};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> UserCacheResult<()> {
    // Load configuration
    let config = ConfigLoader::from_default_location()?.into_config();

    // Initialize logging
    init_logging(
        &config.observability.log_level,
        config.observability.log_format,
    )?;

    startup::print_banner();
    info!("Starting UserCache Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let metrics = observability::install_metrics(&config.observability)?;

    let module = di::build_lookup_module(&config).await?;
    info!("Lookup module initialized");

    let router = create_router(
        module.as_ref(),
        &config.server,
        &config.observability,
        metrics,
    );

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| UserCacheError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    startup::print_startup_info(&config);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| UserCacheError::internal(format!("Server error: {}", e)))?;

    let connector: Arc<dyn ConnectionProvider> = module.resolve();
    connector.close().await;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
