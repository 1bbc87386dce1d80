//! Server startup utilities.

use tracing::info;
use usercache_config::AppConfig;

use crate::di::CacheBackend;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r#"
   __  __                ______           __
  / / / /_______  _____ / ____/___ ______/ /_  ___
 / / / / ___/ _ \/ ___// /   / __ `/ ___/ __ \/ _ \
/ /_/ (__  )  __/ /   / /___/ /_/ / /__/ / / /  __/
\____/____/\___/_/    \____/\__,_/\___/_/ /_/\___/
    "#);
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let base = format!("http://{}", config.server.addr());

    info!("{}", separator);
    info!("Search page: {}/", base);
    info!("Search API:  {}/api/search", base);
    info!("Health:      {}/health", base);
    info!("API Docs:    {}/swagger-ui", base);
    if config.observability.metrics_enabled {
        info!("Metrics:     {}{}", base, config.observability.metrics_path);
    }
    info!("Cache:       {}", CacheBackend::from_config(config));
    info!("Database:    {}", config.database.connection_mode);
    info!("{}", separator);
}
