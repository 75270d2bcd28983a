//! Lost & Found server binary.

use std::time::Duration;

use actix_web::HttpServer;
use log::{error, info};

use lost_found_server::config::ServerConfig;
use lost_found_server::security::SecurityComponents;
use lost_found_server::{build_app, AppState};

/// How often abandoned sessions are swept from the registry.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = ServerConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;
    let security = SecurityComponents::new(&config)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    let state = AppState::new(&security);
    security
        .authenticator()
        .registry()
        .start_purge_task(SESSION_PURGE_INTERVAL);

    if let Some(seed) = &config.admin {
        if let Err(e) = state.seed_admin(seed).await {
            error!("Could not seed administrator {}: {}", seed.username, e);
        }
    }

    info!("Lost & Found listening on http://{}", config.bind_addr);
    info!("CORS origins: {:?}", config.cors_origins);

    HttpServer::new(move || build_app(&security, state.clone()))
        .bind(&config.bind_addr)?
        .run()
        .await
}
