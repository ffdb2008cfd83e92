mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use anyhow::Context;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;
use server::{AppServices, start_rest_server};


#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let keys = JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl);
    let services = AppServices::postgres(pool, keys);

    start_rest_server(config, services).await
}
