use election_results::Config;
use log::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Without DATABASE_URL, a local dev build runs its own server
    #[cfg(feature = "embedded-postgres")]
    let (config, _local) = {
        let mut config = config;
        let local = if config.database.url.is_none() {
            match election_results::local_db::LocalPostgres::start(&config.database.name).await {
                Ok(local) => {
                    local.apply(&mut config.database);
                    Some(local)
                }
                Err(e) => {
                    error!("Failed to start embedded PostgreSQL: {}", e);
                    std::process::exit(1);
                }
            }
        } else {
            None
        };
        (config, local)
    };

    info!("Scoping results to state {}", config.state_id);
    if let Err(e) = election_results::serve(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
