pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
#[cfg(feature = "embedded-postgres")]
pub mod local_db;
pub mod models;
pub mod views;

use std::net::SocketAddr;
use std::sync::Arc;

use log::{info, warn};

pub use config::Config;
pub use db::{Database, MemoryStore, ResultsStore};
pub use error::{Error, Result};
pub use handlers::{router, AppState};

/// Connects to the database and serves the pages until ctrl-c.
pub async fn serve(config: Config) -> Result<()> {
    let database = Database::connect(&config.database).await?;
    if config.init_schema {
        database.init_schema().await?;
    }

    let app = router(AppState::new(Arc::new(database), config.state_id));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Serving election results on http://{}", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
