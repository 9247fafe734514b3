//! Throwaway PostgreSQL server for local development.

use log::info;
use postgresql_embedded::PostgreSQL;

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Keeps the embedded server alive; it shuts down when dropped.
pub struct LocalPostgres {
    server: PostgreSQL,
}

impl LocalPostgres {
    pub async fn start(database: &str) -> Result<Self> {
        let mut server = PostgreSQL::default();
        server.setup().await?;
        server.start().await?;
        if !server.database_exists(database).await? {
            server.create_database(database).await?;
        }
        info!("Embedded PostgreSQL running for database '{}'", database);
        Ok(Self { server })
    }

    /// Points the configuration at the embedded server.
    pub fn apply(&self, config: &mut DatabaseConfig) {
        config.url = Some(self.server.settings().url(&config.name));
    }
}
