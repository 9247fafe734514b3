pub mod memory;
mod schema;

use async_trait::async_trait;
use log::{info, warn};
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::models::{
    Lga, NewPollingUnit, Party, PartyScore, PartyTotal, PollingUnitDetails, PollingUnitOption,
    Ward,
};

pub use memory::MemoryStore;

/// Every query the pages need. One call is one statement, except
/// `create_polling_unit`, which is all-or-nothing.
#[async_trait]
pub trait ResultsStore: Send + Sync {
    /// Polling units in the state that have at least one announced result,
    /// ordered by LGA, ward and unit name.
    async fn polling_units_with_results(&self, state_id: i32) -> Result<Vec<PollingUnitOption>>;

    async fn polling_unit_details(&self, uniqueid: i32) -> Result<Option<PollingUnitDetails>>;

    /// Announced results of one unit ordered by party abbreviation.
    async fn polling_unit_results(&self, uniqueid: i32) -> Result<Vec<PartyScore>>;

    async fn lgas(&self, state_id: i32) -> Result<Vec<Lga>>;

    async fn lga(&self, lga_id: i32) -> Result<Option<Lga>>;

    /// Scores summed per party across every polling unit whose ward belongs
    /// to the LGA, highest total first.
    async fn lga_totals(&self, lga_id: i32) -> Result<Vec<PartyTotal>>;

    async fn wards(&self) -> Result<Vec<Ward>>;

    async fn parties(&self) -> Result<Vec<Party>>;

    /// Stores the unit and its scores, returning the newly assigned unique id.
    async fn create_polling_unit(&self, unit: &NewPollingUnit) -> Result<i32>;
}

pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(config.connect_options()?)
            .await?;
        info!("Connected to database ({})", config.describe());
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    // Create any missing tables and sync the polling unit id sequence
    pub async fn init_schema(&self) -> Result<()> {
        for &statement in schema::CREATE_TABLES {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        sqlx::query(schema::SYNC_UNIQUEID_SEQUENCE)
            .execute(&self.pool)
            .await?;
        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl ResultsStore for Database {
    async fn polling_units_with_results(&self, state_id: i32) -> Result<Vec<PollingUnitOption>> {
        let units = sqlx::query_as::<_, PollingUnitOption>(
            r#"
            SELECT DISTINCT pu.uniqueid, pu.polling_unit_name, l.lga_name, w.ward_name
            FROM polling_unit pu
            JOIN lga l ON pu.lga_id = l.lga_id
            JOIN ward w ON pu.ward_id = w.ward_id
            JOIN announced_pu_results apr ON pu.uniqueid = apr.polling_unit_uniqueid
            WHERE l.state_id = $1
            ORDER BY l.lga_name, w.ward_name, pu.polling_unit_name
            "#,
        )
        .bind(state_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(units)
    }

    async fn polling_unit_details(&self, uniqueid: i32) -> Result<Option<PollingUnitDetails>> {
        let details = sqlx::query_as::<_, PollingUnitDetails>(
            r#"
            SELECT pu.polling_unit_name, l.lga_name, w.ward_name
            FROM polling_unit pu
            JOIN lga l ON pu.lga_id = l.lga_id
            JOIN ward w ON pu.ward_id = w.ward_id
            WHERE pu.uniqueid = $1
            "#,
        )
        .bind(uniqueid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(details)
    }

    async fn polling_unit_results(&self, uniqueid: i32) -> Result<Vec<PartyScore>> {
        let results = sqlx::query_as::<_, PartyScore>(
            r#"
            SELECT party_abbreviation, party_score
            FROM announced_pu_results
            WHERE polling_unit_uniqueid = $1
            ORDER BY party_abbreviation
            "#,
        )
        .bind(uniqueid)
        .fetch_all(&self.pool)
        .await?;
        Ok(results)
    }

    async fn lgas(&self, state_id: i32) -> Result<Vec<Lga>> {
        let lgas = sqlx::query_as::<_, Lga>(
            r#"
            SELECT lga_id, lga_name
            FROM lga
            WHERE state_id = $1
            ORDER BY lga_name
            "#,
        )
        .bind(state_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lgas)
    }

    async fn lga(&self, lga_id: i32) -> Result<Option<Lga>> {
        let lga = sqlx::query_as::<_, Lga>("SELECT lga_id, lga_name FROM lga WHERE lga_id = $1")
            .bind(lga_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lga)
    }

    async fn lga_totals(&self, lga_id: i32) -> Result<Vec<PartyTotal>> {
        let totals = sqlx::query_as::<_, PartyTotal>(
            r#"
            SELECT apr.party_abbreviation, SUM(apr.party_score) AS total_score
            FROM announced_pu_results apr
            JOIN polling_unit pu ON apr.polling_unit_uniqueid = pu.uniqueid
            JOIN ward w ON pu.ward_id = w.ward_id
            JOIN lga l ON w.lga_id = l.lga_id
            WHERE l.lga_id = $1
            GROUP BY apr.party_abbreviation
            ORDER BY total_score DESC, apr.party_abbreviation
            "#,
        )
        .bind(lga_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(totals)
    }

    async fn wards(&self) -> Result<Vec<Ward>> {
        let wards = sqlx::query_as::<_, Ward>(
            "SELECT ward_id, ward_name, lga_id FROM ward ORDER BY ward_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(wards)
    }

    async fn parties(&self) -> Result<Vec<Party>> {
        let parties =
            sqlx::query_as::<_, Party>("SELECT partyid, partyname FROM party ORDER BY partyname")
                .fetch_all(&self.pool)
                .await?;
        Ok(parties)
    }

    async fn create_polling_unit(&self, unit: &NewPollingUnit) -> Result<i32> {
        let mut tx = self.pool.begin().await?;
        match insert_polling_unit(&mut *tx, unit).await {
            Ok(uniqueid) => {
                tx.commit().await?;
                Ok(uniqueid)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    warn!("Rollback after failed polling unit insert also failed: {}", rollback);
                }
                Err(e)
            }
        }
    }
}

async fn insert_polling_unit(conn: &mut PgConnection, unit: &NewPollingUnit) -> Result<i32> {
    let uniqueid: i32 = sqlx::query_scalar("SELECT nextval('polling_unit_uniqueid_seq')::INTEGER")
        .fetch_one(&mut *conn)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO polling_unit (
            uniqueid, polling_unit_id, ward_id, lga_id, uniquewardid,
            polling_unit_name, polling_unit_description,
            entered_by_user, date_entered, user_ip_address
        ) VALUES ($1, $2, $3, $4, $5, $6, '', $7, CURRENT_TIMESTAMP, $8)
        "#,
    )
    .bind(uniqueid)
    .bind(uniqueid)
    .bind(unit.ward_id)
    .bind(unit.lga_id)
    .bind(unit.unique_ward_id(uniqueid))
    .bind(&unit.polling_unit_name)
    .bind(&unit.entered_by_user)
    .bind(&unit.user_ip_address)
    .execute(&mut *conn)
    .await?;

    for score in &unit.scores {
        sqlx::query(
            r#"
            INSERT INTO announced_pu_results (
                polling_unit_uniqueid, party_abbreviation, party_score,
                entered_by_user, date_entered, user_ip_address
            ) VALUES ($1, $2, $3, $4, CURRENT_TIMESTAMP, $5)
            "#,
        )
        .bind(uniqueid)
        .bind(&score.party_abbreviation)
        .bind(score.party_score)
        .bind(&unit.entered_by_user)
        .bind(&unit.user_ip_address)
        .execute(&mut *conn)
        .await?;
    }

    Ok(uniqueid)
}
