#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use election_results::models::{
    Lga, NewPollingUnit, Party, PartyScore, PartyTotal, PollingUnitDetails, PollingUnitOption,
    Ward,
};
use election_results::{Error, MemoryStore, Result, ResultsStore};

pub const STATE_ID: i32 = 25;

/// Three LGAs in the state (one without results), one LGA elsewhere, and
/// four polling units of which three have announced results.
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.add_lga(STATE_ID, 1, "Aniocha North").unwrap();
    store.add_lga(STATE_ID, 2, "Bomadi").unwrap();
    store.add_lga(STATE_ID, 3, "Ethiope East").unwrap();
    store.add_lga(7, 70, "Other State LGA").unwrap();

    store.add_ward(10, "Ezi", 1).unwrap();
    store.add_ward(11, "Akwukwu", 1).unwrap();
    store.add_ward(20, "Ogriagbene", 2).unwrap();
    store.add_ward(30, "Abraka", 3).unwrap();

    store.add_party("ACN", "ACN").unwrap();
    store.add_party("LABOUR", "LABOUR").unwrap();
    store.add_party("PDP", "PDP").unwrap();

    store.add_polling_unit(8, "Primary School Ezi", 10, 1).unwrap();
    store.add_polling_unit(9, "Town Hall Akwukwu", 11, 1).unwrap();
    store.add_polling_unit(12, "Market Square", 20, 2).unwrap();
    store.add_polling_unit(15, "Empty Hall", 10, 1).unwrap();

    store.add_result(8, "PDP", 802).unwrap();
    store.add_result(8, "ACN", 50).unwrap();
    store.add_result(8, "LABOUR", 11).unwrap();
    store.add_result(9, "PDP", 198).unwrap();
    store.add_result(9, "ACN", 25).unwrap();
    store.add_result(12, "PDP", 5).unwrap();
    store.add_result(12, "ACN", 90).unwrap();
    store
}

pub fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Reads like a healthy store but every write fails.
pub struct ReadOnlyStore(pub MemoryStore);

#[async_trait]
impl ResultsStore for ReadOnlyStore {
    async fn polling_units_with_results(&self, state_id: i32) -> Result<Vec<PollingUnitOption>> {
        self.0.polling_units_with_results(state_id).await
    }

    async fn polling_unit_details(&self, uniqueid: i32) -> Result<Option<PollingUnitDetails>> {
        self.0.polling_unit_details(uniqueid).await
    }

    async fn polling_unit_results(&self, uniqueid: i32) -> Result<Vec<PartyScore>> {
        self.0.polling_unit_results(uniqueid).await
    }

    async fn lgas(&self, state_id: i32) -> Result<Vec<Lga>> {
        self.0.lgas(state_id).await
    }

    async fn lga(&self, lga_id: i32) -> Result<Option<Lga>> {
        self.0.lga(lga_id).await
    }

    async fn lga_totals(&self, lga_id: i32) -> Result<Vec<PartyTotal>> {
        self.0.lga_totals(lga_id).await
    }

    async fn wards(&self) -> Result<Vec<Ward>> {
        self.0.wards().await
    }

    async fn parties(&self) -> Result<Vec<Party>> {
        self.0.parties().await
    }

    async fn create_polling_unit(&self, _unit: &NewPollingUnit) -> Result<i32> {
        Err(Error::Database(sqlx::Error::PoolTimedOut))
    }
}
