//! A `ResultsStore` kept entirely in process memory. It mirrors the ordering,
//! aggregation, reference and column-length rules of the Postgres schema.
//! Other column types and constraints are not checked.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::ResultsStore;
use crate::error::{Error, Result};
use crate::models::{
    AnnouncedResult, Lga, NewPollingUnit, Party, PartyScore, PartyTotal, PollingUnit,
    PollingUnitDetails, PollingUnitOption, Ward,
};

// VARCHAR(50) columns written by `create_polling_unit`
const TEXT_COLUMN_MAX: usize = 50;

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    lgas: Vec<(i32, Lga)>, // (state_id, lga)
    wards: Vec<Ward>,
    parties: Vec<Party>,
    units: Vec<PollingUnit>,
    results: Vec<AnnouncedResult>,
    next_uniqueid: i32,
}

impl Tables {
    fn lga(&self, lga_id: i32) -> Option<&(i32, Lga)> {
        self.lgas.iter().find(|(_, lga)| lga.lga_id == lga_id)
    }

    fn ward(&self, ward_id: i32) -> Option<&Ward> {
        self.wards.iter().find(|ward| ward.ward_id == ward_id)
    }

    fn unit(&self, uniqueid: i32) -> Option<&PollingUnit> {
        self.units.iter().find(|unit| unit.uniqueid == uniqueid)
    }

    // Mirrors the lga/ward inner joins: units with a dangling reference drop out
    fn details(&self, unit: &PollingUnit) -> Option<(i32, PollingUnitDetails)> {
        let (state_id, lga) = self.lga(unit.lga_id)?;
        let ward = self.ward(unit.ward_id)?;
        Some((
            *state_id,
            PollingUnitDetails {
                polling_unit_name: unit.polling_unit_name.clone(),
                lga_name: lga.lga_name.clone(),
                ward_name: ward.ward_name.clone(),
            },
        ))
    }

    fn check_unit_references(&self, ward_id: i32, lga_id: i32) -> Result<()> {
        if self.ward(ward_id).is_none() {
            return Err(Error::MissingReference { kind: "ward", id: ward_id });
        }
        if self.lga(lga_id).is_none() {
            return Err(Error::MissingReference { kind: "lga", id: lga_id });
        }
        Ok(())
    }

    fn check_lengths(unit: &NewPollingUnit) -> Result<()> {
        let columns = [
            ("polling_unit_name", &unit.polling_unit_name),
            ("entered_by_user", &unit.entered_by_user),
            ("user_ip_address", &unit.user_ip_address),
        ];
        for (column, value) in columns {
            if value.chars().count() > TEXT_COLUMN_MAX {
                return Err(Error::TooLong { column, max: TEXT_COLUMN_MAX });
            }
        }
        for score in &unit.scores {
            if score.party_abbreviation.chars().count() > TEXT_COLUMN_MAX {
                return Err(Error::TooLong {
                    column: "party_abbreviation",
                    max: TEXT_COLUMN_MAX,
                });
            }
        }
        Ok(())
    }

    fn has_result(&self, uniqueid: i32, party: &str) -> bool {
        self.results
            .iter()
            .any(|r| r.polling_unit_uniqueid == uniqueid && r.party_abbreviation == party)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|_| Error::LockPoisoned)
    }

    pub fn add_lga(&self, state_id: i32, lga_id: i32, lga_name: &str) -> Result<()> {
        let mut tables = self.lock()?;
        tables.lgas.push((
            state_id,
            Lga {
                lga_id,
                lga_name: lga_name.to_string(),
            },
        ));
        Ok(())
    }

    pub fn add_ward(&self, ward_id: i32, ward_name: &str, lga_id: i32) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.lga(lga_id).is_none() {
            return Err(Error::MissingReference { kind: "lga", id: lga_id });
        }
        tables.wards.push(Ward {
            ward_id,
            ward_name: ward_name.to_string(),
            lga_id,
        });
        Ok(())
    }

    pub fn add_party(&self, party_id: &str, party_name: &str) -> Result<()> {
        let mut tables = self.lock()?;
        tables.parties.push(Party {
            party_id: party_id.to_string(),
            party_name: party_name.to_string(),
        });
        Ok(())
    }

    /// Loads an existing polling unit. New ids are always allocated past the
    /// highest loaded one.
    pub fn add_polling_unit(
        &self,
        uniqueid: i32,
        polling_unit_name: &str,
        ward_id: i32,
        lga_id: i32,
    ) -> Result<()> {
        let mut tables = self.lock()?;
        tables.check_unit_references(ward_id, lga_id)?;
        tables.units.push(PollingUnit {
            uniqueid,
            polling_unit_id: uniqueid,
            ward_id,
            lga_id,
            uniquewardid: format!("{}-{}-{}", lga_id, ward_id, uniqueid),
            polling_unit_name: polling_unit_name.to_string(),
            polling_unit_description: String::new(),
            entered_by_user: String::new(),
            date_entered: Utc::now(),
            user_ip_address: String::new(),
        });
        tables.next_uniqueid = tables.next_uniqueid.max(uniqueid);
        Ok(())
    }

    pub fn add_result(&self, uniqueid: i32, party_abbreviation: &str, party_score: i32) -> Result<()> {
        let mut tables = self.lock()?;
        if tables.unit(uniqueid).is_none() {
            return Err(Error::MissingReference {
                kind: "polling unit",
                id: uniqueid,
            });
        }
        if tables.has_result(uniqueid, party_abbreviation) {
            return Err(Error::DuplicateResult {
                uniqueid,
                party: party_abbreviation.to_string(),
            });
        }
        tables.results.push(AnnouncedResult {
            polling_unit_uniqueid: uniqueid,
            party_abbreviation: party_abbreviation.to_string(),
            party_score,
            entered_by_user: String::new(),
            date_entered: Utc::now(),
            user_ip_address: String::new(),
        });
        Ok(())
    }

    pub fn polling_units(&self) -> Result<Vec<PollingUnit>> {
        Ok(self.lock()?.units.clone())
    }

    pub fn announced_results(&self) -> Result<Vec<AnnouncedResult>> {
        Ok(self.lock()?.results.clone())
    }
}

#[async_trait]
impl ResultsStore for MemoryStore {
    async fn polling_units_with_results(&self, state_id: i32) -> Result<Vec<PollingUnitOption>> {
        let tables = self.lock()?;
        let with_results: HashSet<i32> = tables
            .results
            .iter()
            .map(|r| r.polling_unit_uniqueid)
            .collect();

        let mut options: Vec<PollingUnitOption> = tables
            .units
            .iter()
            .filter(|unit| with_results.contains(&unit.uniqueid))
            .filter_map(|unit| {
                let (unit_state, details) = tables.details(unit)?;
                (unit_state == state_id).then(|| PollingUnitOption {
                    uniqueid: unit.uniqueid,
                    polling_unit_name: details.polling_unit_name,
                    lga_name: details.lga_name,
                    ward_name: details.ward_name,
                })
            })
            .collect();
        options.sort_by(|a, b| {
            (&a.lga_name, &a.ward_name, &a.polling_unit_name)
                .cmp(&(&b.lga_name, &b.ward_name, &b.polling_unit_name))
        });
        Ok(options)
    }

    async fn polling_unit_details(&self, uniqueid: i32) -> Result<Option<PollingUnitDetails>> {
        let tables = self.lock()?;
        Ok(tables
            .unit(uniqueid)
            .and_then(|unit| tables.details(unit))
            .map(|(_, details)| details))
    }

    async fn polling_unit_results(&self, uniqueid: i32) -> Result<Vec<PartyScore>> {
        let tables = self.lock()?;
        let mut scores: Vec<PartyScore> = tables
            .results
            .iter()
            .filter(|r| r.polling_unit_uniqueid == uniqueid)
            .map(|r| PartyScore {
                party_abbreviation: r.party_abbreviation.clone(),
                party_score: r.party_score,
            })
            .collect();
        scores.sort_by(|a, b| a.party_abbreviation.cmp(&b.party_abbreviation));
        Ok(scores)
    }

    async fn lgas(&self, state_id: i32) -> Result<Vec<Lga>> {
        let tables = self.lock()?;
        let mut lgas: Vec<Lga> = tables
            .lgas
            .iter()
            .filter(|(lga_state, _)| *lga_state == state_id)
            .map(|(_, lga)| lga.clone())
            .collect();
        lgas.sort_by(|a, b| a.lga_name.cmp(&b.lga_name));
        Ok(lgas)
    }

    async fn lga(&self, lga_id: i32) -> Result<Option<Lga>> {
        Ok(self.lock()?.lga(lga_id).map(|(_, lga)| lga.clone()))
    }

    async fn lga_totals(&self, lga_id: i32) -> Result<Vec<PartyTotal>> {
        let tables = self.lock()?;
        // Units belong to the LGA through their ward, not their own lga_id
        let units: HashSet<i32> = tables
            .units
            .iter()
            .filter(|unit| {
                tables
                    .ward(unit.ward_id)
                    .is_some_and(|ward| ward.lga_id == lga_id)
            })
            .map(|unit| unit.uniqueid)
            .collect();

        let mut sums: BTreeMap<&str, i64> = BTreeMap::new();
        for result in tables
            .results
            .iter()
            .filter(|r| units.contains(&r.polling_unit_uniqueid))
        {
            *sums.entry(result.party_abbreviation.as_str()).or_insert(0) +=
                i64::from(result.party_score);
        }

        let mut totals: Vec<PartyTotal> = sums
            .into_iter()
            .map(|(party, total)| PartyTotal {
                party_abbreviation: party.to_string(),
                total_score: total,
            })
            .collect();
        totals.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| a.party_abbreviation.cmp(&b.party_abbreviation))
        });
        Ok(totals)
    }

    async fn wards(&self) -> Result<Vec<Ward>> {
        let mut wards = self.lock()?.wards.clone();
        wards.sort_by(|a, b| a.ward_name.cmp(&b.ward_name));
        Ok(wards)
    }

    async fn parties(&self) -> Result<Vec<Party>> {
        let mut parties = self.lock()?.parties.clone();
        parties.sort_by(|a, b| a.party_name.cmp(&b.party_name));
        Ok(parties)
    }

    async fn create_polling_unit(&self, unit: &NewPollingUnit) -> Result<i32> {
        let mut tables = self.lock()?;
        tables.check_unit_references(unit.ward_id, unit.lga_id)?;
        Tables::check_lengths(unit)?;
        let uniqueid = tables
            .next_uniqueid
            .checked_add(1)
            .ok_or(Error::UniqueIdsExhausted(tables.next_uniqueid))?;

        let mut seen = HashSet::new();
        for score in &unit.scores {
            if !seen.insert(score.party_abbreviation.as_str()) {
                return Err(Error::DuplicateResult {
                    uniqueid,
                    party: score.party_abbreviation.clone(),
                });
            }
        }

        // Checks are done; nothing below can fail, so the insert is all-or-nothing
        tables.next_uniqueid = uniqueid;
        let now = Utc::now();

        tables.units.push(PollingUnit {
            uniqueid,
            polling_unit_id: uniqueid,
            ward_id: unit.ward_id,
            lga_id: unit.lga_id,
            uniquewardid: unit.unique_ward_id(uniqueid),
            polling_unit_name: unit.polling_unit_name.clone(),
            polling_unit_description: String::new(),
            entered_by_user: unit.entered_by_user.clone(),
            date_entered: now,
            user_ip_address: unit.user_ip_address.clone(),
        });
        for score in &unit.scores {
            tables.results.push(AnnouncedResult {
                polling_unit_uniqueid: uniqueid,
                party_abbreviation: score.party_abbreviation.clone(),
                party_score: score.party_score,
                entered_by_user: unit.entered_by_user.clone(),
                date_entered: now,
                user_ip_address: unit.user_ip_address.clone(),
            });
        }
        Ok(uniqueid)
    }
}
