use std::collections::{BTreeMap, HashMap};

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::models::{NewPollingUnit, Party, PartyScore};

lazy_static! {
    static ref PARTY_SCORE_FIELD: Regex = Regex::new(r"^party_score_(\S+)$").unwrap();
}

pub const MISSING_FIELDS: &str =
    "All fields (Polling Unit Name, LGA, Ward, Your Name) are required and must be valid selections.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitSelection {
    pub polling_unit_uniqueid: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LgaSelection {
    pub lga_id: Option<String>,
}

/// Reads an integer id out of a select box; blank or garbage means "nothing chosen".
pub fn parse_id(raw: Option<&str>) -> Option<i32> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse().ok())
}

/// The new-polling-unit form exactly as submitted, kept so a rejected form
/// can be shown again with the user's input intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUnitDraft {
    pub polling_unit_name: String,
    pub ward_id: String,
    pub lga_id: String,
    pub entered_by_user: String,
    /// Raw score text keyed by party id.
    pub scores: BTreeMap<String, String>,
}

impl NewUnitDraft {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let field = |name: &str| fields.get(name).cloned().unwrap_or_default();

        let scores = fields
            .iter()
            .filter_map(|(name, value)| {
                PARTY_SCORE_FIELD
                    .captures(name)
                    .map(|caps| (caps[1].to_string(), value.clone()))
            })
            .collect();

        Self {
            polling_unit_name: field("polling_unit_name"),
            ward_id: field("ward_id"),
            lga_id: field("lga_id"),
            entered_by_user: field("entered_by_user"),
            scores,
        }
    }

    pub fn score_for(&self, party_id: &str) -> &str {
        self.scores.get(party_id).map(String::as_str).unwrap_or("")
    }

    /// Checks the four required fields and picks up every known party's
    /// score that parses as an integer. Unknown parties and blank or
    /// non-numeric scores are ignored.
    pub fn validate(
        &self,
        parties: &[Party],
        user_ip_address: &str,
    ) -> Result<NewPollingUnit, &'static str> {
        let name = self.polling_unit_name.trim();
        let entered_by = self.entered_by_user.trim();
        let ward_id = parse_id(Some(self.ward_id.as_str()));
        let lga_id = parse_id(Some(self.lga_id.as_str()));

        let (Some(ward_id), Some(lga_id)) = (ward_id, lga_id) else {
            return Err(MISSING_FIELDS);
        };
        if name.is_empty() || entered_by.is_empty() {
            return Err(MISSING_FIELDS);
        }

        let scores = parties
            .iter()
            .filter_map(|party| {
                let score = self.score_for(&party.party_id).trim().parse::<i32>().ok()?;
                Some(PartyScore {
                    party_abbreviation: party.party_name.clone(),
                    party_score: score,
                })
            })
            .collect();

        Ok(NewPollingUnit {
            polling_unit_name: name.to_string(),
            ward_id,
            lga_id,
            entered_by_user: entered_by.to_string(),
            user_ip_address: user_ip_address.to_string(),
            scores,
        })
    }
}
