use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Lga {
    pub lga_id: i32,
    pub lga_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Ward {
    pub ward_id: i32,
    pub ward_name: String,
    pub lga_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Party {
    #[sqlx(rename = "partyid")]
    pub party_id: String,
    #[sqlx(rename = "partyname")]
    pub party_name: String,
}

// Entry in the Q1 polling-unit dropdown
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PollingUnitOption {
    pub uniqueid: i32,
    pub polling_unit_name: String,
    pub lga_name: String,
    pub ward_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PollingUnitDetails {
    pub polling_unit_name: String,
    pub lga_name: String,
    pub ward_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PartyScore {
    pub party_abbreviation: String,
    pub party_score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct PartyTotal {
    pub party_abbreviation: String,
    pub total_score: i64,
}

/// A polling unit and its party scores, validated and ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPollingUnit {
    pub polling_unit_name: String,
    pub ward_id: i32,
    pub lga_id: i32,
    pub entered_by_user: String,
    pub user_ip_address: String,
    pub scores: Vec<PartyScore>,
}

impl NewPollingUnit {
    /// The `uniquewardid` column value for a unit once its id is known.
    pub fn unique_ward_id(&self, uniqueid: i32) -> String {
        format!("{}-{}-{}", self.lga_id, self.ward_id, uniqueid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingUnit {
    pub uniqueid: i32,
    pub polling_unit_id: i32,
    pub ward_id: i32,
    pub lga_id: i32,
    pub uniquewardid: String,
    pub polling_unit_name: String,
    pub polling_unit_description: String,
    pub entered_by_user: String,
    pub date_entered: DateTime<Utc>,
    pub user_ip_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncedResult {
    pub polling_unit_uniqueid: i32,
    pub party_abbreviation: String,
    pub party_score: i32,
    pub entered_by_user: String,
    pub date_entered: DateTime<Utc>,
    pub user_ip_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_ward_id_joins_lga_ward_and_unit() {
        let unit = NewPollingUnit {
            polling_unit_name: "Primary School".to_string(),
            ward_id: 12,
            lga_id: 3,
            entered_by_user: "ada".to_string(),
            user_ip_address: "10.0.0.1".to_string(),
            scores: Vec::new(),
        };
        assert_eq!(unit.unique_ward_id(41), "3-12-41");
    }
}
