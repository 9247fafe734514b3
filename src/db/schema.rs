//! Table definitions for a fresh database. Every statement is idempotent so
//! running them against an already-loaded results dump is harmless.

pub const CREATE_TABLES: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS state (
        state_id INTEGER PRIMARY KEY,
        state_name VARCHAR(50) NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS lga (
        uniqueid SERIAL PRIMARY KEY,
        lga_id INTEGER NOT NULL UNIQUE,
        lga_name VARCHAR(50) NOT NULL,
        state_id INTEGER NOT NULL REFERENCES state (state_id),
        lga_description TEXT,
        entered_by_user VARCHAR(50),
        date_entered TIMESTAMPTZ,
        user_ip_address VARCHAR(50)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ward (
        uniqueid SERIAL PRIMARY KEY,
        ward_id INTEGER NOT NULL UNIQUE,
        ward_name VARCHAR(50) NOT NULL,
        lga_id INTEGER NOT NULL REFERENCES lga (lga_id),
        ward_description TEXT,
        entered_by_user VARCHAR(50),
        date_entered TIMESTAMPTZ,
        user_ip_address VARCHAR(50)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS polling_unit (
        uniqueid INTEGER PRIMARY KEY,
        polling_unit_id INTEGER NOT NULL,
        ward_id INTEGER NOT NULL REFERENCES ward (ward_id),
        lga_id INTEGER NOT NULL REFERENCES lga (lga_id),
        uniquewardid VARCHAR(50),
        polling_unit_number VARCHAR(50),
        polling_unit_name VARCHAR(50) NOT NULL,
        polling_unit_description TEXT NOT NULL DEFAULT '',
        lat VARCHAR(255),
        long VARCHAR(255),
        entered_by_user VARCHAR(50),
        date_entered TIMESTAMPTZ,
        user_ip_address VARCHAR(50)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS party (
        id SERIAL PRIMARY KEY,
        partyid VARCHAR(11) NOT NULL UNIQUE,
        partyname VARCHAR(11) NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS announced_pu_results (
        result_id SERIAL PRIMARY KEY,
        polling_unit_uniqueid INTEGER NOT NULL REFERENCES polling_unit (uniqueid),
        party_abbreviation VARCHAR(50) NOT NULL,
        party_score INTEGER NOT NULL,
        entered_by_user VARCHAR(50),
        date_entered TIMESTAMPTZ,
        user_ip_address VARCHAR(50),
        UNIQUE (polling_unit_uniqueid, party_abbreviation)
    );
    "#,
    "CREATE SEQUENCE IF NOT EXISTS polling_unit_uniqueid_seq AS INTEGER;",
];

/// Moves the id sequence past every existing polling unit, including rows
/// loaded from a dump after the sequence was created.
pub const SYNC_UNIQUEID_SEQUENCE: &str = r#"
    SELECT setval(
        'polling_unit_uniqueid_seq',
        COALESCE((SELECT MAX(uniqueid) FROM polling_unit), 0) + 1,
        false
    );
"#;
