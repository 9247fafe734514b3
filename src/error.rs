use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{kind} {id} does not exist")]
    MissingReference { kind: &'static str, id: i32 },

    #[error("duplicate result for polling unit {uniqueid} and party {party}")]
    DuplicateResult { uniqueid: i32, party: String },

    #[error("{column} is longer than {max} characters")]
    TooLong { column: &'static str, max: usize },

    #[error("no polling unit ids left after {0}")]
    UniqueIdsExhausted(i32),

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "embedded-postgres")]
    #[error("embedded postgres error: {0}")]
    Embedded(#[from] postgresql_embedded::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
