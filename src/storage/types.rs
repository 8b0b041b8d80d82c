use thiserror::Error;

/// SQLite primary result codes that mean another process holds the file.
const BUSY_CODES: [i32; 3] = [5 /* BUSY */, 6 /* LOCKED */, 14 /* CANTOPEN */];

/// Message fragments for the cases where sqlx hands back no result code.
const BUSY_MESSAGES: [&str; 3] = [
    "database is locked",
    "database table is locked",
    "unable to open database file",
];

/// Failure to open or prepare the movie database.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("movieboard is already running against this database; quit the other instance first")]
    InstanceLocked,

    #[error("could not prepare the database schema: {0}")]
    Migration(#[source] sqlx::Error),

    #[error("database failure: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Classify an error raised while connecting.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if held_by_other_process(&err) {
            DatabaseError::InstanceLocked
        } else {
            DatabaseError::Other(err)
        }
    }

    /// Classify an error raised while creating tables.
    pub(crate) fn from_migration(err: sqlx::Error) -> Self {
        if held_by_other_process(&err) {
            DatabaseError::InstanceLocked
        } else {
            DatabaseError::Migration(err)
        }
    }
}

fn held_by_other_process(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        // sqlx reports the extended code; the primary code is its low byte.
        if let Some(code) = db_err.code().and_then(|c| c.parse::<i32>().ok()) {
            return BUSY_CODES.contains(&(code & 0xff));
        }
    }
    let message = err.to_string().to_lowercase();
    BUSY_MESSAGES.iter().any(|m| message.contains(m))
}

/// Errors from the key-value store and the movie repository on top of it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(#[from] sqlx::Error),

    /// The persisted value exists but is not a valid movie list.
    #[error("Stored movie list is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The in-memory collection could not be turned into JSON.
    #[error("Could not encode movie list: {0}")]
    Encode(#[source] serde_json::Error),
}
