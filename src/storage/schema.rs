use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use super::types::DatabaseError;

const IN_MEMORY: &str = ":memory:";

/// SQLite-backed key-value store.
#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Connect to the SQLite file at `path` (or [`IN_MEMORY`]) and make sure
    /// the `kv_store` table exists.
    ///
    /// A file held by a second movieboard process yields
    /// [`DatabaseError::InstanceLocked`].
    pub async fn open(path: &str) -> Result<Self, DatabaseError> {
        let in_memory = path == IN_MEMORY;
        if !in_memory {
            restrict_file_mode(Path::new(path));
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path))
            .map_err(DatabaseError::from_sqlx)?
            .pragma("busy_timeout", "5000");

        let pool = pool_options(in_memory)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(DatabaseError::from_sqlx)?;

        let db = Self { pool };
        db.migrate().await.map_err(DatabaseError::from_migration)?;
        tracing::debug!(path = %path, "Database opened");
        Ok(db)
    }

    /// Create the schema. Every statement is `IF NOT EXISTS`.
    async fn migrate(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // The whole movie list lives under a single key.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }
}

/// Each in-memory connection is a separate database, so that case pins one
/// connection for the life of the pool.
fn pool_options(in_memory: bool) -> SqlitePoolOptions {
    if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(2)
    }
}

/// Make the database file owner-only, creating it empty if needed so it
/// never exists with umask permissions. Failures are left for SQLite to
/// report on connect.
#[cfg(unix)]
fn restrict_file_mode(path: &Path) {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    if path.exists() {
        if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)) {
            tracing::warn!(path = %path.display(), error = %e, "Could not restrict database file mode");
        }
        return;
    }
    if path.parent().is_some_and(Path::exists) {
        let _ = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(path);
    }
}

#[cfg(not(unix))]
fn restrict_file_mode(_path: &Path) {}
