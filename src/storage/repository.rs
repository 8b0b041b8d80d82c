use crate::board::Movie;

use super::kv::KeyValueStore;
use super::types::StoreError;

/// Store key holding the JSON-serialised movie collection.
pub const MOVIES_KEY: &str = "movieData";

/// Loads and saves the whole movie collection as one JSON value.
#[derive(Debug, Clone)]
pub struct MovieRepository<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> MovieRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: MOVIES_KEY.to_owned(),
        }
    }

    /// Read the persisted collection. `None` when nothing was ever saved.
    pub async fn load(&self) -> Result<Option<Vec<Movie>>, StoreError> {
        let Some(raw) = self.store.get(&self.key).await? else {
            tracing::debug!(key = %self.key, "No persisted movies");
            return Ok(None);
        };
        let movies: Vec<Movie> = serde_json::from_str(&raw)?;
        Ok(Some(movies))
    }

    /// Overwrite the persisted collection.
    pub async fn save(&self, movies: &[Movie]) -> Result<(), StoreError> {
        let json = serde_json::to_string(movies).map_err(StoreError::Encode)?;
        self.store.set(&self.key, &json).await?;
        tracing::debug!(key = %self.key, count = movies.len(), "Persisted movies");
        Ok(())
    }
}
