use super::{parse_movies, CatalogError, MAX_CATALOG_SIZE};
use crate::board::Movie;
use std::path::Path;

/// Read a JSON movie list from disk.
pub(super) async fn load_movies(path: &Path) -> Result<Vec<Movie>, CatalogError> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CATALOG_SIZE as u64 {
        return Err(CatalogError::ResponseTooLarge(MAX_CATALOG_SIZE));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let movies = parse_movies(&content)?;
    tracing::debug!(path = %path.display(), count = movies.len(), "Loaded catalog file");
    Ok(movies)
}
