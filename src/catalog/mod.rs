//! Fallback movie providers.
//!
//! A [`Catalog`] is consulted when the store holds no movie list yet, and
//! again on every reset. Sources are the bundled list, a local JSON file or
//! an HTTP endpoint returning the same JSON array.

mod builtin;
mod file;
mod http;

use crate::board::Movie;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub use builtin::builtin_movies;

/// Upper bound on a provider payload, local or remote.
pub const MAX_CATALOG_SIZE: usize = 2 * 1024 * 1024; // 2MB

/// Default request timeout for HTTP catalogs.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog is not a valid movie list: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid catalog source: {0}")]
    InvalidSource(String),
}

/// Anything that can produce the initial movie list.
pub trait MovieSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<Movie>, CatalogError>> + Send;
}

/// The configured fallback provider.
#[derive(Debug, Clone, Default)]
pub enum Catalog {
    #[default]
    Builtin,
    File(PathBuf),
    Http {
        client: reqwest::Client,
        url: url::Url,
        timeout: Duration,
    },
}

impl Catalog {
    /// Resolve a source string: `builtin`, an `http(s)://` URL, or a file path.
    pub fn from_source(source: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let source = source.trim();
        if source.is_empty() || source.eq_ignore_ascii_case("builtin") {
            return Ok(Catalog::Builtin);
        }

        if source.contains("://") {
            let url = http::validate_catalog_url(source)?;
            let client = http::build_client(timeout)?;
            return Ok(Catalog::Http {
                client,
                url,
                timeout,
            });
        }

        Ok(Catalog::File(PathBuf::from(source)))
    }

    /// Short human-readable name for the status bar and logs.
    pub fn describe(&self) -> String {
        match self {
            Catalog::Builtin => "built-in catalog".to_string(),
            Catalog::File(path) => path.display().to_string(),
            Catalog::Http { url, .. } => url.to_string(),
        }
    }
}

impl MovieSource for Catalog {
    async fn fetch(&self) -> Result<Vec<Movie>, CatalogError> {
        let movies = match self {
            Catalog::Builtin => builtin_movies()?,
            Catalog::File(path) => file::load_movies(path).await?,
            Catalog::Http {
                client,
                url,
                timeout,
            } => http::fetch_movies(client, url, *timeout).await?,
        };
        tracing::info!(source = %self.describe(), count = movies.len(), "Fetched catalog");
        Ok(movies)
    }
}

/// Decode a JSON array of movies.
pub(crate) fn parse_movies(json: &str) -> Result<Vec<Movie>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}
