use super::{parse_movies, CatalogError, MAX_CATALOG_SIZE};
use crate::board::Movie;
use futures::StreamExt;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("movieboard/", env!("CARGO_PKG_VERSION"));

pub(super) fn build_client(timeout: Duration) -> Result<reqwest::Client, CatalogError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}

/// Parse a catalog URL. Only http and https are accepted.
pub(super) fn validate_catalog_url(source: &str) -> Result<Url, CatalogError> {
    let url = Url::parse(source).map_err(|e| CatalogError::InvalidSource(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(CatalogError::InvalidSource(format!(
                "unsupported scheme {} (only http/https allowed)",
                scheme
            )))
        }
    }
    if url.host_str().is_none() {
        return Err(CatalogError::InvalidSource("missing host".to_string()));
    }
    Ok(url)
}

/// GET the catalog URL and decode the JSON array in the body.
pub(super) async fn fetch_movies(
    client: &reqwest::Client,
    url: &Url,
    timeout: Duration,
) -> Result<Vec<Movie>, CatalogError> {
    tracing::debug!(url = %url, "Fetching catalog");

    let body = tokio::time::timeout(timeout, fetch_body(client, url))
        .await
        .map_err(|_| CatalogError::Timeout(timeout.as_secs()))??;

    parse_movies(&body)
}

async fn fetch_body(client: &reqwest::Client, url: &Url) -> Result<String, CatalogError> {
    let response = client.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(CatalogError::HttpStatus(response.status().as_u16()));
    }
    read_limited_text(response, MAX_CATALOG_SIZE).await
}

async fn read_limited_text(
    response: reqwest::Response,
    limit: usize,
) -> Result<String, CatalogError> {
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(CatalogError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    // Invalid UTF-8 surfaces as a JSON parse error
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
