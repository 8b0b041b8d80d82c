use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// Movie Identifier
// ============================================================================

/// Unique movie identifier.
///
/// Stored as a string. Providers and older persisted data may carry numeric
/// ids (`"id": 5`); those are accepted and normalised to their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<u64> for MovieId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Text(s) if s.is_empty() => Err(serde::de::Error::custom("movie id is empty")),
            RawId::Text(s) => Ok(Self(s)),
            RawId::Number(n) => Ok(Self(n.to_string())),
        }
    }
}

// ============================================================================
// Movie Record
// ============================================================================

/// A single movie record with its vote counters.
///
/// Counters are unsigned, so a negative like/dislike count is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub category: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub dislikes: u32,
}

impl Movie {
    pub fn new(id: impl Into<MovieId>, title: &str, category: &str) -> Self {
        Self {
            id: id.into(),
            title: title.to_owned(),
            category: category.to_owned(),
            likes: 0,
            dislikes: 0,
        }
    }

    /// Total number of votes cast.
    pub fn total_votes(&self) -> u64 {
        u64::from(self.likes) + u64::from(self.dislikes)
    }

    /// Fraction of votes that are likes, in `[0.0, 1.0]`.
    ///
    /// `None` when the movie has no votes at all.
    pub fn like_ratio(&self) -> Option<f64> {
        let total = self.total_votes();
        if total == 0 {
            return None;
        }
        Some(self.likes as f64 / total as f64)
    }
}

/// Drop movies whose id was already seen, keeping the first occurrence.
///
/// Returns the number of entries removed.
pub fn dedup_by_id(movies: &mut Vec<Movie>) -> usize {
    let before = movies.len();
    let mut seen = HashSet::with_capacity(movies.len());
    movies.retain(|m| seen.insert(m.id.clone()));
    let removed = before - movies.len();
    if removed > 0 {
        tracing::warn!(removed, "Dropped movies with duplicate ids");
    }
    removed
}
