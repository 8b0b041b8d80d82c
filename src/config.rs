//! Configuration file parser for ~/.config/movieboard/config.toml.
//!
//! The config file is optional. A missing file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use crate::board::{PageSize, PaginationOrder, TokenMode};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config is {size} bytes, above the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    /// Well-formed TOML with a value outside the accepted range.
    #[error("bad config value: {0}")]
    Invalid(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Initial page size. One of 4, 8, 12.
    pub movies_per_page: usize,

    /// Fallback provider: "builtin", a JSON file path, or an http(s) URL.
    pub catalog: String,

    /// "slice-then-filter" or "filter-then-slice".
    pub pagination: PaginationOrder,

    /// Ignore re-selection of a category that is already a token.
    pub unique_category_tokens: bool,

    /// Timeout for HTTP catalog requests.
    pub fetch_timeout_secs: u64,

    /// Custom keybinding overrides. Keys are action names, values are key strings.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            movies_per_page: PageSize::default().get(),
            catalog: "builtin".to_string(),
            pagination: PaginationOrder::default(),
            unique_category_tokens: false,
            fetch_timeout_secs: 15,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 7] = [
        "theme",
        "movies_per_page",
        "catalog",
        "pagination",
        "unique_category_tokens",
        "fetch_timeout_secs",
        "keybindings",
    ];

    /// Read and validate the TOML file at `path`.
    ///
    /// An absent or blank file gives the defaults. Keys this version does not
    /// know are logged and skipped.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let Some(content) = Self::read_bounded(path)? else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Self::warn_unknown_keys(&content);

        tracing::info!(
            path = %path.display(),
            catalog = %config.catalog,
            per_page = config.movies_per_page,
            "Config loaded"
        );
        Ok(config)
    }

    /// File contents, or `None` when there is no file.
    fn read_bounded(path: &Path) -> Result<Option<String>, ConfigError> {
        let absent = |e: &std::io::Error| e.kind() == std::io::ErrorKind::NotFound;

        let size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) if absent(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if size > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                size,
                limit: Self::MAX_FILE_SIZE,
            });
        }

        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if absent(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn warn_unknown_keys(content: &str) {
        let Ok(table) = content.parse::<toml::Table>() else {
            return;
        };
        table
            .keys()
            .filter(|key| !Self::KNOWN_KEYS.contains(&key.as_str()))
            .for_each(|key| tracing::warn!(key = %key, "Ignoring unrecognised config key"));
    }

    /// Reject values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if PageSize::from_count(self.movies_per_page).is_none() {
            return Err(ConfigError::Invalid(format!(
                "movies_per_page must be 4, 8 or 12 (got {})",
                self.movies_per_page
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn page_size(&self) -> PageSize {
        PageSize::from_count(self.movies_per_page).unwrap_or_default()
    }

    pub fn token_mode(&self) -> TokenMode {
        if self.unique_category_tokens {
            TokenMode::Set
        } else {
            TokenMode::Multiset
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// A config file in its own temp directory, removed on drop.
    struct TempConfig {
        dir: PathBuf,
        path: PathBuf,
    }

    impl TempConfig {
        fn new(label: &str, content: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("movieboard_cfg_{}", label));
            std::fs::create_dir_all(&dir).unwrap();
            let path = dir.join("config.toml");
            std::fs::write(&path, content).unwrap();
            Self { dir, path }
        }

        fn load(&self) -> Result<Config, ConfigError> {
            Config::load(&self.path)
        }
    }

    impl Drop for TempConfig {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.page_size(), PageSize::Four);
        assert_eq!(config.catalog, "builtin");
        assert_eq!(config.pagination, PaginationOrder::SliceThenFilter);
        assert_eq!(config.token_mode(), TokenMode::Multiset);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(15));
        assert!(config.keybindings.is_empty());
        config.validate().unwrap();
    }

    #[test]
    fn absent_and_blank_files_give_defaults() {
        let missing = Path::new("/tmp/movieboard_cfg_does_not_exist/config.toml");
        assert_eq!(Config::load(missing).unwrap().movies_per_page, 4);

        let blank = TempConfig::new("blank", "  \n\t\n");
        assert_eq!(blank.load().unwrap().theme, "dark");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = TempConfig::new("partial", "theme = \"light\"\n");
        let config = file.load().unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.movies_per_page, 4);
        assert_eq!(config.catalog, "builtin");
    }

    #[test]
    fn every_key_is_read() {
        let file = TempConfig::new(
            "full",
            r#"
theme = "light"
movies_per_page = 12
catalog = "https://example.com/movies.json"
pagination = "filter-then-slice"
unique_category_tokens = true
fetch_timeout_secs = 5

[keybindings]
quit = "Ctrl+q"
like = "l"
"#,
        );

        let config = file.load().unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.page_size(), PageSize::Twelve);
        assert_eq!(config.catalog, "https://example.com/movies.json");
        assert_eq!(config.pagination, PaginationOrder::FilterThenSlice);
        assert_eq!(config.token_mode(), TokenMode::Set);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert_eq!(config.keybindings["quit"], "Ctrl+q");
        assert_eq!(config.keybindings["like"], "l");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = TempConfig::new("malformed", "this is not [valid toml");
        let err = file.load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("config is not valid TOML"));
    }

    #[test]
    fn unknown_enum_and_wrong_types_are_parse_errors() {
        let bad_order = TempConfig::new("bad_order", "pagination = \"sideways\"\n");
        assert!(matches!(bad_order.load(), Err(ConfigError::Parse(_))));

        let bad_type = TempConfig::new("bad_type", "movies_per_page = \"four\"\n");
        assert!(matches!(bad_type.load(), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let size = TempConfig::new("size5", "movies_per_page = 5\n");
        let err = size.load().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("movies_per_page"));

        let timeout = TempConfig::new("timeout0", "fetch_timeout_secs = 0\n");
        assert!(matches!(timeout.load(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn unrecognised_keys_do_not_fail() {
        let file = TempConfig::new("extra", "theme = \"dark\"\ncolour = \"teal\"\n");
        assert_eq!(file.load().unwrap().theme, "dark");
    }

    #[test]
    fn oversized_file_is_refused() {
        let file = TempConfig::new("huge", &"#".repeat(1_048_577));
        match file.load() {
            Err(ConfigError::TooLarge { size, limit }) => {
                assert_eq!(size, 1_048_577);
                assert_eq!(limit, 1_048_576);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }
}
