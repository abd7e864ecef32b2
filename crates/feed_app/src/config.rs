//! `shuffle` configuration: optional RON file, then environment overrides.

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use feed_core::FeedKind;
use feed_logging::{feed_info, LogDestination};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "shuffle.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("missing required setting {0}")]
    Missing(&'static str),
}

/// On-disk shape; every field optional so partial files are fine.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    base_url: Option<String>,
    api_key: Option<String>,
    feed: Option<String>,
    pages: Option<usize>,
    page_size: Option<usize>,
    state_dir: Option<PathBuf>,
    log: Option<String>,
    request_timeout_secs: Option<u64>,
    fresh: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub base_url: String,
    pub api_key: String,
    pub feed: FeedKind,
    /// Pages to load before leaving the feed.
    pub pages: usize,
    pub page_size: Option<NonZeroUsize>,
    pub state_dir: PathBuf,
    pub log_destination: LogDestination,
    pub request_timeout: Duration,
    /// Forget the persisted history before the first page.
    pub fresh: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            feed: FeedKind::Grid,
            pages: 3,
            page_size: None,
            state_dir: PathBuf::from(".shuffle_session"),
            log_destination: LogDestination::File,
            request_timeout: Duration::from_secs(30),
            fresh: false,
        }
    }
}

impl AppConfig {
    /// Loads `path` (or `shuffle.ron` if present), then `.env` and process
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        };
        if let Some(file) = file {
            config.apply_file(&file)?;
        }

        dotenvy::dotenv().ok();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply_ron(&text).map_err(|err| match err {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        feed_info!("Loaded config from {:?}", path);
        Ok(())
    }

    pub fn apply_ron(&mut self, text: &str) -> Result<(), ConfigError> {
        let file: FileConfig = ron::from_str(text).map_err(|err| ConfigError::Parse {
            path: PathBuf::new(),
            message: err.to_string(),
        })?;

        if let Some(base_url) = file.base_url {
            self.base_url = base_url;
        }
        if let Some(api_key) = file.api_key {
            self.api_key = api_key;
        }
        if let Some(feed) = file.feed {
            self.feed = parse_feed(&feed)?;
        }
        if let Some(pages) = file.pages {
            self.pages = pages;
        }
        if let Some(page_size) = file.page_size {
            self.page_size = Some(parse_page_size(page_size)?);
        }
        if let Some(state_dir) = file.state_dir {
            self.state_dir = state_dir;
        }
        if let Some(log) = file.log {
            self.log_destination = parse_log(&log)?;
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(fresh) = file.fresh {
            self.fresh = fresh;
        }
        Ok(())
    }

    /// Applies `SHUFFLE_*` variables found through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("SHUFFLE_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(api_key) = lookup("SHUFFLE_API_KEY") {
            self.api_key = api_key;
        }
        if let Some(feed) = lookup("SHUFFLE_FEED") {
            self.feed = parse_feed(&feed)?;
        }
        if let Some(pages) = lookup("SHUFFLE_PAGES") {
            self.pages = parse_number("SHUFFLE_PAGES", &pages)?;
        }
        if let Some(page_size) = lookup("SHUFFLE_PAGE_SIZE") {
            self.page_size = Some(parse_page_size(parse_number("SHUFFLE_PAGE_SIZE", &page_size)?)?);
        }
        if let Some(state_dir) = lookup("SHUFFLE_STATE_DIR") {
            self.state_dir = PathBuf::from(state_dir);
        }
        if let Some(log) = lookup("SHUFFLE_LOG") {
            self.log_destination = parse_log(&log)?;
        }
        if let Some(secs) = lookup("SHUFFLE_REQUEST_TIMEOUT_SECS") {
            let secs = parse_number("SHUFFLE_REQUEST_TIMEOUT_SECS", &secs)?;
            self.request_timeout = Duration::from_secs(secs as u64);
        }
        if let Some(fresh) = lookup("SHUFFLE_FRESH") {
            self.fresh = matches!(fresh.trim(), "1" | "true" | "yes");
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("base_url / SHUFFLE_BASE_URL"));
        }
        Ok(())
    }
}

fn parse_feed(raw: &str) -> Result<FeedKind, ConfigError> {
    FeedKind::parse(raw).ok_or_else(|| ConfigError::InvalidValue {
        key: "feed",
        value: raw.to_string(),
    })
}

fn parse_log(raw: &str) -> Result<LogDestination, ConfigError> {
    LogDestination::parse(raw).ok_or_else(|| ConfigError::InvalidValue {
        key: "log",
        value: raw.to_string(),
    })
}

fn parse_number(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

fn parse_page_size(size: usize) -> Result<NonZeroUsize, ConfigError> {
    NonZeroUsize::new(size).ok_or(ConfigError::InvalidValue {
        key: "page_size",
        value: size.to_string(),
    })
}
