//! Centralized configuration for chonkers.
//!
//! Default constants live in associated-const structs. A run is driven by a
//! single immutable [`ChonkersConfig`] built once and handed to every
//! component.

use crate::{ChonkersError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Network-related defaults.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const GITHUB_API_BASE: &'static str = "https://api.github.com";
    pub const GITHUB_RAW_BASE: &'static str = "https://raw.githubusercontent.com";
    pub const ACCEPT_HEADER: &'static str = "application/vnd.github.v3+json";
    pub const TOKEN_ENV_VAR: &'static str = "GITHUB_TOKEN";
    pub const USER_AGENT: &'static str = concat!("chonkers/", env!("CARGO_PKG_VERSION"));
    pub const THROTTLE_DELAY: Duration = Duration::from_millis(500);
}

/// Search thresholds and loop bounds.
pub struct SearchConfig;

impl SearchConfig {
    pub const REPO_MIN_SIZE: u64 = 100_000_000;
    pub const REPOS_PER_PAGE: u32 = 100;
    pub const REPOS_MAX_PAGES: u32 = 100;
    /// Code search only indexes files below 384 KB.
    pub const FILE_MIN_SIZE: u64 = 380_000;
    pub const FILE_SIZE_STEP: u64 = 20_000;
    pub const FILE_QUOTA: usize = 60;
    pub const FILE_MAX_ROUNDS: u32 = 25;
    pub const CODE_PER_PAGE: u32 = 100;
    pub const SEARCH_DELAY: Duration = Duration::from_secs(2);
}

/// Output locations, relative to the site root.
pub struct OutputConfig;

impl OutputConfig {
    pub const DATA_DIR_NAME: &'static str = "_data";
    pub const REPOS_FILENAME: &'static str = "repos.yml";
    pub const FILES_FILENAME: &'static str = "files.yml";
    pub const SIZE_IMAGE_DIR: &'static str = "/assets/images/sizes";
}

/// Runtime configuration for one chonkers run.
#[derive(Debug, Clone)]
pub struct ChonkersConfig {
    /// Base URL of the REST API.
    pub api_base: String,
    /// Base URL serving raw file contents.
    pub raw_base: String,
    /// Personal access token sent as `Authorization: token ...`.
    pub token: Option<String>,
    /// Optional per-request timeout. `None` keeps transport defaults.
    pub request_timeout: Option<Duration>,
    /// Minimum size for the global repository search.
    pub repo_min_size: u64,
    /// Page cap for listing a user's repositories.
    pub repo_max_pages: u32,
    /// Starting threshold for the file search loop.
    pub file_min_size: u64,
    /// Amount the file threshold shrinks each round.
    pub file_size_step: u64,
    /// Unique files to collect before stopping.
    pub file_quota: usize,
    /// Hard bound on file search rounds.
    pub file_max_rounds: u32,
    /// Courtesy delay between code search requests.
    pub search_delay: Duration,
    /// Directory that contains `_data/`.
    pub site_root: PathBuf,
}

impl Default for ChonkersConfig {
    fn default() -> Self {
        Self {
            api_base: NetworkConfig::GITHUB_API_BASE.to_string(),
            raw_base: NetworkConfig::GITHUB_RAW_BASE.to_string(),
            token: None,
            request_timeout: None,
            repo_min_size: SearchConfig::REPO_MIN_SIZE,
            repo_max_pages: SearchConfig::REPOS_MAX_PAGES,
            file_min_size: SearchConfig::FILE_MIN_SIZE,
            file_size_step: SearchConfig::FILE_SIZE_STEP,
            file_quota: SearchConfig::FILE_QUOTA,
            file_max_rounds: SearchConfig::FILE_MAX_ROUNDS,
            search_delay: SearchConfig::SEARCH_DELAY,
            site_root: PathBuf::from("."),
        }
    }
}

impl ChonkersConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus the token from `GITHUB_TOKEN`, if set and non-empty.
    pub fn from_env() -> Self {
        let token = std::env::var(NetworkConfig::TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self::default().with_token(token)
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_raw_base(mut self, base: impl Into<String>) -> Self {
        self.raw_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_repo_min_size(mut self, size: u64) -> Self {
        self.repo_min_size = size;
        self
    }

    pub fn with_repo_max_pages(mut self, pages: u32) -> Self {
        self.repo_max_pages = pages;
        self
    }

    pub fn with_file_min_size(mut self, size: u64) -> Self {
        self.file_min_size = size;
        self
    }

    pub fn with_file_size_step(mut self, step: u64) -> Self {
        self.file_size_step = step;
        self
    }

    pub fn with_file_quota(mut self, quota: usize) -> Self {
        self.file_quota = quota;
        self
    }

    pub fn with_file_max_rounds(mut self, rounds: u32) -> Self {
        self.file_max_rounds = rounds;
        self
    }

    pub fn with_search_delay(mut self, delay: Duration) -> Self {
        self.search_delay = delay;
        self
    }

    pub fn with_site_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.site_root = root.into();
        self
    }

    /// Reject settings that would make the file search meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.file_quota == 0 {
            return Err(ChonkersError::Validation {
                field: "file_quota".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.file_max_rounds == 0 {
            return Err(ChonkersError::Validation {
                field: "file_max_rounds".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.repo_max_pages == 0 {
            return Err(ChonkersError::Validation {
                field: "repo_max_pages".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        for (field, base) in [("api_base", &self.api_base), ("raw_base", &self.raw_base)] {
            url::Url::parse(base).map_err(|e| ChonkersError::Config {
                message: format!("{} {:?} is not a valid URL: {}", field, base, e),
            })?;
        }
        Ok(())
    }

    /// `<site_root>/_data`
    pub fn data_dir(&self) -> PathBuf {
        self.site_root.join(OutputConfig::DATA_DIR_NAME)
    }

    pub fn repos_output_path(&self) -> PathBuf {
        self.data_dir().join(OutputConfig::REPOS_FILENAME)
    }

    pub fn files_output_path(&self) -> PathBuf {
        self.data_dir().join(OutputConfig::FILES_FILENAME)
    }

    pub fn site_root(&self) -> &Path {
        &self.site_root
    }
}
