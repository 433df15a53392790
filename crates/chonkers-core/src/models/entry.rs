//! Output records for the website's data files.

use serde::{Deserialize, Serialize};

/// One ranked row in `_data/repos.yml` or `_data/files.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub url: String,
    pub owner: String,
    pub avatar: Option<String>,
    /// Tier badge path, e.g. `/assets/images/sizes/6.png`.
    pub image: String,
    pub name: String,
    /// Human-readable size, e.g. `"1.46 KB"`.
    pub size: String,
    pub rawsize: u64,
    pub tier: u8,
    pub label: String,
    #[serde(flatten)]
    pub details: EntryDetails,
}

/// Fields copied through unchanged from the API record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryDetails {
    File(FileDetails),
    Repository(RepoDetails),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoDetails {
    pub stargazers_count: Option<u64>,
    pub watchers_count: Option<u64>,
    pub html_url: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub homepage: Option<String>,
    pub language: Option<String>,
    pub open_issues_count: Option<u64>,
    pub forks: Option<u64>,
    pub default_branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDetails {
    pub filename: String,
    pub path: String,
    pub sha: Option<String>,
    pub repository: String,
    pub repository_url: Option<String>,
}

/// Top-level document: a single list under `chonkers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub chonkers: Vec<RankedEntry>,
}

impl OutputDocument {
    pub fn new(chonkers: Vec<RankedEntry>) -> Self {
        Self { chonkers }
    }

    pub fn len(&self) -> usize {
        self.chonkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chonkers.is_empty()
    }
}
