//! GitHub API payload types.
//!
//! Only the fields that end up in the output are modelled; everything else in
//! the API response is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Account that owns a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Repository as returned by `/search/repositories` and `/users/{user}/repos`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoRecord {
    pub html_url: String,
    pub full_name: String,
    pub owner: Owner,
    /// Size as reported by the API.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub stargazers_count: Option<u64>,
    #[serde(default)]
    pub watchers_count: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub open_issues_count: Option<u64>,
    #[serde(default)]
    pub forks: Option<u64>,
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Envelope shared by the search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Repository summary embedded in code search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeRepository {
    pub full_name: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub owner: Owner,
}

/// One hit from `/search/code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeSearchItem {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub sha: Option<String>,
    /// API URL of the blob; unique per item and used for dedup.
    pub url: String,
    /// Web URL of the file (`https://github.com/{owner}/{repo}/blob/{ref}/{path}`).
    pub html_url: String,
    pub repository: CodeRepository,
}

/// A code search hit with its size resolved from the raw content host.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub item: CodeSearchItem,
    pub size: u64,
}
