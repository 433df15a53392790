//! GitHub collectors for large repositories and files.
//!
//! Provides:
//! - Global repository search by size threshold
//! - Paginated listing of a user's repositories
//! - A bounded quota-filling loop over code search with a shrinking threshold
//! - File size lookup via HEAD on the raw content host

use crate::config::{ChonkersConfig, SearchConfig};
use crate::models::{CodeSearchItem, FileRecord, RepoRecord, SearchResponse};
use crate::network::client::HttpClient;
use crate::{ChonkersError, Result};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// GitHub API client bound to one run's configuration.
pub struct GitHubClient {
    http: HttpClient,
    config: ChonkersConfig,
}

impl GitHubClient {
    pub fn new(config: ChonkersConfig) -> Result<Self> {
        let http = HttpClient::new(&config)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ChonkersConfig {
        &self.config
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Repositories larger than `min_size`, keyed by web URL.
    ///
    /// One request; the API decides how many results come back.
    pub async fn search_repositories_by_size(
        &self,
        min_size: u64,
    ) -> Result<BTreeMap<String, RepoRecord>> {
        let query = format!("size:>{}", min_size);
        let url = format!(
            "{}/search/repositories?q={}",
            self.config.api_base,
            urlencoding::encode(&query)
        );

        let results: SearchResponse<RepoRecord> = self.http.get_json(&url).await?;
        info!(
            "Found {} results for size {}",
            results.total_count, min_size
        );
        if results.incomplete_results {
            warn!("Repository search for size {} returned incomplete results", min_size);
        }

        Ok(results
            .items
            .into_iter()
            .map(|repo| (repo.html_url.clone(), repo))
            .collect())
    }

    /// All repositories owned by `user`, one page of 100 at a time until a
    /// page comes back empty.
    pub async fn list_user_repositories(&self, user: &str) -> Result<Vec<RepoRecord>> {
        let mut all_repos = Vec::new();
        let per_page = SearchConfig::REPOS_PER_PAGE;
        let mut reached_end = false;

        for page in 1..=self.config.repo_max_pages {
            let url = format!(
                "{}/users/{}/repos?per_page={}&page={}",
                self.config.api_base,
                urlencoding::encode(user),
                per_page,
                page
            );

            let repos: Vec<RepoRecord> = self.http.get_json(&url).await?;
            if repos.is_empty() {
                reached_end = true;
                break;
            }
            debug!("Page {}: {} repositories", page, repos.len());
            all_repos.extend(repos);
        }

        if !reached_end {
            warn!(
                "Stopped listing {}'s repositories after {} pages",
                user, self.config.repo_max_pages
            );
        }
        info!("Fetched {} repositories for {}", all_repos.len(), user);
        Ok(all_repos)
    }

    /// One page of code search results for files owned by `user` larger than
    /// `min_size` bytes.
    pub async fn search_code(
        &self,
        user: &str,
        min_size: u64,
    ) -> Result<SearchResponse<CodeSearchItem>> {
        let query = format!("user:{} size:>{}", user, min_size);
        let url = format!(
            "{}/search/code?q={}&per_page={}&page=1",
            self.config.api_base,
            urlencoding::encode(&query),
            SearchConfig::CODE_PER_PAGE
        );
        self.http.get_json(&url).await
    }

    /// Fill the file quota by searching with a shrinking size threshold.
    ///
    /// Results are keyed by the item's API URL. Stops at the quota, after
    /// `file_max_rounds` searches, or once a search at threshold 0 has run.
    pub async fn search_user_files(&self, user: &str) -> Result<BTreeMap<String, CodeSearchItem>> {
        let quota = self.config.file_quota;
        let mut found: BTreeMap<String, CodeSearchItem> = BTreeMap::new();
        let mut threshold = self.config.file_min_size;
        let mut round = 0u32;

        loop {
            round += 1;
            let results = self.search_code(user, threshold).await?;
            let before = found.len();
            for item in results.items {
                found.insert(item.url.clone(), item);
            }
            info!(
                "Round {}: size >{} found {} results, {} new, {} unique",
                round,
                threshold,
                results.total_count,
                found.len() - before,
                found.len()
            );

            if found.len() >= quota {
                break;
            }
            if round >= self.config.file_max_rounds {
                warn!(
                    "Stopping file search after {} rounds with {} of {} files",
                    round,
                    found.len(),
                    quota
                );
                break;
            }
            if threshold == 0 {
                warn!(
                    "File search threshold exhausted with {} of {} files",
                    found.len(),
                    quota
                );
                break;
            }

            threshold = threshold.saturating_sub(self.config.file_size_step);
            tokio::time::sleep(self.config.search_delay).await;
        }

        Ok(found)
    }

    /// Byte size of a code search hit, read from the raw host's `Content-Length`.
    pub async fn resolve_file_size(&self, item: &CodeSearchItem) -> Result<u64> {
        let raw_url = raw_content_url(&item.html_url, &self.config.raw_base)?;
        match self.http.content_length(&raw_url).await? {
            Some(size) => Ok(size),
            None => {
                warn!("No Content-Length for {}, recording size 0", raw_url);
                Ok(0)
            }
        }
    }

    /// Search `user`'s files and resolve each one's size.
    pub async fn collect_user_files(&self, user: &str) -> Result<Vec<FileRecord>> {
        let items = self.search_user_files(user).await?;
        let mut records = Vec::with_capacity(items.len());
        for item in items.into_values() {
            let size = self.resolve_file_size(&item).await?;
            debug!("{} is {} bytes", item.html_url, size);
            records.push(FileRecord { item, size });
        }
        Ok(records)
    }
}

/// Map `https://github.com/{owner}/{repo}/blob/{ref}/{path}` to
/// `{raw_base}/{owner}/{repo}/{ref}/{path}`.
pub fn raw_content_url(html_url: &str, raw_base: &str) -> Result<String> {
    let invalid = |message: &str| ChonkersError::Validation {
        field: "html_url".to_string(),
        message: format!("{}: {}", message, html_url),
    };

    let parsed = url::Url::parse(html_url).map_err(|_| invalid("not a URL"))?;
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [owner, repo, "blob", git_ref, path @ ..] if !path.is_empty() => Ok(format!(
            "{}/{}/{}/{}/{}",
            raw_base.trim_end_matches('/'),
            owner,
            repo,
            git_ref,
            path.join("/")
        )),
        _ => Err(invalid("expected /{owner}/{repo}/blob/{ref}/{path}")),
    }
}
