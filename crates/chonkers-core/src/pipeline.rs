//! The two collect → rank → write pipelines.
//!
//! Nothing is written until a pipeline has collected and ranked everything,
//! so a failed request leaves existing output files untouched.

use crate::config::ChonkersConfig;
use crate::models::OutputDocument;
use crate::network::GitHubClient;
use crate::ranker::{rank, RankMode};
use crate::tier::TierTable;
use crate::writer::write_document;
use crate::Result;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Which output file to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Repositories,
    Files,
}

impl Pipeline {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pipeline::Repositories => "repos",
            Pipeline::Files => "files",
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the repositories pipeline looks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoScope {
    /// Every repository owned by this user.
    User(String),
    /// Any repository above the configured size threshold.
    Global,
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub pipeline: Pipeline,
    pub path: PathBuf,
    pub document: OutputDocument,
    /// False for dry runs.
    pub written: bool,
}

/// Entry point tying the collectors, ranker and writer together.
pub struct Chonkers {
    github: GitHubClient,
}

impl Chonkers {
    pub fn new(config: ChonkersConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            github: GitHubClient::new(config)?,
        })
    }

    pub fn config(&self) -> &ChonkersConfig {
        self.github.config()
    }

    pub fn github(&self) -> &GitHubClient {
        &self.github
    }

    /// Collect and rank repositories. Every repository is kept; ranks past
    /// the hand-tuned table land in the lowest tier.
    pub async fn rank_repositories(&self, scope: &RepoScope) -> Result<OutputDocument> {
        let repos = match scope {
            RepoScope::Global => self
                .github
                .search_repositories_by_size(self.config().repo_min_size)
                .await?
                .into_values()
                .collect(),
            RepoScope::User(user) => self.github.list_user_repositories(user).await?,
        };

        let entries = rank(repos, &TierTable::repositories(), RankMode::KeepAll);
        Ok(OutputDocument::new(entries))
    }

    /// Collect, size and rank `user`'s largest files, keeping the top
    /// `file_quota`.
    pub async fn rank_files(&self, user: &str) -> Result<OutputDocument> {
        let files = self.github.collect_user_files(user).await?;
        let table = TierTable::uniform(self.config().file_quota.div_ceil(6));
        let mut entries = rank(files, &table, RankMode::Truncate);
        entries.truncate(self.config().file_quota);
        Ok(OutputDocument::new(entries))
    }

    /// Rank repositories and write `_data/repos.yml` unless `dry_run`.
    pub async fn run_repositories(
        &self,
        scope: &RepoScope,
        dry_run: bool,
    ) -> Result<PipelineOutcome> {
        let document = self.rank_repositories(scope).await?;
        self.finish(Pipeline::Repositories, document, dry_run)
    }

    /// Rank `user`'s files and write `_data/files.yml` unless `dry_run`.
    pub async fn run_files(&self, user: &str, dry_run: bool) -> Result<PipelineOutcome> {
        let document = self.rank_files(user).await?;
        self.finish(Pipeline::Files, document, dry_run)
    }

    fn finish(
        &self,
        pipeline: Pipeline,
        document: OutputDocument,
        dry_run: bool,
    ) -> Result<PipelineOutcome> {
        let path = match pipeline {
            Pipeline::Repositories => self.config().repos_output_path(),
            Pipeline::Files => self.config().files_output_path(),
        };

        if !dry_run {
            write_document(&path, &document)?;
            info!(
                "Wrote {} {} entries to {}",
                document.len(),
                pipeline,
                path.display()
            );
        }

        Ok(PipelineOutcome {
            pipeline,
            path,
            document,
            written: !dry_run,
        })
    }
}
