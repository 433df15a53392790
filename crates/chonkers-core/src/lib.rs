//! chonkers core - find the biggest repositories and files on GitHub and
//! publish them as YAML data for a static site.
//!
//! Each run is a linear pass: collect from the GitHub API, sort by size,
//! label by rank with a [`SizeTier`], and write `_data/repos.yml` or
//! `_data/files.yml`.
//!
//! # Example
//!
//! ```rust,ignore
//! use chonkers_core::{Chonkers, ChonkersConfig, RepoScope};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> chonkers_core::Result<()> {
//!     let chonkers = Chonkers::new(ChonkersConfig::from_env().with_site_root("./site"))?;
//!
//!     let repos = chonkers
//!         .run_repositories(&RepoScope::User("octocat".into()), false)
//!         .await?;
//!     println!("Wrote {} repositories", repos.document.len());
//!
//!     let files = chonkers.run_files("octocat", false).await?;
//!     println!("Wrote {} files", files.document.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod pipeline;
pub mod ranker;
pub mod size;
pub mod tier;
pub mod writer;

pub use config::ChonkersConfig;
pub use error::{ChonkersError, Result};
pub use models::{OutputDocument, RankedEntry};
pub use network::{GitHubClient, HttpClient};
pub use pipeline::{Chonkers, Pipeline, PipelineOutcome, RepoScope};
pub use ranker::{rank, RankMode, Rankable};
pub use size::format_size;
pub use tier::{tier_for_rank, SizeTier, TierTable};
pub use writer::{render_document, write_document};
