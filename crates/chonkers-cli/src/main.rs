//! chonkers - write the biggest GitHub repositories and files for a user
//! into the website's `_data/` directory.

use anyhow::{Context, Result};
use chonkers_core::{render_document, Chonkers, ChonkersConfig, PipelineOutcome, RepoScope};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PipelineArg {
    Repos,
    Files,
    All,
}

#[derive(Parser, Debug)]
#[command(name = "chonkers")]
#[command(about = "Rank a GitHub user's largest repositories and files", version)]
struct Args {
    /// GitHub username to rank
    user: String,

    /// Which data file(s) to produce
    #[arg(long, value_enum, default_value = "all")]
    pipeline: PipelineArg,

    /// Rank repositories from a global size search instead of the user's own
    #[arg(long)]
    global: bool,

    /// Minimum repository size for the global search
    #[arg(long, default_value_t = chonkers_core::config::SearchConfig::REPO_MIN_SIZE)]
    min_repo_size: u64,

    /// Starting size threshold (bytes) for the file search
    #[arg(long, default_value_t = chonkers_core::config::SearchConfig::FILE_MIN_SIZE)]
    min_file_size: u64,

    /// Amount the file threshold shrinks after each search
    #[arg(long, default_value_t = chonkers_core::config::SearchConfig::FILE_SIZE_STEP)]
    file_size_step: u64,

    /// Number of files to collect and rank
    #[arg(long, default_value_t = chonkers_core::config::SearchConfig::FILE_QUOTA)]
    file_quota: usize,

    /// Maximum number of file searches
    #[arg(long, default_value_t = chonkers_core::config::SearchConfig::FILE_MAX_ROUNDS)]
    max_rounds: u32,

    /// Pause between file searches, in milliseconds
    #[arg(long, default_value = "2000")]
    delay_ms: u64,

    /// Site directory that contains _data/ (defaults to the current directory)
    #[arg(long)]
    site_root: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Raw content base URL
    #[arg(long)]
    raw_base: Option<String>,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Print the YAML instead of writing files
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn to_config(&self) -> Result<ChonkersConfig> {
        let site_root = match &self.site_root {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("Failed to read the current directory")?,
        };

        let mut config = ChonkersConfig::from_env()
            .with_site_root(site_root)
            .with_repo_min_size(self.min_repo_size)
            .with_file_min_size(self.min_file_size)
            .with_file_size_step(self.file_size_step)
            .with_file_quota(self.file_quota)
            .with_file_max_rounds(self.max_rounds)
            .with_search_delay(Duration::from_millis(self.delay_ms))
            .with_request_timeout(self.timeout_secs.map(Duration::from_secs));
        if let Some(base) = &self.api_base {
            config = config.with_api_base(base.as_str());
        }
        if let Some(base) = &self.raw_base {
            config = config.with_raw_base(base.as_str());
        }
        Ok(config)
    }
}

fn init_logging(debug: bool) {
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact();

    match EnvFilter::try_from_default_env() {
        Ok(filter) => builder.with_env_filter(filter).init(),
        Err(_) => {
            let log_level = if debug { Level::DEBUG } else { Level::INFO };
            builder.with_max_level(log_level).init()
        }
    }
}

fn emit(outcome: &PipelineOutcome) -> Result<()> {
    if outcome.written {
        info!(
            "{}: {} entries in {}",
            outcome.pipeline,
            outcome.document.len(),
            outcome.path.display()
        );
    } else {
        let yaml = render_document(&outcome.document)?;
        println!("# {}", outcome.path.display());
        print!("{}", yaml);
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let config = args.to_config()?;
    if config.token.is_none() {
        info!("GITHUB_TOKEN not set, using unauthenticated rate limits");
    }
    let chonkers = Chonkers::new(config)?;

    if matches!(args.pipeline, PipelineArg::Repos | PipelineArg::All) {
        let scope = if args.global {
            RepoScope::Global
        } else {
            RepoScope::User(args.user.clone())
        };
        let outcome = chonkers
            .run_repositories(&scope, args.dry_run)
            .await
            .context("Repository pipeline failed")?;
        emit(&outcome)?;
    }

    if matches!(args.pipeline, PipelineArg::Files | PipelineArg::All) {
        let outcome = chonkers
            .run_files(&args.user, args.dry_run)
            .await
            .context("File pipeline failed")?;
        emit(&outcome)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_is_required() {
        assert!(Args::try_parse_from(["chonkers"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["chonkers", "octocat"]).unwrap();
        assert_eq!(args.user, "octocat");
        assert_eq!(args.pipeline, PipelineArg::All);
        assert!(!args.global);
        assert_eq!(args.file_quota, 60);
        assert_eq!(args.delay_ms, 2000);
    }

    #[test]
    fn test_to_config_applies_overrides() {
        let args = Args::try_parse_from([
            "chonkers",
            "octocat",
            "--pipeline",
            "files",
            "--site-root",
            "/srv/site",
            "--api-base",
            "http://127.0.0.1:9000/",
            "--file-quota",
            "12",
            "--timeout-secs",
            "30",
        ])
        .unwrap();
        let config = args.to_config().unwrap();

        assert_eq!(args.pipeline, PipelineArg::Files);
        assert_eq!(config.site_root, PathBuf::from("/srv/site"));
        assert_eq!(config.api_base, "http://127.0.0.1:9000");
        assert_eq!(config.file_quota, 12);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }
}
