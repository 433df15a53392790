//! Sorting collected records and projecting them into ranked entries.

use crate::models::{
    EntryDetails, FileDetails, FileRecord, RankedEntry, RepoDetails, RepoRecord,
};
use crate::size::format_size;
use crate::tier::{tier_for_rank, SizeTier, TierTable};

/// What to do with records ranked past the end of the tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMode {
    /// Keep only as many records as the table covers.
    Truncate,
    /// Keep every record; the overflow gets the lowest tier.
    KeepAll,
}

/// A collected record that can be ranked by size.
pub trait Rankable {
    fn size_bytes(&self) -> u64;

    fn project(&self, tier: SizeTier) -> RankedEntry;
}

/// Sort `records` by size, largest first, and label each with its tier.
///
/// The sort is stable, so equal sizes keep collection order.
pub fn rank<R, I>(records: I, table: &TierTable, mode: RankMode) -> Vec<RankedEntry>
where
    R: Rankable,
    I: IntoIterator<Item = R>,
{
    let mut sorted: Vec<R> = records.into_iter().collect();
    sorted.sort_by(|a, b| b.size_bytes().cmp(&a.size_bytes()));

    let keep = match mode {
        RankMode::Truncate => table.len(),
        RankMode::KeepAll => sorted.len(),
    };

    sorted
        .iter()
        .take(keep)
        .enumerate()
        .map(|(rank, record)| record.project(tier_for_rank(rank, table)))
        .collect()
}

impl Rankable for RepoRecord {
    fn size_bytes(&self) -> u64 {
        self.size
    }

    fn project(&self, tier: SizeTier) -> RankedEntry {
        RankedEntry {
            url: self.html_url.clone(),
            owner: self.owner.login.clone(),
            avatar: self.owner.avatar_url.clone(),
            image: tier.image_path(),
            name: self.full_name.clone(),
            size: format_size(self.size),
            rawsize: self.size,
            tier: tier.level(),
            label: tier.label().to_string(),
            details: EntryDetails::Repository(RepoDetails {
                stargazers_count: self.stargazers_count,
                watchers_count: self.watchers_count,
                html_url: Some(self.html_url.clone()),
                created_at: self.created_at.clone(),
                updated_at: self.updated_at.clone(),
                homepage: self.homepage.clone(),
                language: self.language.clone(),
                open_issues_count: self.open_issues_count,
                forks: self.forks,
                default_branch: self.default_branch.clone(),
            }),
        }
    }
}

impl Rankable for FileRecord {
    fn size_bytes(&self) -> u64 {
        self.size
    }

    fn project(&self, tier: SizeTier) -> RankedEntry {
        let item = &self.item;
        RankedEntry {
            url: item.html_url.clone(),
            owner: item.repository.owner.login.clone(),
            avatar: item.repository.owner.avatar_url.clone(),
            image: tier.image_path(),
            name: format!("{}/{}", item.repository.full_name, item.path),
            size: format_size(self.size),
            rawsize: self.size,
            tier: tier.level(),
            label: tier.label().to_string(),
            details: EntryDetails::File(FileDetails {
                filename: item.name.clone(),
                path: item.path.clone(),
                sha: item.sha.clone(),
                repository: item.repository.full_name.clone(),
                repository_url: item.repository.html_url.clone(),
            }),
        }
    }
}
