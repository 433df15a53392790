//! Size tiers assigned by rank.
//!
//! A [`TierTable`] is a run-length list of `(tier, count)` pairs read from the
//! top rank down. Ranks past the end of the table get the lowest tier.

use crate::config::OutputConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six size-severity categories, lowest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum SizeTier {
    #[default]
    FineBoi = 1,
    HeChonk = 2,
    HeckinChonker = 3,
    HeftyChonk = 4,
    Megachonker = 5,
    OhLawdHeComin = 6,
}

impl SizeTier {
    pub const ALL: [SizeTier; 6] = [
        SizeTier::FineBoi,
        SizeTier::HeChonk,
        SizeTier::HeckinChonker,
        SizeTier::HeftyChonk,
        SizeTier::Megachonker,
        SizeTier::OhLawdHeComin,
    ];

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(SizeTier::FineBoi),
            2 => Some(SizeTier::HeChonk),
            3 => Some(SizeTier::HeckinChonker),
            4 => Some(SizeTier::HeftyChonk),
            5 => Some(SizeTier::Megachonker),
            6 => Some(SizeTier::OhLawdHeComin),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn label(&self) -> &'static str {
        match self {
            SizeTier::FineBoi => "A fine boi",
            SizeTier::HeChonk => "He chonk",
            SizeTier::HeckinChonker => "A heckin' chonker",
            SizeTier::HeftyChonk => "H E F T Y C H O N K",
            SizeTier::Megachonker => "MEGACHONKER",
            SizeTier::OhLawdHeComin => "OH LAWD HE COMIN",
        }
    }

    /// Site path of the badge image, e.g. `/assets/images/sizes/6.png`.
    pub fn image_path(&self) -> String {
        format!("{}/{}.png", OutputConfig::SIZE_IMAGE_DIR, self.level())
    }
}

impl fmt::Display for SizeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<SizeTier> for u8 {
    fn from(tier: SizeTier) -> Self {
        tier.level()
    }
}

impl TryFrom<u8> for SizeTier {
    type Error = String;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        SizeTier::from_level(level).ok_or_else(|| format!("tier must be 1-6, got {}", level))
    }
}

/// Run-length tier assignment by rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierTable {
    runs: Vec<(SizeTier, usize)>,
}

impl TierTable {
    pub fn new(runs: Vec<(SizeTier, usize)>) -> Self {
        Self { runs }
    }

    /// `per_tier` ranks for each tier from the top tier down to the lowest.
    pub fn uniform(per_tier: usize) -> Self {
        Self::new(SizeTier::ALL.iter().rev().map(|&t| (t, per_tier)).collect())
    }

    /// Build a table from an explicit tier per rank, e.g. `[6, 5, 4, 4]`.
    ///
    /// Levels outside 1-6 are treated as the lowest tier.
    pub fn from_levels(levels: &[u8]) -> Self {
        let mut runs: Vec<(SizeTier, usize)> = Vec::new();
        for &level in levels {
            let tier = SizeTier::from_level(level).unwrap_or_default();
            match runs.last_mut() {
                Some((last, count)) if *last == tier => *count += 1,
                _ => runs.push((tier, 1)),
            }
        }
        Self::new(runs)
    }

    /// Ten files per tier, sixty in total.
    pub fn files() -> Self {
        Self::uniform(10)
    }

    /// Hand-tuned table for repositories; everything after rank 8 is tier 1.
    pub fn repositories() -> Self {
        Self::from_levels(&[6, 5, 4, 4, 3, 3, 3, 2, 2])
    }

    /// Number of ranks the table covers explicitly.
    /// Total ranks covered, saturating at `usize::MAX`.
    pub fn len(&self) -> usize {
        self.runs
            .iter()
            .fold(0usize, |total, &(_, count)| total.saturating_add(count))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tier for a zero-based rank. Ranks past the table fall back to the lowest tier.
pub fn tier_for_rank(rank: usize, table: &TierTable) -> SizeTier {
    let mut start: usize = 0;
    for &(tier, count) in &table.runs {
        let end = start.saturating_add(count);
        if rank < end {
            return tier;
        }
        start = end;
    }
    SizeTier::default()
}
