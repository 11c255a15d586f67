//! Precomputed world statistics.
//!
//! Selectivity estimation never scans tiles. It reads these aggregates
//! instead: histograms for numeric attributes, per-item counts for set
//! attributes and prevalence counts for flags. Statistics for several sampled
//! worlds can be merged into one combined table.
//!
//! # Examples
//!
//! ```
//! use landingzone_core::{Attribute, WorldStats};
//!
//! let stats = WorldStats::from_toml_str(r#"
//!     total_tiles = 20000
//!     settleable_tiles = 10000
//!
//!     [flags]
//!     coastal = 1500
//!
//!     [[categories.hilliness]]
//!     name = "Mountainous"
//!     count_all = 4000
//!     count_settleable = 1000
//! "#).unwrap();
//!
//! assert_eq!(stats.candidate_count(), 10000);
//! assert_eq!(stats.flag_fraction(Attribute::Coastal), Some(0.15));
//! assert_eq!(stats.category_fraction(Attribute::Hilliness, "Mountainous"), Some(0.1));
//! assert_eq!(stats.category_fraction(Attribute::Hilliness, "Flat"), Some(0.0));
//! ```

mod builder;
mod distribution;

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attribute::Attribute;

pub use builder::{StatsBuilder, TileSample};
pub use distribution::Distribution;

/// Statistics loading error
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid statistics: {0}")]
    Invalid(String),
}

/// Tile counts for one item of a set attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    #[serde(default)]
    pub count_all: u64,
    #[serde(default)]
    pub count_settleable: u64,
}

impl CategoryCount {
    pub fn new(name: impl Into<String>, count_all: u64, count_settleable: u64) -> Self {
        Self {
            name: name.into(),
            count_all,
            count_settleable,
        }
    }
}

/// Aggregated statistics of the candidate space.
///
/// Histograms and flag counts cover settleable tiles only, since those are
/// the candidates a search can return.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorldStats {
    /// Number of worlds these statistics were aggregated from.
    #[serde(default = "default_samples")]
    pub samples: u32,

    pub total_tiles: u64,

    pub settleable_tiles: u64,

    #[serde(default)]
    pub distributions: BTreeMap<Attribute, Distribution>,

    #[serde(default)]
    pub categories: BTreeMap<Attribute, Vec<CategoryCount>>,

    /// Settleable tiles carrying each flag.
    #[serde(default)]
    pub flags: BTreeMap<Attribute, u64>,
}

fn default_samples() -> u32 {
    1
}

impl WorldStats {
    /// Creates empty statistics for a world of the given size.
    pub fn new(total_tiles: u64, settleable_tiles: u64) -> Self {
        Self {
            samples: 1,
            total_tiles,
            settleable_tiles,
            ..Self::default()
        }
    }

    /// Loads statistics from a file; `.yaml`/`.yml` is read as YAML, anything
    /// else as TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StatsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            _ => Self::from_toml_str(&contents),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, StatsError> {
        let stats: Self = toml::from_str(s)?;
        stats.validate()?;
        Ok(stats)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, StatsError> {
        let stats: Self = serde_yaml::from_str(s)?;
        stats.validate()?;
        Ok(stats)
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> Result<(), StatsError> {
        if self.settleable_tiles > self.total_tiles {
            return Err(StatsError::Invalid(format!(
                "settleable_tiles ({}) exceeds total_tiles ({})",
                self.settleable_tiles, self.total_tiles
            )));
        }
        for (attribute, dist) in &self.distributions {
            if dist.counts.is_empty() || !(dist.min < dist.max) {
                return Err(StatsError::Invalid(format!(
                    "distribution for {} needs bins and min < max",
                    attribute.key()
                )));
            }
        }
        Ok(())
    }

    /// Size of the candidate space: settleable tiles, or all tiles when the
    /// settleable count is unknown.
    pub fn candidate_count(&self) -> u64 {
        if self.settleable_tiles > 0 {
            self.settleable_tiles
        } else {
            self.total_tiles
        }
    }

    pub fn distribution(&self, attribute: Attribute) -> Option<&Distribution> {
        self.distributions.get(&attribute)
    }

    /// Share of candidates carrying `item`.
    ///
    /// `None` when the attribute has no category table at all; `Some(0.0)`
    /// when the table exists but never saw the item.
    pub fn category_fraction(&self, attribute: Attribute, item: &str) -> Option<f64> {
        let table = self.categories.get(&attribute)?;
        let candidates = self.candidate_count();
        if candidates == 0 {
            return Some(0.0);
        }
        let count = table
            .iter()
            .find(|c| c.name == item)
            .map(|c| self.candidate_side(c))
            .unwrap_or(0);
        Some((count as f64 / candidates as f64).min(1.0))
    }

    fn candidate_side(&self, c: &CategoryCount) -> u64 {
        if self.settleable_tiles > 0 {
            c.count_settleable
        } else {
            c.count_all
        }
    }

    /// Share of candidates carrying a flag.
    pub fn flag_fraction(&self, attribute: Attribute) -> Option<f64> {
        let count = *self.flags.get(&attribute)?;
        let candidates = self.candidate_count();
        if candidates == 0 {
            return Some(0.0);
        }
        Some((count as f64 / candidates as f64).min(1.0))
    }

    /// Folds another world's statistics into this one by summing counts.
    ///
    /// Histograms must share bounds and bin count; a mismatch leaves `self`
    /// unchanged. When only one side knows its settleable count, the other
    /// side's tiles are all counted as settleable, matching how
    /// [`candidate_count`](Self::candidate_count) reads it on its own.
    pub fn merge(&mut self, other: &WorldStats) -> Result<(), StatsError> {
        for (attribute, theirs) in &other.distributions {
            if let Some(ours) = self.distributions.get(attribute) {
                if !ours.is_compatible(theirs) {
                    return Err(StatsError::Invalid(format!(
                        "cannot merge {} histograms with different binning",
                        attribute.key()
                    )));
                }
            }
        }

        let other = match (self.settleable_tiles > 0, other.settleable_tiles > 0) {
            (true, false) => {
                let mut other = other.clone();
                other.assume_all_settleable();
                Cow::Owned(other)
            }
            (false, true) => {
                self.assume_all_settleable();
                Cow::Borrowed(other)
            }
            _ => Cow::Borrowed(other),
        };

        self.samples += other.samples;
        self.total_tiles += other.total_tiles;
        self.settleable_tiles += other.settleable_tiles;

        for (attribute, theirs) in &other.distributions {
            match self.distributions.get_mut(attribute) {
                Some(ours) => {
                    for (a, b) in ours.counts.iter_mut().zip(&theirs.counts) {
                        *a += b;
                    }
                }
                None => {
                    self.distributions.insert(*attribute, theirs.clone());
                }
            }
        }

        for (attribute, theirs) in &other.categories {
            let ours = self.categories.entry(*attribute).or_default();
            for entry in theirs {
                match ours.iter_mut().find(|c| c.name == entry.name) {
                    Some(c) => {
                        c.count_all += entry.count_all;
                        c.count_settleable += entry.count_settleable;
                    }
                    None => ours.push(entry.clone()),
                }
            }
            ours.sort_by(|a, b| b.count_all.cmp(&a.count_all).then_with(|| a.name.cmp(&b.name)));
        }

        for (attribute, count) in &other.flags {
            *self.flags.entry(*attribute).or_default() += count;
        }
        Ok(())
    }

    fn assume_all_settleable(&mut self) {
        if self.settleable_tiles > 0 {
            return;
        }
        self.settleable_tiles = self.total_tiles;
        for entry in self.categories.values_mut().flatten() {
            entry.count_settleable = entry.count_all;
        }
    }
}
