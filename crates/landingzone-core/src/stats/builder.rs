use std::collections::BTreeMap;

use crate::attribute::{Attribute, AttributeKind};

use super::{CategoryCount, Distribution, WorldStats};

/// Default histogram resolution.
pub const DEFAULT_BINS: usize = 48;

/// One tile's attribute values, as dumped by a world scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileSample {
    pub settleable: bool,
    pub values: BTreeMap<Attribute, f64>,
    pub items: BTreeMap<Attribute, Vec<String>>,
    pub flags: Vec<Attribute>,
}

impl TileSample {
    pub fn settleable() -> Self {
        Self {
            settleable: true,
            ..Self::default()
        }
    }

    pub fn with_value(mut self, attribute: Attribute, value: f64) -> Self {
        self.values.insert(attribute, value);
        self
    }

    pub fn with_item(mut self, attribute: Attribute, item: impl Into<String>) -> Self {
        self.items.entry(attribute).or_default().push(item.into());
        self
    }

    pub fn with_flag(mut self, attribute: Attribute) -> Self {
        self.flags.push(attribute);
        self
    }
}

/// Accumulates [`TileSample`]s into [`WorldStats`].
///
/// # Example
///
/// ```
/// use landingzone_core::{Attribute, StatsBuilder, TileSample};
///
/// let mut builder = StatsBuilder::new();
/// builder.add(&TileSample::settleable().with_value(Attribute::Rainfall, 1200.0));
/// builder.add(&TileSample::default().with_value(Attribute::Rainfall, 50.0));
///
/// let stats = builder.build();
/// assert_eq!(stats.total_tiles, 2);
/// assert_eq!(stats.settleable_tiles, 1);
/// assert_eq!(stats.distribution(Attribute::Rainfall).unwrap().total(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StatsBuilder {
    bins: usize,
    stats: WorldStats,
    categories: BTreeMap<Attribute, BTreeMap<String, (u64, u64)>>,
}

impl Default for StatsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsBuilder {
    pub fn new() -> Self {
        Self::with_bins(DEFAULT_BINS)
    }

    /// Creates a builder whose histograms span each attribute's catalog
    /// bounds with `bins` bins.
    pub fn with_bins(bins: usize) -> Self {
        let mut stats = WorldStats::new(0, 0);
        for attribute in Attribute::of_kind(AttributeKind::Range) {
            if let Some(bounds) = attribute.bounds() {
                stats
                    .distributions
                    .insert(attribute, Distribution::new(bounds.min, bounds.max, bins));
            }
        }
        Self {
            bins: bins.max(1),
            stats,
            categories: BTreeMap::new(),
        }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn add(&mut self, tile: &TileSample) {
        self.stats.total_tiles += 1;
        if tile.settleable {
            self.stats.settleable_tiles += 1;
        }

        for (attribute, names) in &tile.items {
            let table = self.categories.entry(*attribute).or_default();
            for name in names {
                let entry = table.entry(name.clone()).or_default();
                entry.0 += 1;
                if tile.settleable {
                    entry.1 += 1;
                }
            }
        }

        if !tile.settleable {
            return;
        }
        for (attribute, value) in &tile.values {
            if let Some(dist) = self.stats.distributions.get_mut(attribute) {
                dist.record(*value);
            }
        }
        for flag in &tile.flags {
            *self.stats.flags.entry(*flag).or_default() += 1;
        }
    }

    pub fn extend<'a>(&mut self, tiles: impl IntoIterator<Item = &'a TileSample>) {
        for tile in tiles {
            self.add(tile);
        }
    }

    /// Finishes aggregation. Category tables are sorted by descending count.
    pub fn build(self) -> WorldStats {
        let mut stats = self.stats;
        for (attribute, table) in self.categories {
            let mut counts: Vec<CategoryCount> = table
                .into_iter()
                .map(|(name, (all, settleable))| CategoryCount::new(name, all, settleable))
                .collect();
            counts.sort_by(|a, b| b.count_all.cmp(&a.count_all).then_with(|| a.name.cmp(&b.name)));
            stats.categories.insert(attribute, counts);
        }
        stats
    }
}
