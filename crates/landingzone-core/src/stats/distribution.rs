use serde::{Deserialize, Serialize};

use crate::criterion::FloatRange;

/// Equal-width histogram of one numeric attribute over candidate tiles.
///
/// # Example
///
/// ```
/// use landingzone_core::{Distribution, FloatRange};
///
/// let dist = Distribution::from_counts(0.0, 100.0, vec![10, 30, 40, 20]);
/// assert_eq!(dist.total(), 100);
/// // Half of the second bin plus the whole third bin.
/// let f = dist.fraction_within(&FloatRange::new(37.5, 75.0));
/// assert!((f - 0.55).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<u64>,
}

impl Distribution {
    /// Creates an empty histogram with `bins` equal-width bins.
    pub fn new(min: f64, max: f64, bins: usize) -> Self {
        Self {
            min,
            max,
            counts: vec![0; bins.max(1)],
        }
    }

    pub fn from_counts(min: f64, max: f64, counts: Vec<u64>) -> Self {
        Self { min, max, counts }
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len().max(1) as f64
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Adds one observation. Values outside `[min, max]` land in the edge bins.
    pub fn record(&mut self, value: f64) {
        if self.counts.is_empty() || !value.is_finite() {
            return;
        }
        let idx = self.bin_of(value);
        self.counts[idx] += 1;
    }

    fn bin_of(&self, value: f64) -> usize {
        let last = self.counts.len().saturating_sub(1);
        let width = self.bin_width();
        if width <= 0.0 {
            return 0;
        }
        let raw = ((value - self.min) / width).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(last)
        }
    }

    /// Fraction of observations expected inside `range`.
    ///
    /// Observations are assumed uniform within each bin, so partially covered
    /// bins contribute proportionally. A degenerate range (`min == max`)
    /// returns the share of the bin holding that value, which treats discrete
    /// attributes such as growing days as point masses.
    ///
    /// The range is first clamped to `[min, max]`. [`record`](Self::record)
    /// files out-of-bounds values in the edge bins, so a range reaching past
    /// a bound covers that whole edge bin, and one lying entirely past it
    /// reads as the point mass at the bound.
    pub fn fraction_within(&self, range: &FloatRange) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let width = self.bin_width();
        if width <= 0.0 {
            return if range.contains(self.min) { 1.0 } else { 0.0 };
        }
        let from = range.min.max(self.min).min(self.max);
        let to = range.max.max(self.min).min(self.max);
        if to <= from {
            return self.counts[self.bin_of(from)] as f64 / total as f64;
        }

        let mut covered = 0.0;
        for (i, &count) in self.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let lo = self.min + width * i as f64;
            let hi = lo + width;
            let overlap = to.min(hi) - from.max(lo);
            if overlap > 0.0 {
                covered += count as f64 * (overlap / width).min(1.0);
            }
        }
        (covered / total as f64).clamp(0.0, 1.0)
    }

    /// Returns true if both histograms share bounds and bin count.
    pub fn is_compatible(&self, other: &Distribution) -> bool {
        self.min == other.min && self.max == other.max && self.counts.len() == other.counts.len()
    }
}
