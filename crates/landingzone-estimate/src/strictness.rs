//! Strictness: requiring only some of the hard gates.
//!
//! A profile's strictness `s` in `[0, 1]` asks a tile to pass
//! `ceil(s * n)` of its `n` hard gates. At 1.0 every gate must pass and the
//! estimate is the plain product of selectivities. Below that the estimate
//! is the probability that at least `k` of `n` independent gates pass (a
//! Poisson-binomial tail), which inherits the independence approximation
//! of [`combine`].

use std::fmt;

use landingzone_config::{CategoryThresholds, StrictnessConfig};
use landingzone_core::{CriteriaProfile, Importance};
use smallvec::SmallVec;
use tracing::debug;

use crate::estimate::{combine, expected_count, SelectivityEstimate};

/// Qualitative size of an expected result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchCategory {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
    Guaranteed,
}

impl MatchCategory {
    /// Buckets an expected match count.
    pub fn from_expected(expected: f64, thresholds: &CategoryThresholds) -> Self {
        if expected >= thresholds.guaranteed {
            MatchCategory::Guaranteed
        } else if expected >= thresholds.very_high {
            MatchCategory::VeryHigh
        } else if expected >= thresholds.high {
            MatchCategory::High
        } else if expected >= thresholds.medium {
            MatchCategory::Medium
        } else if expected >= thresholds.low {
            MatchCategory::Low
        } else {
            MatchCategory::VeryLow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchCategory::Guaranteed => "Guaranteed",
            MatchCategory::VeryHigh => "Very high",
            MatchCategory::High => "High",
            MatchCategory::Medium => "Medium",
            MatchCategory::Low => "Low",
            MatchCategory::VeryLow => "Very low",
        }
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of gates out of `n` that strictness `s` requires.
pub fn required_gates(strictness: f64, n: usize) -> usize {
    let s = if strictness.is_finite() {
        strictness.clamp(0.0, 1.0)
    } else {
        1.0
    };
    // Absorb rounding noise so that e.g. 2/3 * 3 requires 2, not 3.
    let k = (s * n as f64 - 1e-9).ceil().max(0.0) as usize;
    k.min(n)
}

/// Probability that at least `k` of the independent events with the given
/// probabilities occur.
pub fn at_least_k_of(probabilities: &[f64], k: usize) -> f64 {
    if k == 0 {
        return 1.0;
    }
    if k > probabilities.len() {
        return 0.0;
    }
    // dist[j] = P(exactly j successes so far)
    let mut dist: SmallVec<[f64; 16]> = SmallVec::from_elem(0.0, probabilities.len() + 1);
    dist[0] = 1.0;
    for (i, &p) in probabilities.iter().enumerate() {
        let p = p.clamp(0.0, 1.0);
        for j in (0..=i + 1).rev() {
            let stay = dist[j] * (1.0 - p);
            let advance = if j > 0 { dist[j - 1] * p } else { 0.0 };
            dist[j] = stay + advance;
        }
    }
    dist[k..].iter().sum::<f64>().clamp(0.0, 1.0)
}

/// Expected survivors when `strictness` of the hard gates must pass.
///
/// Exact product at full strictness; heuristic tail probability below.
/// With no gates everything survives.
pub fn estimate_at_strictness(
    estimates: &[SelectivityEstimate],
    strictness: f64,
    total: u64,
) -> SelectivityEstimate {
    let n = estimates.len();
    let k = required_gates(strictness, n);
    if k == n {
        return combine(estimates, total);
    }
    let probabilities: SmallVec<[f64; 16]> = estimates.iter().map(|e| e.selectivity).collect();
    let selectivity = at_least_k_of(&probabilities, k);
    SelectivityEstimate::from_fraction(None, selectivity, total, Importance::MustHave, false)
}

/// An alternative strictness with its predicted yield.
#[derive(Debug, Clone, PartialEq)]
pub struct StrictnessSuggestion {
    pub strictness: f64,
    /// Gates a tile must pass at this strictness.
    pub required: usize,
    /// Hard gates in the profile.
    pub total_criteria: usize,
    pub expected_matches: u64,
    pub category: MatchCategory,
    pub description: String,
}

impl StrictnessSuggestion {
    /// Writes this suggestion's strictness onto `profile`.
    pub fn apply(&self, profile: &mut CriteriaProfile) {
        profile.set_strictness(self.strictness);
        debug!(event = "strictness_applied", strictness = self.strictness);
    }
}

impl fmt::Display for StrictnessSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// Proposes up to `config.max_suggestions` other strictness values.
///
/// Candidates are `k / n` for `k` in `1..=n`. Values within
/// `config.epsilon` of `current` are dropped, the rest are ordered by
/// distance from `current` with the more relaxed value first on ties.
///
/// # Example
///
/// ```
/// use landingzone_config::StrictnessConfig;
/// use landingzone_core::Importance;
/// use landingzone_estimate::{suggest_strictness, SelectivityEstimate};
///
/// let gates: Vec<_> = [0.5, 0.5]
///     .into_iter()
///     .map(|p| SelectivityEstimate::from_fraction(None, p, 1000, Importance::MustHave, true))
///     .collect();
/// let suggestions = suggest_strictness(&gates, 1.0, 1000, &StrictnessConfig::default());
/// assert_eq!(suggestions.len(), 1);
/// assert_eq!(suggestions[0].strictness, 0.5);
/// assert_eq!(suggestions[0].expected_matches, 750);
/// ```
pub fn suggest_strictness(
    estimates: &[SelectivityEstimate],
    current: f64,
    total: u64,
    config: &StrictnessConfig,
) -> Vec<StrictnessSuggestion> {
    let n = estimates.len();
    let mut candidates: Vec<(usize, f64)> = (1..=n)
        .map(|k| (k, k as f64 / n as f64))
        .filter(|(_, s)| (s - current).abs() > config.epsilon)
        .collect();
    candidates.sort_by(|a, b| {
        let da = (a.1 - current).abs();
        let db = (b.1 - current).abs();
        da.total_cmp(&db).then(a.1.total_cmp(&b.1))
    });
    candidates.dedup_by(|a, b| (a.1 - b.1).abs() <= f64::EPSILON);
    candidates.truncate(config.max_suggestions);

    let suggestions: Vec<StrictnessSuggestion> = candidates
        .into_iter()
        .map(|(k, strictness)| {
            let estimate = estimate_at_strictness(estimates, strictness, total);
            let expected = estimate.expected_matches();
            let category = MatchCategory::from_expected(expected, &config.categories);
            let expected_matches = expected_count(total, estimate.selectivity);
            StrictnessSuggestion {
                strictness,
                required: k,
                total_criteria: n,
                expected_matches,
                category,
                description: format!(
                    "Match {k} of {n} hard criteria: about {expected_matches} tiles ({category})"
                ),
            }
        })
        .collect();
    debug!(event = "strictness_suggested", count = suggestions.len(), current);
    suggestions
}
