//! Selectivity estimates and their combination.

use std::fmt;

use landingzone_core::{CriterionId, Importance};

/// Predicted share of candidates satisfying one criterion or a combination.
///
/// Estimates are derived on demand from world statistics and never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectivityEstimate {
    /// The criterion this estimate is for; `None` for combined estimates.
    pub criterion: Option<CriterionId>,
    /// Expected number of matching candidates.
    pub matching_count: u64,
    /// Size of the candidate space.
    pub total_count: u64,
    /// `matching_count / total_count` before rounding, in `[0, 1]`.
    pub selectivity: f64,
    /// Importance the criterion was estimated at.
    pub importance: Importance,
    /// True when the figure comes straight from counts rather than from
    /// interpolation or an independence assumption.
    pub is_exact: bool,
}

impl SelectivityEstimate {
    /// Builds an estimate from a fraction of `total`.
    ///
    /// The fraction is clamped to `[0, 1]`; NaN reads as zero.
    pub fn from_fraction(
        criterion: Option<CriterionId>,
        fraction: f64,
        total: u64,
        importance: Importance,
        is_exact: bool,
    ) -> Self {
        let selectivity = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Self {
            criterion,
            matching_count: expected_count(total, selectivity),
            total_count: total,
            selectivity,
            importance,
            is_exact,
        }
    }

    /// Builds an exact estimate from counted matches.
    pub fn from_counts(
        criterion: Option<CriterionId>,
        matching: u64,
        total: u64,
        importance: Importance,
    ) -> Self {
        let matching = matching.min(total);
        let selectivity = if total == 0 {
            0.0
        } else {
            matching as f64 / total as f64
        };
        Self {
            criterion,
            matching_count: matching,
            total_count: total,
            selectivity,
            importance,
            is_exact: true,
        }
    }

    /// The estimate of the opposite requirement, as used for `MustNotHave`.
    pub fn complement(&self) -> Self {
        Self::from_fraction(
            self.criterion.clone(),
            1.0 - self.selectivity,
            self.total_count,
            self.importance,
            self.is_exact,
        )
    }

    /// Expected matches before rounding.
    pub fn expected_matches(&self) -> f64 {
        self.total_count as f64 * self.selectivity
    }
}

impl fmt::Display for SelectivityEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.is_exact { "" } else { "~" };
        match &self.criterion {
            Some(c) => write!(
                f,
                "{c}: {marker}{} of {} ({:.2}%)",
                self.matching_count,
                self.total_count,
                self.selectivity * 100.0
            ),
            None => write!(
                f,
                "{marker}{} of {} ({:.2}%)",
                self.matching_count,
                self.total_count,
                self.selectivity * 100.0
            ),
        }
    }
}

/// Combines per-criterion estimates into one by multiplying selectivities.
///
/// Criteria are treated as independent. This is an approximation: positively
/// correlated criteria (cold and short growing season) make the product too
/// pessimistic, negatively correlated ones too optimistic. The result only
/// feeds warnings and suggestions, never the search itself.
///
/// The result is exact only when it is a single exact estimate. No estimates
/// at all means nothing is filtered out.
///
/// # Example
///
/// ```
/// use landingzone_core::Importance;
/// use landingzone_estimate::{combine, SelectivityEstimate};
///
/// let parts: Vec<_> = [0.5, 0.4, 0.2]
///     .into_iter()
///     .map(|p| SelectivityEstimate::from_fraction(None, p, 1000, Importance::MustHave, true))
///     .collect();
/// assert_eq!(combine(&parts, 1000).matching_count, 40);
/// ```
pub fn combine(estimates: &[SelectivityEstimate], total: u64) -> SelectivityEstimate {
    let selectivity: f64 = estimates.iter().map(|e| e.selectivity).product();
    let is_exact = match estimates {
        [] => true,
        [only] => only.is_exact,
        _ => false,
    };
    SelectivityEstimate::from_fraction(None, selectivity, total, Importance::MustHave, is_exact)
}

pub(crate) fn expected_count(total: u64, selectivity: f64) -> u64 {
    (total as f64 * selectivity).round().max(0.0) as u64
}
