//! Per-criterion and combined selectivity from world statistics.

use landingzone_core::{
    Attribute, AttributeKind, CriteriaProfile, CriterionId, FloatRange, Importance, LogicMode,
    WorldStats,
};
use tracing::{debug, trace};

use crate::error::{EstimateError, EstimateResult};
use crate::estimate::{combine, SelectivityEstimate};

/// Estimates how many candidates survive criteria, without scanning tiles.
///
/// All queries are pure reads over the borrowed statistics.
#[derive(Debug, Clone, Copy)]
pub struct SelectivityEstimator<'a> {
    stats: &'a WorldStats,
}

impl<'a> SelectivityEstimator<'a> {
    pub fn new(stats: &'a WorldStats) -> Self {
        Self { stats }
    }

    pub fn stats(&self) -> &'a WorldStats {
        self.stats
    }

    /// Size of the candidate space.
    pub fn candidates(&self) -> EstimateResult<u64> {
        match self.stats.candidate_count() {
            0 => Err(EstimateError::EmptyCandidateSpace),
            n => Ok(n),
        }
    }

    // ------------------------------------------------------------------
    // Single criteria
    // ------------------------------------------------------------------

    /// Share of candidates whose `attribute` lies in `range`.
    ///
    /// Integrates the range over the attribute's histogram, interpolating
    /// linearly inside partially covered bins, so the result is heuristic.
    /// `MustNotHave` estimates the share outside the range.
    pub fn estimate_range(
        &self,
        attribute: Attribute,
        range: &FloatRange,
        importance: Importance,
    ) -> EstimateResult<SelectivityEstimate> {
        let total = self.candidates()?;
        let distribution = self
            .stats
            .distribution(attribute)
            .ok_or(EstimateError::MissingStatistics(attribute))?;
        let fraction = distribution.fraction_within(range);
        let estimate = SelectivityEstimate::from_fraction(
            Some(CriterionId::Range(attribute)),
            fraction,
            total,
            importance,
            false,
        );
        trace!(event = "range_estimate", attribute = attribute.key(), fraction);
        Ok(negate_if_excluded(estimate, importance))
    }

    /// Share of candidates satisfying a set of items combined with `mode`.
    ///
    /// - `Or` on a single-valued attribute sums the (disjoint) frequencies.
    /// - `Or` on a multi-valued attribute takes the independent union
    ///   `1 - Π(1 - p)`.
    /// - `And` multiplies frequencies, except that two distinct items of a
    ///   single-valued attribute can never hold together and yield zero.
    /// - `MustNotHave` requires none of the items: the complement of `Or`,
    ///   whatever `mode` says.
    ///
    /// Duplicate item names count once. No items at all filters nothing.
    pub fn estimate_items(
        &self,
        attribute: Attribute,
        items: &[&str],
        importance: Importance,
        mode: LogicMode,
    ) -> EstimateResult<SelectivityEstimate> {
        let total = self.candidates()?;
        let mut names: Vec<&str> = items.to_vec();
        names.sort_unstable();
        names.dedup();

        let mut fractions = Vec::with_capacity(names.len());
        for name in &names {
            let p = self
                .stats
                .category_fraction(attribute, name)
                .ok_or(EstimateError::MissingStatistics(attribute))?;
            fractions.push(p);
        }

        let exclude = importance == Importance::MustNotHave;
        let mode = if exclude { LogicMode::Or } else { mode };
        let single_valued = attribute.is_single_valued();
        let (fraction, is_exact) = match (mode, fractions.as_slice()) {
            (_, []) => (1.0, true),
            (_, [p]) => (*p, true),
            (LogicMode::Or, ps) if single_valued => (ps.iter().sum::<f64>().min(1.0), true),
            (LogicMode::Or, ps) => (1.0 - ps.iter().map(|p| 1.0 - p).product::<f64>(), false),
            (LogicMode::And, _) if single_valued => (0.0, true),
            (LogicMode::And, ps) => (ps.iter().product::<f64>(), false),
        };

        let criterion = match names.as_slice() {
            [only] => Some(CriterionId::Item(attribute, (*only).to_string())),
            _ => None,
        };
        trace!(
            event = "items_estimate",
            attribute = attribute.key(),
            items = names.len(),
            mode = mode.keyword(),
            fraction,
        );
        let estimate =
            SelectivityEstimate::from_fraction(criterion, fraction, total, importance, is_exact);
        Ok(negate_if_excluded(estimate, importance))
    }

    /// Share of candidates carrying a flag, from its known prevalence.
    pub fn estimate_flag(
        &self,
        attribute: Attribute,
        importance: Importance,
    ) -> EstimateResult<SelectivityEstimate> {
        let total = self.candidates()?;
        let fraction = self
            .stats
            .flag_fraction(attribute)
            .ok_or(EstimateError::MissingStatistics(attribute))?;
        let estimate = SelectivityEstimate::from_fraction(
            Some(CriterionId::Flag(attribute)),
            fraction,
            total,
            importance,
            true,
        );
        Ok(negate_if_excluded(estimate, importance))
    }

    /// Estimates one criterion of `profile` at its current importance.
    ///
    /// Items are estimated on their own, ignoring their container's
    /// combinator.
    pub fn estimate_criterion(
        &self,
        profile: &CriteriaProfile,
        id: &CriterionId,
    ) -> EstimateResult<SelectivityEstimate> {
        let importance = profile.importance_of(id);
        if !importance.is_active() {
            return Err(EstimateError::Inactive(id.clone()));
        }
        match id {
            CriterionId::Range(attribute) => {
                let criterion = profile
                    .range(*attribute)
                    .ok_or_else(|| EstimateError::Inactive(id.clone()))?;
                self.estimate_range(*attribute, &criterion.range, importance)
            }
            CriterionId::Item(attribute, name) => {
                self.estimate_items(*attribute, &[name.as_str()], importance, LogicMode::And)
            }
            CriterionId::Flag(attribute) => self.estimate_flag(*attribute, importance),
        }
    }

    // ------------------------------------------------------------------
    // Hard gates
    // ------------------------------------------------------------------

    /// One estimate per hard gate of `profile`.
    ///
    /// A gate is a `MustHave` or `MustNotHave` range, a flag, or the items
    /// of one set attribute at one of those importances taken together.
    pub fn hard_estimates(&self, profile: &CriteriaProfile) -> EstimateResult<Vec<SelectivityEstimate>> {
        self.hard_estimates_excluding(profile, &[])
    }

    /// Like [`hard_estimates`](Self::hard_estimates), skipping every gate
    /// on an attribute in `excluded`.
    pub fn hard_estimates_excluding(
        &self,
        profile: &CriteriaProfile,
        excluded: &[Attribute],
    ) -> EstimateResult<Vec<SelectivityEstimate>> {
        let mut out = Vec::new();
        for attribute in Attribute::ALL {
            if excluded.contains(&attribute) {
                continue;
            }
            match attribute.kind() {
                AttributeKind::Range => {
                    if let Some(c) = profile.range(attribute).filter(|c| c.importance.is_hard()) {
                        out.push(self.estimate_range(attribute, &c.range, c.importance)?);
                    }
                }
                AttributeKind::Set => {
                    let Some(container) = profile.items(attribute) else {
                        continue;
                    };
                    for importance in [Importance::MustHave, Importance::MustNotHave] {
                        let names: Vec<&str> = container.items_at(importance).collect();
                        if !names.is_empty() {
                            out.push(self.estimate_items(
                                attribute,
                                &names,
                                importance,
                                container.mode(),
                            )?);
                        }
                    }
                }
                AttributeKind::Flag => {
                    let importance = profile.flag(attribute);
                    if importance.is_hard() {
                        out.push(self.estimate_flag(attribute, importance)?);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Expected survivors of every hard gate of `profile` at full strictness.
    ///
    /// Gates are assumed independent; see [`combine`].
    pub fn estimate_combined(&self, profile: &CriteriaProfile) -> EstimateResult<SelectivityEstimate> {
        let total = self.candidates()?;
        let estimates = self.hard_estimates(profile)?;
        let combined = combine(&estimates, total);
        debug!(
            event = "combined_estimate",
            gates = estimates.len(),
            matches = combined.matching_count,
            total,
        );
        Ok(combined)
    }
}

fn negate_if_excluded(estimate: SelectivityEstimate, importance: Importance) -> SelectivityEstimate {
    if importance == Importance::MustNotHave {
        estimate.complement()
    } else {
        estimate
    }
}
