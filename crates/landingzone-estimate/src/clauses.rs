//! Selectivity of a clause workspace.
//!
//! A profile is flat, but a workspace can say "Flat AND Coastal, OR
//! Mountainous". A tile survives when it satisfies at least one `MustHave`
//! clause and no `MustNotHave` clause. The clauses of a tier are combined by
//! inclusion-exclusion: the intersection of several clauses is the
//! conjunction of all their terms, so clauses asking for different values
//! of a single-valued attribute come out disjoint. Terms within a clause,
//! and the two tiers, are assumed independent.

use std::collections::BTreeMap;

use landingzone_clauses::{Term, Workspace};
use landingzone_core::{Attribute, CriteriaProfile, CriterionId, Importance, LogicMode, Tier};
use tracing::debug;

use crate::error::{EstimateError, EstimateResult};
use crate::estimate::SelectivityEstimate;
use crate::estimator::SelectivityEstimator;

/// Above this many clauses in a tier, clauses are treated as independent
/// instead of enumerating every intersection.
const MAX_EXACT_CLAUSES: usize = 12;

/// One AND-ed term of a clause, by criterion.
#[derive(Debug, Clone, PartialEq)]
enum Gate<'w> {
    One(&'w CriterionId),
    AnyOf(Vec<&'w CriterionId>),
}

impl<'a> SelectivityEstimator<'a> {
    /// Expected survivors of a workspace's hard tiers.
    ///
    /// Range bounds come from `profile`, which should be the profile the
    /// workspace was synced onto. Heuristic unless the workspace has no hard
    /// chips, in which case everything survives.
    pub fn estimate_workspace(
        &self,
        workspace: &Workspace,
        profile: &CriteriaProfile,
    ) -> EstimateResult<SelectivityEstimate> {
        let total = self.candidates()?;
        let estimate = match self.workspace_fraction(workspace, profile, &[])? {
            Some(fraction) => {
                SelectivityEstimate::from_fraction(None, fraction, total, Importance::MustHave, false)
            }
            None => SelectivityEstimate::from_counts(None, total, total, Importance::MustHave),
        };
        debug!(
            event = "workspace_estimate",
            matches = estimate.matching_count,
            total,
        );
        Ok(estimate)
    }

    /// Surviving fraction of the hard tiers, skipping every term whose chips
    /// all sit on an `excluded` attribute. `None` when no hard term remains.
    pub(crate) fn workspace_fraction(
        &self,
        workspace: &Workspace,
        profile: &CriteriaProfile,
        excluded: &[Attribute],
    ) -> EstimateResult<Option<f64>> {
        let required = self.tier_union(workspace, profile, Tier::MustHave, excluded)?;
        let forbidden = self.tier_union(workspace, profile, Tier::MustNotHave, excluded)?;
        Ok(match (required, forbidden) {
            (None, None) => None,
            (required, forbidden) => {
                Some(required.unwrap_or(1.0) * (1.0 - forbidden.unwrap_or(0.0)))
            }
        })
    }

    /// Share of candidates satisfying at least one clause of `tier`.
    fn tier_union(
        &self,
        workspace: &Workspace,
        profile: &CriteriaProfile,
        tier: Tier,
        excluded: &[Attribute],
    ) -> EstimateResult<Option<f64>> {
        let clauses: Vec<Vec<Gate<'_>>> = workspace
            .clauses_in_bucket(tier)
            .iter()
            .map(|clause| {
                clause
                    .terms()
                    .iter()
                    .filter_map(|term| gate(term, excluded))
                    .collect::<Vec<_>>()
            })
            .filter(|gates| !gates.is_empty())
            .collect();

        match clauses.len() {
            0 => Ok(None),
            n if n > MAX_EXACT_CLAUSES => {
                let mut miss = 1.0;
                for clause in &clauses {
                    let gates: Vec<&Gate<'_>> = clause.iter().collect();
                    miss *= 1.0 - self.conjunction(profile, &gates)?;
                }
                Ok(Some(1.0 - miss))
            }
            n => {
                let mut union = 0.0;
                for mask in 1u32..(1 << n) {
                    let gates: Vec<&Gate<'_>> = clauses
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| mask & (1 << i) != 0)
                        .flat_map(|(_, clause)| clause.iter())
                        .collect();
                    let p = self.conjunction(profile, &gates)?;
                    if mask.count_ones() % 2 == 1 {
                        union += p;
                    } else {
                        union -= p;
                    }
                }
                Ok(Some(union.clamp(0.0, 1.0)))
            }
        }
    }

    /// Share of candidates satisfying every gate at once.
    fn conjunction(&self, profile: &CriteriaProfile, gates: &[&Gate<'_>]) -> EstimateResult<f64> {
        let mut items: BTreeMap<Attribute, Vec<&str>> = BTreeMap::new();
        let mut seen: Vec<&Gate<'_>> = Vec::new();
        let mut fraction = 1.0;
        for &gate in gates {
            if let Gate::One(CriterionId::Item(attribute, name)) = gate {
                items.entry(*attribute).or_default().push(name);
                continue;
            }
            if seen.contains(&gate) {
                continue;
            }
            seen.push(gate);
            fraction *= match gate {
                Gate::One(id) => self.positive_fraction(profile, id)?,
                Gate::AnyOf(ids) => self.any_of_fraction(profile, ids)?,
            };
        }
        for (attribute, names) in items {
            fraction *= self
                .estimate_items(attribute, &names, Importance::MustHave, LogicMode::And)?
                .selectivity;
        }
        Ok(fraction)
    }

    fn any_of_fraction(&self, profile: &CriteriaProfile, ids: &[&CriterionId]) -> EstimateResult<f64> {
        if let Some((attribute, names)) = same_attribute_items(ids) {
            return Ok(self
                .estimate_items(attribute, &names, Importance::MustHave, LogicMode::Or)?
                .selectivity);
        }
        let mut miss = 1.0;
        for id in ids {
            miss *= 1.0 - self.positive_fraction(profile, id)?;
        }
        Ok(1.0 - miss)
    }

    /// Share of candidates matching one criterion, ignoring its importance.
    fn positive_fraction(&self, profile: &CriteriaProfile, id: &CriterionId) -> EstimateResult<f64> {
        let estimate = match id {
            CriterionId::Range(attribute) => {
                let criterion = profile
                    .range(*attribute)
                    .ok_or_else(|| EstimateError::Inactive(id.clone()))?;
                self.estimate_range(*attribute, &criterion.range, Importance::MustHave)?
            }
            CriterionId::Item(attribute, name) => {
                self.estimate_items(*attribute, &[name.as_str()], Importance::MustHave, LogicMode::And)?
            }
            CriterionId::Flag(attribute) => self.estimate_flag(*attribute, Importance::MustHave)?,
        };
        Ok(estimate.selectivity)
    }
}

fn gate<'w>(term: &Term<'w>, excluded: &[Attribute]) -> Option<Gate<'w>> {
    let ids: Vec<&'w CriterionId> = term.chips().into_iter().map(|chip| chip.criterion()).collect();
    if ids.iter().all(|id| excluded.contains(&id.attribute())) {
        return None;
    }
    match ids.as_slice() {
        [only] => Some(Gate::One(only)),
        _ => Some(Gate::AnyOf(ids)),
    }
}

/// Item names when every criterion is an item of one attribute.
fn same_attribute_items<'w>(ids: &[&'w CriterionId]) -> Option<(Attribute, Vec<&'w str>)> {
    let first = ids.first()?.attribute();
    ids.iter()
        .map(|&id| match id {
            CriterionId::Item(attribute, name) if *attribute == first => Some(name.as_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()
        .map(|names| (first, names))
}
