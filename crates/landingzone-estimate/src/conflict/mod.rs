//! Conflict detection for criteria profiles.
//!
//! Four independent rules run on every query; any number may fire:
//!
//! 1. exclusive conjunction: two required values of an attribute a tile
//!    holds only one of
//! 2. contradictory numeric ranges: impossible temperature orderings and
//!    growing seasons, plus statistically unlikely pairs
//! 3. overall restrictiveness: too few expected matches
//! 4. rare-feature conjunction: several ultra-rare or many required map
//!    features at once
//!
//! Detection never fails. When estimation does, rule 3 degrades to counting
//! hard criteria.

mod rules;

#[cfg(test)]
mod tests;

use std::fmt;

use landingzone_clauses::{ClauseId, Term, Workspace};
use landingzone_config::AdvisorConfig;
use landingzone_core::{
    Attribute, CriteriaProfile, CriterionId, Importance, LogicMode, Tier, WorldStats,
};
use tracing::debug;

use crate::estimate::{combine, SelectivityEstimate};
use crate::estimator::SelectivityEstimator;

use rules::ItemTerm;

/// How serious a conflict is. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a conflict is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConflictOrigin {
    Tier(Tier),
    Clause(Tier, ClauseId),
    Criterion(CriterionId),
}

impl ConflictOrigin {
    /// The tier the conflict belongs to, when it names one.
    pub fn tier(&self) -> Option<Tier> {
        match self {
            ConflictOrigin::Tier(tier) | ConflictOrigin::Clause(tier, _) => Some(*tier),
            ConflictOrigin::Criterion(_) => None,
        }
    }
}

/// A detected problem with a profile, with a suggested fix.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
    pub origin: ConflictOrigin,
}

impl Conflict {
    pub fn new(
        severity: Severity,
        origin: ConflictOrigin,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            suggestion: suggestion.into(),
            origin,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)?;
        if !self.suggestion.is_empty() {
            write!(f, " ({})", self.suggestion)?;
        }
        Ok(())
    }
}

/// Runs the conflict rules against a profile or a workspace.
#[derive(Debug, Clone, Copy)]
pub struct ConflictDetector<'a> {
    estimator: SelectivityEstimator<'a>,
    config: &'a AdvisorConfig,
}

impl<'a> ConflictDetector<'a> {
    pub fn new(stats: &'a WorldStats, config: &'a AdvisorConfig) -> Self {
        Self {
            estimator: SelectivityEstimator::new(stats),
            config,
        }
    }

    /// Evaluates all four rules on the profile's flat representation.
    ///
    /// Each multi-item attribute contributes its `MustHave` items as one
    /// OR-term when its combinator is `Or`, or one term per item otherwise.
    pub fn detect(&self, profile: &CriteriaProfile) -> Vec<Conflict> {
        let origin = ConflictOrigin::Tier(Tier::MustHave);
        let terms = profile_terms(profile);

        let mut conflicts = Vec::new();
        let flagged = rules::exclusive_conjunction(&terms, &origin, &mut conflicts);
        rules::contradictory_ranges(profile, &mut conflicts);
        let estimated = self.estimator.candidates().and_then(|total| {
            self.estimator
                .hard_estimates_excluding(profile, &flagged)
                .map(|estimates| (!estimates.is_empty()).then(|| combine(&estimates, total)))
        });
        rules::restrictiveness(estimated, self.config, profile, &flagged, &mut conflicts);
        rules::rare_features(&self.estimator, self.config, &terms, &origin, &mut conflicts);

        debug!(event = "conflicts_detected", count = conflicts.len());
        conflicts
    }

    /// Evaluates rules 1 and 4 per clause of the workspace's `MustHave`
    /// tier, where an OR-group counts as a single term, and rule 2 on
    /// `profile`. Rule 3 judges the union of the clauses, with range bounds
    /// taken from `profile`.
    pub fn detect_in_workspace(&self, workspace: &Workspace, profile: &CriteriaProfile) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        let mut flagged: Vec<Attribute> = Vec::new();
        let mut clause_terms: Vec<(ClauseId, Vec<ItemTerm<'_>>)> = Vec::new();

        for clause in workspace.clauses_in_bucket(Tier::MustHave) {
            let terms: Vec<ItemTerm<'_>> = clause.terms().iter().filter_map(item_term).collect();
            let origin = ConflictOrigin::Clause(Tier::MustHave, clause.id());
            for attribute in rules::exclusive_conjunction(&terms, &origin, &mut conflicts) {
                if !flagged.contains(&attribute) {
                    flagged.push(attribute);
                }
            }
            clause_terms.push((clause.id(), terms));
        }

        rules::contradictory_ranges(profile, &mut conflicts);
        let estimated = self.estimator.candidates().and_then(|total| {
            self.estimator
                .workspace_fraction(workspace, profile, &flagged)
                .map(|fraction| {
                    fraction.map(|f| {
                        SelectivityEstimate::from_fraction(None, f, total, Importance::MustHave, false)
                    })
                })
        });
        rules::restrictiveness(estimated, self.config, profile, &flagged, &mut conflicts);

        for (id, terms) in &clause_terms {
            let origin = ConflictOrigin::Clause(Tier::MustHave, *id);
            rules::rare_features(&self.estimator, self.config, terms, &origin, &mut conflicts);
        }

        debug!(event = "workspace_conflicts_detected", count = conflicts.len());
        conflicts
    }
}

fn profile_terms(profile: &CriteriaProfile) -> Vec<ItemTerm<'_>> {
    let mut terms = Vec::new();
    for attribute in Attribute::ALL {
        let Some(container) = profile.items(attribute) else {
            continue;
        };
        let names: Vec<&str> = container.items_at(Importance::MustHave).collect();
        if names.is_empty() {
            continue;
        }
        match container.mode() {
            LogicMode::Or => terms.push(ItemTerm::new(attribute, names)),
            LogicMode::And => {
                terms.extend(names.into_iter().map(|n| ItemTerm::new(attribute, vec![n])))
            }
        }
    }
    terms
}

/// A clause term made only of items of one attribute.
fn item_term<'w>(term: &Term<'w>) -> Option<ItemTerm<'w>> {
    let mut attribute = None;
    let mut names = Vec::new();
    for chip in term.chips() {
        let CriterionId::Item(a, name) = chip.criterion() else {
            return None;
        };
        match attribute {
            None => attribute = Some(*a),
            Some(seen) if seen != *a => return None,
            Some(_) => {}
        }
        names.push(name.as_str());
    }
    Some(ItemTerm::new(attribute?, names))
}
