//! One-call profile analysis.

use std::fmt;

use landingzone_clauses::Workspace;
use landingzone_config::AdvisorConfig;
use landingzone_core::{CriteriaProfile, WorldStats};
use landingzone_estimate::{
    combine, estimate_at_strictness, suggest_strictness, Conflict, ConflictDetector, EstimateResult,
    SelectivityEstimate, SelectivityEstimator, Severity, StrictnessSuggestion,
};
use tracing::{debug, warn};

/// Owns the world statistics and thresholds a search runs against.
#[derive(Debug, Clone)]
pub struct ProfileAdvisor {
    stats: WorldStats,
    config: AdvisorConfig,
}

impl ProfileAdvisor {
    /// Creates an advisor with default thresholds.
    pub fn new(stats: WorldStats) -> Self {
        Self::with_config(stats, AdvisorConfig::default())
    }

    pub fn with_config(stats: WorldStats, config: AdvisorConfig) -> Self {
        Self { stats, config }
    }

    pub fn stats(&self) -> &WorldStats {
        &self.stats
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Replaces the statistics, e.g. after a new world is generated.
    pub fn set_stats(&mut self, stats: WorldStats) {
        self.stats = stats;
    }

    pub fn estimator(&self) -> SelectivityEstimator<'_> {
        SelectivityEstimator::new(&self.stats)
    }

    pub fn detector(&self) -> ConflictDetector<'_> {
        ConflictDetector::new(&self.stats, &self.config)
    }

    /// Estimates, conflicts and strictness alternatives for `profile`.
    pub fn analyze(&self, profile: &CriteriaProfile) -> ProfileReport {
        let conflicts = self.detector().detect(profile);
        self.report(profile, conflicts)
    }

    /// Like [`analyze`](Self::analyze), for the profile `workspace` would
    /// write onto `base`. Clause-level conflicts point at their clause.
    ///
    /// The combined estimate is the union of the workspace's `MustHave`
    /// clauses; relaxed estimates and suggestions come from the synced
    /// profile's gates. `base` is left untouched.
    pub fn analyze_workspace(&self, workspace: &Workspace, base: &CriteriaProfile) -> ProfileReport {
        let mut profile = base.clone();
        workspace.sync_to(&mut profile);
        let conflicts = self.detector().detect_in_workspace(workspace, &profile);
        let mut report = self.report(&profile, conflicts);
        if report.combined.is_some() {
            match self.estimator().estimate_workspace(workspace, &profile) {
                Ok(estimate) => report.combined = Some(estimate),
                Err(err) => {
                    warn!(event = "workspace_estimate_unavailable", error = %err);
                    report.combined = None;
                }
            }
        }
        report
    }

    fn report(&self, profile: &CriteriaProfile, conflicts: Vec<Conflict>) -> ProfileReport {
        let strictness = profile.strictness();
        let report = match self.gates(profile) {
            Ok((gates, total)) => {
                let combined = combine(&gates, total);
                let relaxed = (strictness < 1.0)
                    .then(|| estimate_at_strictness(&gates, strictness, total));
                let suggestions = suggest_strictness(&gates, strictness, total, &self.config.strictness);
                ProfileReport {
                    combined: Some(combined),
                    at_strictness: relaxed,
                    conflicts,
                    suggestions,
                }
            }
            Err(err) => {
                warn!(event = "estimate_unavailable", error = %err);
                ProfileReport {
                    combined: None,
                    at_strictness: None,
                    conflicts,
                    suggestions: Vec::new(),
                }
            }
        };
        debug!(
            event = "profile_analyzed",
            matches = report.combined.as_ref().map(|e| e.matching_count),
            conflicts = report.conflicts.len(),
            suggestions = report.suggestions.len(),
        );
        report
    }

    fn gates(&self, profile: &CriteriaProfile) -> EstimateResult<(Vec<SelectivityEstimate>, u64)> {
        let estimator = self.estimator();
        let total = estimator.candidates()?;
        Ok((estimator.hard_estimates(profile)?, total))
    }
}

/// Result of [`ProfileAdvisor::analyze`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileReport {
    /// Expected survivors of every hard gate. `None` when the statistics
    /// cannot support an estimate.
    pub combined: Option<SelectivityEstimate>,
    /// Expected survivors at the profile's own strictness, when below 1.0.
    pub at_strictness: Option<SelectivityEstimate>,
    pub conflicts: Vec<Conflict>,
    pub suggestions: Vec<StrictnessSuggestion>,
}

impl ProfileReport {
    /// Predicted result count at the profile's strictness.
    pub fn expected_matches(&self) -> Option<u64> {
        self.at_strictness
            .as_ref()
            .or(self.combined.as_ref())
            .map(|e| e.matching_count)
    }

    pub fn worst_severity(&self) -> Option<Severity> {
        self.conflicts.iter().map(|c| c.severity).max()
    }

    pub fn has_errors(&self) -> bool {
        self.conflicts.iter().any(Conflict::is_error)
    }
}

impl fmt::Display for ProfileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.at_strictness.as_ref().or(self.combined.as_ref()) {
            Some(estimate) => writeln!(f, "Expected matches: {estimate}")?,
            None => writeln!(f, "Expected matches: unknown")?,
        }
        for conflict in &self.conflicts {
            writeln!(f, "{conflict}")?;
        }
        for suggestion in &self.suggestions {
            writeln!(f, "Try: {suggestion}")?;
        }
        Ok(())
    }
}
