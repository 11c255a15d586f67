//! Tests for selectivity estimation and strictness.

use landingzone_config::StrictnessConfig;
use landingzone_core::{Attribute, CriterionId, FloatRange, Importance, LogicMode, WorldStats};
use landingzone_test::synthetic::synthetic_world;
use landingzone_test::{sample_world, uniform_world, ProfileBuilder, SAMPLE_CANDIDATES};

use crate::strictness::{at_least_k_of, required_gates};
use crate::{
    combine, estimate_at_strictness, suggest_strictness, EstimateError, MatchCategory,
    SelectivityEstimate, SelectivityEstimator,
};

fn gate(p: f64, total: u64) -> SelectivityEstimate {
    SelectivityEstimate::from_fraction(None, p, total, Importance::MustHave, true)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// SelectivityEstimate / combine
// ============================================================================

mod estimate_tests {
    use super::*;

    #[test]
    fn test_combined_product() {
        let parts = [gate(0.5, 1000), gate(0.4, 1000), gate(0.2, 1000)];
        let combined = combine(&parts, 1000);
        assert_eq!(combined.matching_count, 40);
        assert!(close(combined.selectivity, 0.04));
        assert!(!combined.is_exact);
        assert_eq!(combined.criterion, None);
    }

    #[test]
    fn test_combine_empty_keeps_everything() {
        let combined = combine(&[], 500);
        assert_eq!(combined.matching_count, 500);
        assert!(combined.is_exact);
    }

    #[test]
    fn test_combine_single_keeps_exactness() {
        assert!(combine(&[gate(0.3, 100)], 100).is_exact);
    }

    #[test]
    fn test_from_fraction_clamps() {
        assert_eq!(gate(1.7, 100).matching_count, 100);
        assert_eq!(gate(-0.2, 100).matching_count, 0);
        assert_eq!(gate(f64::NAN, 100).selectivity, 0.0);
    }

    #[test]
    fn test_from_counts() {
        let e = SelectivityEstimate::from_counts(None, 25, 200, Importance::MustHave);
        assert!(close(e.selectivity, 0.125));
        assert!(e.is_exact);
        let capped = SelectivityEstimate::from_counts(None, 300, 200, Importance::MustHave);
        assert_eq!(capped.matching_count, 200);
    }

    #[test]
    fn test_complement() {
        let e = gate(0.25, 1000).complement();
        assert_eq!(e.matching_count, 750);
    }

    #[test]
    fn test_display_marks_heuristic() {
        let exact = gate(0.5, 10);
        let heuristic = combine(&[gate(0.5, 10), gate(0.5, 10)], 10);
        assert_eq!(exact.to_string(), "5 of 10 (50.00%)");
        assert!(heuristic.to_string().starts_with('~'));
    }
}

// ============================================================================
// SelectivityEstimator
// ============================================================================

mod estimator_tests {
    use super::*;

    #[test]
    fn test_range_integrates_histogram() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let e = estimator
            .estimate_range(Attribute::Rainfall, &FloatRange::new(0.0, 600.0), Importance::MustHave)
            .unwrap();
        assert_eq!(e.matching_count, 1000);
        assert_eq!(e.total_count, SAMPLE_CANDIDATES);
        assert!(!e.is_exact);
        assert_eq!(e.criterion, Some(CriterionId::Range(Attribute::Rainfall)));
    }

    #[test]
    fn test_range_partial_bin() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let e = estimator
            .estimate_range(Attribute::Rainfall, &FloatRange::new(0.0, 300.0), Importance::MustHave)
            .unwrap();
        assert_eq!(e.matching_count, 500);
    }

    #[test]
    fn test_range_must_not_have_is_complement() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let e = estimator
            .estimate_range(Attribute::Rainfall, &FloatRange::new(0.0, 600.0), Importance::MustNotHave)
            .unwrap();
        assert_eq!(e.matching_count, 9000);
        assert_eq!(e.importance, Importance::MustNotHave);
    }

    #[test]
    fn test_or_on_single_valued_sums() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let e = estimator
            .estimate_items(Attribute::Hilliness, &["Flat", "Small Hills"], Importance::MustHave, LogicMode::Or)
            .unwrap();
        assert_eq!(e.matching_count, 5500);
        assert!(e.is_exact);
    }

    #[test]
    fn test_and_on_single_valued_is_zero() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let e = estimator
            .estimate_items(Attribute::Hilliness, &["Flat", "Mountainous"], Importance::MustHave, LogicMode::And)
            .unwrap();
        assert_eq!(e.matching_count, 0);
    }

    #[test]
    fn test_duplicate_items_count_once() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let e = estimator
            .estimate_items(Attribute::Hilliness, &["Flat", "Flat"], Importance::MustHave, LogicMode::And)
            .unwrap();
        assert_eq!(e.matching_count, 3000);
        assert_eq!(e.criterion, Some(CriterionId::Item(Attribute::Hilliness, "Flat".into())));
    }

    #[test]
    fn test_and_on_multi_valued_multiplies() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let e = estimator
            .estimate_items(Attribute::Stone, &["Granite", "Marble"], Importance::MustHave, LogicMode::And)
            .unwrap();
        assert_eq!(e.matching_count, 1575);
        assert!(!e.is_exact);
    }

    #[test]
    fn test_or_on_multi_valued_is_union() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let e = estimator
            .estimate_items(Attribute::Stone, &["Granite", "Marble"], Importance::MustHave, LogicMode::Or)
            .unwrap();
        assert_eq!(e.matching_count, 6425);
    }

    #[test]
    fn test_must_not_have_items_excludes_all() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        // The combinator is irrelevant when excluding.
        let e = estimator
            .estimate_items(Attribute::Biome, &["Desert", "Tundra"], Importance::MustNotHave, LogicMode::And)
            .unwrap();
        assert_eq!(e.matching_count, 7800);
    }

    #[test]
    fn test_unknown_item_has_zero_frequency() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let e = estimator
            .estimate_items(Attribute::Biome, &["Sea Ice"], Importance::MustHave, LogicMode::And)
            .unwrap();
        assert_eq!(e.matching_count, 0);
    }

    #[test]
    fn test_flag_prevalence() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let e = estimator.estimate_flag(Attribute::Coastal, Importance::MustHave).unwrap();
        assert_eq!(e.matching_count, 1800);
        assert!(e.is_exact);
        let not = estimator.estimate_flag(Attribute::Coastal, Importance::MustNotHave).unwrap();
        assert_eq!(not.matching_count, 8200);
    }

    #[test]
    fn test_missing_statistics() {
        let stats = uniform_world(1000);
        let estimator = SelectivityEstimator::new(&stats);
        let err = estimator
            .estimate_items(Attribute::Hilliness, &["Flat"], Importance::MustHave, LogicMode::And)
            .unwrap_err();
        assert_eq!(err, EstimateError::MissingStatistics(Attribute::Hilliness));
        assert!(estimator.estimate_flag(Attribute::Landmark, Importance::MustHave).is_err());
    }

    #[test]
    fn test_empty_candidate_space() {
        let stats = WorldStats::new(0, 0);
        let estimator = SelectivityEstimator::new(&stats);
        assert_eq!(
            estimator.estimate_combined(&ProfileBuilder::new().build()),
            Err(EstimateError::EmptyCandidateSpace)
        );
    }

    #[test]
    fn test_estimate_criterion() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let profile = ProfileBuilder::new()
            .item(Attribute::Stone, "Slate", Importance::Priority)
            .build();

        let id = CriterionId::Item(Attribute::Stone, "Slate".into());
        let e = estimator.estimate_criterion(&profile, &id).unwrap();
        assert_eq!(e.matching_count, 4000);
        assert_eq!(e.importance, Importance::Priority);

        let ignored = CriterionId::Flag(Attribute::Coastal);
        assert_eq!(
            estimator.estimate_criterion(&profile, &ignored),
            Err(EstimateError::Inactive(ignored.clone()))
        );
    }

    #[test]
    fn test_hard_estimates_one_per_gate() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let profile = ProfileBuilder::new()
            .range(Attribute::Rainfall, 0.0, 3000.0, Importance::MustHave)
            .item(Attribute::Stone, "Granite", Importance::MustHave)
            .item(Attribute::Stone, "Marble", Importance::MustHave)
            .item(Attribute::Biome, "Desert", Importance::MustNotHave)
            .flag(Attribute::Coastal, Importance::Preferred)
            .build();

        let gates = estimator.hard_estimates(&profile).unwrap();
        assert_eq!(gates.len(), 3);
        let without_stone = estimator
            .hard_estimates_excluding(&profile, &[Attribute::Stone])
            .unwrap();
        assert_eq!(without_stone.len(), 2);
    }

    #[test]
    fn test_combined_ignores_soft_tiers() {
        let stats = sample_world();
        let estimator = SelectivityEstimator::new(&stats);
        let profile = ProfileBuilder::new()
            .range(Attribute::Rainfall, 0.0, 3000.0, Importance::MustHave)
            .flag(Attribute::Coastal, Importance::MustHave)
            .item(Attribute::Stone, "Marble", Importance::Priority)
            .build();

        let combined = estimator.estimate_combined(&profile).unwrap();
        assert_eq!(combined.matching_count, 900);
    }

    #[test]
    fn test_synthetic_world_is_self_consistent() {
        let stats = synthetic_world(7, 2_000);
        let estimator = SelectivityEstimator::new(&stats);
        let candidates = estimator.candidates().unwrap();

        let everything = estimator
            .estimate_range(Attribute::Pollution, &FloatRange::new(0.0, 1.0), Importance::MustHave)
            .unwrap();
        assert_eq!(everything.matching_count, candidates);

        let any_hilliness = estimator
            .estimate_items(
                Attribute::Hilliness,
                &["Flat", "Small Hills", "Large Hills", "Mountainous"],
                Importance::MustHave,
                LogicMode::Or,
            )
            .unwrap();
        assert_eq!(any_hilliness.matching_count, candidates);
    }
}

// ============================================================================
// Workspaces
// ============================================================================

mod workspace_tests {
    use landingzone_clauses::Workspace;
    use landingzone_core::{CriteriaProfile, Tier};

    use super::*;

    fn hilliness(name: &str) -> CriterionId {
        CriterionId::Item(Attribute::Hilliness, name.into())
    }

    /// Puts `criterion` in a fresh `MustHave` clause of its own.
    fn or_clause(ws: &mut Workspace, criterion: CriterionId) {
        let chip = ws.add_criterion(criterion, Tier::MustHave, "");
        let clause = ws.add_clause(Tier::MustHave);
        ws.move_chip_to_clause(chip, clause);
    }

    #[test]
    fn test_empty_workspace_keeps_everything() {
        let stats = sample_world();
        let e = SelectivityEstimator::new(&stats)
            .estimate_workspace(&Workspace::new(), &CriteriaProfile::new())
            .unwrap();
        assert_eq!(e.matching_count, SAMPLE_CANDIDATES);
        assert!(e.is_exact);
    }

    #[test]
    fn test_clauses_of_one_attribute_add_up() {
        let stats = sample_world();
        let mut ws = Workspace::new();
        ws.add_criterion(hilliness("Flat"), Tier::MustHave, "");
        or_clause(&mut ws, hilliness("Mountainous"));

        let e = SelectivityEstimator::new(&stats)
            .estimate_workspace(&ws, &CriteriaProfile::new())
            .unwrap();
        assert_eq!(e.matching_count, 5000);
        assert_eq!(e.criterion, None);
        assert!(!e.is_exact);
    }

    #[test]
    fn test_overlapping_clauses_count_once() {
        let stats = sample_world();
        let profile = ProfileBuilder::new()
            .range(Attribute::Rainfall, 0.0, 3000.0, Importance::MustHave)
            .build();
        let mut ws = Workspace::load_from(&profile);
        or_clause(&mut ws, CriterionId::Flag(Attribute::Coastal));

        // 0.5 + 0.18 - 0.5 * 0.18
        let e = SelectivityEstimator::new(&stats)
            .estimate_workspace(&ws, &profile)
            .unwrap();
        assert_eq!(e.matching_count, 5900);
    }

    #[test]
    fn test_must_not_have_clause_removes_its_share() {
        let stats = sample_world();
        let mut ws = Workspace::new();
        ws.add_criterion(hilliness("Flat"), Tier::MustHave, "");
        ws.add_criterion(CriterionId::Flag(Attribute::Coastal), Tier::MustNotHave, "");

        let e = SelectivityEstimator::new(&stats)
            .estimate_workspace(&ws, &CriteriaProfile::new())
            .unwrap();
        assert_eq!(e.matching_count, 2460);
    }

    #[test]
    fn test_or_group_inside_a_clause() {
        let stats = sample_world();
        let mut ws = Workspace::new();
        let flat = ws.add_criterion(hilliness("Flat"), Tier::MustHave, "");
        let coastal = ws.add_criterion(CriterionId::Flag(Attribute::Coastal), Tier::MustHave, "");
        ws.add_criterion(
            CriterionId::Item(Attribute::Stone, "Granite".into()),
            Tier::MustHave,
            "",
        );
        ws.create_or_group(&[flat, coastal]).unwrap();

        // (1 - 0.7 * 0.82) * 0.45
        let e = SelectivityEstimator::new(&stats)
            .estimate_workspace(&ws, &CriteriaProfile::new())
            .unwrap();
        assert_eq!(e.matching_count, 1917);
    }

    #[test]
    fn test_range_chip_needs_profile_bounds() {
        let stats = sample_world();
        let mut ws = Workspace::new();
        ws.add_criterion(CriterionId::Range(Attribute::Rainfall), Tier::MustHave, "");

        assert_eq!(
            SelectivityEstimator::new(&stats).estimate_workspace(&ws, &CriteriaProfile::new()),
            Err(EstimateError::Inactive(CriterionId::Range(Attribute::Rainfall)))
        );
    }
}

// ============================================================================
// Strictness
// ============================================================================

mod strictness_tests {
    use super::*;

    #[test]
    fn test_required_gates() {
        assert_eq!(required_gates(1.0, 3), 3);
        assert_eq!(required_gates(2.0 / 3.0, 3), 2);
        assert_eq!(required_gates(0.5, 3), 2);
        assert_eq!(required_gates(0.0, 3), 0);
        assert_eq!(required_gates(f64::NAN, 4), 4);
    }

    #[test]
    fn test_at_least_k_of() {
        let ps = [0.5, 0.5, 0.5];
        assert!(close(at_least_k_of(&ps, 0), 1.0));
        assert!(close(at_least_k_of(&ps, 1), 0.875));
        assert!(close(at_least_k_of(&ps, 2), 0.5));
        assert!(close(at_least_k_of(&ps, 3), 0.125));
        assert_eq!(at_least_k_of(&ps, 4), 0.0);
    }

    #[test]
    fn test_full_strictness_is_exact_product() {
        let gates = [gate(0.5, 1000), gate(0.4, 1000), gate(0.2, 1000)];
        let e = estimate_at_strictness(&gates, 1.0, 1000);
        assert_eq!(e.matching_count, 40);
    }

    #[test]
    fn test_relaxed_strictness_raises_estimate() {
        let gates = [gate(0.5, 1000), gate(0.4, 1000), gate(0.2, 1000)];
        let strict = estimate_at_strictness(&gates, 1.0, 1000);
        let relaxed = estimate_at_strictness(&gates, 0.6, 1000);
        assert!(relaxed.matching_count > strict.matching_count);
        assert!(!relaxed.is_exact);
        // Exactly two: .16 + .06 + .04, all three: .04.
        assert_eq!(relaxed.matching_count, 300);
    }

    #[test]
    fn test_no_gates_keeps_everything() {
        assert_eq!(estimate_at_strictness(&[], 0.5, 123).matching_count, 123);
    }

    #[test]
    fn test_suggestions_skip_current() {
        let gates = [gate(0.5, 1000), gate(0.4, 1000), gate(0.2, 1000)];
        let config = StrictnessConfig::default();
        for current in [1.0, 2.0 / 3.0, 1.0 / 3.0, 0.665] {
            for s in suggest_strictness(&gates, current, 1000, &config) {
                assert!((s.strictness - current).abs() > config.epsilon);
            }
        }
    }

    #[test]
    fn test_suggestions_sorted_by_distance() {
        let gates: Vec<_> = (0..4).map(|_| gate(0.5, 10_000)).collect();
        let config = StrictnessConfig::default();
        let suggestions = suggest_strictness(&gates, 0.5, 10_000, &config);
        let values: Vec<f64> = suggestions.iter().map(|s| s.strictness).collect();
        // 0.25 and 0.75 tie; the relaxed one comes first.
        assert_eq!(values, vec![0.25, 0.75, 1.0]);
        assert_eq!(suggestions[0].required, 1);
        assert_eq!(suggestions[0].total_criteria, 4);
    }

    #[test]
    fn test_suggestions_capped() {
        let gates: Vec<_> = (0..8).map(|_| gate(0.5, 1000)).collect();
        let config = StrictnessConfig::default();
        assert_eq!(suggest_strictness(&gates, 1.0, 1000, &config).len(), 3);

        let config = StrictnessConfig {
            max_suggestions: 5,
            ..StrictnessConfig::default()
        };
        assert_eq!(suggest_strictness(&gates, 1.0, 1000, &config).len(), 5);
    }

    #[test]
    fn test_suggestion_category_and_apply() {
        let gates = [gate(0.5, 1000), gate(0.4, 1000), gate(0.2, 1000)];
        let suggestions = suggest_strictness(&gates, 1.0, 1000, &StrictnessConfig::default());
        let first = &suggestions[0];
        assert!(close(first.strictness, 2.0 / 3.0));
        assert_eq!(first.expected_matches, 300);
        assert_eq!(first.category, MatchCategory::VeryHigh);
        assert!(first.description.contains("2 of 3"));

        let mut profile = ProfileBuilder::new().build();
        first.apply(&mut profile);
        assert!(close(profile.strictness(), 2.0 / 3.0));
    }

    #[test]
    fn test_match_category_thresholds() {
        let t = StrictnessConfig::default().categories;
        assert_eq!(MatchCategory::from_expected(5000.0, &t), MatchCategory::Guaranteed);
        assert_eq!(MatchCategory::from_expected(250.0, &t), MatchCategory::VeryHigh);
        assert_eq!(MatchCategory::from_expected(60.0, &t), MatchCategory::High);
        assert_eq!(MatchCategory::from_expected(10.0, &t), MatchCategory::Medium);
        assert_eq!(MatchCategory::from_expected(1.0, &t), MatchCategory::Low);
        assert_eq!(MatchCategory::from_expected(0.4, &t), MatchCategory::VeryLow);
    }
}
