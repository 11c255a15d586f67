//! Tests for the conflict rules.

use landingzone_clauses::Workspace;
use landingzone_config::AdvisorConfig;
use landingzone_core::{Attribute, CriteriaProfile, CriterionId, Importance, LogicMode, Tier};
use landingzone_test::{sample_world, uniform_world, ProfileBuilder};

use super::*;

fn detect(profile: &CriteriaProfile) -> Vec<Conflict> {
    let stats = sample_world();
    let config = AdvisorConfig::default();
    ConflictDetector::new(&stats, &config).detect(profile)
}

fn detect_ws(ws: &Workspace, profile: &CriteriaProfile) -> Vec<Conflict> {
    let stats = sample_world();
    let config = AdvisorConfig::default();
    ConflictDetector::new(&stats, &config).detect_in_workspace(ws, profile)
}

fn with_severity(conflicts: &[Conflict], severity: Severity) -> Vec<&Conflict> {
    conflicts.iter().filter(|c| c.severity == severity).collect()
}

fn rainfall_profile(max: f64) -> CriteriaProfile {
    ProfileBuilder::new()
        .range(Attribute::Rainfall, 0.0, max, Importance::MustHave)
        .build()
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn test_empty_profile_has_no_conflicts() {
    assert!(detect(&CriteriaProfile::new()).is_empty());
}

#[test]
fn test_severity_order() {
    assert!(Severity::Info < Severity::Warning);
    assert!(Severity::Warning < Severity::Error);
}

#[test]
fn test_conflict_display() {
    let c = Conflict::new(
        Severity::Warning,
        ConflictOrigin::Tier(Tier::MustHave),
        "Too strict",
        "Relax it",
    );
    assert_eq!(c.to_string(), "[Warning] Too strict (Relax it)");
    assert_eq!(c.origin.tier(), Some(Tier::MustHave));
    assert!(!c.is_error());
}

// ============================================================================
// Rule 1: exclusive conjunction
// ============================================================================

#[test]
fn test_two_and_ed_single_valued_items_is_one_error() {
    let profile = ProfileBuilder::new()
        .item(Attribute::Hilliness, "Flat", Importance::MustHave)
        .item(Attribute::Hilliness, "Mountainous", Importance::MustHave)
        .build();

    let conflicts = detect(&profile);
    assert_eq!(conflicts.len(), 1, "{conflicts:?}");
    assert_eq!(conflicts[0].severity, Severity::Error);
    assert_eq!(conflicts[0].origin, ConflictOrigin::Tier(Tier::MustHave));
    assert!(conflicts[0].message.contains("Hilliness"));
}

#[test]
fn test_or_ed_single_valued_items_are_fine() {
    let profile = ProfileBuilder::new()
        .item(Attribute::Hilliness, "Flat", Importance::MustHave)
        .item(Attribute::Hilliness, "Mountainous", Importance::MustHave)
        .mode(Attribute::Hilliness, LogicMode::Or)
        .build();
    assert!(detect(&profile).is_empty());
}

#[test]
fn test_multi_valued_items_may_be_and_ed() {
    let profile = ProfileBuilder::new()
        .item(Attribute::Stone, "Granite", Importance::MustHave)
        .item(Attribute::Stone, "Marble", Importance::MustHave)
        .build();
    assert!(with_severity(&detect(&profile), Severity::Error).is_empty());
}

#[test]
fn test_exclusive_conjunction_in_clause() {
    let profile = ProfileBuilder::new()
        .item(Attribute::Biome, "Desert", Importance::MustHave)
        .item(Attribute::Biome, "Tundra", Importance::MustHave)
        .build();
    let ws = Workspace::load_from(&profile);
    let clause = ws.clauses_in_bucket(Tier::MustHave)[0].id();

    let conflicts = detect_ws(&ws, &profile);
    assert_eq!(conflicts.len(), 1, "{conflicts:?}");
    assert_eq!(conflicts[0].severity, Severity::Error);
    assert_eq!(conflicts[0].origin, ConflictOrigin::Clause(Tier::MustHave, clause));
    assert_eq!(conflicts[0].origin.tier(), Some(Tier::MustHave));
}

#[test]
fn test_or_group_satisfies_exclusive_attribute() {
    let profile = ProfileBuilder::new()
        .item(Attribute::Biome, "Desert", Importance::MustHave)
        .item(Attribute::Biome, "Tundra", Importance::MustHave)
        .build();
    let mut ws = Workspace::load_from(&profile);
    let ids: Vec<_> = ws.chips_in_bucket(Tier::MustHave).iter().map(|c| c.id()).collect();
    ws.create_or_group(&ids).unwrap();

    let mut synced = profile.clone();
    ws.sync_to(&mut synced);
    assert!(detect_ws(&ws, &synced).is_empty());
}

#[test]
fn test_separate_clauses_are_not_exclusive() {
    let profile = ProfileBuilder::new()
        .item(Attribute::Biome, "Desert", Importance::MustHave)
        .item(Attribute::Biome, "Tundra", Importance::MustHave)
        .build();
    let mut ws = Workspace::load_from(&profile);
    let tundra = ws
        .find_chip_by_criterion(&CriterionId::Item(Attribute::Biome, "Tundra".into()))
        .unwrap()
        .id();
    let second = ws.add_clause(Tier::MustHave);
    ws.move_chip_to_clause(tundra, second);

    // Desert (1200) or Tundra (1000)
    let conflicts = detect_ws(&ws, &profile);
    assert!(conflicts.is_empty(), "{conflicts:?}");
}

#[test]
fn test_restrictiveness_judges_union_of_clauses() {
    let profile = ProfileBuilder::new()
        .item(Attribute::MapFeature, "Hot Springs", Importance::MustHave)
        .item(Attribute::MapFeature, "Archean Trees", Importance::MustHave)
        .build();
    let mut ws = Workspace::load_from(&profile);
    let trees = ws
        .find_chip_by_criterion(&CriterionId::Item(Attribute::MapFeature, "Archean Trees".into()))
        .unwrap()
        .id();
    let second = ws.add_clause(Tier::MustHave);
    ws.move_chip_to_clause(trees, second);

    // about 50 tiles have either feature
    let conflicts = detect_ws(&ws, &profile);
    assert_eq!(conflicts.len(), 1, "{conflicts:?}");
    assert_eq!(conflicts[0].severity, Severity::Error);
    assert_eq!(conflicts[0].origin, ConflictOrigin::Tier(Tier::MustHave));
    assert!(conflicts[0].message.starts_with("Only about"));
}

// ============================================================================
// Rule 2: contradictory ranges
// ============================================================================

#[test]
fn test_min_temperature_above_max_temperature() {
    let profile = ProfileBuilder::new()
        .range(Attribute::MinimumTemperature, 10.0, 20.0, Importance::MustHave)
        .range(Attribute::MaximumTemperature, -10.0, 5.0, Importance::MustHave)
        .build();
    let conflicts = detect(&profile);
    assert!(conflicts.iter().any(|c| c.is_error()
        && c.origin == ConflictOrigin::Criterion(CriterionId::Range(Attribute::MinimumTemperature))));
}

#[test]
fn test_average_outside_extremes() {
    let profile = ProfileBuilder::new()
        .range(Attribute::AverageTemperature, 30.0, 40.0, Importance::MustHave)
        .range(Attribute::MaximumTemperature, 0.0, 20.0, Importance::MustHave)
        .build();
    let conflicts = detect(&profile);
    assert!(conflicts.iter().any(|c| c.is_error()
        && c.origin == ConflictOrigin::Criterion(CriterionId::Range(Attribute::AverageTemperature))));
}

#[test]
fn test_unreachable_growing_season() {
    let profile = ProfileBuilder::new()
        .range(Attribute::MinimumTemperature, -40.0, -30.0, Importance::MustHave)
        .range(Attribute::MaximumTemperature, 0.0, 10.0, Importance::MustHave)
        .range(Attribute::GrowingDays, 50.0, 60.0, Importance::MustHave)
        .build();
    let growing = ConflictOrigin::Criterion(CriterionId::Range(Attribute::GrowingDays));
    assert!(detect(&profile)
        .iter()
        .any(|c| c.is_error() && c.origin == growing));
}

#[test]
fn test_reachable_growing_season() {
    let profile = ProfileBuilder::new()
        .range(Attribute::MinimumTemperature, 8.0, 15.0, Importance::MustHave)
        .range(Attribute::MaximumTemperature, 25.0, 35.0, Importance::MustHave)
        .range(Attribute::GrowingDays, 55.0, 60.0, Importance::MustHave)
        .build();
    let growing = ConflictOrigin::Criterion(CriterionId::Range(Attribute::GrowingDays));
    assert!(!detect(&profile).iter().any(|c| c.origin == growing));
}

#[test]
fn test_soft_ranges_never_contradict() {
    let profile = ProfileBuilder::new()
        .range(Attribute::MinimumTemperature, 10.0, 20.0, Importance::Priority)
        .range(Attribute::MaximumTemperature, -10.0, 5.0, Importance::Priority)
        .build();
    assert!(detect(&profile).is_empty());
}

#[test]
fn test_unlikely_pair_is_info() {
    let profile = ProfileBuilder::new()
        .range(Attribute::Rainfall, 2500.0, 4000.0, Importance::MustHave)
        .range(Attribute::PlantDensity, 0.0, 0.2, Importance::MustHave)
        .build();
    let infos: Vec<_> = detect(&profile)
        .into_iter()
        .filter(|c| c.severity == Severity::Info)
        .collect();
    assert_eq!(infos.len(), 1);
    assert_eq!(
        infos[0].origin,
        ConflictOrigin::Criterion(CriterionId::Range(Attribute::Rainfall))
    );
}

// ============================================================================
// Rule 3: restrictiveness
// ============================================================================

#[test]
fn test_restrictiveness_thresholds() {
    // Rainfall is uniform over 0–6000 across 10,000 candidates.
    let error = detect(&rainfall_profile(30.0));
    assert_eq!(error.len(), 1);
    assert_eq!(error[0].severity, Severity::Error);
    assert_eq!(error[0].origin, ConflictOrigin::Tier(Tier::MustHave));

    let warning = detect(&rainfall_profile(180.0));
    assert_eq!(warning.len(), 1);
    assert_eq!(warning[0].severity, Severity::Warning);

    assert!(detect(&rainfall_profile(360.0)).is_empty());
}

#[test]
fn test_restrictiveness_uses_config() {
    let stats = sample_world();
    let config = AdvisorConfig::default().with_restrictiveness(10, 20);
    let conflicts = ConflictDetector::new(&stats, &config).detect(&rainfall_profile(30.0));
    assert!(conflicts.is_empty());
}

#[test]
fn test_must_not_have_counts_toward_restrictiveness() {
    let profile = ProfileBuilder::new()
        .range(Attribute::Rainfall, 30.0, 6000.0, Importance::MustNotHave)
        .build();
    let conflicts = detect(&profile);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].severity, Severity::Error);
}

#[test]
fn test_fallback_counts_hard_criteria() {
    // No category or flag statistics: estimation fails.
    let stats = uniform_world(10_000);
    let config = AdvisorConfig::default();
    let detector = ConflictDetector::new(&stats, &config);

    let mut builder = ProfileBuilder::new();
    for stone in ["Granite", "Limestone", "Marble", "Sandstone", "Slate"] {
        builder = builder.item(Attribute::Stone, stone, Importance::MustHave);
    }
    let six = builder.clone().flag(Attribute::Coastal, Importance::MustHave).build();
    assert!(detector.detect(&six).is_empty());

    let seven = builder
        .flag(Attribute::Coastal, Importance::MustHave)
        .flag(Attribute::Landmark, Importance::MustNotHave)
        .build();
    let conflicts = detector.detect(&seven);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].severity, Severity::Warning);
    assert!(conflicts[0].message.starts_with("7 hard criteria"));
}

// ============================================================================
// Rule 4: rare features
// ============================================================================

#[test]
fn test_two_ultra_rare_features_is_error() {
    let profile = ProfileBuilder::new()
        .item(Attribute::MapFeature, "Hot Springs", Importance::MustHave)
        .item(Attribute::MapFeature, "Archean Trees", Importance::MustHave)
        .build();
    let errors: Vec<_> = detect(&profile)
        .into_iter()
        .filter(|c| c.is_error() && c.message.contains("ultra-rare"))
        .collect();
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_or_ed_rare_features_are_fine() {
    let profile = ProfileBuilder::new()
        .item(Attribute::MapFeature, "Hot Springs", Importance::MustHave)
        .item(Attribute::MapFeature, "Archean Trees", Importance::MustHave)
        .mode(Attribute::MapFeature, LogicMode::Or)
        .build();
    assert!(!detect(&profile)
        .iter()
        .any(|c| c.message.contains("ultra-rare")));
}

#[test]
fn test_one_rare_feature_with_common_ones() {
    let profile = ProfileBuilder::new()
        .item(Attribute::MapFeature, "Hot Springs", Importance::MustHave)
        .item(Attribute::MapFeature, "Caves", Importance::MustHave)
        .build();
    assert!(!detect(&profile)
        .iter()
        .any(|c| c.message.contains("ultra-rare")));
}

fn four_features() -> CriteriaProfile {
    let mut builder = ProfileBuilder::new();
    for feature in ["Caves", "Mixed Biome", "Fertile Soil", "Wetland"] {
        builder = builder.item(Attribute::MapFeature, feature, Importance::MustHave);
    }
    builder.build()
}

#[test]
fn test_many_and_ed_features_is_warning() {
    let warnings: Vec<_> = detect(&four_features())
        .into_iter()
        .filter(|c| c.severity == Severity::Warning && c.message.contains("map features"))
        .collect();
    assert_eq!(warnings.len(), 1);
}

#[test]
fn test_or_group_counts_as_one_feature() {
    let profile = four_features();
    let mut ws = Workspace::load_from(&profile);
    let chips: Vec<_> = ws
        .chips_in_bucket(Tier::MustHave)
        .iter()
        .take(2)
        .map(|c| c.id())
        .collect();

    let before = detect_ws(&ws, &profile);
    assert!(before.iter().any(|c| c.message.contains("4 map features")));

    ws.create_or_group(&chips).unwrap();
    let after = detect_ws(&ws, &profile);
    assert!(!after.iter().any(|c| c.message.contains("map features are required")));
}
