use landingzone_config::AdvisorConfig;
use landingzone_core::{Attribute, CriteriaProfile, CriterionId, FloatRange, Importance, Tier};
use tracing::warn;

use crate::climate;
use crate::error::EstimateResult;
use crate::estimate::SelectivityEstimate;
use crate::estimator::SelectivityEstimator;

use super::{Conflict, ConflictOrigin, Severity};

/// One AND-ed requirement made of items of a single attribute, any of which
/// satisfies it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ItemTerm<'a> {
    pub attribute: Attribute,
    pub names: Vec<&'a str>,
}

impl<'a> ItemTerm<'a> {
    pub fn new(attribute: Attribute, names: Vec<&'a str>) -> Self {
        Self { attribute, names }
    }

    fn describe(&self) -> String {
        self.names.join(" or ")
    }
}

// ============================================================================
// Rule 1: exclusive conjunction
// ============================================================================

/// Flags AND-ed terms over one single-valued attribute. Returns the flagged
/// attributes.
pub(crate) fn exclusive_conjunction(
    terms: &[ItemTerm<'_>],
    origin: &ConflictOrigin,
    out: &mut Vec<Conflict>,
) -> Vec<Attribute> {
    let mut flagged = Vec::new();
    for attribute in Attribute::ALL {
        if !attribute.is_single_valued() {
            continue;
        }
        let of_attribute: Vec<&ItemTerm<'_>> =
            terms.iter().filter(|t| t.attribute == attribute).collect();
        if of_attribute.len() < 2 {
            continue;
        }
        let values = of_attribute
            .iter()
            .map(|t| t.describe())
            .collect::<Vec<_>>()
            .join(", ");
        out.push(Conflict::new(
            Severity::Error,
            origin.clone(),
            format!(
                "{attribute} requires {} values at once ({values}), but a tile has only one",
                of_attribute.len()
            ),
            format!("Combine the {attribute} values with OR, or keep just one"),
        ));
        flagged.push(attribute);
    }
    flagged
}

// ============================================================================
// Rule 2: contradictory numeric ranges
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Side {
    /// The whole required range is at or above the value.
    AtLeast(f64),
    /// The whole required range is at or below the value.
    AtMost(f64),
}

impl Side {
    fn holds(self, range: &FloatRange) -> bool {
        match self {
            Side::AtLeast(v) => range.min >= v,
            Side::AtMost(v) => range.max <= v,
        }
    }
}

/// Pairs of requirements that rarely occur together in generated worlds.
const UNLIKELY_PAIRS: [(Attribute, Side, Attribute, Side, &str); 5] = [
    (
        Attribute::Rainfall,
        Side::AtLeast(2000.0),
        Attribute::PlantDensity,
        Side::AtMost(0.3),
        "very wet tiles are almost always densely vegetated",
    ),
    (
        Attribute::Elevation,
        Side::AtLeast(2000.0),
        Attribute::GrowingDays,
        Side::AtLeast(40.0),
        "high tiles rarely have long growing seasons",
    ),
    (
        Attribute::AverageTemperature,
        Side::AtMost(0.0),
        Attribute::AnimalDensity,
        Side::AtLeast(3.0),
        "cold tiles rarely support dense wildlife",
    ),
    (
        Attribute::Rainfall,
        Side::AtMost(300.0),
        Attribute::Swampiness,
        Side::AtLeast(0.5),
        "dry tiles are rarely swampy",
    ),
    (
        Attribute::GrowingDays,
        Side::AtMost(20.0),
        Attribute::Forageability,
        Side::AtLeast(0.7),
        "short growing seasons leave little to forage",
    ),
];

fn required_range(profile: &CriteriaProfile, attribute: Attribute) -> Option<FloatRange> {
    profile
        .range(attribute)
        .filter(|c| c.importance == Importance::MustHave)
        .map(|c| c.range)
}

fn range_origin(attribute: Attribute) -> ConflictOrigin {
    ConflictOrigin::Criterion(CriterionId::Range(attribute))
}

pub(crate) fn contradictory_ranges(profile: &CriteriaProfile, out: &mut Vec<Conflict>) {
    let min_temp = required_range(profile, Attribute::MinimumTemperature);
    let max_temp = required_range(profile, Attribute::MaximumTemperature);
    let avg_temp = required_range(profile, Attribute::AverageTemperature);
    let mut ordering_broken = false;

    if let (Some(lo), Some(hi)) = (min_temp, max_temp) {
        if lo.min > hi.max {
            ordering_broken = true;
            out.push(Conflict::new(
                Severity::Error,
                range_origin(Attribute::MinimumTemperature),
                format!(
                    "Minimum temperature of at least {}°C is above a maximum temperature of at most {}°C",
                    lo.min, hi.max
                ),
                "Lower the minimum temperature or raise the maximum temperature",
            ));
        }
    }
    if let (Some(avg), Some(lo)) = (avg_temp, min_temp) {
        if avg.max < lo.min {
            ordering_broken = true;
            out.push(Conflict::new(
                Severity::Error,
                range_origin(Attribute::AverageTemperature),
                format!(
                    "Average temperature of at most {}°C is below a minimum temperature of at least {}°C",
                    avg.max, lo.min
                ),
                "Widen the average or minimum temperature range",
            ));
        }
    }
    if let (Some(avg), Some(hi)) = (avg_temp, max_temp) {
        if avg.min > hi.max {
            ordering_broken = true;
            out.push(Conflict::new(
                Severity::Error,
                range_origin(Attribute::AverageTemperature),
                format!(
                    "Average temperature of at least {}°C is above a maximum temperature of at most {}°C",
                    avg.min, hi.max
                ),
                "Widen the average or maximum temperature range",
            ));
        }
    }

    let any_temperature = min_temp.is_some() || max_temp.is_some() || avg_temp.is_some();
    if let Some(days) = required_range(profile, Attribute::GrowingDays) {
        if any_temperature && !ordering_broken {
            growing_season(days, min_temp, max_temp, avg_temp, out);
        }
    }

    for (first, first_side, second, second_side, note) in UNLIKELY_PAIRS {
        let (Some(a), Some(b)) = (required_range(profile, first), required_range(profile, second))
        else {
            continue;
        };
        if first_side.holds(&a) && second_side.holds(&b) {
            out.push(Conflict::new(
                Severity::Info,
                range_origin(first),
                format!("{first} {a} together with {second} {b} is unusual: {note}"),
                format!("Consider relaxing {first} or {second}"),
            ));
        }
    }
}

fn growing_season(
    days: FloatRange,
    min_temp: Option<FloatRange>,
    max_temp: Option<FloatRange>,
    avg_temp: Option<FloatRange>,
    out: &mut Vec<Conflict>,
) {
    let full = |attribute: Attribute| attribute.bounds().unwrap_or(FloatRange::new(-100.0, 100.0));
    let Some((shortest, longest)) = climate::growing_days_range(
        &min_temp.unwrap_or_else(|| full(Attribute::MinimumTemperature)),
        &max_temp.unwrap_or_else(|| full(Attribute::MaximumTemperature)),
        &avg_temp.unwrap_or_else(|| full(Attribute::AverageTemperature)),
    ) else {
        return;
    };
    if days.max < f64::from(shortest) || days.min > f64::from(longest) {
        out.push(Conflict::new(
            Severity::Error,
            range_origin(Attribute::GrowingDays),
            format!(
                "A growing season of {days} days cannot occur with the required temperatures \
                 (only {shortest}–{longest} days are possible)"
            ),
            "Relax the growing days or the temperature ranges",
        ));
    }
}

// ============================================================================
// Rule 3: overall restrictiveness
// ============================================================================

/// Applies the thresholds to an estimate of hard-tier survivors. `None`
/// means no hard criterion is left to judge. When estimation failed, counts
/// the hard criteria of `profile` not on an `excluded` attribute.
pub(crate) fn restrictiveness(
    estimated: EstimateResult<Option<SelectivityEstimate>>,
    config: &AdvisorConfig,
    profile: &CriteriaProfile,
    excluded: &[Attribute],
    out: &mut Vec<Conflict>,
) {
    let thresholds = &config.restrictiveness;
    let origin = ConflictOrigin::Tier(Tier::MustHave);

    match estimated {
        Ok(None) => {}
        Ok(Some(estimate)) => {
            let (matches, total) = (estimate.matching_count, estimate.total_count);
            let severity = if matches < thresholds.error_below {
                Severity::Error
            } else if matches < thresholds.warning_below {
                Severity::Warning
            } else {
                return;
            };
            out.push(Conflict::new(
                severity,
                origin,
                format!("Only about {matches} of {total} tiles are expected to pass every hard criterion"),
                "Relax or remove a Must Have criterion, or lower the strictness",
            ));
        }
        Err(err) => {
            warn!(event = "estimate_fallback", error = %err);
            let hard = profile
                .active_criteria()
                .iter()
                .filter(|(id, imp)| imp.is_hard() && !excluded.contains(&id.attribute()))
                .count();
            if hard > thresholds.fallback_max_hard_criteria {
                out.push(Conflict::new(
                    Severity::Warning,
                    origin,
                    format!("{hard} hard criteria are active; results may be very limited"),
                    "Move some criteria to Priority or Preferred",
                ));
            }
        }
    }
}

// ============================================================================
// Rule 4: rare-feature conjunction
// ============================================================================

pub(crate) fn rare_features(
    estimator: &SelectivityEstimator<'_>,
    config: &AdvisorConfig,
    terms: &[ItemTerm<'_>],
    origin: &ConflictOrigin,
    out: &mut Vec<Conflict>,
) {
    let features: Vec<&ItemTerm<'_>> = terms
        .iter()
        .filter(|t| t.attribute.is_map_feature())
        .collect();
    if features.is_empty() {
        return;
    }

    let stats = estimator.stats();
    let rare: Vec<String> = features
        .iter()
        .filter(|t| {
            let share: Option<f64> = t
                .names
                .iter()
                .map(|name| stats.category_fraction(t.attribute, name))
                .sum();
            share.is_some_and(|p| p < config.features.ultra_rare_fraction)
        })
        .map(|t| t.describe())
        .collect();

    if rare.len() > 1 {
        out.push(Conflict::new(
            Severity::Error,
            origin.clone(),
            format!(
                "{} ultra-rare map features are required together ({})",
                rare.len(),
                rare.join(", ")
            ),
            "Require at most one of them, or combine them with OR",
        ));
    }
    if features.len() >= config.features.max_and_features {
        out.push(Conflict::new(
            Severity::Warning,
            origin.clone(),
            format!("{} map features are required together", features.len()),
            "Combine some with OR or move them to Priority",
        ));
    }
}
