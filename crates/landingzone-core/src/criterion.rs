//! Criterion value types.
//!
//! A criterion is one attribute's constraint. Range attributes carry a
//! [`RangeCriterion`], set attributes an [`ItemImportances`] container and
//! flag attributes a bare [`Importance`]. [`CriterionId`] names a single
//! criterion instance across all three shapes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeKind};
use crate::error::{LandingZoneError, Result};
use crate::importance::Importance;

/// Closed numeric interval.
///
/// # Example
///
/// ```
/// use landingzone_core::FloatRange;
///
/// let r = FloatRange::new(30.0, 10.0);
/// assert_eq!(r.min, 10.0);
/// assert!(r.contains(20.0));
/// assert_eq!(r.width(), 20.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatRange {
    pub min: f64,
    pub max: f64,
}

impl FloatRange {
    /// Creates a range, swapping the bounds if given in reverse.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Creates a range, rejecting non-finite bounds.
    pub fn try_new(a: f64, b: f64) -> Result<Self> {
        if !a.is_finite() || !b.is_finite() {
            return Err(LandingZoneError::InvalidRange(format!("{a}..{b}")));
        }
        Ok(Self::new(a, b))
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Overlap of two ranges, if any.
    pub fn intersect(&self, other: &FloatRange) -> Option<FloatRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(FloatRange { min, max })
    }
}

impl fmt::Display for FloatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}–{}", trim_float(self.min), trim_float(self.max))
    }
}

fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

/// A numeric interval with its importance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeCriterion {
    pub range: FloatRange,
    #[serde(default)]
    pub importance: Importance,
}

impl RangeCriterion {
    pub fn new(range: FloatRange, importance: Importance) -> Self {
        Self { range, importance }
    }

    /// The default criterion for an attribute: its full span, ignored.
    pub fn ignored(attribute: Attribute) -> Self {
        let range = attribute
            .bounds()
            .unwrap_or_else(|| FloatRange::new(0.0, 0.0));
        Self::new(range, Importance::Ignored)
    }
}

/// Combinator applied to the hard-gated members of a multi-item criterion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicMode {
    /// Every item must be present.
    #[default]
    And,
    /// Any one item suffices.
    Or,
}

impl LogicMode {
    pub fn keyword(self) -> &'static str {
        match self {
            LogicMode::And => "AND",
            LogicMode::Or => "OR",
        }
    }
}

/// Per-item importances for a set attribute.
///
/// Items at `Ignored` are not stored.
///
/// # Example
///
/// ```
/// use landingzone_core::{Importance, ItemImportances, LogicMode};
///
/// let mut stones = ItemImportances::default();
/// stones.set("Granite", Importance::MustHave);
/// stones.set("Marble", Importance::MustHave);
/// stones.set("Slate", Importance::Preferred);
/// stones.set_mode(LogicMode::Or);
///
/// assert_eq!(stones.count_at(Importance::MustHave), 2);
/// assert_eq!(stones.get("Limestone"), Importance::Ignored);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemImportances {
    #[serde(default)]
    items: BTreeMap<String, Importance>,
    #[serde(default)]
    mode: LogicMode,
}

impl ItemImportances {
    pub fn new(mode: LogicMode) -> Self {
        Self {
            items: BTreeMap::new(),
            mode,
        }
    }

    /// Sets an item's importance; `Ignored` removes it.
    pub fn set(&mut self, item: impl Into<String>, importance: Importance) {
        let item = item.into();
        if importance.is_active() {
            self.items.insert(item, importance);
        } else {
            self.items.remove(&item);
        }
    }

    pub fn get(&self, item: &str) -> Importance {
        self.items.get(item).copied().unwrap_or_default()
    }

    /// Items at the given importance, in name order.
    pub fn items_at(&self, importance: Importance) -> impl Iterator<Item = &str> + '_ {
        self.items
            .iter()
            .filter(move |(_, imp)| **imp == importance)
            .map(|(name, _)| name.as_str())
    }

    pub fn count_at(&self, importance: Importance) -> usize {
        self.items.values().filter(|imp| **imp == importance).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Importance)> + '_ {
        self.items.iter().map(|(name, imp)| (name.as_str(), *imp))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn has_hard(&self) -> bool {
        self.items.values().any(|imp| imp.is_hard())
    }

    pub fn mode(&self) -> LogicMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: LogicMode) {
        self.mode = mode;
    }

    /// Removes every item and restores the AND combinator.
    pub fn clear(&mut self) {
        self.items.clear();
        self.mode = LogicMode::default();
    }
}

/// Identifies one criterion instance in a profile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionId {
    Range(Attribute),
    Item(Attribute, String),
    Flag(Attribute),
}

impl CriterionId {
    /// Builds a range criterion id, checking the attribute kind.
    pub fn range(attribute: Attribute) -> Result<Self> {
        expect_kind(attribute, AttributeKind::Range)?;
        Ok(CriterionId::Range(attribute))
    }

    /// Builds an item criterion id, checking the attribute kind.
    pub fn item(attribute: Attribute, item: impl Into<String>) -> Result<Self> {
        expect_kind(attribute, AttributeKind::Set)?;
        Ok(CriterionId::Item(attribute, item.into()))
    }

    /// Builds a flag criterion id, checking the attribute kind.
    pub fn flag(attribute: Attribute) -> Result<Self> {
        expect_kind(attribute, AttributeKind::Flag)?;
        Ok(CriterionId::Flag(attribute))
    }

    pub fn attribute(&self) -> Attribute {
        match self {
            CriterionId::Range(a) | CriterionId::Item(a, _) | CriterionId::Flag(a) => *a,
        }
    }

    /// Item name for set criteria.
    pub fn item_name(&self) -> Option<&str> {
        match self {
            CriterionId::Item(_, name) => Some(name),
            _ => None,
        }
    }

    /// Short display label, e.g. `Mountainous` or `Rainfall`.
    pub fn label(&self) -> String {
        match self {
            CriterionId::Item(_, name) => name.clone(),
            other => other.attribute().label().to_string(),
        }
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriterionId::Item(attribute, name) => write!(f, "{attribute}: {name}"),
            other => write!(f, "{}", other.attribute()),
        }
    }
}

fn expect_kind(attribute: Attribute, expected: AttributeKind) -> Result<()> {
    let actual = attribute.kind();
    if actual == expected {
        Ok(())
    } else {
        Err(LandingZoneError::WrongKind {
            attribute,
            expected: expected.label(),
            actual: actual.label(),
        })
    }
}
