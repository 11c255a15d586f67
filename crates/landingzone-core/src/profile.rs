//! The criteria profile value object.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attribute::{Attribute, AttributeKind};
use crate::criterion::{CriterionId, FloatRange, ItemImportances, RangeCriterion};
use crate::error::{LandingZoneError, Result};
use crate::importance::Importance;

/// Strictness of a freshly created profile: every hard gate is required.
pub const DEFAULT_STRICTNESS: f64 = 1.0;

/// A user's multi-tier preference profile.
///
/// Holds one entry for every attribute in the catalog, so typed getters never
/// miss for an attribute of the right kind. Cloning yields an independent
/// snapshot suitable for handing to a background scan.
///
/// # Example
///
/// ```
/// use landingzone_core::{Attribute, CriteriaProfile, FloatRange, Importance};
///
/// let mut profile = CriteriaProfile::new();
/// profile
///     .set_range(Attribute::Rainfall, FloatRange::new(1000.0, 2000.0), Importance::MustHave)
///     .unwrap();
/// profile
///     .set_item(Attribute::Hilliness, "Mountainous", Importance::Priority)
///     .unwrap();
///
/// assert_eq!(profile.active_criteria().len(), 2);
/// profile.reset();
/// assert!(profile.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaProfile {
    ranges: BTreeMap<Attribute, RangeCriterion>,
    items: BTreeMap<Attribute, ItemImportances>,
    flags: BTreeMap<Attribute, Importance>,
    strictness: f64,
}

impl Default for CriteriaProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl CriteriaProfile {
    /// Creates a profile with every criterion ignored.
    pub fn new() -> Self {
        let ranges = Attribute::of_kind(AttributeKind::Range)
            .map(|a| (a, RangeCriterion::ignored(a)))
            .collect();
        let items = Attribute::of_kind(AttributeKind::Set)
            .map(|a| (a, ItemImportances::default()))
            .collect();
        let flags = Attribute::of_kind(AttributeKind::Flag)
            .map(|a| (a, Importance::Ignored))
            .collect();
        Self {
            ranges,
            items,
            flags,
            strictness: DEFAULT_STRICTNESS,
        }
    }

    /// Restores every criterion to `Ignored` and its default value.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // ------------------------------------------------------------------
    // Range attributes
    // ------------------------------------------------------------------

    pub fn range(&self, attribute: Attribute) -> Option<&RangeCriterion> {
        self.ranges.get(&attribute)
    }

    pub fn set_range(
        &mut self,
        attribute: Attribute,
        range: FloatRange,
        importance: Importance,
    ) -> Result<()> {
        let slot = self.range_slot(attribute)?;
        *slot = RangeCriterion::new(range, importance);
        Ok(())
    }

    /// Changes only the importance of a range criterion, keeping its bounds.
    pub fn set_range_importance(&mut self, attribute: Attribute, importance: Importance) -> Result<()> {
        self.range_slot(attribute)?.importance = importance;
        Ok(())
    }

    fn range_slot(&mut self, attribute: Attribute) -> Result<&mut RangeCriterion> {
        self.ranges
            .get_mut(&attribute)
            .ok_or_else(|| wrong_kind(attribute, AttributeKind::Range))
    }

    // ------------------------------------------------------------------
    // Set attributes
    // ------------------------------------------------------------------

    pub fn items(&self, attribute: Attribute) -> Option<&ItemImportances> {
        self.items.get(&attribute)
    }

    pub fn items_mut(&mut self, attribute: Attribute) -> Option<&mut ItemImportances> {
        self.items.get_mut(&attribute)
    }

    pub fn set_item(
        &mut self,
        attribute: Attribute,
        item: impl Into<String>,
        importance: Importance,
    ) -> Result<()> {
        self.items
            .get_mut(&attribute)
            .ok_or_else(|| wrong_kind(attribute, AttributeKind::Set))?
            .set(item, importance);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Flag attributes
    // ------------------------------------------------------------------

    /// Importance of a flag; `Ignored` for non-flag attributes.
    pub fn flag(&self, attribute: Attribute) -> Importance {
        self.flags.get(&attribute).copied().unwrap_or_default()
    }

    pub fn set_flag(&mut self, attribute: Attribute, importance: Importance) -> Result<()> {
        let slot = self
            .flags
            .get_mut(&attribute)
            .ok_or_else(|| wrong_kind(attribute, AttributeKind::Flag))?;
        *slot = importance;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Generic access by criterion id
    // ------------------------------------------------------------------

    pub fn importance_of(&self, id: &CriterionId) -> Importance {
        match id {
            CriterionId::Range(a) => self.range(*a).map(|r| r.importance).unwrap_or_default(),
            CriterionId::Item(a, name) => self.items(*a).map(|c| c.get(name)).unwrap_or_default(),
            CriterionId::Flag(a) => self.flag(*a),
        }
    }

    pub fn set_importance(&mut self, id: &CriterionId, importance: Importance) -> Result<()> {
        match id {
            CriterionId::Range(a) => self.set_range_importance(*a, importance),
            CriterionId::Item(a, name) => self.set_item(*a, name.clone(), importance),
            CriterionId::Flag(a) => self.set_flag(*a, importance),
        }
    }

    /// Every non-ignored criterion with its importance, in catalog order.
    pub fn active_criteria(&self) -> Vec<(CriterionId, Importance)> {
        let mut out = Vec::new();
        for attribute in Attribute::ALL {
            match attribute.kind() {
                AttributeKind::Range => {
                    if let Some(r) = self.range(attribute).filter(|r| r.importance.is_active()) {
                        out.push((CriterionId::Range(attribute), r.importance));
                    }
                }
                AttributeKind::Set => {
                    if let Some(container) = self.items(attribute) {
                        out.extend(container.iter().map(|(name, imp)| {
                            (CriterionId::Item(attribute, name.to_string()), imp)
                        }));
                    }
                }
                AttributeKind::Flag => {
                    let imp = self.flag(attribute);
                    if imp.is_active() {
                        out.push((CriterionId::Flag(attribute), imp));
                    }
                }
            }
        }
        out
    }

    /// Criteria at exactly the given importance.
    pub fn criteria_at(&self, importance: Importance) -> Vec<CriterionId> {
        self.active_criteria()
            .into_iter()
            .filter(|(_, imp)| *imp == importance)
            .map(|(id, _)| id)
            .collect()
    }

    /// Number of criteria at a gating importance.
    pub fn hard_criteria_count(&self) -> usize {
        self.active_criteria()
            .iter()
            .filter(|(_, imp)| imp.is_hard())
            .count()
    }

    /// Returns true if no criterion is active.
    pub fn is_empty(&self) -> bool {
        self.ranges.values().all(|r| !r.importance.is_active())
            && self.items.values().all(ItemImportances::is_empty)
            && self.flags.values().all(|imp| !imp.is_active())
    }

    // ------------------------------------------------------------------
    // Strictness
    // ------------------------------------------------------------------

    /// Fraction of hard gates a candidate must satisfy, in `[0, 1]`.
    pub fn strictness(&self) -> f64 {
        self.strictness
    }

    /// Sets the strictness, clamped to `[0, 1]`. Non-finite input is ignored.
    pub fn set_strictness(&mut self, strictness: f64) {
        if strictness.is_finite() {
            self.strictness = strictness.clamp(0.0, 1.0);
        }
    }
}

fn wrong_kind(attribute: Attribute, expected: AttributeKind) -> LandingZoneError {
    LandingZoneError::WrongKind {
        attribute,
        expected: expected.label(),
        actual: attribute.kind().label(),
    }
}
