//! Fluent profile construction for tests.

use landingzone_core::{Attribute, CriteriaProfile, FloatRange, Importance, LogicMode};

/// Builds a [`CriteriaProfile`] in one expression.
///
/// Panics on attribute kind mismatches, which in a test is a bug in the test.
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder {
    profile: CriteriaProfile,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn range(mut self, attribute: Attribute, min: f64, max: f64, importance: Importance) -> Self {
        self.profile
            .set_range(attribute, FloatRange::new(min, max), importance)
            .unwrap_or_else(|e| panic!("range fixture: {e}"));
        self
    }

    pub fn item(mut self, attribute: Attribute, name: &str, importance: Importance) -> Self {
        self.profile
            .set_item(attribute, name, importance)
            .unwrap_or_else(|e| panic!("item fixture: {e}"));
        self
    }

    pub fn flag(mut self, attribute: Attribute, importance: Importance) -> Self {
        self.profile
            .set_flag(attribute, importance)
            .unwrap_or_else(|e| panic!("flag fixture: {e}"));
        self
    }

    pub fn mode(mut self, attribute: Attribute, mode: LogicMode) -> Self {
        self.profile
            .items_mut(attribute)
            .unwrap_or_else(|| panic!("{attribute} is not a set attribute"))
            .set_mode(mode);
        self
    }

    pub fn strictness(mut self, strictness: f64) -> Self {
        self.profile.set_strictness(strictness);
        self
    }

    pub fn build(self) -> CriteriaProfile {
        self.profile
    }
}
