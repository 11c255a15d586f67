use landingzone_core::CriterionId;

use crate::ids::{ChipId, OrGroupId};

/// A reference to one criterion, placed in a clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    pub(crate) id: ChipId,
    pub(crate) criterion: CriterionId,
    pub(crate) label: String,
    pub(crate) value: String,
    pub(crate) or_group: Option<OrGroupId>,
}

impl Chip {
    pub(crate) fn new(id: ChipId, criterion: CriterionId, value: impl Into<String>) -> Self {
        Self {
            id,
            label: criterion.to_string(),
            criterion,
            value: value.into(),
            or_group: None,
        }
    }

    pub fn id(&self) -> ChipId {
        self.id
    }

    pub fn criterion(&self) -> &CriterionId {
        &self.criterion
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// The OR-group this chip belongs to, if any.
    pub fn or_group(&self) -> Option<OrGroupId> {
        self.or_group
    }

    /// Label and value as shown in the logic summary.
    pub fn display(&self) -> String {
        if self.value.is_empty() {
            self.label.clone()
        } else {
            format!("{} {}", self.label, self.value)
        }
    }
}
