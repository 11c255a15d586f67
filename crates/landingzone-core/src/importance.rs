//! Importance levels and tier buckets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How strongly a criterion participates in the search.
///
/// # Example
///
/// ```
/// use landingzone_core::{Importance, Tier};
///
/// assert!(Importance::MustHave.is_hard());
/// assert!(Importance::Priority.is_soft());
/// assert_eq!(Importance::Priority.weight(), 2);
/// assert_eq!(Importance::Ignored.tier(), None);
/// assert_eq!(Importance::MustNotHave.tier(), Some(Tier::MustNotHave));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    /// Not part of the profile.
    #[default]
    Ignored,
    /// Soft preference, weight 1.
    Preferred,
    /// Soft preference, weight 2.
    Priority,
    /// Hard negative gate: a candidate matching it is excluded.
    MustNotHave,
    /// Hard gate: a candidate not matching it is excluded.
    MustHave,
}

impl Importance {
    /// Returns true for the two gating levels.
    pub fn is_hard(self) -> bool {
        matches!(self, Importance::MustHave | Importance::MustNotHave)
    }

    /// Returns true for the two ranking-only levels.
    pub fn is_soft(self) -> bool {
        matches!(self, Importance::Priority | Importance::Preferred)
    }

    /// Returns true unless the criterion is ignored.
    pub fn is_active(self) -> bool {
        self != Importance::Ignored
    }

    /// Scoring weight of a soft level; hard and ignored levels weigh nothing.
    pub fn weight(self) -> u32 {
        match self {
            Importance::Priority => 2,
            Importance::Preferred => 1,
            _ => 0,
        }
    }

    /// The tier bucket this importance maps to, if any.
    pub fn tier(self) -> Option<Tier> {
        match self {
            Importance::MustHave => Some(Tier::MustHave),
            Importance::MustNotHave => Some(Tier::MustNotHave),
            Importance::Priority => Some(Tier::Priority),
            Importance::Preferred => Some(Tier::Preferred),
            Importance::Ignored => None,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Importance::Ignored => "Ignored",
            other => other.tier().map(Tier::label).unwrap_or("Ignored"),
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One of the four active importance buckets.
///
/// Declaration order is strictness order, most strict first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    MustHave,
    MustNotHave,
    Priority,
    Preferred,
}

impl Tier {
    /// All tiers in strictness order.
    pub const ALL: [Tier; 4] = [
        Tier::MustHave,
        Tier::MustNotHave,
        Tier::Priority,
        Tier::Preferred,
    ];

    /// Position of this tier in [`Tier::ALL`].
    pub fn index(self) -> usize {
        match self {
            Tier::MustHave => 0,
            Tier::MustNotHave => 1,
            Tier::Priority => 2,
            Tier::Preferred => 3,
        }
    }

    /// The importance a criterion gets when its chip sits in this tier.
    pub fn importance(self) -> Importance {
        match self {
            Tier::MustHave => Importance::MustHave,
            Tier::MustNotHave => Importance::MustNotHave,
            Tier::Priority => Importance::Priority,
            Tier::Preferred => Importance::Preferred,
        }
    }

    /// Returns true for the gating tiers.
    pub fn is_hard(self) -> bool {
        self.importance().is_hard()
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::MustHave => "Must Have",
            Tier::MustNotHave => "Must Not Have",
            Tier::Priority => "Priority",
            Tier::Preferred => "Preferred",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Tier> for Importance {
    fn from(tier: Tier) -> Self {
        tier.importance()
    }
}
