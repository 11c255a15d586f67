//! Clause workspace for LandingZone criteria.
//!
//! A [`Workspace`] shows a profile as boolean logic: each tier bucket holds
//! OR-combined clauses, each clause holds AND-combined chips, and chips in a
//! clause may be gathered into OR-groups.
//!
//! # Example
//!
//! ```
//! use landingzone_clauses::Workspace;
//! use landingzone_core::{Attribute, CriterionId, Tier};
//!
//! let mut ws = Workspace::new();
//! let flat = ws.add_criterion(CriterionId::Item(Attribute::Hilliness, "Flat".into()), Tier::MustHave, "");
//! let hills = ws.add_criterion(CriterionId::Item(Attribute::Hilliness, "Small Hills".into()), Tier::MustHave, "");
//! ws.add_criterion(CriterionId::Flag(Attribute::Coastal), Tier::MustHave, "");
//! ws.create_or_group(&[flat, hills]);
//!
//! assert_eq!(
//!     ws.logic_summary(),
//!     "Must Have: (Hilliness: Flat OR Hilliness: Small Hills) AND Coastal"
//! );
//! ```

mod chip;
mod clause;
mod ids;
mod workspace;

pub use chip::Chip;
pub use clause::{Clause, OrGroup, RenderItem, RenderableItems, Term};
pub use ids::{ChipId, ClauseId, OrGroupId};
pub use workspace::{TierBucket, Workspace, EMPTY_LOGIC_SUMMARY};
