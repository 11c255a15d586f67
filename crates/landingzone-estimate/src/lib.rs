//! Consistency and selectivity engine for LandingZone.
//!
//! Given a criteria profile and precomputed world statistics, this crate
//! predicts how many tiles survive the profile and explains why a profile
//! may return nothing, all without scanning a single tile:
//!
//! - [`SelectivityEstimator`] - per-criterion and combined estimates
//! - [`ConflictDetector`] - impossible or near-impossible combinations
//! - [`strictness`] - estimates and suggestions for partial matching
//! - [`climate`] - the seasonal model behind growing-season checks
//!
//! # Example
//!
//! ```
//! use landingzone_core::{Attribute, CriteriaProfile, FloatRange, Importance, WorldStats};
//! use landingzone_core::Distribution;
//! use landingzone_estimate::SelectivityEstimator;
//!
//! let mut stats = WorldStats::new(2000, 1000);
//! stats.distributions.insert(
//!     Attribute::Rainfall,
//!     Distribution::from_counts(0.0, 4000.0, vec![250; 4]),
//! );
//!
//! let mut profile = CriteriaProfile::new();
//! profile
//!     .set_range(Attribute::Rainfall, FloatRange::new(1000.0, 2000.0), Importance::MustHave)
//!     .unwrap();
//!
//! let estimate = SelectivityEstimator::new(&stats).estimate_combined(&profile).unwrap();
//! assert_eq!(estimate.matching_count, 250);
//! ```

pub mod clauses;
pub mod climate;
pub mod conflict;
pub mod error;
pub mod estimate;
pub mod estimator;
pub mod strictness;

#[cfg(test)]
mod tests;

pub use conflict::{Conflict, ConflictDetector, ConflictOrigin, Severity};
pub use error::{EstimateError, EstimateResult};
pub use estimate::{combine, SelectivityEstimate};
pub use estimator::SelectivityEstimator;
pub use strictness::{
    estimate_at_strictness, suggest_strictness, MatchCategory, StrictnessSuggestion,
};
