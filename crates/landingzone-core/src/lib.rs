//! LandingZone Core - criteria model for tile search profiles
//!
//! This crate provides the substrate the clause workspace and the
//! selectivity engine operate over:
//! - Importance tiers and the boolean combinator for multi-item criteria
//! - The attribute catalog (range, set and flag attributes)
//! - The `CriteriaProfile` value object
//! - Precomputed world statistics used for estimation

pub mod attribute;
pub mod criterion;
pub mod error;
pub mod importance;
pub mod profile;
pub mod stats;


pub use attribute::{Attribute, AttributeKind};
pub use criterion::{CriterionId, FloatRange, ItemImportances, LogicMode, RangeCriterion};
pub use error::{LandingZoneError, Result};
pub use importance::{Importance, Tier};
pub use profile::CriteriaProfile;
pub use stats::{CategoryCount, Distribution, StatsBuilder, StatsError, TileSample, WorldStats};
