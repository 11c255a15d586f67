//! LandingZone - tile search advisor for RimWorld
//!
//! Build a criteria profile, edit it as clauses, and ask how many tiles it
//! will match before running a search.
//!
//! # Example
//!
//! ```rust
//! use landingzone::prelude::*;
//!
//! let mut stats = WorldStats::new(2000, 1000);
//! stats.flags.insert(Attribute::Coastal, 600);
//!
//! let mut profile = CriteriaProfile::new();
//! profile.set_flag(Attribute::Coastal, Importance::MustHave).unwrap();
//!
//! let report = ProfileAdvisor::new(stats).analyze(&profile);
//! assert_eq!(report.expected_matches(), Some(600));
//! assert!(report.conflicts.is_empty());
//! ```

// Criteria model
pub use landingzone_core::{
    Attribute, AttributeKind, CriteriaProfile, CriterionId, FloatRange, Importance,
    ItemImportances, LandingZoneError, LogicMode, RangeCriterion, Tier,
};

// World statistics
pub use landingzone_core::{CategoryCount, Distribution, StatsBuilder, StatsError, TileSample, WorldStats};

// Configuration
pub use landingzone_config::{AdvisorConfig, ConfigError};

// Clause workspace
pub use landingzone_clauses::{
    Chip, ChipId, Clause, ClauseId, OrGroup, OrGroupId, RenderItem, Term, Workspace,
    EMPTY_LOGIC_SUMMARY,
};

// Estimation and conflicts
pub use landingzone_estimate::{
    climate, Conflict, ConflictDetector, ConflictOrigin, EstimateError, MatchCategory,
    SelectivityEstimate, SelectivityEstimator, Severity, StrictnessSuggestion,
};

mod advisor;
pub use advisor::{ProfileAdvisor, ProfileReport};

#[cfg(feature = "console")]
pub mod console;


pub mod prelude {
    pub use super::{
        AdvisorConfig, Attribute, CriteriaProfile, FloatRange, Importance, LogicMode, Tier,
        WorldStats,
    };
    pub use super::{Conflict, SelectivityEstimate, Severity, StrictnessSuggestion};
    pub use super::{ProfileAdvisor, ProfileReport};
    pub use super::Workspace;
}
