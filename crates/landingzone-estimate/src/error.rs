//! Estimation errors.

use landingzone_core::{Attribute, CriterionId};
use thiserror::Error;

/// Why an estimate could not be produced.
///
/// The conflict detector never surfaces these; it falls back to counting
/// hard criteria instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    /// The world statistics carry nothing for this attribute.
    #[error("no statistics for {0}")]
    MissingStatistics(Attribute),

    /// The world statistics report zero candidate tiles.
    #[error("candidate space is empty")]
    EmptyCandidateSpace,

    /// The criterion is ignored by the profile.
    #[error("{0} is not an active criterion")]
    Inactive(CriterionId),
}

/// Result type alias for estimation.
pub type EstimateResult<T> = std::result::Result<T, EstimateError>;
