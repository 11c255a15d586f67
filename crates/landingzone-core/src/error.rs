//! Error types for LandingZone

use thiserror::Error;

use crate::attribute::Attribute;

/// Main error type for LandingZone model operations
#[derive(Debug, Error)]
pub enum LandingZoneError {
    /// A range whose bounds are not finite numbers
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    /// An attribute name that is not part of the catalog
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    /// An operation was applied to an attribute of the wrong kind
    #[error("{attribute} is a {actual} attribute, expected {expected}")]
    WrongKind {
        attribute: Attribute,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Result type alias for LandingZone operations
pub type Result<T> = std::result::Result<T, LandingZoneError>;
