//! Shared test fixtures for LandingZone crates.
//!
//! This crate provides data and builders for tests. It depends only on
//! `landingzone-core` so every other crate can use it as a dev-dependency.
//!
//! - [`world`] - deterministic world statistics with known fractions
//! - [`profile`] - fluent profile builder
//! - [`synthetic`] - seeded random tile samples
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! landingzone-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use landingzone_test::world::sample_world;
//! use landingzone_test::profile::ProfileBuilder;
//! ```

pub mod profile;
pub mod synthetic;
pub mod world;

pub use profile::ProfileBuilder;
pub use world::{sample_world, uniform_world, SAMPLE_CANDIDATES};
