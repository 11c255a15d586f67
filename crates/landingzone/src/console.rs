//! Console logging for advisor events.
//!
//! Installs a `tracing` subscriber that prints the advisor's structured
//! events. Filtering follows `RUST_LOG`, defaulting to `info` with the
//! LandingZone crates at `debug`.

use std::sync::OnceLock;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

const CRATES: [&str; 4] = [
    "landingzone",
    "landingzone_clauses",
    "landingzone_estimate",
    "landingzone_core",
];

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Does
/// nothing if another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        let mut filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy();
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
            for name in CRATES {
                if let Ok(directive) = format!("{name}=debug").parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init();
    });
}
