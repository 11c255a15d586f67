//! Seeded random tiles.
//!
//! Produces plausible-looking tile samples for exercising the statistics
//! builder. The same seed always yields the same tiles.

use landingzone_core::{Attribute, StatsBuilder, TileSample, WorldStats};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const HILLINESS: [&str; 4] = ["Flat", "Small Hills", "Large Hills", "Mountainous"];
const STONES: [&str; 5] = ["Granite", "Limestone", "Marble", "Sandstone", "Slate"];

/// Generates `count` tiles; roughly two in five are settleable.
pub fn generate_tiles(seed: u64, count: usize) -> Vec<TileSample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count).map(|_| random_tile(&mut rng)).collect()
}

/// Aggregates [`generate_tiles`] into statistics.
pub fn synthetic_world(seed: u64, count: usize) -> WorldStats {
    let mut builder = StatsBuilder::new();
    builder.extend(&generate_tiles(seed, count));
    builder.build()
}

fn random_tile(rng: &mut ChaCha8Rng) -> TileSample {
    let settleable = rng.random_bool(0.4);
    let min_temp: f64 = rng.random_range(-50.0..30.0);
    let swing: f64 = rng.random_range(6.0..56.0);
    let max_temp = min_temp + swing;

    let mut tile = TileSample {
        settleable,
        ..TileSample::default()
    }
    .with_value(Attribute::MinimumTemperature, min_temp)
    .with_value(Attribute::MaximumTemperature, max_temp)
    .with_value(Attribute::AverageTemperature, (min_temp + max_temp) / 2.0)
    .with_value(Attribute::Rainfall, rng.random_range(0.0..4000.0))
    .with_value(Attribute::Elevation, rng.random_range(0.0..3000.0))
    .with_value(Attribute::Pollution, rng.random::<f64>() * 0.2)
    .with_item(
        Attribute::Hilliness,
        HILLINESS[rng.random_range(0..HILLINESS.len())],
    );

    let first = rng.random_range(0..STONES.len());
    let second = (first + rng.random_range(1..STONES.len())) % STONES.len();
    tile = tile
        .with_item(Attribute::Stone, STONES[first])
        .with_item(Attribute::Stone, STONES[second]);

    if rng.random_bool(0.15) {
        tile = tile.with_flag(Attribute::Coastal);
    }
    if rng.random_bool(0.01) {
        tile = tile.with_item(Attribute::MapFeature, "Hot Springs");
    }
    tile
}
