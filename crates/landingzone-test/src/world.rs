//! World statistics fixtures.
//!
//! Numeric histograms are flat over each attribute's catalog bounds, so the
//! fraction of a range is its width over the span. Category and flag counts
//! are chosen so common items sit well above and rare map features well
//! below the default rarity cutoff.

use landingzone_core::{Attribute, AttributeKind, CategoryCount, Distribution, WorldStats};

/// Candidate (settleable) tiles in [`sample_world`].
pub const SAMPLE_CANDIDATES: u64 = 10_000;

/// Bins per histogram in the fixtures.
pub const FIXTURE_BINS: usize = 10;

/// A world where every numeric attribute is uniform and nothing else is
/// known.
pub fn uniform_world(candidates: u64) -> WorldStats {
    let mut stats = WorldStats::new(candidates * 2, candidates);
    let per_bin = candidates / FIXTURE_BINS as u64;
    for attribute in Attribute::of_kind(AttributeKind::Range) {
        if let Some(bounds) = attribute.bounds() {
            stats.distributions.insert(
                attribute,
                Distribution::from_counts(bounds.min, bounds.max, vec![per_bin; FIXTURE_BINS]),
            );
        }
    }
    stats
}

/// A 10,000-candidate world with every attribute populated.
pub fn sample_world() -> WorldStats {
    let mut stats = uniform_world(SAMPLE_CANDIDATES);

    let tables: [(Attribute, &[(&str, u64)]); 7] = [
        (
            Attribute::Hilliness,
            &[
                ("Flat", 3000),
                ("Small Hills", 2500),
                ("Large Hills", 2500),
                ("Mountainous", 2000),
            ],
        ),
        (
            Attribute::Biome,
            &[
                ("Temperate Forest", 2500),
                ("Boreal Forest", 1500),
                ("Arid Shrubland", 1500),
                ("Tropical Rainforest", 1300),
                ("Desert", 1200),
                ("Tundra", 1000),
                ("Temperate Swamp", 600),
                ("Tropical Swamp", 400),
            ],
        ),
        (
            Attribute::River,
            &[
                ("Creek", 800),
                ("River", 500),
                ("Large River", 300),
                ("Huge River", 100),
            ],
        ),
        (
            Attribute::Road,
            &[
                ("Dirt Path", 1500),
                ("Dirt Road", 800),
                ("Stone Road", 300),
                ("Ancient Asphalt Road", 100),
            ],
        ),
        (
            Attribute::Stone,
            &[
                ("Granite", 4500),
                ("Limestone", 4000),
                ("Sandstone", 4000),
                ("Slate", 4000),
                ("Marble", 3500),
            ],
        ),
        (
            Attribute::MapFeature,
            &[
                ("Caves", 1200),
                ("Mixed Biome", 900),
                ("Fertile Soil", 600),
                ("Wetland", 500),
                ("Hot Springs", 30),
                ("Archean Trees", 20),
                ("Ancient Heat Vent", 15),
            ],
        ),
        (
            Attribute::AdjacentBiome,
            &[("Temperate Forest", 4000), ("Desert", 2000), ("Ice Sheet", 500)],
        ),
    ];

    for (attribute, rows) in tables {
        stats.categories.insert(
            attribute,
            rows.iter()
                .map(|(name, settleable)| CategoryCount::new(*name, settleable * 2, *settleable))
                .collect(),
        );
    }

    stats.flags.insert(Attribute::Coastal, 1800);
    stats.flags.insert(Attribute::LakeCoastal, 600);
    stats.flags.insert(Attribute::Landmark, 400);
    stats
}
