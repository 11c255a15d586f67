//! Attribute catalog.
//!
//! Every tile attribute a profile can constrain is listed here together with
//! its kind and, for numeric attributes, the span of values the world
//! generator produces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::criterion::FloatRange;
use crate::error::LandingZoneError;

/// Shape of the constraint an attribute accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Numeric interval with a single importance.
    Range,
    /// Named items, each with its own importance.
    Set,
    /// Boolean feature with a single importance.
    Flag,
}

impl AttributeKind {
    pub fn label(self) -> &'static str {
        match self {
            AttributeKind::Range => "range",
            AttributeKind::Set => "set",
            AttributeKind::Flag => "flag",
        }
    }
}

/// A filterable tile attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    // Numeric
    AverageTemperature,
    MinimumTemperature,
    MaximumTemperature,
    Rainfall,
    GrowingDays,
    Pollution,
    Forageability,
    Elevation,
    Swampiness,
    MovementDifficulty,
    AnimalDensity,
    FishPopulation,
    PlantDensity,

    // Categorical
    Hilliness,
    Biome,
    River,
    Road,
    Stone,
    MapFeature,
    AdjacentBiome,

    // Flags
    Coastal,
    LakeCoastal,
    Landmark,
}

impl Attribute {
    /// Every attribute, in catalog order.
    pub const ALL: [Attribute; 23] = [
        Attribute::AverageTemperature,
        Attribute::MinimumTemperature,
        Attribute::MaximumTemperature,
        Attribute::Rainfall,
        Attribute::GrowingDays,
        Attribute::Pollution,
        Attribute::Forageability,
        Attribute::Elevation,
        Attribute::Swampiness,
        Attribute::MovementDifficulty,
        Attribute::AnimalDensity,
        Attribute::FishPopulation,
        Attribute::PlantDensity,
        Attribute::Hilliness,
        Attribute::Biome,
        Attribute::River,
        Attribute::Road,
        Attribute::Stone,
        Attribute::MapFeature,
        Attribute::AdjacentBiome,
        Attribute::Coastal,
        Attribute::LakeCoastal,
        Attribute::Landmark,
    ];

    pub fn kind(self) -> AttributeKind {
        use Attribute::*;
        match self {
            AverageTemperature | MinimumTemperature | MaximumTemperature | Rainfall
            | GrowingDays | Pollution | Forageability | Elevation | Swampiness
            | MovementDifficulty | AnimalDensity | FishPopulation | PlantDensity => {
                AttributeKind::Range
            }
            Hilliness | Biome | River | Road | Stone | MapFeature | AdjacentBiome => {
                AttributeKind::Set
            }
            Coastal | LakeCoastal | Landmark => AttributeKind::Flag,
        }
    }

    /// Returns true if a tile carries exactly one value of this attribute.
    ///
    /// Requiring two different values of such an attribute at once can never
    /// be satisfied.
    pub fn is_single_valued(self) -> bool {
        matches!(
            self,
            Attribute::Hilliness | Attribute::Biome | Attribute::River
        )
    }

    /// Returns true for the map feature ("special feature") attribute.
    pub fn is_map_feature(self) -> bool {
        self == Attribute::MapFeature
    }

    /// Span of values the world generator produces for a numeric attribute.
    pub fn bounds(self) -> Option<FloatRange> {
        use Attribute::*;
        let (min, max) = match self {
            AverageTemperature => (-60.0, 60.0),
            MinimumTemperature => (-90.0, 50.0),
            MaximumTemperature => (-40.0, 80.0),
            Rainfall => (0.0, 6000.0),
            GrowingDays => (0.0, 60.0),
            Pollution => (0.0, 1.0),
            Forageability => (0.0, 1.0),
            Elevation => (0.0, 4000.0),
            Swampiness => (0.0, 1.0),
            MovementDifficulty => (0.0, 4.0),
            AnimalDensity => (0.0, 6.5),
            FishPopulation => (0.0, 100.0),
            PlantDensity => (0.0, 1.5),
            _ => return None,
        };
        Some(FloatRange::new(min, max))
    }

    /// Stable snake_case key, matching the serde representation.
    pub fn key(self) -> &'static str {
        use Attribute::*;
        match self {
            AverageTemperature => "average_temperature",
            MinimumTemperature => "minimum_temperature",
            MaximumTemperature => "maximum_temperature",
            Rainfall => "rainfall",
            GrowingDays => "growing_days",
            Pollution => "pollution",
            Forageability => "forageability",
            Elevation => "elevation",
            Swampiness => "swampiness",
            MovementDifficulty => "movement_difficulty",
            AnimalDensity => "animal_density",
            FishPopulation => "fish_population",
            PlantDensity => "plant_density",
            Hilliness => "hilliness",
            Biome => "biome",
            River => "river",
            Road => "road",
            Stone => "stone",
            MapFeature => "map_feature",
            AdjacentBiome => "adjacent_biome",
            Coastal => "coastal",
            LakeCoastal => "lake_coastal",
            Landmark => "landmark",
        }
    }

    pub fn label(self) -> &'static str {
        use Attribute::*;
        match self {
            AverageTemperature => "Average Temperature",
            MinimumTemperature => "Minimum Temperature",
            MaximumTemperature => "Maximum Temperature",
            Rainfall => "Rainfall",
            GrowingDays => "Growing Days",
            Pollution => "Pollution",
            Forageability => "Forageability",
            Elevation => "Elevation",
            Swampiness => "Swampiness",
            MovementDifficulty => "Movement Difficulty",
            AnimalDensity => "Animal Density",
            FishPopulation => "Fish Population",
            PlantDensity => "Plant Density",
            Hilliness => "Hilliness",
            Biome => "Biome",
            River => "River",
            Road => "Road",
            Stone => "Stone",
            MapFeature => "Map Feature",
            AdjacentBiome => "Adjacent Biome",
            Coastal => "Coastal",
            LakeCoastal => "Lake Coastal",
            Landmark => "Landmark",
        }
    }

    /// Iterates the attributes of one kind, in catalog order.
    pub fn of_kind(kind: AttributeKind) -> impl Iterator<Item = Attribute> {
        Self::ALL.into_iter().filter(move |a| a.kind() == kind)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Attribute {
    type Err = LandingZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.key() == s)
            .ok_or_else(|| LandingZoneError::UnknownAttribute(s.to_string()))
    }
}
