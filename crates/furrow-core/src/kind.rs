//! Enumerations for plant species, crop life-cycle stages, rain intensity,
//! and seasons.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// One of the tabulated plant species, `0..PlantType::COUNT`.
///
/// Per-species parameters (stage durations, ideal moisture, uptake) are
/// indexed by [`PlantType::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlantType(u8);

impl PlantType {
    /// Number of plant species.
    pub const COUNT: usize = 6;

    /// Validate a raw species number.
    pub fn new(raw: u8) -> Result<Self, FieldError> {
        if (raw as usize) < Self::COUNT {
            Ok(Self(raw))
        } else {
            Err(FieldError::InvalidPlantType(raw))
        }
    }

    /// Table index for this species.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The raw species number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// All species in table order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }
}

impl TryFrom<u8> for PlantType {
    type Error = FieldError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<PlantType> for u8 {
    fn from(p: PlantType) -> u8 {
        p.0
    }
}

impl fmt::Display for PlantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Crop life-cycle stage of a cell.
///
/// A cell moves `Empty -> Seed -> Germinate -> Vegetative -> Mature` and
/// returns to `Empty` on death or harvest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum CropStage {
    /// Nothing planted.
    #[default]
    Empty = 0,
    /// Freshly sown.
    Seed = 1,
    /// Germinating.
    Germinate = 2,
    /// Vegetative growth.
    Vegetative = 3,
    /// Mature; rot starts after a per-species delay.
    Mature = 4,
}

impl CropStage {
    /// The numeric stage, `0..=4`.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether a plant occupies the cell.
    pub fn is_planted(self) -> bool {
        self != Self::Empty
    }

    /// The stage a growing plant advances into, or `None` at maturity
    /// and for empty cells.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Empty | Self::Mature => None,
            Self::Seed => Some(Self::Germinate),
            Self::Germinate => Some(Self::Vegetative),
            Self::Vegetative => Some(Self::Mature),
        }
    }

    /// Zero-based row into per-stage tables for planted stages
    /// (`Seed` is 0, `Mature` is 3). `None` for empty cells.
    pub fn table_row(self) -> Option<usize> {
        match self {
            Self::Empty => None,
            s => Some(s as usize - 1),
        }
    }
}

impl fmt::Display for CropStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Empty => "empty",
            Self::Seed => "seed",
            Self::Germinate => "germinate",
            Self::Vegetative => "vegetative",
            Self::Mature => "mature",
        };
        f.write_str(name)
    }
}

/// Discrete rain intensity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum RainLevel {
    /// Not raining.
    #[default]
    None = 0,
    /// Light rain.
    Light = 1,
    /// Moderate rain.
    Moderate = 2,
    /// Heavy rain.
    Heavy = 3,
}

impl RainLevel {
    /// All levels in table order.
    pub const ALL: [Self; 4] = [Self::None, Self::Light, Self::Moderate, Self::Heavy];

    /// Table index, `0..=3`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Level for a table index; indices past 3 saturate at [`RainLevel::Heavy`].
    pub fn from_index(i: usize) -> Self {
        Self::ALL[i.min(3)]
    }

    /// Validate the intensity of a forced rain event (`1..=3`).
    pub fn from_intensity(intensity: u8) -> Result<Self, FieldError> {
        match intensity {
            1 => Ok(Self::Light),
            2 => Ok(Self::Moderate),
            3 => Ok(Self::Heavy),
            other => Err(FieldError::InvalidRainIntensity(other)),
        }
    }

    /// Whether any rain is falling.
    pub fn is_raining(self) -> bool {
        self != Self::None
    }
}

/// Season of the (northern hemisphere) year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Days 80 to 171.
    Spring,
    /// Days 172 to 263.
    Summer,
    /// Days 264 to 354.
    Autumn,
    /// Days 355 to 79, across the year boundary.
    Winter,
}

impl Season {
    /// All seasons in table order.
    pub const ALL: [Self; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// The season containing day-of-year `day`.
    pub fn from_day(day: u32) -> Self {
        match day {
            80..=171 => Self::Spring,
            172..=263 => Self::Summer,
            264..=354 => Self::Autumn,
            _ => Self::Winter,
        }
    }

    /// Row into per-season tables.
    pub fn index(self) -> usize {
        match self {
            Self::Spring => 0,
            Self::Summer => 1,
            Self::Autumn => 2,
            Self::Winter => 3,
        }
    }
}
