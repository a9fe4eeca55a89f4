use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A noise octave count constrained to [1, 16]. Out-of-range values, including
/// zero and negatives, are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct Octaves(u32);

impl Octaves {
    const MIN: i32 = 1;
    const MAX: i32 = 16;

    pub fn new(value: i32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<i32> for Octaves {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl From<Octaves> for i32 {
    fn from(octaves: Octaves) -> Self {
        octaves.0 as i32
    }
}

impl Default for Octaves {
    fn default() -> Self {
        Self::new(crate::terrain::constants::DEFAULT_OCTAVES)
    }
}

/// Amplitude decay per octave, constrained to [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Persistence(f32);

impl Persistence {
    const MIN: f32 = 0.0;
    const MAX: f32 = 1.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for Persistence {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Persistence> for f32 {
    fn from(persistence: Persistence) -> Self {
        persistence.0
    }
}

impl Default for Persistence {
    fn default() -> Self {
        Self::new(crate::terrain::constants::DEFAULT_PERSISTENCE)
    }
}

/// Frequency growth per octave, constrained to [1.0, 16.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Lacunarity(f32);

impl Lacunarity {
    const MIN: f32 = 1.0;
    const MAX: f32 = 16.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for Lacunarity {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Lacunarity> for f32 {
    fn from(lacunarity: Lacunarity) -> Self {
        lacunarity.0
    }
}

impl Default for Lacunarity {
    fn default() -> Self {
        Self::new(crate::terrain::constants::DEFAULT_LACUNARITY)
    }
}
