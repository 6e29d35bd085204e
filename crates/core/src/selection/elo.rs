use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Target playing strength, always within [`EloRating::MIN`, `EloRating::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct EloRating(u16);

impl EloRating {
    pub const MIN: i32 = 800;
    pub const MAX: i32 = 2500;

    /// Rejects ratings outside [800, 2500].
    pub fn new(value: i32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u16))
        } else {
            Err(Error::InvalidElo(value))
        }
    }

    /// Saturates to the nearest bound.
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX) as u16)
    }

    pub fn get(&self) -> i32 {
        i32::from(self.0)
    }

    /// Linear map of the rating onto [0, 1].
    pub fn strength(&self) -> f64 {
        let span = (Self::MAX - Self::MIN) as f64;
        ((self.get() - Self::MIN) as f64 / span).clamp(0.0, 1.0)
    }
}

impl Default for EloRating {
    fn default() -> Self {
        Self(1500)
    }
}

impl TryFrom<i32> for EloRating {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<EloRating> for i32 {
    fn from(elo: EloRating) -> Self {
        elo.get()
    }
}

impl fmt::Display for EloRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
