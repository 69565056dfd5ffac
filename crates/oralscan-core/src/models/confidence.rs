use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// A classifier confidence percentage, always within `[0, 100]`.
///
/// The only way to build one is through [`Confidence::from_raw`] (or
/// deserialization, which goes through the same path), so a missing,
/// negative, or `NaN` upstream value can never reach the report layout.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Confidence(f64);

impl Confidence {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    /// Clamp an optional upstream value into range. `None` and `NaN` map to 0.
    pub fn from_raw(raw: Option<f64>) -> Self {
        match raw {
            Some(v) if v.is_nan() => Self(Self::MIN),
            Some(v) => Self(v.clamp(Self::MIN, Self::MAX)),
            None => Self(Self::MIN),
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Confidence {
    /// One decimal place, e.g. `97.2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<f64>::deserialize(deserializer)?;
        Ok(Self::from_raw(raw))
    }
}
