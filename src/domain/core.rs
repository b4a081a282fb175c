//! Core domain types and operations
//!
//! This module defines pure geographic types that have no knowledge of the
//! map widget or the application store.

use serde::{Deserialize, Serialize};

/// Number of decimal places kept when a dragged position is normalized
pub const COORDINATE_PRECISION: i32 = 4;

/// Geographic position in decimal degrees
///
/// Always holds finite values. Construction from untrusted text goes
/// through [`crate::domain::coords::CoordinateParser`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    /// Creates a new coordinate pair
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the pair rounded to [`COORDINATE_PRECISION`] decimal places
    ///
    /// Rounds the scaled binary value to nearest, ties away from zero. A
    /// decimal half that is not exact in binary (such as `0.00015`) may
    /// round down.
    pub fn rounded(&self) -> Self {
        Self::new(
            round_to_precision(self.latitude),
            round_to_precision(self.longitude),
        )
    }

    /// Formats both axes as the text stored by the application
    pub fn to_text(&self) -> CoordinateText {
        CoordinateText::new(self.latitude.to_string(), self.longitude.to_string())
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self::new(latitude, longitude)
    }
}

/// Coordinate pair as held by the application store
///
/// Both fields are independent free-form text. Nothing guarantees that
/// they parse; readers derive a [`LatLng`] on every access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinateText {
    pub latitude: String,
    pub longitude: String,
}

impl CoordinateText {
    /// Creates a coordinate text pair
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }
}

fn round_to_precision(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_PRECISION);
    (value * scale).round() / scale
}
