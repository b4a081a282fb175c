//! Coordinate text parsing with deterministic fallback
//!
//! The store keeps latitude and longitude as free-form text. Every read
//! goes through [`CoordinateParser`], which never fails: anything that is
//! not a finite, in-range degree value resolves to the configured default
//! for that axis.

use crate::domain::core::{CoordinateText, LatLng};

/// Latitude used when the stored text cannot be parsed
pub const DEFAULT_LATITUDE: f64 = 55.751244;
/// Longitude used when the stored text cannot be parsed
pub const DEFAULT_LONGITUDE: f64 = 37.618423;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Which coordinate axis a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => MAX_LATITUDE,
            Axis::Longitude => MAX_LONGITUDE,
        }
    }
}

/// Pure text-to-degrees parser
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateParser {
    fallback: LatLng,
}

impl Default for CoordinateParser {
    fn default() -> Self {
        Self::new(LatLng::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE))
    }
}

impl CoordinateParser {
    /// Creates a parser with a custom fallback position
    ///
    /// A fallback that is itself invalid is replaced by the built-in
    /// default so the parser can never produce a non-finite value.
    pub fn new(fallback: LatLng) -> Self {
        let latitude = checked(fallback.latitude, Axis::Latitude).unwrap_or(DEFAULT_LATITUDE);
        let longitude = checked(fallback.longitude, Axis::Longitude).unwrap_or(DEFAULT_LONGITUDE);
        Self {
            fallback: LatLng::new(latitude, longitude),
        }
    }

    /// Returns the position used for unparseable input
    pub fn fallback(&self) -> LatLng {
        self.fallback
    }

    /// Parses a single axis value
    ///
    /// # Arguments
    /// * `text` - Raw text, surrounding whitespace is ignored
    /// * `axis` - Axis the value belongs to, selects range and fallback
    ///
    /// # Returns
    /// The parsed degrees, or the fallback for that axis
    pub fn parse_axis(&self, text: &str, axis: Axis) -> f64 {
        text.trim()
            .parse::<f64>()
            .ok()
            .and_then(|value| checked(value, axis))
            .unwrap_or(match axis {
                Axis::Latitude => self.fallback.latitude,
                Axis::Longitude => self.fallback.longitude,
            })
    }

    /// Parses a latitude value
    pub fn parse_latitude(&self, text: &str) -> f64 {
        self.parse_axis(text, Axis::Latitude)
    }

    /// Parses a longitude value
    pub fn parse_longitude(&self, text: &str) -> f64 {
        self.parse_axis(text, Axis::Longitude)
    }

    /// Derives a position from the stored text pair
    ///
    /// Each axis falls back independently.
    pub fn parse(&self, text: &CoordinateText) -> LatLng {
        LatLng::new(
            self.parse_latitude(&text.latitude),
            self.parse_longitude(&text.longitude),
        )
    }
}

fn checked(value: f64, axis: Axis) -> Option<f64> {
    (value.is_finite() && value.abs() <= axis.limit()).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parses_plain_decimal_text() {
        let parser = CoordinateParser::default();
        assert_relative_eq!(parser.parse_latitude("55.1235"), 55.1235);
        assert_relative_eq!(parser.parse_longitude("-122.4194"), -122.4194);
    }

    #[test]
    fn ignores_surrounding_whitespace() {
        let parser = CoordinateParser::default();
        assert_relative_eq!(parser.parse_latitude("  12.5 \n"), 12.5);
    }

    #[test]
    fn malformed_text_resolves_to_default() {
        let parser = CoordinateParser::default();
        for text in ["", "   ", "abc", "55,75", "12.3.4", "NaN", "inf", "-infinity"] {
            let value = parser.parse_latitude(text);
            assert!(value.is_finite(), "non-finite result for {text:?}");
            assert_relative_eq!(value, DEFAULT_LATITUDE);
        }
    }

    #[test]
    fn out_of_range_values_resolve_to_default() {
        let parser = CoordinateParser::default();
        assert_relative_eq!(parser.parse_latitude("90.0001"), DEFAULT_LATITUDE);
        assert_relative_eq!(parser.parse_latitude("-91"), DEFAULT_LATITUDE);
        assert_relative_eq!(parser.parse_longitude("180.5"), DEFAULT_LONGITUDE);
        // Range is axis specific
        assert_relative_eq!(parser.parse_longitude("120"), 120.0);
    }

    #[test]
    fn range_boundaries_are_accepted() {
        let parser = CoordinateParser::default();
        assert_relative_eq!(parser.parse_latitude("-90"), -90.0);
        assert_relative_eq!(parser.parse_longitude("180"), 180.0);
    }

    #[test]
    fn axes_fall_back_independently() {
        let parser = CoordinateParser::default();
        let pair = parser.parse(&CoordinateText::new("48.8566", "garbage"));
        assert_relative_eq!(pair.latitude, 48.8566);
        assert_relative_eq!(pair.longitude, DEFAULT_LONGITUDE);
    }

    #[test]
    fn parsing_is_idempotent() {
        let parser = CoordinateParser::default();
        let text = CoordinateText::new("10.5", "oops");
        assert_eq!(parser.parse(&text), parser.parse(&text));
    }

    #[test]
    fn custom_fallback_is_used() {
        let parser = CoordinateParser::new(LatLng::new(1.0, 2.0));
        assert_eq!(parser.parse(&CoordinateText::default()), LatLng::new(1.0, 2.0));
    }

    #[test]
    fn invalid_fallback_is_replaced() {
        let parser = CoordinateParser::new(LatLng::new(f64::NAN, 500.0));
        assert_eq!(
            parser.fallback(),
            LatLng::new(DEFAULT_LATITUDE, DEFAULT_LONGITUDE)
        );
    }
}
