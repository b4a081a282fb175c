//! Derived circle geometry
//!
//! The circle drawn on the map is never stored. It is recomputed from the
//! coordinate text and zoom level every time the renderer asks for it.
//! The same goes for the map camera handed over in [`MapView`].

use serde::{Deserialize, Serialize};

use crate::domain::coords::CoordinateParser;
use crate::domain::core::{CoordinateText, LatLng};
use crate::domain::zoom::radius_for_zoom;

/// Visual options handed to the circle renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleStyle {
    pub draggable: bool,
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_opacity: f32,
    pub stroke_width: u32,
}

impl Default for CircleStyle {
    fn default() -> Self {
        Self {
            draggable: true,
            fill_color: "#DB709377".to_string(),
            stroke_color: "#990066".to_string(),
            stroke_opacity: 0.8,
            stroke_width: 5,
        }
    }
}

/// Circle position and size for the current store state
#[derive(Debug, Clone, PartialEq)]
pub struct CircleGeometry {
    pub center: LatLng,
    pub radius_meters: u32,
    pub style: CircleStyle,
}

impl CircleGeometry {
    /// Derives the geometry from stored coordinate text and zoom level
    ///
    /// # Arguments
    /// * `parser` - Parser providing the fallback position
    /// * `text` - Stored coordinate text
    /// * `zoom_level` - Stored zoom level, any value is accepted
    /// * `style` - Visual options to attach
    pub fn derive(
        parser: &CoordinateParser,
        text: &CoordinateText,
        zoom_level: i32,
        style: &CircleStyle,
    ) -> Self {
        Self {
            center: parser.parse(text),
            radius_meters: radius_for_zoom(zoom_level),
            style: style.clone(),
        }
    }
}

/// Camera and chrome the map renderer starts from
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: i32,
    /// Names of the native controls to show
    pub controls: Vec<String>,
}
