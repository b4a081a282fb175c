//! Pure domain logic for map synchronization
//!
//! No widget or store access here. Everything in this module is a pure
//! function of its inputs and can be tested in isolation.

pub mod coords;
pub mod core;
pub mod geometry;
pub mod zoom;

pub use coords::{Axis, CoordinateParser};
pub use self::core::{CoordinateText, LatLng};
pub use geometry::{CircleGeometry, CircleStyle, MapView};
pub use zoom::radius_for_zoom;
