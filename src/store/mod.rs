//! Application store interfaces
//!
//! The store is owned by the host application. The synchronization core only
//! reads two state slices through [`StateSource`] and sends [`Intent`]s
//! through [`IntentSink`]; how the store applies them is not its concern.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::domain::core::CoordinateText;
use crate::domain::zoom::radius_for_zoom;

pub use memory::MemoryStore;

/// Requested state change sent to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Intent {
    /// Circle was moved to a new position
    #[serde(rename_all = "camelCase")]
    CoordsChanged { latitude: String, longitude: String },
    /// Map viewport settled at a new zoom level
    #[serde(rename_all = "camelCase")]
    ZoomChanged { zoom_level: i32 },
    /// Derived circle radius changed
    #[serde(rename_all = "camelCase")]
    CircleSizeChanged { radius_meters: u32 },
    /// Set or clear the recenter request flag
    CenterBooleanToggle { value: bool },
}

impl Intent {
    /// Builds a coordinate-change intent from a stored text pair
    pub fn coords_changed(text: CoordinateText) -> Self {
        Intent::CoordsChanged {
            latitude: text.latitude,
            longitude: text.longitude,
        }
    }
}

/// Viewport slice of the application state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub zoom_level: i32,
    pub should_recenter: bool,
    pub circle_size: u32,
}

impl ViewportState {
    /// Settled viewport at a zoom level, with the matching circle size
    pub fn at_zoom(zoom_level: i32) -> Self {
        Self {
            zoom_level,
            should_recenter: false,
            circle_size: radius_for_zoom(zoom_level),
        }
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::at_zoom(9)
    }
}

/// Write side of the store
pub trait IntentSink {
    /// Sends an intent to the store
    fn dispatch(&self, intent: Intent);
}

/// Read side of the store
pub trait StateSource {
    /// Current coordinate text pair
    fn coordinates(&self) -> CoordinateText;

    /// Current viewport slice
    fn viewport(&self) -> ViewportState;
}
