//! Two-way synchronization between an interactive map with a draggable
//! radius circle and application-owned state.
//!
//! Widget events become store intents through the [`input`] adapters;
//! store changes become camera commands through [`app::RecenterController`].
//! The recenter quiet window is what keeps that loop from feeding back on
//! itself.

pub mod app;
pub mod config;
pub mod domain;
pub mod input;
pub mod platform;
pub mod store;

pub use app::{AppError, MapSyncController, SyncDeps};
pub use config::SyncConfig;
pub use domain::{CircleGeometry, CoordinateText, LatLng, MapView};
pub use store::{Intent, IntentSink, StateSource, ViewportState};
