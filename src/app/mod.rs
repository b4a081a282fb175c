//! Application orchestration layer
//!
//! This module coordinates between the widget adapters, the store and the
//! domain logic. It owns the recenter state machine and the widget binding
//! sequence.

pub mod controller;
pub mod mount;
pub mod recenter;
pub mod state;

pub use controller::{AppError, MapSyncController, SyncDeps};
pub use mount::{LoadingGate, MountBindingSequencer, MountError, MountPhase};
pub use recenter::RecenterController;
pub use state::{RecenterEvent, RecenterState};
