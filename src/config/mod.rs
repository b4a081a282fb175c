//! Configuration module for geomap-sync
//!
//! Timing windows, widget binding strategy, parser fallback and circle
//! styling. Everything has a default so an empty file is a valid config.

pub mod sync;

pub use sync::{
    ConfigError, DefaultsConfig, MapChromeConfig, MountConfig, MountStrategy, SyncConfig,
    TimingConfig,
};
