use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::coords::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE};
use crate::domain::core::LatLng;
use crate::domain::geometry::CircleStyle;
use crate::store::ViewportState;

/// Timing windows of the synchronization loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Quiet window after which a recenter request is cleared
    pub debounce_ms: u64,
    /// Delay before checking whether the widgets are ready
    pub mount_delay_ms: u64,
    /// Animation length of programmatic camera moves
    pub recenter_animation_ms: u64,
}

impl TimingConfig {
    pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
    pub const DEFAULT_MOUNT_DELAY_MS: u64 = 1000;
    pub const DEFAULT_ANIMATION_MS: u64 = 500;

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn mount_delay(&self) -> Duration {
        Duration::from_millis(self.mount_delay_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: Self::DEFAULT_DEBOUNCE_MS,
            mount_delay_ms: Self::DEFAULT_MOUNT_DELAY_MS,
            recenter_animation_ms: Self::DEFAULT_ANIMATION_MS,
        }
    }
}

/// How the mount sequencer detects that the widgets exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MountStrategy {
    /// Wait blindly for the mount delay, then look once per attempt
    FixedDelay,
    /// Wait for the widget slots' readiness notification, bounded by the
    /// mount delay per attempt
    #[default]
    ReadySignal,
}

/// Widget binding behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    pub strategy: MountStrategy,
    /// Extra attempts after the first one; 0 means a single attempt
    pub retries: u32,
}

impl MountConfig {
    pub const MAX_RETRIES: u32 = 10;

    /// Single blind check after the delay, no retry
    pub fn legacy() -> Self {
        Self {
            strategy: MountStrategy::FixedDelay,
            retries: 0,
        }
    }
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            strategy: MountStrategy::ReadySignal,
            retries: 2,
        }
    }
}

/// Initial map state and parser fallback
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Fallback used for unparseable coordinate text
    pub latitude: f64,
    pub longitude: f64,
    /// Zoom level the map starts with
    pub zoom: i32,
}

impl DefaultsConfig {
    pub const DEFAULT_ZOOM: i32 = 9;

    pub fn fallback(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Viewport slice the application store starts with
    pub fn viewport(&self) -> ViewportState {
        ViewportState::at_zoom(self.zoom)
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            zoom: Self::DEFAULT_ZOOM,
        }
    }
}

/// Map chrome handed to the rendering collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapChromeConfig {
    pub controls: Vec<String>,
}

impl Default for MapChromeConfig {
    fn default() -> Self {
        Self {
            controls: vec!["zoomControl".to_string(), "fullscreenControl".to_string()],
        }
    }
}

/// Complete configuration of the synchronization core
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub timing: TimingConfig,
    pub mount: MountConfig,
    pub defaults: DefaultsConfig,
    pub circle: CircleStyle,
    pub map: MapChromeConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SyncConfig {
    /// Parses and validates a TOML document; missing keys take defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Rejects values the synchronization loop cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.debounce_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.debounce_ms",
                reason: "quiet window must be positive".to_string(),
            });
        }
        if self.timing.mount_delay_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.mount_delay_ms",
                reason: "mount delay must be positive".to_string(),
            });
        }
        if self.mount.retries > MountConfig::MAX_RETRIES {
            return Err(ConfigError::Invalid {
                field: "mount.retries",
                reason: format!("at most {} retries allowed", MountConfig::MAX_RETRIES),
            });
        }
        if !(self.defaults.latitude.is_finite() && self.defaults.latitude.abs() <= 90.0) {
            return Err(ConfigError::Invalid {
                field: "defaults.latitude",
                reason: format!("{} is not a latitude", self.defaults.latitude),
            });
        }
        if !(self.defaults.longitude.is_finite() && self.defaults.longitude.abs() <= 180.0) {
            return Err(ConfigError::Invalid {
                field: "defaults.longitude",
                reason: format!("{} is not a longitude", self.defaults.longitude),
            });
        }
        if !(0.0..=1.0).contains(&self.circle.stroke_opacity) {
            return Err(ConfigError::Invalid {
                field: "circle.stroke_opacity",
                reason: "opacity must be within 0..=1".to_string(),
            });
        }
        Ok(())
    }
}
