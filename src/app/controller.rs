//! Map synchronization controller
//!
//! The controller owns the widget handles, the recenter controller and the
//! mount sequencer, and is the single entry point the host application talks
//! to. Store access is injected; the controller never reaches for ambient
//! state.

use std::cell::Cell;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, info};

use crate::app::mount::{LoadingGate, MountBindingSequencer, MountError, MountPhase};
use crate::app::recenter::RecenterController;
use crate::app::state::RecenterState;
use crate::config::{ConfigError, SyncConfig};
use crate::domain::coords::CoordinateParser;
use crate::domain::geometry::{CircleGeometry, MapView};
use crate::domain::zoom::{is_tabulated, radius_for_zoom};
use crate::input::UpstreamSink;
use crate::platform::widget::WidgetHandles;
use crate::store::{Intent, IntentSink, StateSource};

/// Application errors that can occur during controller operations
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("widget binding error: {0}")]
    Mount(#[from] MountError),
}

/// Store interfaces and optional upstream sink the controller works with
pub struct SyncDeps {
    pub source: Rc<dyn StateSource>,
    pub sink: Rc<dyn IntentSink>,
    pub upstream: Option<UpstreamSink>,
}

impl SyncDeps {
    /// Uses one object for both store interfaces
    pub fn from_store<S>(store: Rc<S>) -> Self
    where
        S: StateSource + IntentSink + 'static,
    {
        Self {
            source: store.clone(),
            sink: store,
            upstream: None,
        }
    }

    pub fn with_upstream(mut self, upstream: UpstreamSink) -> Self {
        self.upstream = Some(upstream);
        self
    }
}

/// Main synchronization controller
///
/// Lives on a single thread. [`MapSyncController::activate`] and
/// [`MapSyncController::on_store_changed`] must run inside a `LocalSet`.
pub struct MapSyncController {
    config: SyncConfig,
    parser: CoordinateParser,
    source: Rc<dyn StateSource>,
    sink: Rc<dyn IntentSink>,
    handles: Rc<WidgetHandles>,
    recenter: RecenterController,
    mount: MountBindingSequencer,
    torn_down: Cell<bool>,
}

impl MapSyncController {
    /// Creates a new controller
    ///
    /// # Returns
    /// MapSyncController instance or AppError if the configuration is invalid
    pub fn new(config: SyncConfig, deps: SyncDeps) -> Result<Self, AppError> {
        config.validate()?;

        let parser = CoordinateParser::new(config.defaults.fallback());
        let handles = WidgetHandles::new();
        let recenter = RecenterController::new(
            &config.timing,
            parser,
            Rc::clone(&deps.sink),
            Rc::clone(&handles),
        );
        let mount = MountBindingSequencer::new(
            config.mount,
            config.timing.mount_delay(),
            Rc::clone(&handles),
            Rc::clone(&deps.sink),
            deps.upstream,
        );

        Ok(Self {
            config,
            parser,
            source: deps.source,
            sink: deps.sink,
            handles,
            recenter,
            mount,
            torn_down: Cell::new(false),
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Widget slots for the widget-wrapping collaborator to fill
    pub fn handles(&self) -> Rc<WidgetHandles> {
        Rc::clone(&self.handles)
    }

    /// UI-blocking gate, released after the adapters are bound
    pub fn gate(&self) -> Rc<LoadingGate> {
        self.mount.gate()
    }

    pub fn is_interactive(&self) -> bool {
        self.mount.gate().is_released()
    }

    pub fn mount_phase(&self) -> MountPhase {
        self.mount.phase()
    }

    pub fn recenter_state(&self) -> RecenterState {
        self.recenter.state()
    }

    pub fn recenter(&self) -> &RecenterController {
        &self.recenter
    }

    /// Starts widget binding and takes the first look at the store
    pub fn activate(&self) -> Result<(), AppError> {
        info!(
            strategy = ?self.config.mount.strategy,
            retries = self.config.mount.retries,
            "activating map synchronization"
        );
        self.mount.start()?;
        self.on_store_changed();
        Ok(())
    }

    /// Reacts to a store change
    ///
    /// Feeds the recenter controller first, then brings the stored circle
    /// size in line with the zoom level. Safe to call re-entrantly from a
    /// store listener.
    pub fn on_store_changed(&self) {
        if self.torn_down.get() {
            return;
        }
        let coordinates = self.source.coordinates();
        let viewport = self.source.viewport();
        self.recenter.observe(&coordinates, &viewport);

        let viewport = self.source.viewport();
        let radius = radius_for_zoom(viewport.zoom_level);
        if viewport.circle_size != radius {
            debug!(
                zoom = viewport.zoom_level,
                tabulated = is_tabulated(viewport.zoom_level),
                from = viewport.circle_size,
                to = radius,
                "circle size out of date"
            );
            self.sink.dispatch(Intent::CircleSizeChanged {
                radius_meters: radius,
            });
        }
    }

    /// Circle to render for the current store state
    pub fn circle_geometry(&self) -> CircleGeometry {
        CircleGeometry::derive(
            &self.parser,
            &self.source.coordinates(),
            self.source.viewport().zoom_level,
            &self.config.circle,
        )
    }

    /// Map camera and controls to render for the current store state
    pub fn map_view(&self) -> MapView {
        MapView {
            center: self.parser.parse(&self.source.coordinates()),
            zoom: self.source.viewport().zoom_level,
            controls: self.config.map.controls.clone(),
        }
    }

    /// Cancels every pending timer and detaches the widget adapters; later
    /// store changes and widget events are ignored
    pub fn teardown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        debug!("tearing down map synchronization");
        self.mount.teardown();
        self.recenter.teardown();
    }
}

impl Drop for MapSyncController {
    fn drop(&mut self) {
        self.teardown();
    }
}
