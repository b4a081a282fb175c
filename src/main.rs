//! Headless demo session
//!
//! Wires the controller to the in-memory store and simulated widgets, then
//! plays a short scripted session: late widget mount, a drag, a zoom, and a
//! recenter request. Pass a TOML config path as the first argument to
//! override the defaults; set `RUST_LOG` for more detail.

use std::rc::Rc;

use tokio::task::LocalSet;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use geomap_sync::platform::simulated::{SimulatedCircle, SimulatedMap};
use geomap_sync::store::MemoryStore;
use geomap_sync::{
    AppError, Intent, IntentSink, LatLng, MapSyncController, StateSource, SyncConfig, SyncDeps,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SyncConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                std::process::exit(1);
            }
        },
        None => SyncConfig::default(),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("failed to start runtime: {e}");
            std::process::exit(1);
        }
    };

    let local = LocalSet::new();
    if let Err(e) = runtime.block_on(local.run_until(run_session(config))) {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run_session(config: SyncConfig) -> Result<(), AppError> {
    let start = config.defaults.fallback().to_text();
    let store = Rc::new(MemoryStore::new(start, config.defaults.viewport()));
    let deps = SyncDeps::from_store(store.clone()).with_upstream(Rc::new(|pair: LatLng| {
        info!(latitude = pair.latitude, longitude = pair.longitude, "upstream drag sink");
    }));
    let mount_delay = config.timing.mount_delay();
    let debounce = config.timing.debounce();
    let controller = Rc::new(MapSyncController::new(config, deps)?);

    let weak = Rc::downgrade(&controller);
    store.subscribe(Rc::new(move || {
        if let Some(controller) = weak.upgrade() {
            controller.on_store_changed();
        }
    }));

    controller.activate()?;

    // The widget library finishes initializing some time after activation
    tokio::time::sleep(mount_delay / 4).await;
    let view = controller.map_view();
    info!(zoom = view.zoom, controls = ?view.controls, "mounting map");
    let map = SimulatedMap::new(view.center, view.zoom);
    let circle = SimulatedCircle::new(controller.circle_geometry().center);
    let handles = controller.handles();
    handles.map.set(map.clone());
    handles.circle.set(circle.clone());

    controller.gate().wait().await;
    info!(phase = ?controller.mount_phase(), "map is interactive");

    circle.drag_to(LatLng::new(55.123456, 37.987654));
    map.user_zoom(7);
    info!(geometry = ?controller.circle_geometry(), "after drag and zoom");

    store.dispatch(Intent::CenterBooleanToggle { value: true });
    tokio::time::sleep(debounce * 2).await;

    info!(
        recenter = ?controller.recenter_state(),
        camera_moves = map.moves().len(),
        intents = store.history().len(),
        coordinates = ?store.coordinates(),
        "session finished"
    );
    controller.teardown();
    Ok(())
}
