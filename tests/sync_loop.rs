//! End-to-end loop: simulated widgets, in-memory store, real controller

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use geomap_sync::config::{MountConfig, SyncConfig};
use geomap_sync::platform::simulated::{SimulatedCircle, SimulatedMap};
use geomap_sync::platform::widget::MapWidget;
use geomap_sync::store::MemoryStore;
use geomap_sync::{
    CoordinateText, Intent, IntentSink, LatLng, MapSyncController, StateSource, SyncDeps,
};
use tokio::task::LocalSet;
use tokio::time::sleep;

struct Session {
    store: Rc<MemoryStore>,
    controller: Rc<MapSyncController>,
    map: Rc<SimulatedMap>,
    circle: Rc<SimulatedCircle>,
    upstream: Rc<RefCell<Vec<LatLng>>>,
}

impl Session {
    fn new(config: SyncConfig) -> Self {
        let store = Rc::new(MemoryStore::new(
            CoordinateText::new("55.7558", "37.6173"),
            config.defaults.viewport(),
        ));
        let upstream = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&upstream);
        let deps = SyncDeps::from_store(store.clone())
            .with_upstream(Rc::new(move |pair: LatLng| sink.borrow_mut().push(pair)));
        let controller = Rc::new(MapSyncController::new(config, deps).unwrap());

        let weak = Rc::downgrade(&controller);
        store.subscribe(Rc::new(move || {
            if let Some(controller) = weak.upgrade() {
                controller.on_store_changed();
            }
        }));

        let view = controller.map_view();
        Self {
            store,
            map: SimulatedMap::new(view.center, view.zoom),
            circle: SimulatedCircle::new(view.center),
            controller,
            upstream,
        }
    }

    fn mount_widgets(&self) {
        let handles = self.controller.handles();
        handles.map.set(self.map.clone());
        handles.circle.set(self.circle.clone());
    }

    fn clears(&self) -> usize {
        self.store
            .count_matching(|intent| *intent == Intent::CenterBooleanToggle { value: false })
    }
}

#[tokio::test(start_paused = true)]
async fn drag_and_zoom_flow_into_store_and_geometry() {
    LocalSet::new()
        .run_until(async {
            let session = Session::new(SyncConfig::default());
            session.controller.activate().unwrap();
            session.mount_widgets();
            session.controller.gate().wait().await;
            assert!(session.controller.is_interactive());

            session.circle.drag_to(LatLng::new(55.123456, 37.987654));
            assert_eq!(
                session.store.coordinates(),
                CoordinateText::new("55.1235", "37.9877")
            );
            assert_eq!(
                session.upstream.borrow().as_slice(),
                &[LatLng::new(55.1235, 37.9877)]
            );

            session.map.user_zoom(5);
            let geometry = session.controller.circle_geometry();
            assert_eq!(geometry.radius_meters, 80_000);
            assert_eq!(geometry.center, LatLng::new(55.1235, 37.9877));
            assert_eq!(session.store.viewport().circle_size, 80_000);

            session.map.user_zoom(12);
            assert_eq!(session.controller.circle_geometry().radius_meters, 3_000);
            assert_eq!(session.store.viewport().circle_size, 3_000);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn drag_without_geometry_leaves_store_untouched() {
    LocalSet::new()
        .run_until(async {
            let session = Session::new(SyncConfig::default());
            session.controller.activate().unwrap();
            session.mount_widgets();
            session.controller.gate().wait().await;
            let before = session.store.history().len();

            session.circle.emit(Default::default());

            assert_eq!(session.store.history().len(), before);
            assert_eq!(
                session.store.coordinates(),
                CoordinateText::new("55.7558", "37.6173")
            );
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn recenter_echo_settles_with_one_clear() {
    LocalSet::new()
        .run_until(async {
            let session = Session::new(SyncConfig::default());
            session.controller.activate().unwrap();
            session.mount_widgets();
            session.controller.gate().wait().await;

            session
                .store
                .dispatch(Intent::CenterBooleanToggle { value: true });
            assert_eq!(session.map.moves().len(), 1);

            // Three upstream coordinate edits, each echoed by the widget
            for step in 1..=3 {
                sleep(Duration::from_millis(80)).await;
                session.store.dispatch(Intent::CoordsChanged {
                    latitude: format!("55.{step}"),
                    longitude: "37.6".to_string(),
                });
                session.map.settle();
            }
            assert_eq!(session.map.moves().len(), 4);
            assert_eq!(session.clears(), 0);

            sleep(Duration::from_millis(299)).await;
            assert_eq!(session.clears(), 0);
            assert!(session.controller.recenter_state().is_pending());

            sleep(Duration::from_millis(2)).await;
            assert_eq!(session.clears(), 1);
            assert!(!session.store.viewport().should_recenter);

            sleep(Duration::from_secs(10)).await;
            assert_eq!(session.clears(), 1);
            assert_eq!(session.map.moves().len(), 4);
            assert_eq!(session.map.center(), LatLng::new(55.3, 37.6));
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn each_activation_clears_once() {
    LocalSet::new()
        .run_until(async {
            let session = Session::new(SyncConfig::default());
            session.controller.activate().unwrap();
            session.mount_widgets();

            for round in 1..=3 {
                session
                    .store
                    .dispatch(Intent::CenterBooleanToggle { value: true });
                sleep(Duration::from_millis(500)).await;
                assert_eq!(session.clears(), round);
            }
            assert_eq!(session.controller.recenter().activations(), 3);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn late_widgets_with_legacy_mount_stay_unbound() {
    LocalSet::new()
        .run_until(async {
            let config = SyncConfig {
                mount: MountConfig::legacy(),
                ..SyncConfig::default()
            };
            let session = Session::new(config);
            session.controller.activate().unwrap();

            sleep(Duration::from_millis(1500)).await;
            session.mount_widgets();
            sleep(Duration::from_secs(5)).await;

            assert!(!session.controller.is_interactive());
            session.circle.drag_to(LatLng::new(1.0, 1.0));
            session.map.user_zoom(4);
            assert!(session.store.history().is_empty());
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn teardown_stops_pending_work() {
    LocalSet::new()
        .run_until(async {
            let session = Session::new(SyncConfig::default());
            session.controller.activate().unwrap();
            session.mount_widgets();
            session.controller.gate().wait().await;

            session
                .store
                .dispatch(Intent::CenterBooleanToggle { value: true });
            session.controller.teardown();
            sleep(Duration::from_secs(1)).await;

            assert_eq!(session.clears(), 0);
            assert!(session.store.viewport().should_recenter);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn widget_events_after_teardown_are_ignored() {
    LocalSet::new()
        .run_until(async {
            let session = Session::new(SyncConfig::default());
            session.controller.activate().unwrap();
            session.mount_widgets();
            session.controller.gate().wait().await;

            session.controller.teardown();
            let before = session.store.history().len();
            session.circle.drag_to(LatLng::new(1.0, 1.0));
            session.map.user_zoom(4);

            assert_eq!(session.store.history().len(), before);
            assert!(session.upstream.borrow().is_empty());
            assert_eq!(
                session.store.coordinates(),
                CoordinateText::new("55.7558", "37.6173")
            );
            assert_eq!(session.store.viewport().zoom_level, 9);
        })
        .await;
}

#[tokio::test(start_paused = true)]
async fn configured_zoom_seeds_store_and_map() {
    LocalSet::new()
        .run_until(async {
            let config = SyncConfig::from_toml_str("[defaults]\nzoom = 5").unwrap();
            let session = Session::new(config);
            session.controller.activate().unwrap();

            assert_eq!(session.store.viewport().zoom_level, 5);
            assert_eq!(session.store.viewport().circle_size, 80_000);
            assert_eq!(session.controller.circle_geometry().radius_meters, 80_000);
            assert_eq!(session.map.zoom(), Some(5));
            assert!(session.store.history().is_empty());
        })
        .await;
}
