//! Map viewport-settled handling

use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use crate::input::Detach;
use crate::platform::widget::{ACTION_END_EVENT, ActionEndEvent, MapWidget};
use crate::store::{Intent, IntentSink};

/// Adapter between the map's viewport-settled event and the store
///
/// Keeps only a weak reference to the map: the map owns the registered
/// callback, which owns this adapter.
pub struct ViewportAdapter {
    sink: Rc<dyn IntentSink>,
    map: Weak<dyn MapWidget>,
    detach: Detach,
}

impl ViewportAdapter {
    pub fn new(sink: Rc<dyn IntentSink>, map: &Rc<dyn MapWidget>) -> Self {
        Self {
            sink,
            map: Rc::downgrade(map),
            detach: Detach::new(),
        }
    }

    /// Ties this adapter to a shared off switch
    pub fn with_detach(mut self, detach: Detach) -> Self {
        self.detach = detach;
        self
    }

    /// Handles one viewport-settled event
    ///
    /// # Returns
    /// The zoom level that was dispatched, or `None` if the map could not
    /// report one or the adapter was detached
    pub fn handle(&self, _event: ActionEndEvent) -> Option<i32> {
        if self.detach.is_detached() {
            trace!(event = ACTION_END_EVENT, "adapter detached, event ignored");
            return None;
        }
        let Some(zoom) = self.map.upgrade().and_then(|map| map.zoom()) else {
            trace!(event = ACTION_END_EVENT, "no readable zoom level, event ignored");
            return None;
        };
        debug!(zoom, "viewport settled");
        self.sink.dispatch(Intent::ZoomChanged { zoom_level: zoom });
        Some(zoom)
    }

    /// Registers this adapter on its map instance, no-op if the map is gone
    pub fn attach(self: Rc<Self>) {
        let Some(map) = self.map.upgrade() else {
            return;
        };
        map.on_action_end(Box::new(move |event| {
            self.handle(event);
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::core::LatLng;
    use crate::platform::simulated::SimulatedMap;
    use crate::store::{MemoryStore, StateSource};

    #[test]
    fn settle_dispatches_current_zoom() {
        let store = Rc::new(MemoryStore::default());
        let simulated = SimulatedMap::new(LatLng::new(0.0, 0.0), 9);
        let map: Rc<dyn MapWidget> = simulated.clone();
        Rc::new(ViewportAdapter::new(store.clone(), &map)).attach();

        simulated.user_zoom(6);

        assert_eq!(store.history(), vec![Intent::ZoomChanged { zoom_level: 6 }]);
        assert_eq!(store.viewport().zoom_level, 6);
    }

    #[test]
    fn missing_zoom_is_ignored() {
        let store = Rc::new(MemoryStore::default());
        let simulated = SimulatedMap::new(LatLng::new(0.0, 0.0), 9);
        simulated.lose_zoom();
        let map: Rc<dyn MapWidget> = simulated.clone();
        let adapter = ViewportAdapter::new(store.clone(), &map);

        assert_eq!(adapter.handle(ActionEndEvent), None);
        assert!(store.history().is_empty());
    }

    #[test]
    fn detached_adapter_ignores_settles() {
        let store = Rc::new(MemoryStore::default());
        let simulated = SimulatedMap::new(LatLng::new(0.0, 0.0), 9);
        let map: Rc<dyn MapWidget> = simulated.clone();
        let detach = Detach::new();
        Rc::new(ViewportAdapter::new(store.clone(), &map).with_detach(detach.clone())).attach();

        simulated.user_zoom(6);
        detach.detach();
        simulated.user_zoom(4);

        assert_eq!(store.history(), vec![Intent::ZoomChanged { zoom_level: 6 }]);
    }

    #[test]
    fn dropped_map_is_ignored() {
        let store = Rc::new(MemoryStore::default());
        let map: Rc<dyn MapWidget> = SimulatedMap::new(LatLng::new(0.0, 0.0), 9);
        let adapter = ViewportAdapter::new(store.clone(), &map);
        drop(map);

        assert_eq!(adapter.handle(ActionEndEvent), None);
        assert!(store.history().is_empty());
    }
}
