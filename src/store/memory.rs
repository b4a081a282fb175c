//! In-memory reference store
//!
//! Applies intents with the obvious field assignments and notifies
//! listeners after every change. Used by the demo binary and by tests that
//! need a live loop without a host application.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

use crate::domain::core::CoordinateText;
use crate::store::{Intent, IntentSink, StateSource, ViewportState};

/// Listener invoked after the store state changed
pub type StoreListener = Rc<dyn Fn()>;

/// Identifier returned by [`MemoryStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone, Default)]
struct StoreState {
    coordinates: CoordinateText,
    viewport: ViewportState,
}

/// Single-threaded store holding the coordinate and viewport slices
#[derive(Default)]
pub struct MemoryStore {
    state: RefCell<StoreState>,
    history: RefCell<Vec<Intent>>,
    listeners: RefCell<Vec<(ListenerId, StoreListener)>>,
    next_listener: Cell<u64>,
}

impl MemoryStore {
    /// Creates a store with the given initial slices
    pub fn new(coordinates: CoordinateText, viewport: ViewportState) -> Self {
        Self {
            state: RefCell::new(StoreState {
                coordinates,
                viewport,
            }),
            ..Default::default()
        }
    }

    /// Registers a change listener
    pub fn subscribe(&self, listener: StoreListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    /// Removes a change listener, returns false if it was not registered
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Every intent dispatched so far, oldest first
    pub fn history(&self) -> Vec<Intent> {
        self.history.borrow().clone()
    }

    /// Number of dispatched intents matching a predicate
    pub fn count_matching(&self, predicate: impl Fn(&Intent) -> bool) -> usize {
        self.history.borrow().iter().filter(|intent| predicate(intent)).count()
    }

    fn apply(&self, intent: &Intent) -> bool {
        let mut state = self.state.borrow_mut();
        let before = (state.coordinates.clone(), state.viewport);
        match intent {
            Intent::CoordsChanged {
                latitude,
                longitude,
            } => {
                state.coordinates = CoordinateText::new(latitude.clone(), longitude.clone());
            }
            Intent::ZoomChanged { zoom_level } => state.viewport.zoom_level = *zoom_level,
            Intent::CircleSizeChanged { radius_meters } => {
                state.viewport.circle_size = *radius_meters
            }
            Intent::CenterBooleanToggle { value } => state.viewport.should_recenter = *value,
        }
        before != (state.coordinates.clone(), state.viewport)
    }

    fn notify(&self) {
        // Listeners may dispatch again, so never hold the borrow while calling
        let listeners: Vec<StoreListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

impl IntentSink for MemoryStore {
    fn dispatch(&self, intent: Intent) {
        trace!(?intent, "store dispatch");
        let changed = self.apply(&intent);
        self.history.borrow_mut().push(intent);
        if changed {
            self.notify();
        }
    }
}

impl StateSource for MemoryStore {
    fn coordinates(&self) -> CoordinateText {
        self.state.borrow().coordinates.clone()
    }

    fn viewport(&self) -> ViewportState {
        self.state.borrow().viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_update_slices() {
        let store = MemoryStore::default();
        store.dispatch(Intent::coords_changed(CoordinateText::new("1.5", "2.5")));
        store.dispatch(Intent::ZoomChanged { zoom_level: 4 });
        store.dispatch(Intent::CircleSizeChanged {
            radius_meters: 160_000,
        });
        store.dispatch(Intent::CenterBooleanToggle { value: true });

        assert_eq!(store.coordinates(), CoordinateText::new("1.5", "2.5"));
        let viewport = store.viewport();
        assert_eq!(viewport.zoom_level, 4);
        assert_eq!(viewport.circle_size, 160_000);
        assert!(viewport.should_recenter);
        assert_eq!(store.history().len(), 4);
    }

    #[test]
    fn listeners_fire_only_on_change() {
        let store = MemoryStore::default();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        store.subscribe(Rc::new(move || counter.set(counter.get() + 1)));

        store.dispatch(Intent::ZoomChanged { zoom_level: 5 });
        store.dispatch(Intent::ZoomChanged { zoom_level: 5 });
        assert_eq!(calls.get(), 1);
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn unsubscribed_listener_is_silent() {
        let store = MemoryStore::default();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let id = store.subscribe(Rc::new(move || counter.set(counter.get() + 1)));

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(Intent::ZoomChanged { zoom_level: 6 });
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn listener_may_dispatch_reentrantly() {
        let store = Rc::new(MemoryStore::default());
        let weak = Rc::downgrade(&store);
        store.subscribe(Rc::new(move || {
            if let Some(store) = weak.upgrade() {
                if store.viewport().should_recenter {
                    store.dispatch(Intent::CenterBooleanToggle { value: false });
                }
            }
        }));

        store.dispatch(Intent::CenterBooleanToggle { value: true });
        assert!(!store.viewport().should_recenter);
    }
}
