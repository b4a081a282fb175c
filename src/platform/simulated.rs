//! Headless map and circle widgets
//!
//! Records every command and lets callers fire native events by hand.
//! Drives the demo binary and the end-to-end tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::domain::core::LatLng;
use crate::platform::widget::{
    ActionEndCallback, ActionEndEvent, CircleWidget, DragEndCallback, DragEndEvent, MapWidget,
    MoveOptions,
};

/// Camera move issued through [`MapWidget::set_center`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMove {
    pub center: LatLng,
    pub zoom: i32,
    pub options: MoveOptions,
}

/// Simulated map instance
pub struct SimulatedMap {
    zoom: Cell<Option<i32>>,
    center: Cell<LatLng>,
    moves: RefCell<Vec<CameraMove>>,
    action_end: RefCell<Vec<Rc<dyn Fn(ActionEndEvent)>>>,
}

impl SimulatedMap {
    pub fn new(center: LatLng, zoom: i32) -> Rc<Self> {
        Rc::new(Self {
            zoom: Cell::new(Some(zoom)),
            center: Cell::new(center),
            moves: RefCell::new(Vec::new()),
            action_end: RefCell::new(Vec::new()),
        })
    }

    /// Makes [`MapWidget::zoom`] report nothing, as a half-initialized map does
    pub fn lose_zoom(&self) {
        self.zoom.set(None);
    }

    /// Current camera center
    pub fn center(&self) -> LatLng {
        self.center.get()
    }

    /// Camera moves received so far
    pub fn moves(&self) -> Vec<CameraMove> {
        self.moves.borrow().clone()
    }

    /// Number of registered viewport callbacks
    pub fn listener_count(&self) -> usize {
        self.action_end.borrow().len()
    }

    /// User zooms the map; fires the viewport-settled event
    pub fn user_zoom(&self, zoom: i32) {
        self.zoom.set(Some(zoom));
        self.settle();
    }

    /// User pans the map; fires the viewport-settled event
    pub fn user_pan(&self, center: LatLng) {
        self.center.set(center);
        self.settle();
    }

    /// Fires the viewport-settled event without changing anything
    pub fn settle(&self) {
        let callbacks: Vec<_> = self.action_end.borrow().iter().map(Rc::clone).collect();
        for callback in callbacks {
            callback(ActionEndEvent);
        }
    }
}

impl MapWidget for SimulatedMap {
    fn zoom(&self) -> Option<i32> {
        self.zoom.get()
    }

    fn set_center(&self, center: LatLng, zoom: i32, options: MoveOptions) {
        debug!(?center, zoom, duration_ms = options.duration_ms, "simulated camera move");
        self.center.set(center);
        self.zoom.set(Some(zoom));
        self.moves.borrow_mut().push(CameraMove {
            center,
            zoom,
            options,
        });
    }

    fn on_action_end(&self, callback: ActionEndCallback) {
        self.action_end.borrow_mut().push(Rc::from(callback));
    }
}

/// Simulated draggable circle
pub struct SimulatedCircle {
    center: Cell<LatLng>,
    drag_end: RefCell<Vec<Rc<dyn Fn(DragEndEvent)>>>,
}

impl SimulatedCircle {
    pub fn new(center: LatLng) -> Rc<Self> {
        Rc::new(Self {
            center: Cell::new(center),
            drag_end: RefCell::new(Vec::new()),
        })
    }

    pub fn center(&self) -> LatLng {
        self.center.get()
    }

    /// Number of registered drag callbacks
    pub fn listener_count(&self) -> usize {
        self.drag_end.borrow().len()
    }

    /// User drags the circle to `center` and releases it
    pub fn drag_to(&self, center: LatLng) {
        self.center.set(center);
        self.emit(DragEndEvent::at(center));
    }

    /// Fires a raw drag-end event
    pub fn emit(&self, event: DragEndEvent) {
        let callbacks: Vec<_> = self.drag_end.borrow().iter().map(Rc::clone).collect();
        for callback in callbacks {
            callback(event);
        }
    }
}

impl CircleWidget for SimulatedCircle {
    fn on_drag_end(&self, callback: DragEndCallback) {
        self.drag_end.borrow_mut().push(Rc::from(callback));
    }
}
