//! Map widget interface and readiness tracking
//!
//! The rendering widget is an external collaborator. It is reached only
//! through the narrow traits below, with typed event payloads, and only
//! after it has finished its own asynchronous initialization.
//!
//! CRITICAL: a [`WidgetSlot`] may stay empty forever. Every consumer must
//! treat an empty slot as "drop the command", never as an error.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tokio::sync::watch;

use crate::domain::core::LatLng;

/// Native event name for the end of a circle drag
pub const DRAG_END_EVENT: &str = "dragend";
/// Native event name for a settled viewport (pan, zoom, fly-to)
pub const ACTION_END_EVENT: &str = "actionend";

/// Payload of the circle's drag-end event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragEndEvent {
    /// Position of the circle center after the drag, if the widget reported one
    pub coordinates: Option<LatLng>,
}

impl DragEndEvent {
    pub fn at(coordinates: LatLng) -> Self {
        Self {
            coordinates: Some(coordinates),
        }
    }
}

/// Payload of the map's viewport-settled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionEndEvent;

/// Options for a programmatic camera move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    pub duration_ms: u64,
}

pub type DragEndCallback = Box<dyn Fn(DragEndEvent)>;
pub type ActionEndCallback = Box<dyn Fn(ActionEndEvent)>;

/// Live map instance
pub trait MapWidget {
    /// Current zoom level, `None` while the widget cannot report one
    fn zoom(&self) -> Option<i32>;

    /// Moves the camera to a position and zoom level
    fn set_center(&self, center: LatLng, zoom: i32, options: MoveOptions);

    /// Registers a callback for [`ACTION_END_EVENT`]
    fn on_action_end(&self, callback: ActionEndCallback);
}

/// Live circle instance drawn on the map
pub trait CircleWidget {
    /// Registers a callback for [`DRAG_END_EVENT`]
    fn on_drag_end(&self, callback: DragEndCallback);
}

/// Holder for a widget instance that becomes available asynchronously
///
/// Starts empty. The widget-wrapping collaborator calls [`WidgetSlot::set`]
/// once the instance exists; later calls are ignored so the handle stays
/// stable for the component lifetime.
pub struct WidgetSlot<W: ?Sized> {
    inner: RefCell<Option<Rc<W>>>,
    ready: watch::Sender<bool>,
}

impl<W: ?Sized> WidgetSlot<W> {
    /// Creates an empty slot
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            inner: RefCell::new(None),
            ready,
        }
    }

    /// Stores the widget instance, returns false if one was already set
    pub fn set(&self, widget: Rc<W>) -> bool {
        let mut inner = self.inner.borrow_mut();
        if inner.is_some() {
            return false;
        }
        *inner = Some(widget);
        drop(inner);
        self.ready.send_replace(true);
        true
    }

    /// Current widget instance, if available
    pub fn get(&self) -> Option<Rc<W>> {
        self.inner.borrow().clone()
    }

    /// Returns true if the widget instance is available
    pub fn is_ready(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// Resolves once the widget instance is available
    ///
    /// Never resolves for a slot that stays empty; callers bound it with a
    /// timeout.
    pub async fn ready(&self) {
        let mut receiver = self.ready.subscribe();
        // The sender lives in self, so the channel cannot close while we wait
        let _ = receiver.wait_for(|ready| *ready).await;
    }
}

impl<W: ?Sized> Default for WidgetSlot<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: ?Sized> fmt::Debug for WidgetSlot<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetSlot")
            .field("ready", &self.is_ready())
            .finish()
    }
}

/// The pair of widget handles the synchronization core works with
#[derive(Debug, Default)]
pub struct WidgetHandles {
    pub map: WidgetSlot<dyn MapWidget>,
    pub circle: WidgetSlot<dyn CircleWidget>,
}

impl WidgetHandles {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Both handles, if both widgets are available
    pub fn both(&self) -> Option<(Rc<dyn MapWidget>, Rc<dyn CircleWidget>)> {
        Some((self.map.get()?, self.circle.get()?))
    }

    /// Resolves once both widgets are available
    pub async fn ready(&self) {
        self.map.ready().await;
        self.circle.ready().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FixedZoom(Cell<i32>);

    impl MapWidget for FixedZoom {
        fn zoom(&self) -> Option<i32> {
            Some(self.0.get())
        }

        fn set_center(&self, _center: LatLng, zoom: i32, _options: MoveOptions) {
            self.0.set(zoom);
        }

        fn on_action_end(&self, _callback: ActionEndCallback) {}
    }

    #[test]
    fn slot_starts_empty() {
        let slot: WidgetSlot<dyn MapWidget> = WidgetSlot::new();
        assert!(!slot.is_ready());
        assert!(slot.get().is_none());
    }

    #[test]
    fn slot_keeps_first_instance() {
        let slot: WidgetSlot<dyn MapWidget> = WidgetSlot::new();
        assert!(slot.set(Rc::new(FixedZoom(Cell::new(9)))));
        assert!(!slot.set(Rc::new(FixedZoom(Cell::new(4)))));
        assert_eq!(slot.get().and_then(|map| map.zoom()), Some(9));
    }

    #[tokio::test(start_paused = true)]
    async fn ready_resolves_after_set() {
        let slot: Rc<WidgetSlot<dyn MapWidget>> = Rc::new(WidgetSlot::new());
        let waiting = tokio::time::timeout(std::time::Duration::from_millis(10), slot.ready());
        assert!(waiting.await.is_err());

        slot.set(Rc::new(FixedZoom(Cell::new(9))));
        tokio::time::timeout(std::time::Duration::from_millis(10), slot.ready())
            .await
            .expect("slot should report ready");
    }

    #[test]
    fn handles_require_both_widgets() {
        let handles = WidgetHandles::new();
        handles.map.set(Rc::new(FixedZoom(Cell::new(9))));
        assert!(handles.both().is_none());
    }
}
