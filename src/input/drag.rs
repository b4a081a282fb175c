//! Circle drag-end handling
//!
//! Turns the widget's drag-end event into a rounded coordinate pair, sends
//! it to the store as a coordinate-change intent, and forwards it to the
//! optional upstream sink.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::domain::core::LatLng;
use crate::input::Detach;
use crate::platform::widget::{CircleWidget, DRAG_END_EVENT, DragEndEvent};
use crate::store::{Intent, IntentSink};

/// Caller-supplied sink notified with every rounded drag position
pub type UpstreamSink = Rc<dyn Fn(LatLng)>;

/// Adapter between circle drag events and the store
pub struct DragAdapter {
    sink: Rc<dyn IntentSink>,
    upstream: Option<UpstreamSink>,
    detach: Detach,
}

impl DragAdapter {
    pub fn new(sink: Rc<dyn IntentSink>, upstream: Option<UpstreamSink>) -> Self {
        Self {
            sink,
            upstream,
            detach: Detach::new(),
        }
    }

    /// Ties this adapter to a shared off switch
    pub fn with_detach(mut self, detach: Detach) -> Self {
        self.detach = detach;
        self
    }

    /// Handles one drag-end event
    ///
    /// # Returns
    /// The rounded position that was dispatched, or `None` if the event
    /// carried no coordinates or the adapter was detached
    pub fn handle(&self, event: DragEndEvent) -> Option<LatLng> {
        if self.detach.is_detached() {
            trace!(event = DRAG_END_EVENT, "adapter detached, event ignored");
            return None;
        }
        let Some(raw) = event.coordinates else {
            trace!(event = DRAG_END_EVENT, "no coordinates, event ignored");
            return None;
        };
        let rounded = raw.rounded();
        debug!(?raw, ?rounded, "circle dragged");

        if let Some(upstream) = &self.upstream {
            upstream(rounded);
        }
        self.sink.dispatch(Intent::coords_changed(rounded.to_text()));
        Some(rounded)
    }

    /// Registers this adapter on a circle instance
    ///
    /// Must happen once per circle instance; every registration adds another
    /// dispatch per drag.
    pub fn attach(self: Rc<Self>, circle: &dyn CircleWidget) {
        circle.on_drag_end(Box::new(move |event| {
            self.handle(event);
        }));
    }
}
