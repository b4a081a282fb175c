//! Platform seams: the map widget and the local event loop
//!
//! This module encapsulates everything the synchronization core needs from
//! the outside world besides the store: widget handles, typed widget events,
//! and cancellable timers.

pub mod simulated;
pub mod timer;
pub mod widget;

pub use timer::{Debouncer, DeferredAction};
pub use widget::{
    ActionEndEvent, CircleWidget, DragEndEvent, MapWidget, MoveOptions, WidgetHandles, WidgetSlot,
};
