//! Widget event adapters
//!
//! Each adapter turns one native widget event into a store intent.

pub mod drag;
pub mod viewport;

use std::cell::Cell;
use std::rc::Rc;

pub use drag::{DragAdapter, UpstreamSink};
pub use viewport::ViewportAdapter;

/// Off switch shared by every adapter bound in one session
///
/// Widget callbacks cannot be unregistered, so a detached adapter stays
/// registered and ignores its events instead.
#[derive(Debug, Clone, Default)]
pub struct Detach(Rc<Cell<bool>>);

impl Detach {
    pub fn new() -> Self {
        Self::default()
    }

    /// Silences every adapter holding a clone of this switch
    pub fn detach(&self) {
        self.0.set(true);
    }

    pub fn is_detached(&self) -> bool {
        self.0.get()
    }
}
