//! Recenter controller
//!
//! Watches the store's recenter flag together with the stored coordinate.
//! While a recenter is pending every observed change moves the camera and
//! restarts the quiet window; when the window elapses the controller lowers
//! the flag itself. That self-clear is what stops the store → camera →
//! viewport event → store loop, so it must happen exactly once per
//! activation and never after teardown.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::{debug, info};

use crate::app::state::{RecenterEvent, RecenterState, StateMachine};
use crate::config::TimingConfig;
use crate::domain::coords::CoordinateParser;
use crate::domain::core::{CoordinateText, LatLng};
use crate::platform::timer::Debouncer;
use crate::platform::widget::{MoveOptions, WidgetHandles};
use crate::store::{Intent, IntentSink, ViewportState};

/// What the controller saw on its previous observation
#[derive(Debug, Clone, PartialEq)]
struct Observation {
    should_recenter: bool,
    coordinates: CoordinateText,
}

struct Inner {
    state: RefCell<RecenterState>,
    last_seen: RefCell<Option<Observation>>,
    debouncer: Debouncer,
    sink: Rc<dyn IntentSink>,
    handles: Rc<WidgetHandles>,
    parser: CoordinateParser,
    move_options: MoveOptions,
    activations: Cell<u64>,
    clears: Cell<u64>,
    torn_down: Cell<bool>,
}

/// Drives programmatic camera moves from store state
pub struct RecenterController {
    inner: Rc<Inner>,
}

impl RecenterController {
    pub fn new(
        timing: &TimingConfig,
        parser: CoordinateParser,
        sink: Rc<dyn IntentSink>,
        handles: Rc<WidgetHandles>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(RecenterState::Idle),
                last_seen: RefCell::new(None),
                debouncer: Debouncer::new(timing.debounce()),
                sink,
                handles,
                parser,
                move_options: MoveOptions {
                    duration_ms: timing.recenter_animation_ms,
                },
                activations: Cell::new(0),
                clears: Cell::new(0),
                torn_down: Cell::new(false),
            }),
        }
    }

    /// Current recenter state
    pub fn state(&self) -> RecenterState {
        *self.inner.state.borrow()
    }

    /// Number of Idle → Pending transitions so far
    pub fn activations(&self) -> u64 {
        self.inner.activations.get()
    }

    /// Number of times the controller lowered the flag itself
    pub fn clears(&self) -> u64 {
        self.inner.clears.get()
    }

    /// Returns true while the quiet window is running
    pub fn is_settling(&self) -> bool {
        self.inner.debouncer.is_armed()
    }

    /// Feeds the current store state to the controller
    ///
    /// Must be called after every store change. Only the rising edge of the
    /// flag starts an activation; a flag that stays raised after the
    /// controller cleared it does not start another one.
    ///
    /// Must be called from inside a `LocalSet`.
    pub fn observe(&self, coordinates: &CoordinateText, viewport: &ViewportState) {
        let inner = &self.inner;
        if inner.torn_down.get() {
            return;
        }

        let current = Observation {
            should_recenter: viewport.should_recenter,
            coordinates: coordinates.clone(),
        };
        let previous = inner.last_seen.replace(Some(current));
        let was_raised = previous.as_ref().is_some_and(|seen| seen.should_recenter);
        let coordinates_changed = previous
            .as_ref()
            .is_none_or(|seen| seen.coordinates != *coordinates);

        let target = inner.parser.parse(coordinates);
        let event = match (was_raised, viewport.should_recenter) {
            (false, true) => RecenterEvent::Requested { target },
            (true, true) if coordinates_changed => RecenterEvent::CoordinateChanged { target },
            (true, false) => RecenterEvent::Cancelled,
            _ => return,
        };

        let before = self.state();
        let after = StateMachine::process_event(before, event);
        *inner.state.borrow_mut() = after;

        match (before, after) {
            (RecenterState::Idle, RecenterState::Pending(_)) => {
                inner.activations.set(inner.activations.get() + 1);
                info!(?target, "recenter requested");
                inner.move_camera(target, viewport.zoom_level);
                Inner::arm(inner);
            }
            (RecenterState::Pending(_), RecenterState::Pending(_)) => {
                debug!(?target, "recenter target updated");
                inner.move_camera(target, viewport.zoom_level);
                Inner::arm(inner);
            }
            (RecenterState::Pending(_), RecenterState::Idle) => {
                debug!("recenter flag lowered externally");
                inner.debouncer.cancel();
            }
            (RecenterState::Idle, RecenterState::Idle) => {}
        }
    }

    /// Cancels the quiet window and ignores every later observation
    pub fn teardown(&self) {
        let inner = &self.inner;
        if inner.torn_down.replace(true) {
            return;
        }
        if inner.debouncer.cancel() {
            debug!("pending recenter cancelled by teardown");
        }
        *inner.state.borrow_mut() = RecenterState::Idle;
    }
}

impl Inner {
    fn move_camera(&self, target: LatLng, zoom: i32) {
        match self.handles.map.get() {
            Some(map) => map.set_center(target, zoom, self.move_options),
            None => debug!(?target, "map not ready, camera move dropped"),
        }
    }

    fn arm(this: &Rc<Self>) {
        let weak: Weak<Self> = Rc::downgrade(this);
        this.debouncer.arm(move || {
            if let Some(inner) = weak.upgrade() {
                inner.quiet_period_elapsed();
            }
        });
    }

    fn quiet_period_elapsed(&self) {
        if self.torn_down.get() {
            return;
        }
        let before = *self.state.borrow();
        let RecenterState::Pending(pending) = before else {
            return;
        };
        let after = StateMachine::process_event(before, RecenterEvent::QuietPeriodElapsed);
        if after.is_pending() {
            return;
        }
        // Settle before dispatching: the store may call back into observe
        *self.state.borrow_mut() = after;
        self.clears.set(self.clears.get() + 1);
        info!(
            center = ?pending.target,
            updates = pending.updates,
            elapsed_ms = pending.activated_at.elapsed().as_millis() as u64,
            "recenter settled, clearing flag"
        );
        self.sink
            .dispatch(Intent::CenterBooleanToggle { value: false });
    }
}

impl Drop for RecenterController {
    fn drop(&mut self) {
        self.teardown();
    }
}
