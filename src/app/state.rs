//! Recenter state management
//!
//! Defines the two-state recenter machine and its transitions. The state is
//! kept simple; timers and widget commands live in the controller that
//! drives it.

use tokio::time::Instant;

use crate::domain::core::LatLng;

/// Recenter state - either idle or waiting for the camera to settle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RecenterState {
    /// No recenter requested
    #[default]
    Idle,
    /// A recenter was requested and the quiet window is running
    Pending(PendingState),
}

impl RecenterState {
    pub fn is_pending(&self) -> bool {
        matches!(self, RecenterState::Pending(_))
    }
}

/// State while a recenter is pending
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingState {
    /// Position the camera was last sent to
    pub target: LatLng,
    /// When this activation started
    pub activated_at: Instant,
    /// Coordinate updates seen during this activation
    pub updates: u32,
}

impl PendingState {
    /// Creates a new pending state for a fresh activation
    pub fn new(target: LatLng) -> Self {
        Self {
            target,
            activated_at: Instant::now(),
            updates: 0,
        }
    }

    /// Records a coordinate update while pending
    pub fn retarget(&mut self, target: LatLng) {
        self.target = target;
        self.updates += 1;
    }
}

/// Possible state transition events
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecenterEvent {
    /// The store's recenter flag was raised
    Requested { target: LatLng },
    /// The stored coordinate changed
    CoordinateChanged { target: LatLng },
    /// The quiet window elapsed without re-arming
    QuietPeriodElapsed,
    /// The flag was lowered by someone else, or the component went away
    Cancelled,
}

/// State machine for recenter transitions
pub struct StateMachine;

impl StateMachine {
    /// Processes an event and returns the new state
    ///
    /// # Arguments
    /// * `current_state` - Current recenter state
    /// * `event` - Event to process
    ///
    /// # Returns
    /// New recenter state after processing the event
    pub fn process_event(current_state: RecenterState, event: RecenterEvent) -> RecenterState {
        match (current_state, event) {
            // From Idle state
            (RecenterState::Idle, RecenterEvent::Requested { target }) => {
                RecenterState::Pending(PendingState::new(target))
            }

            // From Pending state
            (RecenterState::Pending(mut pending), RecenterEvent::Requested { target })
            | (RecenterState::Pending(mut pending), RecenterEvent::CoordinateChanged { target }) => {
                // Re-entry keeps the activation, the quiet window restarts
                pending.retarget(target);
                RecenterState::Pending(pending)
            }

            (RecenterState::Pending(_), RecenterEvent::QuietPeriodElapsed) => RecenterState::Idle,

            (RecenterState::Pending(_), RecenterEvent::Cancelled) => RecenterState::Idle,

            // Coordinate edits and stray timers do nothing while idle
            (state, _) => state,
        }
    }
}
