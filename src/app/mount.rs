//! Mount-binding sequencer
//!
//! The widget library creates its instances asynchronously and gives no
//! synchronous way to observe that. The sequencer waits for them, binds the
//! drag and viewport adapters exactly once, and then releases the loading
//! gate so the UI becomes interactive.
//!
//! With [`MountStrategy::FixedDelay`] and no retries this reproduces the
//! single blind check: if the widgets are late, nothing is ever bound and
//! the gate stays closed.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{MountConfig, MountStrategy};
use crate::input::{Detach, DragAdapter, UpstreamSink, ViewportAdapter};
use crate::platform::timer::DeferredAction;
use crate::platform::widget::WidgetHandles;
use crate::store::IntentSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MountError {
    #[error("mount sequencer already started")]
    AlreadyStarted,

    #[error("mount sequencer was torn down")]
    TornDown,
}

/// Progress of the binding attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountPhase {
    /// Not started yet
    #[default]
    Idle,
    /// Waiting for the widgets
    Scheduled,
    /// Adapters bound, gate released
    Bound,
    /// Gave up; nothing bound, gate closed
    Unavailable,
    /// Torn down before binding happened
    Cancelled,
}

/// UI-blocking gate, released once the widgets are interactive
#[derive(Debug)]
pub struct LoadingGate {
    released: watch::Sender<bool>,
}

impl LoadingGate {
    pub fn new() -> Rc<Self> {
        let (released, _) = watch::channel(false);
        Rc::new(Self { released })
    }

    pub fn is_released(&self) -> bool {
        *self.released.borrow()
    }

    fn release(&self) {
        self.released.send_replace(true);
    }

    /// Resolves once the gate is released
    pub async fn wait(&self) {
        let mut receiver = self.released.subscribe();
        let _ = receiver.wait_for(|released| *released).await;
    }
}

/// Everything the deferred check needs, shared with the spawned task
struct Binding {
    handles: Rc<WidgetHandles>,
    sink: Rc<dyn IntentSink>,
    upstream: Option<UpstreamSink>,
    gate: Rc<LoadingGate>,
    phase: Rc<Cell<MountPhase>>,
    detach: Detach,
}

impl Binding {
    /// Binds both adapters if both widgets exist
    fn try_bind(&self) -> bool {
        let Some((map, circle)) = self.handles.both() else {
            return false;
        };
        let drag = DragAdapter::new(Rc::clone(&self.sink), self.upstream.clone())
            .with_detach(self.detach.clone());
        Rc::new(drag).attach(circle.as_ref());
        let viewport =
            ViewportAdapter::new(Rc::clone(&self.sink), &map).with_detach(self.detach.clone());
        Rc::new(viewport).attach();
        self.phase.set(MountPhase::Bound);
        self.gate.release();
        true
    }
}

/// Defers adapter binding until the widgets are available
pub struct MountBindingSequencer {
    config: MountConfig,
    delay: Duration,
    binding: Rc<Binding>,
    check: DeferredAction,
}

impl MountBindingSequencer {
    /// Creates a sequencer; nothing happens until [`Self::start`]
    ///
    /// # Arguments
    /// * `config` - Readiness strategy and retry budget
    /// * `delay` - Delay before each readiness check
    /// * `handles` - Widget slots filled by the widget-wrapping collaborator
    /// * `sink` - Store the adapters dispatch to
    /// * `upstream` - Optional sink for drag positions
    pub fn new(
        config: MountConfig,
        delay: Duration,
        handles: Rc<WidgetHandles>,
        sink: Rc<dyn IntentSink>,
        upstream: Option<UpstreamSink>,
    ) -> Self {
        Self {
            config,
            delay,
            binding: Rc::new(Binding {
                handles,
                sink,
                upstream,
                gate: LoadingGate::new(),
                phase: Rc::new(Cell::new(MountPhase::Idle)),
                detach: Detach::new(),
            }),
            check: DeferredAction::new(),
        }
    }

    pub fn phase(&self) -> MountPhase {
        self.binding.phase.get()
    }

    pub fn gate(&self) -> Rc<LoadingGate> {
        Rc::clone(&self.binding.gate)
    }

    /// Schedules the deferred readiness check
    ///
    /// Must be called from inside a `LocalSet`. Can only succeed once.
    pub fn start(&self) -> Result<(), MountError> {
        match self.phase() {
            MountPhase::Idle => {}
            MountPhase::Cancelled => return Err(MountError::TornDown),
            _ => return Err(MountError::AlreadyStarted),
        }
        self.binding.phase.set(MountPhase::Scheduled);

        let binding = Rc::clone(&self.binding);
        let strategy = self.config.strategy;
        let attempts = self.config.retries + 1;
        let delay = self.delay;
        debug!(?strategy, attempts, ?delay, "widget binding scheduled");

        self.check.spawn(async move {
            for attempt in 1..=attempts {
                match strategy {
                    MountStrategy::FixedDelay => tokio::time::sleep(delay).await,
                    MountStrategy::ReadySignal => {
                        let _ = tokio::time::timeout(delay, binding.handles.ready()).await;
                    }
                }
                if binding.try_bind() {
                    info!(attempt, "widget adapters bound");
                    return;
                }
                debug!(attempt, "widgets not ready");
            }
            warn!(attempts, "widgets never became ready, adapters left unbound");
            binding.phase.set(MountPhase::Unavailable);
        });
        Ok(())
    }

    /// Cancels a pending readiness check and detaches bound adapters
    pub fn teardown(&self) {
        self.check.cancel();
        self.binding.detach.detach();
        if matches!(self.phase(), MountPhase::Idle | MountPhase::Scheduled) {
            self.binding.phase.set(MountPhase::Cancelled);
        }
    }
}

impl Drop for MountBindingSequencer {
    fn drop(&mut self) {
        self.teardown();
    }
}
