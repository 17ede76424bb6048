//! Violation monitor: wires environment signals into the proctoring reducer.
//!
//! The monitor owns the [`ProctorState`] for one mount of the widget. While
//! mounted it holds exactly one subscription per [`SignalKind`]; unmounting
//! removes all of them, and a fullscreen request that settles after unmount
//! is discarded.

use crate::config::MonitorConfig;
use crate::event::{Disposition, Signal, SignalKind};
use crate::host::FullscreenHost;
use crate::shortcut::KeyFilter;
use crate::signal::{SignalError, SignalHandler, SignalSource, SubscriptionId};
use crate::state::{Command, ProctorMessage, ProctorState, State};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Callback notified after every state update.
type Subscriber = Rc<dyn Fn(&ProctorState)>;

/// Explicit user actions exposed by the overlay and header controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserAction {
    /// Request fullscreen again ("Return to Fullscreen", "Enter Fullscreen Mode")
    ReturnToFullscreen,
    /// Hide the overlay
    Dismiss,
}

impl UserAction {
    /// Identifier used in markup and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ReturnToFullscreen => "return-to-fullscreen",
            Self::Dismiss => "dismiss",
        }
    }

    /// Parse an identifier produced by [`UserAction::as_str`].
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "return-to-fullscreen" => Some(Self::ReturnToFullscreen),
            "dismiss" => Some(Self::Dismiss),
            _ => None,
        }
    }
}

/// Handle for a state subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewerId(pub u64);

struct Shared<H> {
    state: RefCell<ProctorState>,
    host: H,
    filter: KeyFilter,
    mounted: Cell<bool>,
    generation: Cell<u64>,
    next_viewer: Cell<u64>,
    viewers: RefCell<Vec<(ViewerId, Subscriber)>>,
}

/// Event-driven proctoring monitor.
///
/// # Example
///
/// ```
/// use vigil_core::{
///     MonitorConfig, ScriptedHost, Signal, SimulatedSource, ViolationMonitor,
/// };
///
/// let source = SimulatedSource::new();
/// let host = ScriptedHost::granting().linked(&source);
/// let mut monitor = ViolationMonitor::new(source.clone(), host, MonitorConfig::default());
///
/// monitor.mount().unwrap();
/// assert!(monitor.state().is_fullscreen);
///
/// source.emit(Signal::VisibilityChanged { visible: false });
/// assert_eq!(monitor.state().warning_count, 1);
///
/// monitor.dismiss();
/// assert!(!monitor.state().show_warning);
/// ```
pub struct ViolationMonitor<S: SignalSource, H: FullscreenHost + 'static> {
    shared: Rc<Shared<H>>,
    source: S,
    config: MonitorConfig,
    subscriptions: Vec<SubscriptionId>,
}

impl<S: SignalSource, H: FullscreenHost + 'static> ViolationMonitor<S, H> {
    /// Create an unmounted monitor.
    pub fn new(source: S, host: H, config: MonitorConfig) -> Self {
        let shared = Rc::new(Shared {
            state: RefCell::new(ProctorState::new(config.recovery)),
            host,
            filter: config.blocked_shortcuts.clone(),
            mounted: Cell::new(false),
            generation: Cell::new(0),
            next_viewer: Cell::new(0),
            viewers: RefCell::new(Vec::new()),
        });
        Self {
            shared,
            source,
            config,
            subscriptions: Vec::new(),
        }
    }

    /// Attach listeners and issue the initial fullscreen request.
    ///
    /// Mounting resets the state. Calling `mount` on a mounted monitor does
    /// nothing. If any listener cannot be registered, the ones already added
    /// are removed again and the error is returned.
    pub fn mount(&mut self) -> Result<(), SignalError> {
        if self.shared.mounted.get() {
            tracing::debug!("monitor already mounted");
            return Ok(());
        }

        let environment = self.source.environment().unwrap_or_default();
        tracing::debug!(
            fullscreen = environment.fullscreen,
            visible = environment.visible,
            "initial environment"
        );
        *self.shared.state.borrow_mut() = ProctorState::observed(self.config.recovery, environment);
        self.shared.generation.set(self.shared.generation.get() + 1);

        for kind in SignalKind::ALL {
            let handler = signal_handler(Rc::downgrade(&self.shared));
            match self.source.subscribe(kind, handler) {
                Ok(id) => self.subscriptions.push(id),
                Err(err) => {
                    tracing::error!(event = kind.event_name(), error = %err, "listener registration failed");
                    self.detach();
                    return Err(err);
                }
            }
        }

        self.shared.mounted.set(true);
        tracing::info!(
            listeners = self.subscriptions.len(),
            request_fullscreen = self.config.request_on_mount,
            "monitor mounted"
        );
        dispatch(
            &self.shared,
            ProctorMessage::Mounted {
                request_fullscreen: self.config.request_on_mount,
            },
        );
        Ok(())
    }

    /// Detach every listener. Calling `unmount` twice is harmless.
    pub fn unmount(&mut self) {
        if !self.shared.mounted.get() {
            return;
        }
        self.shared.mounted.set(false);
        let removed = self.detach();
        let state = self.shared.state.borrow();
        tracing::info!(
            listeners = removed,
            warning_count = state.warning_count,
            "monitor unmounted"
        );
    }

    fn detach(&mut self) -> usize {
        let mut removed = 0;
        for id in self.subscriptions.drain(..) {
            if self.source.unsubscribe(id) {
                removed += 1;
            } else {
                tracing::warn!(subscription = id.0, "listener already removed");
            }
        }
        removed
    }

    /// User action: request fullscreen again.
    pub fn return_to_fullscreen(&self) {
        if self.ensure_mounted("return to fullscreen") {
            dispatch(&self.shared, ProctorMessage::ReturnToFullscreen);
        }
    }

    /// User action: hide the warning overlay.
    pub fn dismiss(&self) {
        if self.ensure_mounted("dismiss") {
            dispatch(&self.shared, ProctorMessage::Dismiss);
        }
    }

    /// Perform a user action.
    pub fn perform(&self, action: UserAction) {
        match action {
            UserAction::ReturnToFullscreen => self.return_to_fullscreen(),
            UserAction::Dismiss => self.dismiss(),
        }
    }

    fn ensure_mounted(&self, action: &str) -> bool {
        let mounted = self.shared.mounted.get();
        if !mounted {
            tracing::debug!(action, "ignoring user action on unmounted monitor");
        }
        mounted
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> ProctorState {
        self.shared.state.borrow().clone()
    }

    /// Whether listeners are attached.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.shared.mounted.get()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Signal source the monitor listens on.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Register a callback invoked with the new state after every update.
    pub fn subscribe(&self, viewer: impl Fn(&ProctorState) + 'static) -> ViewerId {
        let id = ViewerId(self.shared.next_viewer.get());
        self.shared.next_viewer.set(id.0 + 1);
        self.shared
            .viewers
            .borrow_mut()
            .push((id, Rc::new(viewer)));
        id
    }

    /// Remove a state callback.
    pub fn unsubscribe(&self, id: ViewerId) -> bool {
        let mut viewers = self.shared.viewers.borrow_mut();
        let before = viewers.len();
        viewers.retain(|(v, _)| *v != id);
        viewers.len() != before
    }
}

impl<S: SignalSource, H: FullscreenHost + 'static> Drop for ViolationMonitor<S, H> {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn signal_handler<H: FullscreenHost + 'static>(shared: Weak<Shared<H>>) -> SignalHandler {
    Box::new(move |signal: &Signal| {
        let Some(shared) = shared.upgrade() else {
            return Disposition::Pass;
        };
        if !shared.mounted.get() {
            return Disposition::Pass;
        }
        handle_signal(&shared, signal)
    })
}

fn handle_signal<H: FullscreenHost + 'static>(shared: &Rc<Shared<H>>, signal: &Signal) -> Disposition {
    match *signal {
        Signal::FullscreenChanged { fullscreen } => {
            dispatch(shared, ProctorMessage::FullscreenChanged(fullscreen));
            Disposition::Pass
        }
        Signal::VisibilityChanged { visible } => {
            dispatch(shared, ProctorMessage::VisibilityChanged(visible));
            Disposition::Pass
        }
        Signal::ContextMenu => {
            tracing::debug!("context menu suppressed");
            Disposition::Suppress
        }
        Signal::KeyDown(input) => {
            if shared.filter.blocks(&input) {
                tracing::debug!(key = input.key.name(), modifiers = %input.modifiers.display(), "shortcut suppressed");
                Disposition::Suppress
            } else {
                Disposition::Pass
            }
        }
    }
}

fn dispatch<H: FullscreenHost + 'static>(shared: &Rc<Shared<H>>, msg: ProctorMessage) {
    let (cmd, snapshot) = {
        let mut state = shared.state.borrow_mut();
        let logged = state.violations.len();
        let cmd = state.update(msg);
        for violation in &state.violations[logged..] {
            tracing::warn!(
                sequence = violation.sequence,
                kind = violation.kind.description(),
                "violation detected"
            );
        }
        (cmd, state.clone())
    };

    let viewers: Vec<Subscriber> = shared
        .viewers
        .borrow()
        .iter()
        .map(|(_, v)| v.clone())
        .collect();
    for viewer in viewers {
        viewer(&snapshot);
    }

    run(shared, cmd);
}

fn run<H: FullscreenHost + 'static>(shared: &Rc<Shared<H>>, cmd: Command) {
    match cmd {
        Command::None => {}
        Command::RequestFullscreen(intent) => {
            tracing::debug!(?intent, "requesting fullscreen");
            let weak = Rc::downgrade(shared);
            let generation = shared.generation.get();
            shared.host.request_fullscreen(Box::new(move |result| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                if !shared.mounted.get() || shared.generation.get() != generation {
                    tracing::debug!(?intent, "discarding fullscreen result after unmount");
                    return;
                }
                match result {
                    Ok(()) => dispatch(&shared, ProctorMessage::FullscreenGranted(intent)),
                    Err(err) => {
                        tracing::warn!(?intent, error = %err, "fullscreen request failed");
                        dispatch(&shared, ProctorMessage::FullscreenDenied(intent, err));
                    }
                }
            }));
        }
    }
}
