//! Signal sources: the seam between the monitor and its environment.
//!
//! The monitor never touches a global document. It subscribes through a
//! [`SignalSource`], which the browser binding implements over DOM event
//! listeners and [`SimulatedSource`] implements in memory.

use crate::event::{Disposition, Signal, SignalKind};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handler invoked for each delivered signal.
pub type SignalHandler = Box<dyn FnMut(&Signal) -> Disposition>;

/// Handle returned by [`SignalSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub u64);

impl SubscriptionId {
    /// Create a new subscription ID.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Listener registration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// The event target is gone (no window or document)
    TargetUnavailable,
    /// The environment refused the listener
    Rejected {
        /// Channel that failed
        kind: SignalKind,
        /// Environment-supplied reason
        reason: String,
    },
}

impl fmt::Display for SignalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetUnavailable => write!(f, "event target unavailable"),
            Self::Rejected { kind, reason } => {
                write!(f, "failed to listen for {}: {reason}", kind.event_name())
            }
        }
    }
}

impl std::error::Error for SignalError {}

/// Current fullscreen and visibility of the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    /// Whether a fullscreen element is present
    pub fullscreen: bool,
    /// Whether the page is the foreground tab
    pub visible: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            fullscreen: false,
            visible: true,
        }
    }
}

/// Environment capability: subscribe to signals by channel.
pub trait SignalSource {
    /// Read the current environment, if the source can observe it.
    ///
    /// The monitor uses this as its starting point on mount.
    fn environment(&self) -> Option<Environment> {
        None
    }

    /// Register a handler for one channel.
    fn subscribe(
        &self,
        kind: SignalKind,
        handler: SignalHandler,
    ) -> Result<SubscriptionId, SignalError>;

    /// Remove a handler. Returns false if the ID was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

impl<S: SignalSource + ?Sized> SignalSource for Rc<S> {
    fn environment(&self) -> Option<Environment> {
        (**self).environment()
    }

    fn subscribe(
        &self,
        kind: SignalKind,
        handler: SignalHandler,
    ) -> Result<SubscriptionId, SignalError> {
        (**self).subscribe(kind, handler)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }
}

type SharedHandler = Rc<RefCell<SignalHandler>>;

struct Listener {
    id: SubscriptionId,
    kind: SignalKind,
    handler: SharedHandler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Listener>,
    refuse: Vec<SignalKind>,
    history: Vec<(Signal, Disposition)>,
    environment: Option<Environment>,
}

/// In-memory signal source for tests and headless runs.
///
/// Cloning yields another handle to the same registry, so a test can keep one
/// handle for emitting while the monitor owns another.
#[derive(Clone, Default)]
pub struct SimulatedSource {
    registry: Rc<RefCell<Registry>>,
}

impl fmt::Debug for SimulatedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        f.debug_struct("SimulatedSource")
            .field("listeners", &registry.listeners.len())
            .field("emitted", &registry.history.len())
            .finish()
    }
}

impl SimulatedSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `environment` to monitors that mount on this source.
    ///
    /// Once set, emitted fullscreen and visibility signals keep it current,
    /// the way a document's state follows its own events.
    pub fn set_environment(&self, environment: Environment) {
        self.registry.borrow_mut().environment = Some(environment);
    }

    /// Make subsequent subscriptions to `kind` fail.
    pub fn refuse(&self, kind: SignalKind) {
        self.registry.borrow_mut().refuse.push(kind);
    }

    /// Deliver a signal to every live listener on its channel.
    ///
    /// Returns the merged disposition: [`Disposition::Suppress`] if any
    /// handler suppressed the default action.
    pub fn emit(&self, signal: Signal) -> Disposition {
        if let Some(env) = self.registry.borrow_mut().environment.as_mut() {
            match signal {
                Signal::FullscreenChanged { fullscreen } => env.fullscreen = fullscreen,
                Signal::VisibilityChanged { visible } => env.visible = visible,
                Signal::ContextMenu | Signal::KeyDown(_) => {}
            }
        }
        let kind = signal.kind();
        let targets: Vec<(SubscriptionId, SharedHandler)> = self
            .registry
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| (l.id, l.handler.clone()))
            .collect();

        let mut disposition = Disposition::Pass;
        for (id, handler) in targets {
            // A handler may unsubscribe others while we iterate.
            if !self.is_live(id) {
                continue;
            }
            if let Ok(mut handler) = handler.try_borrow_mut() {
                disposition = disposition.merge(handler(&signal));
            }
        }

        self.registry
            .borrow_mut()
            .history
            .push((signal, disposition));
        disposition
    }

    /// Total number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Number of listeners registered on one channel.
    #[must_use]
    pub fn listener_count_for(&self, kind: SignalKind) -> usize {
        self.registry
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.kind == kind)
            .count()
    }

    /// Every emitted signal with the disposition it received.
    #[must_use]
    pub fn history(&self) -> Vec<(Signal, Disposition)> {
        self.registry.borrow().history.clone()
    }

    /// Number of emitted signals whose default action was suppressed.
    #[must_use]
    pub fn suppressed_count(&self) -> usize {
        self.registry
            .borrow()
            .history
            .iter()
            .filter(|(_, d)| d.is_suppressed())
            .count()
    }

    fn is_live(&self, id: SubscriptionId) -> bool {
        self.registry.borrow().listeners.iter().any(|l| l.id == id)
    }
}

impl SignalSource for SimulatedSource {
    fn environment(&self) -> Option<Environment> {
        self.registry.borrow().environment
    }

    fn subscribe(
        &self,
        kind: SignalKind,
        handler: SignalHandler,
    ) -> Result<SubscriptionId, SignalError> {
        let mut registry = self.registry.borrow_mut();
        if registry.refuse.contains(&kind) {
            return Err(SignalError::Rejected {
                kind,
                reason: "refused by simulation".to_string(),
            });
        }
        let id = SubscriptionId::new(registry.next_id);
        registry.next_id += 1;
        registry.listeners.push(Listener {
            id,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry.borrow_mut();
        let before = registry.listeners.len();
        registry.listeners.retain(|l| l.id != id);
        registry.listeners.len() != before
    }
}
