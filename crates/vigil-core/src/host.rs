//! Fullscreen capability of the host environment.
//!
//! The only fallible operation of the widget is asking the environment to
//! enter fullscreen. Requests are asynchronous: the host receives a callback
//! and invokes it once the request settles, which may be immediately, later,
//! or never.

use crate::event::Signal;
use crate::signal::SimulatedSource;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

/// Continuation invoked when a fullscreen request settles.
pub type FullscreenCallback = Box<dyn FnOnce(Result<(), FullscreenError>)>;

/// Environment capability: request fullscreen on the root element.
pub trait FullscreenHost {
    /// Issue a fullscreen request and report the outcome through `done`.
    fn request_fullscreen(&self, done: FullscreenCallback);
}

impl<H: FullscreenHost + ?Sized> FullscreenHost for Rc<H> {
    fn request_fullscreen(&self, done: FullscreenCallback) {
        (**self).request_fullscreen(done);
    }
}

/// Fullscreen request failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullscreenError {
    /// The environment rejected the request (e.g. no user gesture)
    Denied(String),
    /// The fullscreen API is not available
    Unsupported,
    /// There is no document element to make fullscreen
    Detached,
}

impl fmt::Display for FullscreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Denied(reason) => write!(f, "fullscreen request denied: {reason}"),
            Self::Unsupported => write!(f, "fullscreen API not supported"),
            Self::Detached => write!(f, "no document element available"),
        }
    }
}

impl std::error::Error for FullscreenError {}

/// Scripted outcome for the next fullscreen request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostResponse {
    /// Resolve successfully right away
    Grant,
    /// Reject right away
    Deny(FullscreenError),
    /// Keep the request pending until resolved manually
    Hold,
}

struct ScriptedInner {
    script: VecDeque<HostResponse>,
    fallback: HostResponse,
    pending: VecDeque<FullscreenCallback>,
    requests: usize,
    source: Option<SimulatedSource>,
}

/// Fullscreen host driven by a script, for tests and headless runs.
///
/// Responses are consumed in order; once the script is exhausted the
/// fallback response applies. When linked to a [`SimulatedSource`], a granted
/// request emits a `fullscreenchange` signal before the callback runs, the
/// same order a browser uses.
#[derive(Clone)]
pub struct ScriptedHost {
    inner: Rc<RefCell<ScriptedInner>>,
}

impl fmt::Debug for ScriptedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ScriptedHost")
            .field("script", &inner.script)
            .field("fallback", &inner.fallback)
            .field("pending", &inner.pending.len())
            .field("requests", &inner.requests)
            .finish()
    }
}

impl ScriptedHost {
    /// Create a host with the given fallback response.
    #[must_use]
    pub fn new(fallback: HostResponse) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ScriptedInner {
                script: VecDeque::new(),
                fallback,
                pending: VecDeque::new(),
                requests: 0,
                source: None,
            })),
        }
    }

    /// A host that grants every request.
    #[must_use]
    pub fn granting() -> Self {
        Self::new(HostResponse::Grant)
    }

    /// A host that denies every request.
    #[must_use]
    pub fn denying() -> Self {
        Self::new(HostResponse::Deny(FullscreenError::Denied(
            "permissions check failed".to_string(),
        )))
    }

    /// A host that never settles a request on its own.
    #[must_use]
    pub fn holding() -> Self {
        Self::new(HostResponse::Hold)
    }

    /// Emit `fullscreenchange` on `source` whenever a request is granted.
    #[must_use]
    pub fn linked(self, source: &SimulatedSource) -> Self {
        self.inner.borrow_mut().source = Some(source.clone());
        self
    }

    /// Queue a response for an upcoming request.
    pub fn push(&self, response: HostResponse) -> &Self {
        self.inner.borrow_mut().script.push_back(response);
        self
    }

    /// Replace the fallback response.
    pub fn set_fallback(&self, response: HostResponse) {
        self.inner.borrow_mut().fallback = response;
    }

    /// Number of requests received.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.inner.borrow().requests
    }

    /// Number of requests awaiting manual resolution.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Settle the oldest held request. Returns false if none is pending.
    pub fn resolve_next(&self, result: Result<(), FullscreenError>) -> bool {
        let callback = self.inner.borrow_mut().pending.pop_front();
        match callback {
            Some(done) => {
                self.settle(done, result);
                true
            }
            None => false,
        }
    }

    fn settle(&self, done: FullscreenCallback, result: Result<(), FullscreenError>) {
        if result.is_ok() {
            let source = self.inner.borrow().source.clone();
            if let Some(source) = source {
                source.emit(Signal::FullscreenChanged { fullscreen: true });
            }
        }
        done(result);
    }
}

impl FullscreenHost for ScriptedHost {
    fn request_fullscreen(&self, done: FullscreenCallback) {
        let response = {
            let mut inner = self.inner.borrow_mut();
            inner.requests += 1;
            let fallback = inner.fallback.clone();
            inner.script.pop_front().unwrap_or(fallback)
        };

        match response {
            HostResponse::Grant => self.settle(done, Ok(())),
            HostResponse::Deny(err) => self.settle(done, Err(err)),
            HostResponse::Hold => self.inner.borrow_mut().pending.push_back(done),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Disposition, SignalKind};
    use crate::signal::SignalSource;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<Result<(), FullscreenError>>>>, impl Fn() -> FullscreenCallback) {
        let results = Rc::new(RefCell::new(Vec::new()));
        let sink = results.clone();
        let make = move || -> FullscreenCallback {
            let sink = sink.clone();
            Box::new(move |r| sink.borrow_mut().push(r))
        };
        (results, make)
    }

    #[test]
    fn test_granting_host() {
        let host = ScriptedHost::granting();
        let (results, cb) = recorder();
        host.request_fullscreen(cb());
        assert_eq!(*results.borrow(), vec![Ok(())]);
        assert_eq!(host.request_count(), 1);
    }

    #[test]
    fn test_denying_host() {
        let host = ScriptedHost::denying();
        let (results, cb) = recorder();
        host.request_fullscreen(cb());
        assert!(matches!(results.borrow()[0], Err(FullscreenError::Denied(_))));
    }

    #[test]
    fn test_script_then_fallback() {
        let host = ScriptedHost::granting();
        host.push(HostResponse::Deny(FullscreenError::Unsupported));
        let (results, cb) = recorder();
        host.request_fullscreen(cb());
        host.request_fullscreen(cb());
        assert_eq!(
            *results.borrow(),
            vec![Err(FullscreenError::Unsupported), Ok(())]
        );
    }

    #[test]
    fn test_holding_host_resolves_manually() {
        let host = ScriptedHost::holding();
        let (results, cb) = recorder();
        host.request_fullscreen(cb());
        assert!(results.borrow().is_empty());
        assert_eq!(host.pending_count(), 1);

        assert!(host.resolve_next(Ok(())));
        assert_eq!(*results.borrow(), vec![Ok(())]);
        assert!(!host.resolve_next(Ok(())));
    }

    #[test]
    fn test_linked_host_emits_fullscreenchange_before_callback() {
        let source = SimulatedSource::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let seen = order.clone();
        source
            .subscribe(
                SignalKind::FullscreenChange,
                Box::new(move |_| {
                    seen.borrow_mut().push("signal");
                    Disposition::Pass
                }),
            )
            .unwrap();

        let host = ScriptedHost::granting().linked(&source);
        let seen = order.clone();
        host.request_fullscreen(Box::new(move |_| seen.borrow_mut().push("callback")));
        assert_eq!(*order.borrow(), vec!["signal", "callback"]);
    }

    #[test]
    fn test_linked_host_denial_emits_nothing() {
        let source = SimulatedSource::new();
        let fired = Rc::new(Cell::new(false));
        let flag = fired.clone();
        source
            .subscribe(
                SignalKind::FullscreenChange,
                Box::new(move |_| {
                    flag.set(true);
                    Disposition::Pass
                }),
            )
            .unwrap();
        let host = ScriptedHost::denying().linked(&source);
        host.request_fullscreen(Box::new(|_| {}));
        assert!(!fired.get());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            FullscreenError::Denied("no gesture".into()).to_string(),
            "fullscreen request denied: no gesture"
        );
        assert_eq!(
            FullscreenError::Unsupported.to_string(),
            "fullscreen API not supported"
        );
    }
}
