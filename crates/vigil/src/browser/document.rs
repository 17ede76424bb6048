//! Document-backed implementations of the monitor's environment seams.

use super::events::{event_to_signal, read_environment};
use std::cell::{Cell, RefCell};
use vigil_core::{
    Environment, FullscreenCallback, FullscreenError, FullscreenHost, SignalError, SignalHandler,
    SignalKind, SignalSource, SubscriptionId,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Event};

type Listener = Closure<dyn FnMut(Event)>;

/// Describe a thrown JS value for logs and errors.
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| "unknown error".to_string())
}

/// Signal source backed by `document` event listeners.
///
/// A handler that suppresses a signal calls `preventDefault` on the event.
pub struct DocumentSignalSource {
    document: Document,
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, SignalKind, Listener)>>,
}

impl DocumentSignalSource {
    /// Create a source listening on `document`.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            next_id: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl SignalSource for DocumentSignalSource {
    fn environment(&self) -> Option<Environment> {
        Some(read_environment(&self.document))
    }

    fn subscribe(
        &self,
        kind: SignalKind,
        mut handler: SignalHandler,
    ) -> Result<SubscriptionId, SignalError> {
        let document = self.document.clone();
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let signal = event_to_signal(kind, &event, &document);
            if handler(&signal).is_suppressed() {
                event.prevent_default();
            }
        });

        self.document
            .add_event_listener_with_callback(kind.event_name(), listener.as_ref().unchecked_ref())
            .map_err(|err| SignalError::Rejected {
                kind,
                reason: describe(&err),
            })?;

        let id = SubscriptionId::new(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, kind, listener));
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let entry = {
            let mut listeners = self.listeners.borrow_mut();
            listeners
                .iter()
                .position(|(i, _, _)| *i == id)
                .map(|index| listeners.remove(index))
        };
        let Some((_, kind, listener)) = entry else {
            return false;
        };
        if let Err(err) = self
            .document
            .remove_event_listener_with_callback(kind.event_name(), listener.as_ref().unchecked_ref())
        {
            tracing::warn!(event = kind.event_name(), error = %describe(&err), "listener removal failed");
        }
        true
    }
}

impl Drop for DocumentSignalSource {
    fn drop(&mut self) {
        let ids: Vec<_> = self.listeners.borrow().iter().map(|(id, _, _)| *id).collect();
        for id in ids {
            self.unsubscribe(id);
        }
    }
}

/// Fullscreen host calling `requestFullscreen` on the root element.
pub struct DocumentFullscreen {
    document: Document,
}

impl DocumentFullscreen {
    /// Create a host for `document`.
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    fn start(&self) -> Result<js_sys::Promise, FullscreenError> {
        let element = self
            .document
            .document_element()
            .ok_or(FullscreenError::Detached)?;
        let method = js_sys::Reflect::get(&element, &JsValue::from_str("requestFullscreen"))
            .map_err(|_| FullscreenError::Unsupported)?;
        let method = method
            .dyn_into::<js_sys::Function>()
            .map_err(|_| FullscreenError::Unsupported)?;
        let result = method
            .call0(&element)
            .map_err(|err| FullscreenError::Denied(describe(&err)))?;
        // Older engines return undefined instead of a promise.
        Ok(js_sys::Promise::resolve(&result))
    }
}

impl FullscreenHost for DocumentFullscreen {
    fn request_fullscreen(&self, done: FullscreenCallback) {
        match self.start() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                let result = JsFuture::from(promise)
                    .await
                    .map(|_| ())
                    .map_err(|err| FullscreenError::Denied(describe(&err)));
                done(result);
            }),
            Err(err) => done(Err(err)),
        }
    }
}
