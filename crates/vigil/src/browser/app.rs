//! WASM application entry point.

use super::document::{describe, DocumentFullscreen, DocumentSignalSource};
use super::logging;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use vigil_core::{
    ConfigError, MonitorConfig, ProctorState, SignalError, UserAction, ViewerId, ViolationMonitor,
};
use vigil_widgets::{present, render_html, STYLESHEET};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, MouseEvent};

type Monitor = ViolationMonitor<DocumentSignalSource, DocumentFullscreen>;

/// Failure to create or mount an [`App`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountError {
    /// No window or document is available
    NoDocument,
    /// The root element ID did not match any element
    RootNotFound(String),
    /// The configuration could not be parsed
    Config(ConfigError),
    /// An event listener could not be attached
    Listener(SignalError),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDocument => write!(f, "no document available"),
            Self::RootNotFound(id) => write!(f, "element '{id}' not found"),
            Self::Config(err) => write!(f, "{err}"),
            Self::Listener(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MountError {}

impl From<ConfigError> for MountError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<SignalError> for MountError {
    fn from(err: SignalError) -> Self {
        Self::Listener(err)
    }
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// The proctoring widget mounted into a page element.
#[wasm_bindgen]
pub struct App {
    monitor: Rc<RefCell<Monitor>>,
    document: Document,
    root: Element,
    style: Option<Element>,
    viewer: Option<ViewerId>,
    click_callback: Option<Closure<dyn FnMut(MouseEvent)>>,
}

#[wasm_bindgen]
impl App {
    /// Create the widget inside the element with ID `root_id`.
    ///
    /// `config` is an optional TOML document; see `MonitorConfig`.
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str, config: Option<String>) -> Result<App, JsValue> {
        console_error_panic_hook::set_once();
        Ok(Self::create(root_id, config.as_deref())?)
    }

    /// Attach listeners, render, and request fullscreen.
    pub fn mount(&mut self) -> Result<(), JsValue> {
        if self.monitor.borrow().is_mounted() {
            return Ok(());
        }
        self.install_style();
        self.install_click();

        let root = self.root.clone();
        let viewer = self
            .monitor
            .borrow()
            .subscribe(move |state| render(&root, state));
        self.viewer = Some(viewer);

        let mounted = self.monitor.borrow_mut().mount();
        if let Err(err) = mounted {
            self.teardown();
            return Err(MountError::from(err).into());
        }
        Ok(())
    }

    /// Detach every listener and clear the widget's markup.
    pub fn unmount(&mut self) {
        self.monitor.borrow_mut().unmount();
        self.teardown();
        self.root.set_inner_html("");
    }

    /// Request fullscreen again.
    pub fn return_to_fullscreen(&self) {
        self.monitor.borrow().return_to_fullscreen();
    }

    /// Hide the warning overlay.
    pub fn dismiss(&self) {
        self.monitor.borrow().dismiss();
    }

    /// Whether listeners are attached.
    pub fn is_mounted(&self) -> bool {
        self.monitor.borrow().is_mounted()
    }

    /// Number of violations recorded since mount.
    pub fn warning_count(&self) -> u32 {
        self.monitor.borrow().state().warning_count
    }

    /// Current state as JSON.
    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.monitor.borrow().state())
            .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {e}")))
    }
}

impl App {
    /// Create the widget (internal Rust API).
    pub fn create(root_id: &str, config: Option<&str>) -> Result<Self, MountError> {
        logging::init(tracing::Level::INFO);

        let config = match config {
            Some(source) => MonitorConfig::from_toml(source)?,
            None => MonitorConfig::default(),
        };
        let document = window()
            .and_then(|w| w.document())
            .ok_or(MountError::NoDocument)?;
        let root = document
            .get_element_by_id(root_id)
            .ok_or_else(|| MountError::RootNotFound(root_id.to_string()))?;

        let monitor = ViolationMonitor::new(
            DocumentSignalSource::new(document.clone()),
            DocumentFullscreen::new(document.clone()),
            config,
        );
        Ok(Self {
            monitor: Rc::new(RefCell::new(monitor)),
            document,
            root,
            style: None,
            viewer: None,
            click_callback: None,
        })
    }

    /// Snapshot of the monitor state.
    pub fn state(&self) -> ProctorState {
        self.monitor.borrow().state()
    }

    fn install_style(&mut self) {
        if self.style.is_some() {
            return;
        }
        let Ok(style) = self.document.create_element("style") else {
            tracing::warn!("could not create stylesheet element");
            return;
        };
        style.set_text_content(Some(STYLESHEET));
        let Some(head) = self.document.head() else {
            tracing::warn!("document has no head, stylesheet not installed");
            return;
        };
        if let Err(err) = head.append_child(&style) {
            tracing::warn!(error = %describe(&err), "could not install stylesheet");
            return;
        }
        self.style = Some(style);
    }

    // Buttons carry `data-action`; one listener on the root routes them all.
    fn install_click(&mut self) {
        let monitor: Weak<RefCell<Monitor>> = Rc::downgrade(&self.monitor);
        let cb = Closure::new(move |e: MouseEvent| {
            let Some(action) = clicked_action(&e) else {
                return;
            };
            let Some(monitor) = monitor.upgrade() else {
                return;
            };
            match monitor.try_borrow() {
                Ok(monitor) => monitor.perform(action),
                Err(_) => tracing::debug!(action = action.as_str(), "monitor busy, click dropped"),
            };
        });
        if let Err(err) = self
            .root
            .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
        {
            tracing::warn!(error = %describe(&err), "click listener failed");
            return;
        }
        self.click_callback = Some(cb);
    }

    fn teardown(&mut self) {
        if let Some(cb) = self.click_callback.take() {
            if let Err(err) = self
                .root
                .remove_event_listener_with_callback("click", cb.as_ref().unchecked_ref())
            {
                tracing::warn!(error = %describe(&err), "click listener removal failed");
            }
        }
        if let Some(id) = self.viewer.take() {
            self.monitor.borrow().unsubscribe(id);
        }
        if let Some(style) = self.style.take() {
            style.remove();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn clicked_action(event: &MouseEvent) -> Option<UserAction> {
    let target = event.target()?.dyn_into::<Element>().ok()?;
    let button = target.closest("[data-action]").ok()??;
    UserAction::parse(&button.get_attribute("data-action")?)
}

fn render(root: &Element, state: &ProctorState) {
    root.set_inner_html(&render_html(&present(state)));
}

/// Initialize panic hook for better error messages.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Log to browser console.
#[wasm_bindgen]
pub fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}
