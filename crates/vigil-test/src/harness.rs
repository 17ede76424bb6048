//! Test harness for the proctoring monitor.
//!
//! A [`Harness`] owns a monitor wired to an in-memory signal source and a
//! scripted fullscreen host, so a test can drive the whole widget without a
//! browser:
//!
//! ```
//! use vigil_test::Harness;
//!
//! let mut harness = Harness::new();
//! harness.mount().hide_tab();
//! harness.assert_warning_visible().assert_warning_count(1);
//! harness.click("dismiss").assert_warning_hidden();
//! ```

use std::str::FromStr;

use vigil_core::{
    Disposition, Environment, FullscreenError, HostResponse, KeyInput, LastAction, MonitorConfig,
    ProctorState, ScriptedHost, Shortcut, Signal, SimulatedSource, ViolationMonitor,
};
use vigil_widgets::{present, render_html, PageView};

/// Test ID of the warning overlay in rendered markup.
pub const OVERLAY: &str = "warning-overlay";

/// Drives a [`ViolationMonitor`] through simulated browser signals.
pub struct Harness {
    source: SimulatedSource,
    host: ScriptedHost,
    monitor: ViolationMonitor<SimulatedSource, ScriptedHost>,
    last_disposition: Disposition,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Harness with default configuration whose host grants every request.
    #[must_use]
    pub fn new() -> Self {
        Self::with(ScriptedHost::granting(), MonitorConfig::default())
    }

    /// Harness with a specific host and configuration.
    ///
    /// The host is linked to the harness's signal source, so granted
    /// requests emit `fullscreenchange` as a browser would.
    #[must_use]
    pub fn with(host: ScriptedHost, config: MonitorConfig) -> Self {
        let source = SimulatedSource::new();
        let host = host.linked(&source);
        let monitor = ViolationMonitor::new(source.clone(), host.clone(), config);
        Self {
            source,
            host,
            monitor,
            last_disposition: Disposition::Pass,
        }
    }

    /// Report `environment` as the page's state at mount.
    pub fn starting_in(&mut self, environment: Environment) -> &mut Self {
        self.source.set_environment(environment);
        self
    }

    // === Lifecycle ===

    /// Mount the monitor.
    ///
    /// # Panics
    ///
    /// Panics if listener registration fails.
    pub fn mount(&mut self) -> &mut Self {
        if let Err(err) = self.monitor.mount() {
            panic!("Expected mount to succeed but got: {err}");
        }
        self
    }

    /// Unmount the monitor.
    pub fn unmount(&mut self) -> &mut Self {
        self.monitor.unmount();
        self
    }

    // === Signal Simulation ===

    /// The user leaves fullscreen (Esc, F11, browser UI).
    pub fn exit_fullscreen(&mut self) -> &mut Self {
        self.emit(Signal::FullscreenChanged { fullscreen: false })
    }

    /// The page enters fullscreen outside the widget's own request.
    pub fn enter_fullscreen(&mut self) -> &mut Self {
        self.emit(Signal::FullscreenChanged { fullscreen: true })
    }

    /// The tab is hidden or the window minimized.
    pub fn hide_tab(&mut self) -> &mut Self {
        self.emit(Signal::VisibilityChanged { visible: false })
    }

    /// The tab becomes visible again.
    pub fn show_tab(&mut self) -> &mut Self {
        self.emit(Signal::VisibilityChanged { visible: true })
    }

    /// Open the context menu.
    pub fn right_click(&mut self) -> &mut Self {
        self.emit(Signal::ContextMenu)
    }

    /// Press a key combination written like `"Ctrl+Shift+I"`.
    ///
    /// # Panics
    ///
    /// Panics if the combination does not parse.
    pub fn press(&mut self, combo: &str) -> &mut Self {
        let shortcut = match Shortcut::from_str(combo) {
            Ok(shortcut) => shortcut,
            Err(err) => panic!("Invalid key combination '{combo}': {err}"),
        };
        self.press_input(KeyInput::new(shortcut.key, shortcut.modifiers))
    }

    /// Press a key with explicit modifier state.
    pub fn press_input(&mut self, input: KeyInput) -> &mut Self {
        self.emit(Signal::KeyDown(input))
    }

    /// Deliver an arbitrary signal.
    pub fn emit(&mut self, signal: Signal) -> &mut Self {
        self.last_disposition = self.source.emit(signal);
        self
    }

    /// Click the button with the given test ID, if it is on the page.
    pub fn click(&mut self, test_id: &str) -> &mut Self {
        let action = self.view().button(test_id).map(|b| b.action);
        if let Some(action) = action {
            self.monitor.perform(action);
        }
        self
    }

    // === Host Scripting ===

    /// Queue a response for the next fullscreen request.
    pub fn respond(&mut self, response: HostResponse) -> &mut Self {
        self.host.push(response);
        self
    }

    /// Make the next fullscreen request fail.
    pub fn deny_next(&mut self) -> &mut Self {
        self.respond(HostResponse::Deny(FullscreenError::Denied(
            "request denied by user agent".to_string(),
        )))
    }

    /// Settle the oldest pending fullscreen request.
    pub fn resolve(&mut self, result: Result<(), FullscreenError>) -> &mut Self {
        self.host.resolve_next(result);
        self
    }

    // === Queries ===

    /// Current monitor state.
    #[must_use]
    pub fn state(&self) -> ProctorState {
        self.monitor.state()
    }

    /// Page view for the current state.
    #[must_use]
    pub fn view(&self) -> PageView {
        present(&self.monitor.state())
    }

    /// Rendered markup for the current state.
    #[must_use]
    pub fn html(&self) -> String {
        render_html(&self.view())
    }

    /// Text of the element with the given test ID: a card's value or a
    /// button's label. The overlay yields its causes and footer.
    #[must_use]
    pub fn text(&self, test_id: &str) -> String {
        let view = self.view();
        if test_id == OVERLAY {
            return view
                .overlay
                .map(|o| {
                    let mut lines = o.causes;
                    lines.push(o.footer);
                    lines.join("\n")
                })
                .unwrap_or_default();
        }
        if let Some(card) = view.card(test_id) {
            return card.value.clone();
        }
        view.button(test_id)
            .map(|b| b.label.clone())
            .unwrap_or_default()
    }

    /// Whether an element with the given test ID is on the page.
    #[must_use]
    pub fn exists(&self, test_id: &str) -> bool {
        let view = self.view();
        if test_id == OVERLAY {
            return view.overlay.is_some();
        }
        view.card(test_id).is_some() || view.button(test_id).is_some()
    }

    /// Disposition of the most recently emitted signal.
    #[must_use]
    pub const fn last_disposition(&self) -> Disposition {
        self.last_disposition
    }

    /// Underlying monitor.
    #[must_use]
    pub const fn monitor(&self) -> &ViolationMonitor<SimulatedSource, ScriptedHost> {
        &self.monitor
    }

    /// Simulated signal source.
    #[must_use]
    pub const fn source(&self) -> &SimulatedSource {
        &self.source
    }

    /// Scripted fullscreen host.
    #[must_use]
    pub const fn host(&self) -> &ScriptedHost {
        &self.host
    }

    // === Assertions ===

    /// Assert that the warning overlay is shown.
    ///
    /// # Panics
    ///
    /// Panics if the overlay is hidden.
    pub fn assert_warning_visible(&self) -> &Self {
        assert!(
            self.state().show_warning,
            "Expected warning overlay to be visible"
        );
        self
    }

    /// Assert that the warning overlay is hidden.
    ///
    /// # Panics
    ///
    /// Panics if the overlay is shown.
    pub fn assert_warning_hidden(&self) -> &Self {
        assert!(
            !self.state().show_warning,
            "Expected warning overlay to be hidden"
        );
        self
    }

    /// Assert the number of recorded violations.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_warning_count(&self, expected: u32) -> &Self {
        let actual = self.state().warning_count;
        assert_eq!(
            actual, expected,
            "Expected warning count {expected} but got {actual}"
        );
        self
    }

    /// Assert the fullscreen flag.
    ///
    /// # Panics
    ///
    /// Panics if the flag does not match.
    pub fn assert_fullscreen(&self, expected: bool) -> &Self {
        let actual = self.state().is_fullscreen;
        assert_eq!(
            actual, expected,
            "Expected is_fullscreen {expected} but got {actual}"
        );
        self
    }

    /// Assert the tab visibility flag.
    ///
    /// # Panics
    ///
    /// Panics if the flag does not match.
    pub fn assert_tab_visible(&self, expected: bool) -> &Self {
        let actual = self.state().is_tab_visible;
        assert_eq!(
            actual, expected,
            "Expected is_tab_visible {expected} but got {actual}"
        );
        self
    }

    /// Assert the most recent action.
    ///
    /// # Panics
    ///
    /// Panics if the action does not match.
    pub fn assert_last_action(&self, expected: LastAction) -> &Self {
        let actual = self.state().last_action;
        assert_eq!(
            actual,
            Some(expected),
            "Expected last action {expected:?} but got {actual:?}"
        );
        self
    }

    /// Assert that the last signal's default action was suppressed.
    ///
    /// # Panics
    ///
    /// Panics if the default action was allowed.
    pub fn assert_suppressed(&self) -> &Self {
        assert!(
            self.last_disposition.is_suppressed(),
            "Expected last signal to be suppressed"
        );
        self
    }

    /// Assert that the last signal's default action was allowed.
    ///
    /// # Panics
    ///
    /// Panics if the default action was suppressed.
    pub fn assert_passed(&self) -> &Self {
        assert!(
            !self.last_disposition.is_suppressed(),
            "Expected last signal to pass through"
        );
        self
    }

    /// Assert the number of attached listeners.
    ///
    /// # Panics
    ///
    /// Panics if the count does not match.
    pub fn assert_listeners(&self, expected: usize) -> &Self {
        let actual = self.source.listener_count();
        assert_eq!(
            actual, expected,
            "Expected {expected} listeners but found {actual}"
        );
        self
    }

    /// Assert that an element exists.
    ///
    /// # Panics
    ///
    /// Panics if the element does not exist.
    pub fn assert_exists(&self, test_id: &str) -> &Self {
        assert!(
            self.exists(test_id),
            "Expected element '{test_id}' to exist"
        );
        self
    }

    /// Assert that an element does not exist.
    ///
    /// # Panics
    ///
    /// Panics if the element exists.
    pub fn assert_not_exists(&self, test_id: &str) -> &Self {
        assert!(
            !self.exists(test_id),
            "Expected element '{test_id}' to not exist"
        );
        self
    }

    /// Assert that an element's text matches exactly.
    ///
    /// # Panics
    ///
    /// Panics if the text does not match.
    pub fn assert_text(&self, test_id: &str, expected: &str) -> &Self {
        let actual = self.text(test_id);
        assert_eq!(
            actual, expected,
            "Expected text '{expected}' but got '{actual}' for '{test_id}'"
        );
        self
    }

    /// Assert that an element's text contains a substring.
    ///
    /// # Panics
    ///
    /// Panics if the text does not contain the substring.
    pub fn assert_text_contains(&self, test_id: &str, substring: &str) -> &Self {
        let actual = self.text(test_id);
        assert!(
            actual.contains(substring),
            "Expected text for '{test_id}' to contain '{substring}' but got '{actual}'"
        );
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_widgets::{DISMISS_BUTTON, ENTER_BUTTON, RETURN_BUTTON, WARNINGS_CARD};

    #[test]
    fn test_harness_mounts_in_fullscreen() {
        let mut harness = Harness::new();
        harness.mount();
        harness
            .assert_fullscreen(true)
            .assert_listeners(4)
            .assert_not_exists(ENTER_BUTTON)
            .assert_not_exists(OVERLAY);
    }

    #[test]
    fn test_text_queries() {
        let mut harness = Harness::new();
        harness.mount().exit_fullscreen();
        harness
            .assert_text(WARNINGS_CARD, "1 violations")
            .assert_text(RETURN_BUTTON, "Return to Fullscreen")
            .assert_text_contains(OVERLAY, "You have exited fullscreen mode.")
            .assert_text_contains(OVERLAY, "Warning count: 1");
        assert_eq!(harness.text("missing"), "");
    }

    #[test]
    fn test_click_missing_button_is_noop() {
        let mut harness = Harness::new();
        harness.mount();
        let before = harness.state();
        harness.click(DISMISS_BUTTON);
        assert_eq!(harness.state(), before);
    }

    #[test]
    fn test_press_parses_combination() {
        let mut harness = Harness::new();
        harness.mount();
        harness.press("Ctrl+Shift+I").assert_suppressed();
        harness.press("Ctrl+C").assert_passed();
    }

    #[test]
    #[should_panic(expected = "Invalid key combination")]
    fn test_press_rejects_garbage() {
        let mut harness = Harness::new();
        harness.press("Hyper+Q");
    }

    #[test]
    #[should_panic(expected = "Expected warning count 3")]
    fn test_assertion_failure_message() {
        let mut harness = Harness::new();
        harness.mount().hide_tab();
        harness.assert_warning_count(3);
    }

    #[test]
    fn test_html_reflects_state() {
        let mut harness = Harness::new();
        harness.mount().hide_tab();
        assert!(harness.html().contains(r#"data-testid="warning-overlay""#));
    }
}
