//! View model for the proctoring page.
//!
//! [`present`] is a pure function of [`ProctorState`]. It decides what is
//! shown; [`crate::html`] decides how.

use serde::{Deserialize, Serialize};
use vigil_core::{ProctorState, UserAction};

/// Icon glyphs used by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    /// Shield
    Shield,
    /// Open eye
    Eye,
    /// Crossed-out eye
    EyeOff,
    /// Warning triangle
    AlertTriangle,
}

impl Icon {
    /// Stable name, used as a CSS class suffix.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Shield => "shield",
            Self::Eye => "eye",
            Self::EyeOff => "eye-off",
            Self::AlertTriangle => "alert-triangle",
        }
    }
}

/// Colour tone of a status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Condition satisfied
    Good,
    /// Condition violated
    Alert,
    /// Attention needed
    Warning,
}

impl Tone {
    /// Stable name, used as a CSS class suffix.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Alert => "alert",
            Self::Warning => "warning",
        }
    }
}

/// Button styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    /// Filled, alert-coloured
    Primary,
    /// Bordered
    Outline,
}

/// A clickable control bound to a user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    /// Button label
    pub label: String,
    /// Action performed on click
    pub action: UserAction,
    /// Test ID
    pub test_id: String,
    /// Styling
    pub variant: ButtonVariant,
}

impl ActionButton {
    fn new(label: &str, action: UserAction, test_id: &str, variant: ButtonVariant) -> Self {
        Self {
            label: label.to_string(),
            action,
            test_id: test_id.to_string(),
            variant,
        }
    }
}

/// Modal warning shown after a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningOverlay {
    /// Heading
    pub title: String,
    /// One line per currently violated condition
    pub causes: Vec<String>,
    /// Logged-count line
    pub footer: String,
    /// "Return to Fullscreen" and "Dismiss"
    pub actions: Vec<ActionButton>,
}

/// Page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Session badge
    pub badge: String,
    /// Page title
    pub title: String,
    /// Explanatory paragraph
    pub description: String,
    /// Shown while not in fullscreen
    pub enter_fullscreen: Option<ActionButton>,
}

/// One dashboard indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCard {
    /// Test ID
    pub test_id: String,
    /// Icon
    pub icon: Icon,
    /// Caption
    pub title: String,
    /// Current value
    pub value: String,
    /// Colour tone
    pub tone: Tone,
}

/// One monitored category in the informational panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoItem {
    /// Category name
    pub title: String,
    /// What is observed
    pub description: String,
}

/// Always-visible informational panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoPanel {
    /// Heading
    pub title: String,
    /// Lead paragraph
    pub intro: String,
    /// Monitored categories
    pub items: Vec<InfoItem>,
}

/// Everything rendered for one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    /// Warning overlay, when displayed
    pub overlay: Option<WarningOverlay>,
    /// Header
    pub header: Header,
    /// Fullscreen, visibility and warning indicators
    pub status: Vec<StatusCard>,
    /// Informational panel
    pub info: InfoPanel,
}

impl PageView {
    /// Every button on the page, overlay first.
    #[must_use]
    pub fn buttons(&self) -> Vec<&ActionButton> {
        self.overlay
            .iter()
            .flat_map(|o| o.actions.iter())
            .chain(self.header.enter_fullscreen.iter())
            .collect()
    }

    /// Find a button by test ID.
    #[must_use]
    pub fn button(&self, test_id: &str) -> Option<&ActionButton> {
        self.buttons().into_iter().find(|b| b.test_id == test_id)
    }

    /// Find a status card by test ID.
    #[must_use]
    pub fn card(&self, test_id: &str) -> Option<&StatusCard> {
        self.status.iter().find(|c| c.test_id == test_id)
    }
}

/// Test ID of the overlay's return button.
pub const RETURN_BUTTON: &str = "return-to-fullscreen";
/// Test ID of the overlay's dismiss button.
pub const DISMISS_BUTTON: &str = "dismiss";
/// Test ID of the header's enter-fullscreen button.
pub const ENTER_BUTTON: &str = "enter-fullscreen";
/// Test ID of the fullscreen status card.
pub const FULLSCREEN_CARD: &str = "status-fullscreen";
/// Test ID of the visibility status card.
pub const VISIBILITY_CARD: &str = "status-visibility";
/// Test ID of the warnings status card.
pub const WARNINGS_CARD: &str = "status-warnings";

/// Build the page for a state.
#[must_use]
pub fn present(state: &ProctorState) -> PageView {
    PageView {
        overlay: state.show_warning.then(|| overlay(state)),
        header: header(state),
        status: vec![
            fullscreen_card(state),
            visibility_card(state),
            warnings_card(state),
        ],
        info: info_panel(),
    }
}

fn overlay(state: &ProctorState) -> WarningOverlay {
    let mut causes = Vec::new();
    if !state.is_fullscreen {
        causes.push("You have exited fullscreen mode.".to_string());
    }
    if !state.is_tab_visible {
        causes.push("You have switched tabs or minimized the window.".to_string());
    }

    WarningOverlay {
        title: "Security Warning".to_string(),
        causes,
        footer: format!(
            "This action has been logged. Warning count: {}",
            state.warning_count
        ),
        actions: vec![
            ActionButton::new(
                "Return to Fullscreen",
                UserAction::ReturnToFullscreen,
                RETURN_BUTTON,
                ButtonVariant::Primary,
            ),
            ActionButton::new(
                "Dismiss",
                UserAction::Dismiss,
                DISMISS_BUTTON,
                ButtonVariant::Outline,
            ),
        ],
    }
}

fn header(state: &ProctorState) -> Header {
    Header {
        badge: "Secure Session Active".to_string(),
        title: "Fullscreen Security Mode".to_string(),
        description: "This page enforces fullscreen mode for enhanced security and focus. \
                      Any attempts to exit fullscreen or switch tabs will be detected and logged."
            .to_string(),
        enter_fullscreen: (!state.is_fullscreen).then(|| {
            ActionButton::new(
                "Enter Fullscreen Mode",
                UserAction::ReturnToFullscreen,
                ENTER_BUTTON,
                ButtonVariant::Primary,
            )
        }),
    }
}

const fn signal_tone(ok: bool) -> Tone {
    if ok {
        Tone::Good
    } else {
        Tone::Alert
    }
}

fn fullscreen_card(state: &ProctorState) -> StatusCard {
    StatusCard {
        test_id: FULLSCREEN_CARD.to_string(),
        icon: Icon::Shield,
        title: "Fullscreen Status".to_string(),
        value: if state.is_fullscreen { "Active" } else { "Inactive" }.to_string(),
        tone: signal_tone(state.is_fullscreen),
    }
}

fn visibility_card(state: &ProctorState) -> StatusCard {
    StatusCard {
        test_id: VISIBILITY_CARD.to_string(),
        icon: if state.is_tab_visible {
            Icon::Eye
        } else {
            Icon::EyeOff
        },
        title: "Tab Visibility".to_string(),
        value: if state.is_tab_visible { "Focused" } else { "Hidden" }.to_string(),
        tone: signal_tone(state.is_tab_visible),
    }
}

fn warnings_card(state: &ProctorState) -> StatusCard {
    StatusCard {
        test_id: WARNINGS_CARD.to_string(),
        icon: Icon::AlertTriangle,
        title: "Warnings".to_string(),
        value: format!("{} violations", state.warning_count),
        tone: if state.warning_count == 0 {
            Tone::Good
        } else {
            Tone::Warning
        },
    }
}

fn info_panel() -> InfoPanel {
    let item = |title: &str, description: &str| InfoItem {
        title: title.to_string(),
        description: description.to_string(),
    };
    InfoPanel {
        title: "Secure Content Area".to_string(),
        intro: "This is your protected workspace. The system continuously monitors for:"
            .to_string(),
        items: vec![
            item("Fullscreen Exit", "Detects when user exits fullscreen mode"),
            item("Tab Switching", "Monitors tab visibility and focus"),
            item("Developer Tools", "Blocks F12 and context menu access"),
            item("Violation Logging", "Tracks and counts security violations"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{FullscreenIntent, ProctorMessage, State};

    fn state_with(msgs: &[ProctorMessage]) -> ProctorState {
        let mut state = ProctorState::default();
        for msg in msgs {
            state.update(msg.clone());
        }
        state
    }

    fn fullscreen() -> ProctorMessage {
        ProctorMessage::FullscreenGranted(FullscreenIntent::Mount)
    }

    #[test]
    fn test_initial_page() {
        let page = present(&ProctorState::default());
        assert!(page.overlay.is_none());
        assert!(page.header.enter_fullscreen.is_some());
        assert_eq!(page.card(FULLSCREEN_CARD).unwrap().value, "Inactive");
        assert_eq!(page.card(FULLSCREEN_CARD).unwrap().tone, Tone::Alert);
        assert_eq!(page.card(VISIBILITY_CARD).unwrap().value, "Focused");
        assert_eq!(page.card(WARNINGS_CARD).unwrap().value, "0 violations");
        assert_eq!(page.card(WARNINGS_CARD).unwrap().tone, Tone::Good);
    }

    #[test]
    fn test_fullscreen_hides_enter_button() {
        let page = present(&state_with(&[fullscreen()]));
        assert!(page.header.enter_fullscreen.is_none());
        assert!(page.button(ENTER_BUTTON).is_none());
        assert_eq!(page.card(FULLSCREEN_CARD).unwrap().value, "Active");
        assert_eq!(page.card(FULLSCREEN_CARD).unwrap().tone, Tone::Good);
    }

    #[test]
    fn test_overlay_for_hidden_tab() {
        let page = present(&state_with(&[
            fullscreen(),
            ProctorMessage::VisibilityChanged(false),
        ]));
        let overlay = page.overlay.as_ref().unwrap();
        assert_eq!(overlay.title, "Security Warning");
        assert_eq!(
            overlay.causes,
            vec!["You have switched tabs or minimized the window.".to_string()]
        );
        assert_eq!(
            overlay.footer,
            "This action has been logged. Warning count: 1"
        );
        let visibility = page.card(VISIBILITY_CARD).unwrap();
        assert_eq!(visibility.value, "Hidden");
        assert_eq!(visibility.icon, Icon::EyeOff);
        assert_eq!(page.card(WARNINGS_CARD).unwrap().tone, Tone::Warning);
    }

    #[test]
    fn test_overlay_lists_both_causes() {
        let page = present(&state_with(&[
            fullscreen(),
            ProctorMessage::FullscreenChanged(false),
            ProctorMessage::VisibilityChanged(false),
        ]));
        let overlay = page.overlay.unwrap();
        assert_eq!(overlay.causes.len(), 2);
        assert_eq!(overlay.causes[0], "You have exited fullscreen mode.");
    }

    #[test]
    fn test_overlay_buttons() {
        let page = present(&state_with(&[
            fullscreen(),
            ProctorMessage::FullscreenChanged(false),
        ]));
        let labels: Vec<_> = page.buttons().into_iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Return to Fullscreen", "Dismiss", "Enter Fullscreen Mode"]
        );
        assert_eq!(page.button(DISMISS_BUTTON).unwrap().action, UserAction::Dismiss);
        assert_eq!(
            page.button(ENTER_BUTTON).unwrap().action,
            UserAction::ReturnToFullscreen
        );
    }

    #[test]
    fn test_dismissed_overlay_hidden() {
        let page = present(&state_with(&[
            fullscreen(),
            ProctorMessage::VisibilityChanged(false),
            ProctorMessage::Dismiss,
        ]));
        assert!(page.overlay.is_none());
        assert_eq!(page.card(WARNINGS_CARD).unwrap().value, "1 violations");
    }

    #[test]
    fn test_info_panel_always_present() {
        for state in [
            ProctorState::default(),
            state_with(&[fullscreen(), ProctorMessage::VisibilityChanged(false)]),
        ] {
            let page = present(&state);
            let titles: Vec<_> = page.info.items.iter().map(|i| i.title.as_str()).collect();
            assert_eq!(
                titles,
                [
                    "Fullscreen Exit",
                    "Tab Switching",
                    "Developer Tools",
                    "Violation Logging"
                ]
            );
        }
    }

    #[test]
    fn test_present_is_deterministic() {
        let state = state_with(&[fullscreen(), ProctorMessage::FullscreenChanged(false)]);
        assert_eq!(present(&state), present(&state));
    }

    #[test]
    fn test_page_serializes() {
        let page = present(&state_with(&[
            fullscreen(),
            ProctorMessage::VisibilityChanged(false),
        ]));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["status"][1]["icon"], "eye-off");
        assert_eq!(json["overlay"]["actions"][0]["action"], "return-to-fullscreen");
    }
}
