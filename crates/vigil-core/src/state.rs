//! Proctoring state and its reducer.
//!
//! This module follows the Elm Architecture for predictable state
//! management: `State + Message → (State, Command)`. Every transition of the
//! widget goes through [`ProctorState::update`], so the whole state machine can
//! be exercised without a browser.
//!
//! # Examples
//!
//! ```
//! use vigil_core::{Command, FullscreenIntent, ProctorMessage, ProctorState, State};
//!
//! let mut state = ProctorState::default();
//! let cmd = state.update(ProctorMessage::Mounted { request_fullscreen: true });
//! assert_eq!(cmd, Command::RequestFullscreen(FullscreenIntent::Mount));
//!
//! state.update(ProctorMessage::FullscreenGranted(FullscreenIntent::Mount));
//! state.update(ProctorMessage::VisibilityChanged(false));
//! assert!(state.show_warning);
//! assert_eq!(state.warning_count, 1);
//! ```

use crate::host::FullscreenError;
use crate::signal::Environment;
use serde::{Deserialize, Serialize};

/// Application state trait.
///
/// Implements the Elm Architecture: State + Message → (State, Command)
pub trait State: Clone + Serialize + for<'de> Deserialize<'de> {
    /// Message type for state updates
    type Message;

    /// Update state in response to a message.
    ///
    /// Returns a command describing side effects for the runtime to perform.
    fn update(&mut self, msg: Self::Message) -> Command;
}

/// Side effects requested by a state update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Command {
    /// No command
    #[default]
    None,
    /// Ask the environment to enter fullscreen
    RequestFullscreen(FullscreenIntent),
}

impl Command {
    /// Check if this is the none command.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Why a fullscreen request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FullscreenIntent {
    /// Automatic request on mount
    Mount,
    /// User clicked "Return to Fullscreen" or "Enter Fullscreen Mode"
    Recover,
}

/// How a successful return to fullscreen treats the warning overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryPolicy {
    /// Re-entering fullscreen clears the overlay even if the tab is hidden
    #[default]
    Lenient,
    /// The overlay clears only once no violation remains active
    Strict,
}

/// Cause of a counted violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The document left fullscreen
    FullscreenExit,
    /// The page was hidden (tab switch or minimise)
    TabHidden,
}

impl ViolationKind {
    /// Human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::FullscreenExit => "exited fullscreen",
            Self::TabHidden => "tab hidden",
        }
    }
}

/// A logged violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// 1-based position in the log
    pub sequence: u32,
    /// What happened
    pub kind: ViolationKind,
}

/// Most recent state-changing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "kind")]
pub enum LastAction {
    /// Widget mounted
    Mounted,
    /// A violation was recorded
    Violation(ViolationKind),
    /// A fullscreen request succeeded
    Recovered,
    /// The user dismissed the overlay
    Dismissed,
    /// A fullscreen request failed
    RequestDenied,
}

/// Per-signal health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalStatus {
    /// Condition satisfied
    Ok,
    /// Condition violated
    Violated,
}

/// Overall alarm state, as shown by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alarm {
    /// No overlay
    Clear,
    /// Overlay displayed
    Warning,
}

/// Messages that drive the proctoring state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProctorMessage {
    /// The widget was mounted
    Mounted {
        /// Whether to request fullscreen immediately
        request_fullscreen: bool,
    },
    /// The environment reported a fullscreen change
    FullscreenChanged(bool),
    /// The environment reported a visibility change
    VisibilityChanged(bool),
    /// The user asked to (re-)enter fullscreen
    ReturnToFullscreen,
    /// A fullscreen request resolved successfully
    FullscreenGranted(FullscreenIntent),
    /// A fullscreen request was rejected
    FullscreenDenied(FullscreenIntent, FullscreenError),
    /// The user dismissed the warning overlay
    Dismiss,
}

/// Ephemeral proctoring state for one mount of the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProctorState {
    /// Whether the document is in fullscreen
    pub is_fullscreen: bool,
    /// Whether the page is the foreground tab
    pub is_tab_visible: bool,
    /// Whether the warning overlay is displayed
    pub show_warning: bool,
    /// Violations counted since mount
    pub warning_count: u32,
    /// Violation log, one entry per counted violation
    #[serde(default)]
    pub violations: Vec<Violation>,
    /// Most recent state-changing action
    #[serde(default)]
    pub last_action: Option<LastAction>,
    /// Overlay recovery policy
    #[serde(default)]
    pub recovery: RecoveryPolicy,
}

impl Default for ProctorState {
    fn default() -> Self {
        Self::new(RecoveryPolicy::default())
    }
}

impl ProctorState {
    /// Fresh state: not fullscreen, tab visible, no warnings.
    #[must_use]
    pub const fn new(recovery: RecoveryPolicy) -> Self {
        Self {
            is_fullscreen: false,
            is_tab_visible: true,
            show_warning: false,
            warning_count: 0,
            violations: Vec::new(),
            last_action: None,
            recovery,
        }
    }

    /// Fresh state starting from an observed environment.
    ///
    /// Conditions already violated at this point are not counted; only
    /// later transitions are.
    #[must_use]
    pub const fn observed(recovery: RecoveryPolicy, environment: Environment) -> Self {
        let mut state = Self::new(recovery);
        state.is_fullscreen = environment.fullscreen;
        state.is_tab_visible = environment.visible;
        state
    }

    /// Fullscreen signal health.
    #[must_use]
    pub const fn fullscreen_status(&self) -> SignalStatus {
        if self.is_fullscreen {
            SignalStatus::Ok
        } else {
            SignalStatus::Violated
        }
    }

    /// Visibility signal health.
    #[must_use]
    pub const fn visibility_status(&self) -> SignalStatus {
        if self.is_tab_visible {
            SignalStatus::Ok
        } else {
            SignalStatus::Violated
        }
    }

    /// Whether any underlying condition is currently violated.
    #[must_use]
    pub const fn any_violation_active(&self) -> bool {
        !self.is_fullscreen || !self.is_tab_visible
    }

    /// Overlay state.
    #[must_use]
    pub const fn alarm(&self) -> Alarm {
        if self.show_warning {
            Alarm::Warning
        } else {
            Alarm::Clear
        }
    }

    fn record_violation(&mut self, kind: ViolationKind) {
        self.warning_count = self.warning_count.saturating_add(1);
        self.violations.push(Violation {
            sequence: self.warning_count,
            kind,
        });
        self.show_warning = true;
        self.last_action = Some(LastAction::Violation(kind));
    }

    fn apply_grant(&mut self, intent: FullscreenIntent) {
        self.is_fullscreen = true;
        if intent == FullscreenIntent::Recover {
            let clear = match self.recovery {
                RecoveryPolicy::Lenient => true,
                RecoveryPolicy::Strict => !self.any_violation_active(),
            };
            if clear {
                self.show_warning = false;
            }
            self.last_action = Some(LastAction::Recovered);
        }
    }
}

impl State for ProctorState {
    type Message = ProctorMessage;

    fn update(&mut self, msg: Self::Message) -> Command {
        match msg {
            ProctorMessage::Mounted { request_fullscreen } => {
                self.last_action = Some(LastAction::Mounted);
                if request_fullscreen {
                    return Command::RequestFullscreen(FullscreenIntent::Mount);
                }
            }
            ProctorMessage::FullscreenChanged(fullscreen) => {
                let was = self.is_fullscreen;
                self.is_fullscreen = fullscreen;
                if was && !fullscreen {
                    self.record_violation(ViolationKind::FullscreenExit);
                }
            }
            ProctorMessage::VisibilityChanged(visible) => {
                let was = self.is_tab_visible;
                self.is_tab_visible = visible;
                if was && !visible {
                    self.record_violation(ViolationKind::TabHidden);
                }
            }
            ProctorMessage::ReturnToFullscreen => {
                return Command::RequestFullscreen(FullscreenIntent::Recover);
            }
            ProctorMessage::FullscreenGranted(intent) => self.apply_grant(intent),
            ProctorMessage::FullscreenDenied(_, _) => {
                self.last_action = Some(LastAction::RequestDenied);
            }
            ProctorMessage::Dismiss => {
                self.show_warning = false;
                self.last_action = Some(LastAction::Dismissed);
            }
        }
        Command::None
    }
}
