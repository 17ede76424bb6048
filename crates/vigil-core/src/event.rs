//! Environment signals consumed by the violation monitor.
//!
//! A [`Signal`] is the platform-neutral form of a document event. Browser
//! bindings convert DOM events into signals; tests construct them directly.

use crate::shortcut::Modifiers;
use serde::{Deserialize, Serialize};

/// Keyboard key identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A key
    A,
    /// B key
    B,
    /// C key
    C,
    /// D key
    D,
    /// E key
    E,
    /// F key
    F,
    /// G key
    G,
    /// H key
    H,
    /// I key
    I,
    /// J key
    J,
    /// K key
    K,
    /// L key
    L,
    /// M key
    M,
    /// N key
    N,
    /// O key
    O,
    /// P key
    P,
    /// Q key
    Q,
    /// R key
    R,
    /// S key
    S,
    /// T key
    T,
    /// U key
    U,
    /// V key
    V,
    /// W key
    W,
    /// X key
    X,
    /// Y key
    Y,
    /// Z key
    Z,
    /// Digit 0
    Num0,
    /// Digit 1
    Num1,
    /// Digit 2
    Num2,
    /// Digit 3
    Num3,
    /// Digit 4
    Num4,
    /// Digit 5
    Num5,
    /// Digit 6
    Num6,
    /// Digit 7
    Num7,
    /// Digit 8
    Num8,
    /// Digit 9
    Num9,
    /// F1 function key
    F1,
    /// F2 function key
    F2,
    /// F3 function key
    F3,
    /// F4 function key
    F4,
    /// F5 function key
    F5,
    /// F6 function key
    F6,
    /// F7 function key
    F7,
    /// F8 function key
    F8,
    /// F9 function key
    F9,
    /// F10 function key
    F10,
    /// F11 function key
    F11,
    /// F12 function key
    F12,
    /// Enter key
    Enter,
    /// Escape key
    Escape,
    /// Backspace key
    Backspace,
    /// Tab key
    Tab,
    /// Space bar
    Space,
    /// Delete key
    Delete,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Any key without a dedicated variant.
    Unidentified,
}

/// Key names as reported by the DOM `KeyboardEvent.key` property.
const KEY_NAMES: &[(Key, &str)] = &[
    (Key::A, "A"),
    (Key::B, "B"),
    (Key::C, "C"),
    (Key::D, "D"),
    (Key::E, "E"),
    (Key::F, "F"),
    (Key::G, "G"),
    (Key::H, "H"),
    (Key::I, "I"),
    (Key::J, "J"),
    (Key::K, "K"),
    (Key::L, "L"),
    (Key::M, "M"),
    (Key::N, "N"),
    (Key::O, "O"),
    (Key::P, "P"),
    (Key::Q, "Q"),
    (Key::R, "R"),
    (Key::S, "S"),
    (Key::T, "T"),
    (Key::U, "U"),
    (Key::V, "V"),
    (Key::W, "W"),
    (Key::X, "X"),
    (Key::Y, "Y"),
    (Key::Z, "Z"),
    (Key::Num0, "0"),
    (Key::Num1, "1"),
    (Key::Num2, "2"),
    (Key::Num3, "3"),
    (Key::Num4, "4"),
    (Key::Num5, "5"),
    (Key::Num6, "6"),
    (Key::Num7, "7"),
    (Key::Num8, "8"),
    (Key::Num9, "9"),
    (Key::F1, "F1"),
    (Key::F2, "F2"),
    (Key::F3, "F3"),
    (Key::F4, "F4"),
    (Key::F5, "F5"),
    (Key::F6, "F6"),
    (Key::F7, "F7"),
    (Key::F8, "F8"),
    (Key::F9, "F9"),
    (Key::F10, "F10"),
    (Key::F11, "F11"),
    (Key::F12, "F12"),
    (Key::Enter, "Enter"),
    (Key::Escape, "Escape"),
    (Key::Backspace, "Backspace"),
    (Key::Tab, "Tab"),
    (Key::Space, " "),
    (Key::Delete, "Delete"),
    (Key::Up, "ArrowUp"),
    (Key::Down, "ArrowDown"),
    (Key::Left, "ArrowLeft"),
    (Key::Right, "ArrowRight"),
];

impl Key {
    /// Look up a key by its DOM name.
    ///
    /// Letters are matched case-insensitively, since holding Shift reports
    /// `"I"` where an unshifted press reports `"i"`. `"Space"` is accepted as
    /// an alias for `" "` so shortcuts can be written in config files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("space") {
            return Some(Self::Space);
        }
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphabetic() {
                let upper = c.to_ascii_uppercase().to_string();
                return KEY_NAMES
                    .iter()
                    .find(|(_, n)| *n == upper)
                    .map(|(k, _)| *k);
            }
        }
        KEY_NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(k, _)| *k)
    }

    /// Resolve a DOM key name, falling back to [`Key::Unidentified`].
    #[must_use]
    pub fn from_dom(name: &str) -> Self {
        Self::from_name(name).unwrap_or(Self::Unidentified)
    }

    /// Canonical display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Space => "Space",
            Self::Unidentified => "Unidentified",
            key => KEY_NAMES
                .iter()
                .find(|(k, _)| k == key)
                .map_or("Unidentified", |(_, n)| *n),
        }
    }
}

/// A key press together with the modifiers held at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    /// Key pressed
    pub key: Key,
    /// Modifiers held
    pub modifiers: Modifiers,
}

impl KeyInput {
    /// Create a key input.
    #[must_use]
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key press with no modifiers.
    #[must_use]
    pub const fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }
}

/// Environment signal delivered to the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The document entered or left fullscreen
    FullscreenChanged {
        /// Whether a fullscreen element is now present
        fullscreen: bool,
    },
    /// The page became visible or hidden
    VisibilityChanged {
        /// Whether the page is the foreground tab
        visible: bool,
    },
    /// A context menu was requested
    ContextMenu,
    /// A key was pressed
    KeyDown(KeyInput),
}

impl Signal {
    /// The subscription channel this signal is delivered on.
    #[must_use]
    pub const fn kind(&self) -> SignalKind {
        match self {
            Self::FullscreenChanged { .. } => SignalKind::FullscreenChange,
            Self::VisibilityChanged { .. } => SignalKind::VisibilityChange,
            Self::ContextMenu => SignalKind::ContextMenu,
            Self::KeyDown(_) => SignalKind::KeyDown,
        }
    }
}

/// Subscription channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    /// `fullscreenchange`
    FullscreenChange,
    /// `visibilitychange`
    VisibilityChange,
    /// `contextmenu`
    ContextMenu,
    /// `keydown`
    KeyDown,
}

impl SignalKind {
    /// Every channel the monitor listens on, in registration order.
    pub const ALL: [Self; 4] = [
        Self::FullscreenChange,
        Self::VisibilityChange,
        Self::ContextMenu,
        Self::KeyDown,
    ];

    /// DOM event type name.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::FullscreenChange => "fullscreenchange",
            Self::VisibilityChange => "visibilitychange",
            Self::ContextMenu => "contextmenu",
            Self::KeyDown => "keydown",
        }
    }
}

/// What the signal source should do with the originating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Let the default action happen
    #[default]
    Pass,
    /// Prevent the default action
    Suppress,
}

impl Disposition {
    /// Whether the default action should be prevented.
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppress)
    }

    /// Combine the verdicts of two handlers; suppression wins.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Pass, Self::Pass) => Self::Pass,
            _ => Self::Suppress,
        }
    }
}
