//! Keyboard shortcut matching for intercepted key presses.
//!
//! This module provides:
//! - Modifier key state (Ctrl, Alt, Shift, Meta)
//! - Shortcut parsing from strings such as `"Ctrl+Shift+I"`
//! - [`KeyFilter`], the set of shortcuts the monitor suppresses
//!
//! Suppressing a shortcut only blocks that literal key combination. Browser
//! menus and other entry points to developer tools stay reachable, so a filter
//! is an observability aid and never a security boundary.

use crate::event::{Key, KeyInput};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Modifier keys for keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Control key.
    pub ctrl: bool,
    /// Alt key (Option on Mac).
    pub alt: bool,
    /// Shift key.
    pub shift: bool,
    /// Meta key (Windows key, Cmd on Mac).
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self::new(false, false, false, false);

    /// Ctrl only.
    pub const CTRL: Self = Self::new(true, false, false, false);

    /// Shift only.
    pub const SHIFT: Self = Self::new(false, false, true, false);

    /// Ctrl+Shift.
    pub const CTRL_SHIFT: Self = Self::new(true, false, true, false);

    /// Create custom modifiers.
    pub const fn new(ctrl: bool, alt: bool, shift: bool, meta: bool) -> Self {
        Self {
            ctrl,
            alt,
            shift,
            meta,
        }
    }

    /// Check if any modifier is pressed.
    pub const fn any(&self) -> bool {
        self.ctrl || self.alt || self.shift || self.meta
    }

    /// Check if no modifier is pressed.
    pub const fn none(&self) -> bool {
        !self.any()
    }

    /// Whether every modifier set in `self` is also set in `held`.
    pub const fn satisfied_by(&self, held: &Self) -> bool {
        (!self.ctrl || held.ctrl)
            && (!self.alt || held.alt)
            && (!self.shift || held.shift)
            && (!self.meta || held.meta)
    }

    /// Get a display string for the modifiers.
    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.meta {
            parts.push("Meta");
        }
        parts.join("+")
    }
}

/// A keyboard shortcut (key + required modifiers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    /// The key.
    pub key: Key,
    /// Modifiers that must be held.
    pub modifiers: Modifiers,
}

impl Shortcut {
    /// Devtools toggle key.
    pub const DEVTOOLS_KEY: Self = Self::key(Key::F12);

    /// Devtools inspector combination.
    pub const DEVTOOLS_INSPECT: Self = Self::ctrl_shift(Key::I);

    /// Create a new shortcut.
    pub const fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Create a shortcut with no modifiers.
    pub const fn key(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Create a shortcut with Ctrl modifier.
    pub const fn ctrl(key: Key) -> Self {
        Self::new(key, Modifiers::CTRL)
    }

    /// Create a shortcut with Ctrl+Shift modifiers.
    pub const fn ctrl_shift(key: Key) -> Self {
        Self::new(key, Modifiers::CTRL_SHIFT)
    }

    /// Whether a key press triggers this shortcut.
    ///
    /// The key must match and every required modifier must be held. Extra
    /// modifiers do not prevent a match, so `F12` also matches `Shift+F12`.
    pub fn matches(&self, input: &KeyInput) -> bool {
        self.key == input.key && self.modifiers.satisfied_by(&input.modifiers)
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.none() {
            write!(f, "{}", self.key.name())
        } else {
            write!(f, "{}+{}", self.modifiers.display(), self.key.name())
        }
    }
}

/// Error parsing a shortcut string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcutParseError {
    /// The string was empty
    Empty,
    /// A modifier name was not recognised
    UnknownModifier(String),
    /// The key name was not recognised
    UnknownKey(String),
}

impl fmt::Display for ShortcutParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty shortcut"),
            Self::UnknownModifier(m) => write!(f, "unknown modifier: {m}"),
            Self::UnknownKey(k) => write!(f, "unknown key: {k}"),
        }
    }
}

impl std::error::Error for ShortcutParseError {}

impl FromStr for Shortcut {
    type Err = ShortcutParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key_name = parts.pop().unwrap_or_default();
        if key_name.is_empty() {
            return Err(ShortcutParseError::UnknownKey(s.to_string()));
        }
        let key = Key::from_name(key_name)
            .ok_or_else(|| ShortcutParseError::UnknownKey(key_name.to_string()))?;

        let mut modifiers = Modifiers::NONE;
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                _ => return Err(ShortcutParseError::UnknownModifier(part.to_string())),
            }
        }

        Ok(Self::new(key, modifiers))
    }
}

impl Serialize for Shortcut {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Shortcut {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Set of shortcuts whose default action is suppressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyFilter {
    shortcuts: Vec<Shortcut>,
}

impl Default for KeyFilter {
    fn default() -> Self {
        Self::devtools()
    }
}

impl KeyFilter {
    /// A filter that blocks nothing.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            shortcuts: Vec::new(),
        }
    }

    /// The devtools-opening key and key combination.
    #[must_use]
    pub fn devtools() -> Self {
        Self {
            shortcuts: vec![Shortcut::DEVTOOLS_KEY, Shortcut::DEVTOOLS_INSPECT],
        }
    }

    /// Add a shortcut to the filter.
    #[must_use]
    pub fn with(mut self, shortcut: Shortcut) -> Self {
        if !self.shortcuts.contains(&shortcut) {
            self.shortcuts.push(shortcut);
        }
        self
    }

    /// Shortcuts in the filter.
    #[must_use]
    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    /// Whether a key press should be suppressed.
    #[must_use]
    pub fn blocks(&self, input: &KeyInput) -> bool {
        self.shortcuts.iter().any(|s| s.matches(input))
    }
}
