//! Monitor configuration.
//!
//! Configuration is read from TOML:
//!
//! ```toml
//! request_on_mount = true
//! recovery = "strict"
//! blocked_shortcuts = ["F12", "Ctrl+Shift+I", "Ctrl+U"]
//! ```
//!
//! Every key is optional. Context-menu suppression is always on and has no
//! setting.

use crate::shortcut::KeyFilter;
use crate::state::RecoveryPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration for a [`ViolationMonitor`](crate::ViolationMonitor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// Request fullscreen as soon as the monitor mounts
    pub request_on_mount: bool,
    /// How a successful return to fullscreen treats the overlay
    pub recovery: RecoveryPolicy,
    /// Key combinations whose default action is suppressed
    pub blocked_shortcuts: KeyFilter,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            request_on_mount: true,
            recovery: RecoveryPolicy::Lenient,
            blocked_shortcuts: KeyFilter::devtools(),
        }
    }
}

impl MonitorConfig {
    /// Parse configuration from a TOML document.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Set the recovery policy.
    #[must_use]
    pub fn recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    /// Enable or disable the fullscreen request on mount.
    #[must_use]
    pub fn request_on_mount(mut self, request: bool) -> Self {
        self.request_on_mount = request;
        self
    }

    /// Replace the blocked shortcuts.
    #[must_use]
    pub fn blocked_shortcuts(mut self, filter: KeyFilter) -> Self {
        self.blocked_shortcuts = filter;
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The TOML document was malformed or had invalid values
    Parse(String),
    /// The configuration could not be written out
    Serialize(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid config: {msg}"),
            Self::Serialize(msg) => write!(f, "config serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
