//! Core types for the Vigil proctoring widget.
//!
//! This crate holds everything that does not need a browser:
//! - Environment signals: [`Signal`], [`SignalKind`], [`Disposition`]
//! - Shortcut matching: [`Shortcut`], [`KeyFilter`]
//! - The reducer: [`ProctorState`] driven by [`ProctorMessage`]
//! - Environment seams: [`SignalSource`] and [`FullscreenHost`], with
//!   in-memory implementations for tests
//! - The [`ViolationMonitor`] that ties them together
//!
//! Vigil observes; it does not enforce. A page cannot stop a user from
//! leaving fullscreen or opening developer tools through browser menus.

mod config;
mod event;
mod host;
mod monitor;
mod shortcut;
mod signal;
mod state;

pub use config::{ConfigError, MonitorConfig};
pub use event::{Disposition, Key, KeyInput, Signal, SignalKind};
pub use host::{FullscreenCallback, FullscreenError, FullscreenHost, HostResponse, ScriptedHost};
pub use monitor::{UserAction, ViewerId, ViolationMonitor};
pub use shortcut::{KeyFilter, Modifiers, Shortcut, ShortcutParseError};
pub use signal::{
    Environment, SignalError, SignalHandler, SignalSource, SimulatedSource, SubscriptionId,
};
pub use state::{
    Alarm, Command, FullscreenIntent, LastAction, ProctorMessage, ProctorState, RecoveryPolicy,
    SignalStatus, State, Violation, ViolationKind,
};
