//! Testing utilities for the Vigil proctoring widget.
//!
//! [`Harness`] runs the monitor against simulated browser signals and a
//! scripted fullscreen host, with fluent actions and panicking assertions.

mod harness;

pub use harness::{Harness, OVERLAY};
pub use vigil_core::{FullscreenError, HostResponse, LastAction, MonitorConfig, ScriptedHost};
