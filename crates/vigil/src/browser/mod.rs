//! Browser runtime for the Vigil widget.
//!
//! This module binds the monitor to the DOM: document event listeners as the
//! signal source, `requestFullscreen` as the fullscreen host, and the
//! rendered page as the root element's markup.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod document;
#[cfg(target_arch = "wasm32")]
pub mod events;

// Cross-platform modules
pub mod logging;

#[cfg(target_arch = "wasm32")]
pub use app::{App, MountError};
#[cfg(target_arch = "wasm32")]
pub use document::{DocumentFullscreen, DocumentSignalSource};
pub use logging::{ConsoleLayer, ConsoleSink};
