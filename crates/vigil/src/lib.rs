//! Vigil: fullscreen and tab-visibility proctoring widget for the browser.
//!
//! Vigil watches for the page leaving fullscreen and for the tab being
//! hidden, counts each occurrence as a violation, and shows a warning
//! overlay. It also suppresses the context menu and the developer-tools
//! key combinations. None of this is a security boundary: a user can still
//! reach developer tools through browser menus.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { App } from './vigil.js';
//!
//! async function main() {
//!     await init();
//!     const app = new App('exam', 'recovery = "strict"');
//!     app.mount();
//!     console.log(app.state_json());
//! }
//! ```

pub use vigil_core::*;
pub use vigil_widgets as widgets;

pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{App, MountError};
