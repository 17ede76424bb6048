//! Presentation for the Vigil proctoring widget.

pub mod html;
pub mod view;

pub use html::{escape, render_html, STYLESHEET};
pub use view::{
    present, ActionButton, ButtonVariant, Header, Icon, InfoItem, InfoPanel, PageView,
    StatusCard, Tone, WarningOverlay, DISMISS_BUTTON, ENTER_BUTTON, FULLSCREEN_CARD,
    RETURN_BUTTON, VISIBILITY_CARD, WARNINGS_CARD,
};
