//! HTML rendering of a [`PageView`].
//!
//! Buttons carry a `data-action` attribute holding the
//! [`UserAction`](vigil_core::UserAction) name, so a host can route every
//! click through a single delegated listener. All text is escaped.

use crate::view::{
    ActionButton, ButtonVariant, Header, InfoPanel, PageView, StatusCard, WarningOverlay,
};
use std::fmt::Write;

/// Default stylesheet for the rendered markup.
pub const STYLESHEET: &str = r"
.vigil-page { min-height: 100vh; background: #0b1120; color: #e2e8f0; font-family: system-ui, sans-serif; }
.vigil-container { max-width: 56rem; margin: 0 auto; padding: 3rem 1.5rem; text-align: center; }
.vigil-badge { display: inline-flex; align-items: center; gap: .25rem; padding: .25rem .75rem; border-radius: 9999px; background: #14532d55; color: #4ade80; font-size: .75rem; }
.vigil-title { font-size: 3rem; font-weight: 700; margin: 1rem 0; }
.vigil-muted { color: #94a3b8; }
.vigil-status { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1.5rem; margin: 3rem 0; }
.vigil-card { background: #111827; border: 1px solid #1f2937; border-radius: .5rem; padding: 1.5rem; }
.vigil-tone-good { color: #4ade80; }
.vigil-tone-alert { color: #ef4444; }
.vigil-tone-warning { color: #f59e0b; }
.vigil-info { display: grid; grid-template-columns: repeat(2, 1fr); gap: 1rem; text-align: left; }
.vigil-button { padding: .5rem 1rem; border-radius: .375rem; font-weight: 500; cursor: pointer; }
.vigil-button-primary { background: #ef4444; color: #fff; border: none; }
.vigil-button-outline { background: transparent; color: #e2e8f0; border: 1px solid #334155; }
.vigil-overlay { position: fixed; inset: 0; display: flex; align-items: center; justify-content: center; background: #000000cc; z-index: 50; }
.vigil-warning { max-width: 28rem; background: #111827; border: 2px solid #ef4444; border-radius: .5rem; padding: 1.5rem; text-align: left; }
.vigil-actions { display: flex; gap: .75rem; }
";

/// Escape text for use in element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Render the page to an HTML fragment.
#[must_use]
pub fn render_html(page: &PageView) -> String {
    let mut out = String::new();
    out.push_str(r#"<div class="vigil-page">"#);
    if let Some(overlay) = &page.overlay {
        render_overlay(&mut out, overlay);
    }
    out.push_str(r#"<div class="vigil-container">"#);
    render_header(&mut out, &page.header);
    out.push_str(r#"<div class="vigil-status">"#);
    for card in &page.status {
        render_card(&mut out, card);
    }
    out.push_str("</div>");
    render_info(&mut out, &page.info);
    out.push_str("</div></div>");
    out
}

fn render_button(out: &mut String, button: &ActionButton) {
    let variant = match button.variant {
        ButtonVariant::Primary => "primary",
        ButtonVariant::Outline => "outline",
    };
    let _ = write!(
        out,
        r#"<button type="button" class="vigil-button vigil-button-{variant}" data-action="{}" data-testid="{}">{}</button>"#,
        button.action.as_str(),
        escape(&button.test_id),
        escape(&button.label),
    );
}

fn render_overlay(out: &mut String, overlay: &WarningOverlay) {
    let _ = write!(
        out,
        r#"<div class="vigil-overlay" role="alertdialog" aria-modal="true" data-testid="warning-overlay"><div class="vigil-warning"><h2 class="vigil-tone-alert"><span class="vigil-icon vigil-icon-alert-triangle" aria-hidden="true"></span>{}</h2>"#,
        escape(&overlay.title)
    );
    for cause in &overlay.causes {
        let _ = write!(out, "<p>{}</p>", escape(cause));
    }
    let _ = write!(out, r#"<p class="vigil-muted">{}</p>"#, escape(&overlay.footer));
    out.push_str(r#"<div class="vigil-actions">"#);
    for action in &overlay.actions {
        render_button(out, action);
    }
    out.push_str("</div></div></div>");
}

fn render_header(out: &mut String, header: &Header) {
    let _ = write!(
        out,
        r#"<header><div class="vigil-badge"><span class="vigil-icon vigil-icon-shield" aria-hidden="true"></span>{}</div><h1 class="vigil-title">{}</h1><p class="vigil-muted">{}</p>"#,
        escape(&header.badge),
        escape(&header.title),
        escape(&header.description),
    );
    if let Some(button) = &header.enter_fullscreen {
        render_button(out, button);
    }
    out.push_str("</header>");
}

fn render_card(out: &mut String, card: &StatusCard) {
    let tone = card.tone.name();
    let _ = write!(
        out,
        r#"<div class="vigil-card" data-testid="{}"><span class="vigil-icon vigil-icon-{} vigil-tone-{tone}" aria-hidden="true"></span><h3>{}</h3><p class="vigil-tone-{tone}">{}</p></div>"#,
        escape(&card.test_id),
        card.icon.name(),
        escape(&card.title),
        escape(&card.value),
    );
}

fn render_info(out: &mut String, info: &InfoPanel) {
    let _ = write!(
        out,
        r#"<section class="vigil-card"><h2>{}</h2><p class="vigil-muted">{}</p><div class="vigil-info">"#,
        escape(&info.title),
        escape(&info.intro),
    );
    for item in &info.items {
        let _ = write!(
            out,
            r#"<div><h4>{}</h4><p class="vigil-muted">{}</p></div>"#,
            escape(&item.title),
            escape(&item.description),
        );
    }
    out.push_str("</div></section>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::present;
    use proptest::prelude::*;
    use vigil_core::{FullscreenIntent, ProctorMessage, ProctorState, State};

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_initial_markup() {
        let html = render_html(&present(&ProctorState::default()));
        assert!(!html.contains("warning-overlay"));
        assert!(html.contains(r#"data-testid="enter-fullscreen""#));
        assert!(html.contains(r#"data-action="return-to-fullscreen""#));
        assert!(html.contains("Inactive"));
        assert!(html.contains("0 violations"));
        assert!(html.contains("Secure Content Area"));
    }

    #[test]
    fn test_overlay_markup() {
        let mut state = ProctorState::default();
        state.update(ProctorMessage::FullscreenGranted(FullscreenIntent::Mount));
        state.update(ProctorMessage::VisibilityChanged(false));
        let html = render_html(&present(&state));
        assert!(html.contains(r#"role="alertdialog""#));
        assert!(html.contains("You have switched tabs or minimized the window."));
        assert!(html.contains("Warning count: 1"));
        assert!(html.contains(r#"data-action="dismiss""#));
        assert!(html.contains("vigil-icon-eye-off"));
        assert!(!html.contains(r#"data-testid="enter-fullscreen""#));
    }

    #[test]
    fn test_markup_is_balanced() {
        let mut state = ProctorState::default();
        state.update(ProctorMessage::VisibilityChanged(false));
        let html = render_html(&present(&state));
        assert_eq!(html.matches("<div").count(), html.matches("</div>").count());
        assert_eq!(html.matches("<button").count(), html.matches("</button>").count());
    }

    proptest! {
        #[test]
        fn prop_escape_removes_markup(text in ".*") {
            let escaped = escape(&text);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
        }
    }
}
