//! Browser event conversion - DOM events to Vigil signals.

use vigil_core::{Environment, Key, KeyInput, Modifiers, Signal, SignalKind};
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, KeyboardEvent};

/// Convert a `KeyboardEvent` to a key press.
///
/// Uses `KeyboardEvent.key`, so shortcuts follow the user's layout.
pub fn keyboard_event_to_input(event: &KeyboardEvent) -> KeyInput {
    KeyInput::new(
        Key::from_dom(&event.key()),
        Modifiers::new(
            event.ctrl_key(),
            event.alt_key(),
            event.shift_key(),
            event.meta_key(),
        ),
    )
}

/// Read fullscreen and visibility from `document`.
pub fn read_environment(document: &Document) -> Environment {
    Environment {
        fullscreen: document.fullscreen_element().is_some(),
        visible: !document.hidden(),
    }
}

/// Build the signal for a DOM event received on the `kind` channel.
///
/// Fullscreen and visibility are read back from the document rather than
/// the event, which carries neither.
pub fn event_to_signal(kind: SignalKind, event: &Event, document: &Document) -> Signal {
    match kind {
        SignalKind::FullscreenChange => Signal::FullscreenChanged {
            fullscreen: read_environment(document).fullscreen,
        },
        SignalKind::VisibilityChange => Signal::VisibilityChanged {
            visible: read_environment(document).visible,
        },
        SignalKind::ContextMenu => Signal::ContextMenu,
        SignalKind::KeyDown => Signal::KeyDown(
            event
                .dyn_ref::<KeyboardEvent>()
                .map_or(KeyInput::plain(Key::Unidentified), keyboard_event_to_input),
        ),
    }
}
