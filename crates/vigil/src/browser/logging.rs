//! Console logging for `tracing` events.
//!
//! [`ConsoleLayer`] formats each event as one line and hands it to a sink.
//! In the browser the sink is `console.*`, picked by level.

use std::fmt::{self, Write};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Receives one formatted line per event.
pub type ConsoleSink = Box<dyn Fn(Level, &str) + Send + Sync>;

/// `tracing` layer that writes formatted events to a sink.
pub struct ConsoleLayer {
    sink: ConsoleSink,
}

impl fmt::Debug for ConsoleLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleLayer").finish_non_exhaustive()
    }
}

impl ConsoleLayer {
    /// Create a layer writing to `sink`.
    pub fn new(sink: impl Fn(Level, &str) + Send + Sync + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// Layer writing to the browser console.
    #[cfg(target_arch = "wasm32")]
    #[must_use]
    pub fn browser() -> Self {
        Self::new(|level, line| {
            let line = wasm_bindgen::JsValue::from_str(line);
            match level {
                Level::ERROR => web_sys::console::error_1(&line),
                Level::WARN => web_sys::console::warn_1(&line),
                Level::INFO => web_sys::console::info_1(&line),
                _ => web_sys::console::debug_1(&line),
            }
        })
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        (self.sink)(*meta.level(), &fields.line(*meta.level(), meta.target()));
    }
}

#[derive(Default)]
struct FieldCollector {
    message: String,
    fields: String,
}

impl FieldCollector {
    fn line(&self, level: Level, target: &str) -> String {
        format!("{level} {target}: {}{}", self.message, self.fields)
    }
}

impl Visit for FieldCollector {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}

/// Install the console layer as the global subscriber.
///
/// Only events at `max_level` or more severe are forwarded. Returns false if
/// a global subscriber was already set.
#[cfg(target_arch = "wasm32")]
pub fn init(max_level: Level) -> bool {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(max_level))
        .with(ConsoleLayer::browser())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;

    fn capture() -> (ConsoleLayer, Arc<Mutex<Vec<(Level, String)>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = lines.clone();
        let layer = ConsoleLayer::new(move |level, line| {
            sink.lock().unwrap().push((level, line.to_string()));
        });
        (layer, lines)
    }

    #[test]
    fn test_formats_message_and_fields() {
        let (layer, lines) = capture();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: "vigil", sequence = 2, kind = "tab hidden", "violation detected");
        });

        let lines = lines.lock().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::WARN);
        assert_eq!(
            lines[0].1,
            "WARN vigil: violation detected sequence=2 kind=tab hidden"
        );
    }

    #[test]
    fn test_levels_forwarded() {
        let (layer, lines) = capture();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("mounted");
            tracing::debug!("suppressed");
        });

        let levels: Vec<_> = lines.lock().unwrap().iter().map(|(l, _)| *l).collect();
        assert_eq!(levels, [Level::INFO, Level::DEBUG]);
    }
}
