use std::fmt;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

type Callback = dyn Fn(&LogRecord) + Send + Sync;

/// One event as handed to a structured sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: Level,
    pub target: String,
    pub message: String,
    /// Remaining event fields in recording order, values rendered as text.
    pub fields: Vec<(&'static str, String)>,
}

impl LogRecord {
    /// Value of the first field called `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
    }
}

/// A [`Layer`] forwarding every event it sees to a callback.
///
/// Installed globally through [`LoggerBuilder::sink`](crate::LoggerBuilder::sink), or
/// composed by hand with any `tracing_subscriber` registry:
///
/// ```rust
/// use keel_logger::SinkLayer;
/// use std::sync::{Arc, Mutex};
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let store = Arc::clone(&seen);
/// let subscriber = tracing_subscriber::registry()
///     .with(SinkLayer::new(move |record| store.lock().unwrap().push(record.message.clone())));
///
/// tracing::subscriber::with_default(subscriber, || tracing::info!("composed"));
/// assert_eq!(*seen.lock().unwrap(), ["composed"]);
/// ```
#[derive(Clone)]
pub struct SinkLayer {
    callback: Arc<Callback>,
}

impl SinkLayer {
    #[must_use]
    pub fn new(callback: impl Fn(&LogRecord) + Send + Sync + 'static) -> Self {
        Self { callback: Arc::new(callback) }
    }
}

impl fmt::Debug for SinkLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkLayer").finish_non_exhaustive()
    }
}

impl<S: Subscriber> Layer<S> for SinkLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let record = LogRecord {
            level: *metadata.level(),
            target: metadata.target().to_owned(),
            message: visitor.message,
            fields: visitor.fields,
        };
        (self.callback)(&record);
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl RecordVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name(), value));
        }
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}
