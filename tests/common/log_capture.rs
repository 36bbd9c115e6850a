//! Records sandcalc's tracing events for assertions.
//!
//! The subscriber is installed for the current thread only, so async tests
//! using it must stay on the current-thread runtime (the `#[tokio::test]`
//! default).

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One recorded event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: BTreeMap<&'static str, String>,
}

impl CapturedEvent {
    fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle) || self.fields.values().any(|v| v.contains(needle))
    }
}

type Events = Arc<Mutex<Vec<CapturedEvent>>>;

/// Capture guard. Recording stops when it is dropped.
pub struct TestLogCapture {
    events: Events,
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestLogCapture {
    pub fn start() -> Self {
        let events = Events::default();
        let subscriber = tracing_subscriber::registry().with(Recorder(events.clone()));
        Self {
            events,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of events whose message contains `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.events().iter().filter(|e| e.message.contains(needle)).count()
    }

    /// Values recorded for field `name`, in event order.
    pub fn field_values(&self, name: &str) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|e| e.fields.get(name).cloned())
            .collect()
    }

    pub fn assert_logged(&self, needle: &str) {
        assert!(
            self.count(needle) > 0,
            "Expected log containing '{needle}'. Logged: {:#?}",
            self.messages()
        );
    }

    pub fn assert_logged_at_level(&self, level: Level, needle: &str) {
        assert!(
            self.events()
                .iter()
                .any(|e| e.level == level && e.message.contains(needle)),
            "Expected {level} log containing '{needle}'. Logged: {:#?}",
            self.messages()
        );
    }

    pub fn assert_field_logged(&self, name: &str, value: &str) {
        let values = self.field_values(name);
        assert!(
            values.iter().any(|v| v.contains(value)),
            "Expected field {name}={value}. Recorded values: {values:?}"
        );
    }

    /// Fail if any message or field value contains `secret`.
    pub fn assert_never_logged(&self, secret: &str) {
        let leaked: Vec<_> = self.events().into_iter().filter(|e| e.mentions(secret)).collect();
        assert!(leaked.is_empty(), "Secret leaked into logs: {leaked:#?}");
    }

    fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .map(|e| format!("{} {}", e.level, e.message))
            .collect()
    }
}

struct Recorder(Events);

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut captured = CapturedEvent {
            level: *event.metadata().level(),
            message: String::new(),
            fields: BTreeMap::new(),
        };
        event.record(&mut captured);
        self.0.lock().unwrap().push(captured);
    }
}

impl Visit for CapturedEvent {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{value:?}"));
    }
}
