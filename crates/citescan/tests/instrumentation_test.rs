//! Tracing output of scoring calls.

use citescan::{CityTable, ConfidenceScorer, OcrText};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// Collects `(level, message)` for every event.
struct EventCollector {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for EventCollector {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

fn collect<F: FnOnce()>(f: F) -> Vec<(Level, String)> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCollector { events: events.clone() });
    tracing::subscriber::with_default(subscriber, f);
    events.lock().unwrap().clone()
}

#[test]
fn test_scoring_emits_debug_event() {
    let events = collect(|| {
        ConfidenceScorer::default().score_simple(0.9, 1).unwrap();
    });

    assert!(
        events
            .iter()
            .any(|(level, message)| *level == Level::DEBUG && message.contains("Scored OCR result"))
    );
    assert!(events.iter().all(|(level, _)| *level != Level::WARN));
}

#[test]
fn test_rejected_call_emits_warning() {
    let events = collect(|| {
        let err = ConfidenceScorer::default().score_simple(0.9, 7).unwrap_err();
        assert!(err.is_invalid_argument());
    });

    assert!(
        events
            .iter()
            .any(|(level, message)| *level == Level::WARN && message.contains("pattern priority 7"))
    );
}

#[test]
fn test_unknown_city_is_logged_not_raised() {
    let events = collect(|| {
        ConfidenceScorer::default()
            .score_for_city(&OcrText::from("123"), &[0.5], Some("xx-atlantis"), CityTable::builtin())
            .unwrap();
    });

    assert!(
        events
            .iter()
            .any(|(level, message)| *level == Level::DEBUG && message.contains("xx-atlantis"))
    );
}
