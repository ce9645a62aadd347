use std::{
    fmt,
    sync::{Arc, Mutex},
};

use errata::{Erratum, Severity};
use errata_tracing::{TARGET, TracingSink};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
};
use tracing_subscriber::{
    Layer, Registry,
    layer::{Context, SubscriberExt},
};

#[derive(Clone, Debug, PartialEq)]
struct CapturedEvent {
    level: Level,
    target: String,
    message: String,
    severity: String,
    nesting: Option<u64>,
    annotations: Option<u64>,
}

#[derive(Clone, Default)]
struct CaptureLayer(Arc<Mutex<Vec<CapturedEvent>>>);

impl CaptureLayer {
    fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    severity: String,
    nesting: Option<u64>,
    annotations: Option<u64>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "severity" {
            self.severity = value.to_owned();
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "level" => self.nesting = Some(value),
            "annotations" => self.annotations = Some(value),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.0.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            message: visitor.message,
            severity: visitor.severity,
            nesting: visitor.nesting,
            annotations: visitor.annotations,
        });
    }
}

fn capture(f: impl FnOnce()) -> Vec<CapturedEvent> {
    let layer = CaptureLayer::default();
    let subscriber = Registry::default().with(layer.clone());
    tracing::subscriber::with_default(subscriber, f);
    layer.events()
}

const PER_ANNOTATION: TracingSink = TracingSink {
    joined: false,
    min_severity: Severity::Diag,
};

#[test]
fn test_one_event_per_annotation_oldest_first() {
    let mut erratum = Erratum::new();
    erratum.diag("probing").info("connecting");
    let host = String::from("db-1");
    erratum.nest().error(format_args!("refused by {host}"));

    let events = capture(|| PER_ANNOTATION.emit(erratum.as_ref()));
    erratum.clear();

    let summary: Vec<(Level, &str, &str, Option<u64>)> = events
        .iter()
        .map(|event| {
            (
                event.level,
                event.message.as_str(),
                event.severity.as_str(),
                event.nesting,
            )
        })
        .collect();
    assert_eq!(
        summary,
        [
            (Level::DEBUG, "probing", "Diag", Some(1)),
            (Level::INFO, "connecting", "Info", Some(1)),
            (Level::ERROR, "refused by db-1", "Error", Some(1)),
        ]
    );
    assert!(events.iter().all(|event| event.target == TARGET));
}

#[test]
fn test_min_severity_skips_annotations() {
    let mut erratum = Erratum::new().with_info("noise").with_warn("slow reply");
    let sink = TracingSink {
        joined: false,
        min_severity: Severity::Warn,
    };

    let events = capture(|| sink.emit(erratum.as_ref()));
    erratum.clear();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::WARN);
    assert_eq!(events[0].message, "slow reply");
}

#[test]
fn test_joined_emits_single_event() {
    let mut erratum = Erratum::new()
        .with_info("first")
        .with_error("second")
        .with_diag("third");
    let sink = TracingSink {
        joined: true,
        min_severity: Severity::Diag,
    };

    let events = capture(|| sink.emit(erratum.as_ref()));
    erratum.clear();

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.level, Level::ERROR);
    assert_eq!(event.severity, "Error");
    assert_eq!(event.annotations, Some(3));
    assert_eq!(event.message, "Diag: third; Error: second; Info: first");
}

#[test]
fn test_joined_respects_min_severity() {
    let mut erratum = Erratum::new().with_info("only info");
    let sink = TracingSink {
        joined: true,
        min_severity: Severity::Warn,
    };

    let events = capture(|| sink.emit(erratum.as_ref()));
    erratum.clear();
    assert!(events.is_empty());
}

#[test]
fn test_registered_sink_reports_abandoned_erratum() {
    errata::sinks::register_sink(PER_ANNOTATION);

    let events = capture(|| {
        let erratum = Erratum::new().with_error("abandoned in a test");
        let alias = erratum.clone();
        drop(erratum);
        drop(alias);
    });

    let matching: Vec<&CapturedEvent> = events
        .iter()
        .filter(|event| event.message == "abandoned in a test")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].level, Level::ERROR);
}
