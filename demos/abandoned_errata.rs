//! Reporting errata that nobody handled.
//!
//! Registers a sink that prints abandoned errata to stderr, then shows which
//! drops get reported and which do not.

use std::sync::atomic::{AtomicUsize, Ordering};

use errata::{Erratum, ErratumRef, Severity, Sink, sinks};

struct StderrSink {
    reported: AtomicUsize,
}

impl Sink for StderrSink {
    fn abandoned(&self, erratum: ErratumRef<'_>) {
        let number = self.reported.fetch_add(1, Ordering::Relaxed) + 1;
        eprintln!("--- abandoned erratum #{number} ({})", erratum.severity());
        eprintln!("{erratum}");
    }
}

fn save_settings() -> Erratum {
    let mut erratum = Erratum::new();
    erratum.info("writing settings.toml");
    erratum.error("permission denied");
    erratum
}

fn main() {
    sinks::register_sink(StderrSink {
        reported: AtomicUsize::new(0),
    });
    sinks::debug_sinks(|sink| println!("{sink}"));

    // Handled: cleared before it goes away, nothing is reported
    let mut handled = save_settings();
    if handled.is_failure() {
        println!("saving failed, retrying later");
    }
    handled.clear();

    // Ignored: reported once, when the last clone is dropped
    let ignored = save_settings();
    let alias = ignored.clone();
    drop(ignored);
    println!("first handle dropped");
    drop(alias);

    // Every abandoned erratum is reported, failure or not
    drop(Erratum::new().with_diag("cache warmed"));

    // Raise the threshold to only hear about failures
    sinks::set_reporting_threshold(Severity::FAILURE);
    drop(Erratum::new().with_info("this one is filtered out"));
    drop(Erratum::new().with_warn("but this one shows up"));
    sinks::set_reporting_threshold(Severity::Diag);

    // Errata dropped on other threads are reported there
    std::thread::spawn(|| {
        let _erratum = Erratum::new().with_warn("abandoned on a worker thread");
    })
    .join()
    .ok();
}
