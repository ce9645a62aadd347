//! The reporting threshold is process-wide, so it gets a test binary of its
//! own.

use std::sync::{Arc, Mutex};

use errata::{Erratum, Severity, sinks};

#[test]
fn test_reporting_threshold() {
    let reported = Arc::new(Mutex::new(Vec::new()));
    {
        let reported = reported.clone();
        sinks::register_sink_fn(move |erratum| reported.lock().unwrap().push(erratum.to_string()));
    }
    assert_eq!(sinks::reporting_threshold(), Severity::Diag);

    drop(Erratum::new().with_diag("reported by default"));
    drop(Erratum::new());
    assert_eq!(*reported.lock().unwrap(), ["Diag: reported by default"]);

    sinks::set_reporting_threshold(Severity::FAILURE);
    drop(Erratum::new().with_info("below failure"));
    drop(Erratum::new().with_warn("at failure"));

    sinks::set_reporting_threshold(Severity::Error);
    drop(Erratum::new().with_warn("now below"));
    drop(Erratum::new().with_info("ignored").with_error("still reported"));

    sinks::set_reporting_threshold(Severity::Diag);
    drop(Erratum::new().with_info("everything counts again"));

    assert_eq!(
        *reported.lock().unwrap(),
        [
            "Diag: reported by default",
            "Warn: at failure",
            "Error: still reported\nInfo: ignored",
            "Info: everything counts again",
        ]
    );
}
