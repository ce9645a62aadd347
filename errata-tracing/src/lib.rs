#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]

//! Tracing sink for abandoned errata.
//!
//! Forwards every erratum that is dropped without being handled to the
//! [`tracing`] ecosystem, so forgotten failures show up next to the rest of
//! your logs.
//!
//! # Quick Start
//!
//! ```
//! use errata::Erratum;
//!
//! // Register the sink once, at program start
//! errata_tracing::install();
//!
//! let mut erratum = Erratum::new();
//! erratum.info("connecting").error("connection refused");
//! drop(erratum); // emits an INFO and an ERROR event with target "errata"
//! ```
//!
//! # Events
//!
//! By default, every annotation of an abandoned erratum becomes one event,
//! oldest first, at the level matching its severity:
//!
//! | Severity | Level   |
//! |----------|---------|
//! | `Diag`   | `DEBUG` |
//! | `Info`   | `INFO`  |
//! | `Warn`   | `WARN`  |
//! | `Error`  | `ERROR` |
//!
//! Each event has the target `errata`, the annotation text as its message,
//! and the fields `severity` and `level` (the nesting level). In joined mode
//! ([`TracingSink::joined`]), the whole erratum becomes a single event at the
//! level of its aggregate severity. Its message is the rendered erratum,
//! newest annotation first, with annotations separated by `"; "`. It has the
//! fields `severity` and `annotations` (the number of annotations).
//!
//! # Environment Variables
//!
//! - `ERRATA_TRACING` - Comma-separated options, read once:
//!   - `joined` - Emit one event per erratum instead of one per annotation
//!   - `min=<severity>` - Skip annotations below `<severity>` (`diag`,
//!     `info`, `warn` or `error`)
//!
//! Which errata reach the sink at all is decided by
//! [`errata::sinks::set_reporting_threshold`].

use std::sync::OnceLock;

use errata::{ErratumRef, Severity, Sink};

/// The target of every event emitted by [`TracingSink`].
pub const TARGET: &str = "errata";

/// A [`Sink`] that emits abandoned errata as [`tracing`] events.
///
/// # Examples
///
/// Using the configuration from the environment:
///
/// ```
/// use errata_tracing::TracingSink;
///
/// errata::sinks::register_sink(TracingSink::new());
/// ```
///
/// Custom configuration:
///
/// ```
/// use errata::Severity;
/// use errata_tracing::TracingSink;
///
/// let sink = TracingSink {
///     joined: true,
///     min_severity: Severity::Warn,
/// };
/// errata::sinks::register_sink(sink);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TracingSink {
    /// Whether to emit a single event per erratum instead of one event per
    /// annotation.
    pub joined: bool,
    /// Annotations below this severity are not emitted. In joined mode, the
    /// erratum is skipped if its aggregate severity is below it.
    pub min_severity: Severity,
}

#[derive(Debug)]
struct ErrataTracingEnvOptions {
    joined: bool,
    min_severity: Severity,
}

impl ErrataTracingEnvOptions {
    fn get() -> &'static Self {
        static ERRATA_TRACING_FLAGS: OnceLock<ErrataTracingEnvOptions> = OnceLock::new();

        ERRATA_TRACING_FLAGS.get_or_init(|| match std::env::var_os("ERRATA_TRACING") {
            Some(var) => Self::parse(&var.to_string_lossy()),
            None => Self::parse(""),
        })
    }

    fn parse(var: &str) -> Self {
        let mut joined = false;
        let mut min_severity = Severity::DEFAULT;

        for option in var.split(',').map(str::trim) {
            if option.eq_ignore_ascii_case("joined") {
                joined = true;
            } else if let Some((key, value)) = option.split_once('=')
                && key.trim().eq_ignore_ascii_case("min")
                && let Ok(severity) = value.parse()
            {
                min_severity = severity;
            }
        }

        ErrataTracingEnvOptions {
            joined,
            min_severity,
        }
    }
}

impl TracingSink {
    /// Creates a new [`TracingSink`] configured from the `ERRATA_TRACING`
    /// environment variable.
    ///
    /// Without the variable, every annotation is emitted as its own event.
    pub fn new() -> Self {
        let env_options = ErrataTracingEnvOptions::get();
        Self {
            joined: env_options.joined,
            min_severity: env_options.min_severity,
        }
    }

    /// Emits the annotations of `erratum` as events.
    ///
    /// This is what the sink does with an abandoned erratum; it can also be
    /// called directly to log an erratum that is still in use.
    pub fn emit(&self, erratum: ErratumRef<'_>) {
        if self.joined {
            let severity = erratum.severity();
            if !erratum.is_empty() && severity >= self.min_severity {
                let annotations = erratum.len();
                let rendered = erratum.display_with_glue("; ");
                match severity {
                    Severity::Diag => tracing::debug!(target: TARGET, severity = severity.as_str(), annotations, "{rendered}"),
                    Severity::Info => tracing::info!(target: TARGET, severity = severity.as_str(), annotations, "{rendered}"),
                    Severity::Warn => tracing::warn!(target: TARGET, severity = severity.as_str(), annotations, "{rendered}"),
                    Severity::Error => tracing::error!(target: TARGET, severity = severity.as_str(), annotations, "{rendered}"),
                }
            }
            return;
        }

        for note in erratum.iter().rev() {
            let severity = note.severity();
            if severity < self.min_severity {
                continue;
            }
            emit_annotation(severity, note.level(), note.text());
        }
    }
}

fn emit_annotation(severity: Severity, level: u32, text: &str) {
    match severity {
        Severity::Diag => tracing::debug!(target: TARGET, severity = severity.as_str(), level, "{text}"),
        Severity::Info => tracing::info!(target: TARGET, severity = severity.as_str(), level, "{text}"),
        Severity::Warn => tracing::warn!(target: TARGET, severity = severity.as_str(), level, "{text}"),
        Severity::Error => tracing::error!(target: TARGET, severity = severity.as_str(), level, "{text}"),
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for TracingSink {
    fn abandoned(&self, erratum: ErratumRef<'_>) {
        self.emit(erratum);
    }
}

/// Registers a [`TracingSink`] configured from the environment.
///
/// Shorthand for `errata::sinks::register_sink(TracingSink::new())`. Calling
/// it more than once registers the sink more than once.
#[track_caller]
pub fn install() {
    errata::sinks::register_sink(TracingSink::new());
}
