//! Process-wide reporting of abandoned errata.
//!
//! # Quick Start
//!
//! ```
//! use errata::{Erratum, sinks};
//!
//! // Print every abandoned erratum to stderr
//! sinks::register_sink_fn(|erratum| eprintln!("unhandled errata:\n{erratum}"));
//!
//! let mut erratum = Erratum::new();
//! erratum.error("could not save settings");
//! // `erratum` goes out of scope without being cleared, so the sink prints it
//! ```
//!
//! # When a Sink Is Called
//!
//! An erratum data block is *abandoned* when its last handle is dropped while
//! it still holds at least one annotation. Every abandoned block is passed to
//! every registered sink, in registration order, exactly once, before it is
//! destroyed. [`set_reporting_threshold`] can narrow this down to blocks of a
//! minimum [severity](crate::Erratum::severity), for example to failures
//! only.
//!
//! Blocks are shared between the clones of an [`Erratum`], so dropping one of
//! several clones reports nothing; the block is reported when the last clone
//! goes away, on whichever thread that happens. [`Erratum::clear`] and
//! [`Erratum::absorb`] both prevent a block from being reported.
//!
//! Sinks receive an [`ErratumRef`], a read-only view that is only valid for
//! the duration of the call. Use [`ErratumRef::to_erratum`] to keep a copy;
//! such a copy is not reported again. A sink may create and drop errata of
//! its own, and those are reported like any other, so a sink that abandons a
//! new erratum on every call never returns.
//!
//! Sinks can only be added, never removed, and are typically registered once
//! at program start.
//!
//! [`Erratum`]: crate::Erratum
//! [`Erratum::clear`]: crate::Erratum::clear
//! [`Erratum::absorb`]: crate::Erratum::absorb

mod registry;

use alloc::sync::Arc as StdArc;
use core::{
    fmt,
    panic::Location,
    sync::atomic::{AtomicU8, AtomicUsize, Ordering},
};

use errata_internals::{RawErratumRef, handlers::AbandonHandler};
use triomphe::Arc;
use unsize::CoerceUnsize;

use self::registry::SinkRegistry;
use crate::{ErratumRef, Severity};

/// A destination for abandoned errata.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// use errata::{ErratumRef, Sink, sinks};
///
/// struct FailureCounter(AtomicUsize);
///
/// impl Sink for FailureCounter {
///     fn abandoned(&self, erratum: ErratumRef<'_>) {
///         self.0.fetch_add(erratum.len(), Ordering::Relaxed);
///     }
/// }
///
/// sinks::register_sink(FailureCounter(AtomicUsize::new(0)));
/// ```
pub trait Sink: 'static + Send + Sync {
    /// Called with an abandoned erratum right before it is destroyed.
    ///
    /// The call happens on the thread that dropped the last handle to the
    /// erratum. A sink may create, annotate and drop other errata.
    fn abandoned(&self, erratum: ErratumRef<'_>);
}

impl<S: Sink + ?Sized> Sink for StdArc<S> {
    #[inline]
    fn abandoned(&self, erratum: ErratumRef<'_>) {
        S::abandoned(self, erratum);
    }
}

/// A [`Sink`] that calls a closure or function.
///
/// Created by [`register_sink_fn`], or directly with [`FnSink::new`].
#[derive(Clone, Copy, Debug)]
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: Fn(ErratumRef<'_>) + Send + Sync + 'static,
{
    /// Wraps a function into a [`Sink`].
    #[inline]
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Sink for FnSink<F>
where
    F: Fn(ErratumRef<'_>) + Send + Sync + 'static,
{
    #[inline]
    fn abandoned(&self, erratum: ErratumRef<'_>) {
        (self.0)(erratum);
    }
}

struct RegisteredSink<S> {
    sink: S,
    added_at: &'static Location<'static>,
}

impl<S> fmt::Display for RegisteredSink<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sink {} registered at {}:{}",
            core::any::type_name::<S>(),
            self.added_at.file(),
            self.added_at.line()
        )
    }
}

trait StoredSink: 'static + Send + Sync + fmt::Display {
    fn abandoned(&self, erratum: ErratumRef<'_>);
}

impl<S: Sink> StoredSink for RegisteredSink<S> {
    #[inline]
    fn abandoned(&self, erratum: ErratumRef<'_>) {
        self.sink.abandoned(erratum);
    }
}

static SINKS: SinkRegistry = SinkRegistry::new();

/// Number of registered sinks, readable without taking the lock.
static SINK_COUNT: AtomicUsize = AtomicUsize::new(0);

static THRESHOLD: AtomicU8 = AtomicU8::new(Severity::Diag as u8);

#[track_caller]
fn stored<S: Sink>(sink: S) -> Arc<dyn StoredSink> {
    let sink = RegisteredSink {
        sink,
        added_at: Location::caller(),
    };
    let sink: Arc<RegisteredSink<S>> = Arc::new(sink);
    sink.unsize(unsize::Coercion!(to dyn StoredSink))
}

/// Adds a sink to the process-wide registry.
///
/// The sink stays registered for the rest of the program. Sinks are invoked
/// in the order they were registered. The caller location is recorded and
/// shown by [`debug_sinks`].
///
/// To keep access to a sink after registering it, register an
/// [`Arc`](alloc::sync::Arc) clone of it.
///
/// # Examples
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use errata::{Erratum, ErratumRef, Sink, sinks};
///
/// #[derive(Default)]
/// struct Collect(Mutex<Vec<String>>);
///
/// impl Sink for Collect {
///     fn abandoned(&self, erratum: ErratumRef<'_>) {
///         self.0.lock().unwrap().push(erratum.to_string());
///     }
/// }
///
/// let collected = Arc::new(Collect::default());
/// sinks::register_sink(collected.clone());
///
/// drop(Erratum::new().with_error("lost"));
/// assert_eq!(*collected.0.lock().unwrap(), ["Error: lost"]);
/// ```
#[track_caller]
pub fn register_sink<S: Sink>(sink: S) {
    let count = SINKS.push(stored(sink));
    SINK_COUNT.fetch_max(count, Ordering::Release);
}

/// Adds a closure or function to the process-wide registry.
///
/// Shorthand for `register_sink(FnSink::new(f))`.
///
/// # Examples
///
/// ```
/// use errata::{ErratumRef, sinks};
///
/// fn log_to_stderr(erratum: ErratumRef<'_>) {
///     eprintln!("{erratum}");
/// }
///
/// sinks::register_sink_fn(log_to_stderr);
/// sinks::register_sink_fn(|erratum| eprintln!("{} annotation(s)", erratum.len()));
/// ```
#[track_caller]
pub fn register_sink_fn<F>(f: F)
where
    F: Fn(ErratumRef<'_>) + Send + Sync + 'static,
{
    register_sink(FnSink::new(f));
}

/// Returns the number of registered sinks.
pub fn registered_sinks() -> usize {
    SINK_COUNT.load(Ordering::Acquire)
}

/// Calls `f` with a description of every registered sink, in registration
/// order.
///
/// Each description names the type of the sink and where it was registered.
pub fn debug_sinks(mut f: impl FnMut(&dyn fmt::Display)) {
    for sink in &SINKS.snapshot() {
        f(sink);
    }
}

/// Sets the lowest severity an abandoned erratum must reach to be passed to
/// the sinks.
///
/// The default is [`Severity::Diag`]: every abandoned erratum that holds
/// at least one annotation is reported. Raising it to [`Severity::FAILURE`]
/// limits reporting to errata that represent a failure.
///
/// # Examples
///
/// ```
/// use errata::{Severity, sinks};
///
/// assert_eq!(sinks::reporting_threshold(), Severity::Diag);
/// sinks::set_reporting_threshold(Severity::FAILURE);
/// assert_eq!(sinks::reporting_threshold(), Severity::Warn);
/// ```
pub fn set_reporting_threshold(severity: Severity) {
    THRESHOLD.store(u8::from(severity), Ordering::Relaxed);
}

/// Returns the lowest severity an abandoned erratum must reach to be passed
/// to the sinks.
pub fn reporting_threshold() -> Severity {
    Severity::try_from(THRESHOLD.load(Ordering::Relaxed)).unwrap_or(Severity::Diag)
}

/// Passes an abandoned erratum to every registered sink.
fn dispatch(erratum: ErratumRef<'_>) {
    if SINK_COUNT.load(Ordering::Acquire) == 0 || erratum.severity() < reporting_threshold() {
        return;
    }

    // Sinks run without the lock held, so they can drop errata of their own.
    for sink in &SINKS.snapshot() {
        sink.abandoned(erratum);
    }
}

/// The abandon handler of every data block created by this crate.
pub(crate) struct SinkDispatch;

impl AbandonHandler for SinkDispatch {
    fn abandoned(erratum: RawErratumRef<'_>) {
        dispatch(ErratumRef::abandoned(erratum));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(FnSink<fn(ErratumRef<'_>)>: Sink);
    static_assertions::assert_impl_all!(StdArc<dyn Sink>: Sink);

    #[test]
    fn test_threshold_default() {
        assert_eq!(reporting_threshold(), Severity::Diag);
    }
}
