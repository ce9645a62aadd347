//! Handlers that define what happens to an erratum data block that is
//! destroyed while it still holds annotations.

use crate::RawErratumRef;

/// Trait for reacting to the abandonment of an erratum data block.
///
/// A data block is *abandoned* when the last handle referencing it is released
/// while the block still holds at least one annotation. The handler type is
/// chosen when the block is created and cannot be changed afterwards, so every
/// block knows exactly which handler to call when it is destroyed.
///
/// The handler is called exactly once per abandoned block, before any of its
/// storage is released. It receives a read-only view of the block and cannot
/// keep a reference to it beyond the call.
///
/// # When to Implement
///
/// You typically don't need to implement this trait directly. The `errata`
/// crate installs a handler that broadcasts abandoned errata to its globally
/// registered sinks.
///
/// # Examples
///
/// ```
/// use core::sync::atomic::{AtomicUsize, Ordering};
///
/// use errata_internals::{RawErratum, RawErratumRef, handlers::AbandonHandler, severity::Severity};
///
/// static ABANDONED: AtomicUsize = AtomicUsize::new(0);
///
/// struct CountingHandler;
///
/// impl AbandonHandler for CountingHandler {
///     fn abandoned(erratum: RawErratumRef<'_>) {
///         ABANDONED.fetch_add(erratum.len(), Ordering::Relaxed);
///     }
/// }
///
/// let mut raw = RawErratum::new::<CountingHandler>();
/// raw.make_mut().push_static(Severity::Error, "lost");
/// drop(raw);
/// assert_eq!(ABANDONED.load(Ordering::Relaxed), 1);
/// ```
pub trait AbandonHandler: 'static {
    /// Called with the contents of a data block that is about to be
    /// destroyed while still holding annotations.
    fn abandoned(erratum: RawErratumRef<'_>);
}

/// Handler that discards abandoned blocks silently.
#[derive(Copy, Clone, Debug, Default)]
pub struct Discard;

impl AbandonHandler for Discard {
    #[inline]
    fn abandoned(_erratum: RawErratumRef<'_>) {}
}
