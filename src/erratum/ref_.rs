use core::fmt;

use errata_internals::{RawErratumRef, handlers::Discard};

use crate::{Annotation, Annotations, Erratum, ErratumDisplay, Severity, format::DEFAULT_GLUE};

/// A borrowed, read-only view of an erratum.
///
/// [`ErratumRef`] is what a [`Sink`] receives for an abandoned erratum, and
/// what [`Erratum::as_ref`] returns. It is `Copy` and offers the same queries
/// as [`Erratum`], but it cannot add annotations and cannot be turned back
/// into a handle to the same data block: [`ErratumRef::to_erratum`] always
/// copies.
///
/// # Examples
///
/// ```
/// use errata::{Erratum, ErratumRef, Severity};
///
/// fn summarize(erratum: ErratumRef<'_>) -> String {
///     format!("{} annotation(s), worst is {}", erratum.len(), erratum.severity())
/// }
///
/// let erratum = Erratum::new().with_info("loaded").with_warn("stale");
/// assert_eq!(summarize(erratum.as_ref()), "2 annotation(s), worst is Warn");
/// ```
///
/// [`Sink`]: crate::Sink
#[derive(Clone, Copy)]
pub struct ErratumRef<'a> {
    /// The referenced data block, or `None` for an empty erratum
    raw: Option<RawErratumRef<'a>>,
    /// Whether the block is being reported to the sinks
    abandoned: bool,
}

impl<'a> ErratumRef<'a> {
    /// Creates a view of a data block that is being reported as abandoned.
    #[inline]
    pub(crate) fn abandoned(raw: RawErratumRef<'a>) -> Self {
        Self {
            raw: Some(raw),
            abandoned: true,
        }
    }

    /// Creates a view of a live erratum that may not have a data block yet.
    #[inline]
    pub(crate) fn from_option(raw: Option<RawErratumRef<'a>>) -> Self {
        Self {
            raw,
            abandoned: false,
        }
    }

    /// Returns `true` if no annotation is [`Severity::FAILURE`] or higher.
    ///
    /// An empty erratum is always ok.
    #[inline]
    pub fn is_ok(self) -> bool {
        !self.is_failure()
    }

    /// Returns `true` if at least one annotation is [`Severity::FAILURE`] or
    /// higher.
    #[inline]
    pub fn is_failure(self) -> bool {
        self.severity().is_failure()
    }

    /// Returns the highest severity over all annotations, or
    /// [`Severity::DEFAULT`] if there are none.
    #[inline]
    pub fn severity(self) -> Severity {
        match self.raw {
            Some(raw) => raw.severity(),
            None => Severity::DEFAULT,
        }
    }

    /// Returns the number of annotations.
    #[inline]
    pub fn len(self) -> usize {
        self.raw.map_or(0, RawErratumRef::len)
    }

    /// Returns the number of annotations. Same as [`ErratumRef::len`].
    #[inline]
    pub fn count(self) -> usize {
        self.len()
    }

    /// Returns `true` if there are no annotations.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.raw.is_none_or(RawErratumRef::is_empty)
    }

    /// Returns the nesting level given to annotations added from now on.
    #[inline]
    pub fn nesting_level(self) -> u32 {
        self.raw.map_or(0, RawErratumRef::level)
    }

    /// Returns an iterator over the annotations, newest first.
    #[inline]
    pub fn iter(self) -> Annotations<'a> {
        match self.raw {
            Some(raw) => Annotations::from_raw(raw.notes()),
            None => Annotations::empty(),
        }
    }

    /// Returns the most recently added annotation.
    #[inline]
    pub fn front(self) -> Option<Annotation<'a>> {
        self.raw
            .and_then(|raw| raw.notes().last())
            .map(Annotation::from_raw)
    }

    /// Returns a value that renders the annotations separated by `glue`
    /// instead of [`DEFAULT_GLUE`].
    ///
    /// [`DEFAULT_GLUE`]: crate::DEFAULT_GLUE
    #[inline]
    pub fn display_with_glue(self, glue: &'a str) -> ErratumDisplay<'a> {
        ErratumDisplay::new(self, glue)
    }

    /// Copies the annotations into a new erratum.
    ///
    /// The copy is an independent data block. If it is dropped without being
    /// [cleared](Erratum::clear), it is reported on its own.
    ///
    /// The one exception is a copy taken inside a [`Sink`] from the erratum
    /// being reported. Those annotations have just been reported, so the copy
    /// is never reported again, nor is anything that adopts its block through
    /// [`Erratum::absorb`]. A sink can therefore copy, keep or drop what it
    /// receives without triggering itself. [Merge](Erratum::merge) the copy
    /// into another erratum to get annotations that do report.
    ///
    /// [`Sink`]: crate::Sink
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::Erratum;
    ///
    /// let original = Erratum::new().with_error("lost connection");
    /// let copy = original.as_ref().to_erratum();
    /// assert_eq!(copy.len(), 1);
    /// assert!(!copy.ptr_eq(&original));
    /// ```
    pub fn to_erratum(self) -> Erratum {
        match self.raw {
            Some(raw) if raw.is_empty() => Erratum::new(),
            Some(raw) if self.abandoned => Erratum::from_raw(raw.fork_to::<Discard>()),
            Some(raw) => Erratum::from_raw(raw.fork()),
            None => Erratum::new(),
        }
    }
}

impl<'a> IntoIterator for ErratumRef<'a> {
    type Item = Annotation<'a>;
    type IntoIter = Annotations<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ErratumRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_with_glue(DEFAULT_GLUE), f)
    }
}

impl fmt::Debug for ErratumRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Erratum")
            .field("severity", &self.severity())
            .field("annotations", &self.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(ErratumRef<'static>: Send, Sync, Copy);

    #[test]
    fn test_empty_view() {
        let view = ErratumRef::from_option(None);
        assert!(view.is_ok());
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
        assert_eq!(view.severity(), Severity::DEFAULT);
        assert_eq!(view.nesting_level(), 0);
        assert!(view.front().is_none());
        assert_eq!(view.iter().count(), 0);
        assert!(view.to_erratum().is_empty());
    }
}
