use core::fmt;

use errata_internals::{RawErratum, RawErratumMut};

use crate::{
    Annotation, Annotations, ErratumDisplay, ErratumRef, NoteText, Severity, sinks::SinkDispatch,
};

/// A handle to a stack of severity-tagged annotations.
///
/// An empty [`Erratum`] is a single null pointer: creating, moving, cloning
/// and dropping it costs nothing and never allocates. The first annotation
/// allocates a reference-counted data block, which all clones of the handle
/// share.
///
/// # Copy-on-write
///
/// Cloning a handle never copies the annotations. Adding to a handle whose
/// block is shared with other handles first gives it a private copy of the
/// block, so no handle ever observes changes made through another one.
///
/// # Abandonment
///
/// When the last handle to a block is dropped while the block still holds
/// annotations, the block is passed to the registered [`Sink`]s (see
/// [`sinks`]) before it is destroyed. This happens exactly once per block,
/// no matter how many handles shared it or on which thread the last one was
/// dropped. Use [`Erratum::clear`] to acknowledge the annotations instead.
///
/// # Examples
///
/// ```
/// use errata::{Erratum, Severity};
///
/// let mut erratum = Erratum::new();
/// assert!(erratum.is_ok());
///
/// erratum.info("start");
/// erratum.warn(format_args!("retrying {}", 3));
/// assert_eq!(erratum.count(), 2);
/// assert!(!erratum.is_ok());
/// assert_eq!(erratum.severity(), Severity::Warn);
///
/// assert_eq!(erratum.to_string(), "Warn: retrying 3\nInfo: start");
/// erratum.clear();
/// ```
///
/// [`Sink`]: crate::Sink
/// [`sinks`]: crate::sinks
#[must_use = "an erratum holding failures is reported to the registered sinks when dropped"]
#[derive(Clone, Default)]
#[repr(transparent)]
pub struct Erratum {
    /// The data block, created by the first annotation
    raw: Option<RawErratum>,
}

impl Erratum {
    /// Creates an empty erratum. This does not allocate.
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::Erratum;
    ///
    /// const NOTHING: Erratum = Erratum::new();
    /// assert!(NOTHING.is_empty());
    /// ```
    #[inline]
    pub const fn new() -> Self {
        Self { raw: None }
    }

    /// Wraps an existing data block.
    #[inline]
    pub(crate) fn from_raw(raw: RawErratum) -> Self {
        Self { raw: Some(raw) }
    }

    /// Returns a mutable reference to a data block owned by this handle
    /// alone, creating it or forking it from a shared block as needed.
    fn raw_mut(&mut self) -> RawErratumMut<'_> {
        self.raw
            .get_or_insert_with(RawErratum::new::<SinkDispatch>)
            .make_mut()
    }

    /// Pushes an annotation with the given severity.
    ///
    /// The text is copied into the erratum, unless it is a literal-only
    /// [`format_args!`]. See [`NoteText`] for the accepted types.
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::{Erratum, Severity};
    ///
    /// let mut erratum = Erratum::new();
    /// erratum
    ///     .note(Severity::Diag, "checking cache")
    ///     .note(Severity::Info, format_args!("{} entries", 12));
    /// assert_eq!(erratum.len(), 2);
    /// ```
    #[inline]
    pub fn note(&mut self, severity: Severity, text: impl NoteText) -> &mut Self {
        text.push_into(severity, self.raw_mut());
        self
    }

    /// Pushes an annotation with [`Severity::Diag`].
    #[inline]
    pub fn diag(&mut self, text: impl NoteText) -> &mut Self {
        self.note(Severity::Diag, text)
    }

    /// Pushes an annotation with [`Severity::Info`].
    #[inline]
    pub fn info(&mut self, text: impl NoteText) -> &mut Self {
        self.note(Severity::Info, text)
    }

    /// Pushes an annotation with [`Severity::Warn`].
    #[inline]
    pub fn warn(&mut self, text: impl NoteText) -> &mut Self {
        self.note(Severity::Warn, text)
    }

    /// Pushes an annotation with [`Severity::Error`].
    #[inline]
    pub fn error(&mut self, text: impl NoteText) -> &mut Self {
        self.note(Severity::Error, text)
    }

    /// Pushes an annotation with the given severity and returns the erratum.
    ///
    /// This is the by-value counterpart of [`Erratum::note`], for building an
    /// erratum in a single expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::{Erratum, Severity};
    ///
    /// fn open() -> Erratum {
    ///     Erratum::new().with_note(Severity::Error, "permission denied")
    /// }
    ///
    /// let mut erratum = open();
    /// assert!(erratum.is_failure());
    /// erratum.clear();
    /// ```
    #[inline]
    pub fn with_note(mut self, severity: Severity, text: impl NoteText) -> Self {
        self.note(severity, text);
        self
    }

    /// Pushes an annotation with [`Severity::Diag`] and returns the erratum.
    #[inline]
    pub fn with_diag(self, text: impl NoteText) -> Self {
        self.with_note(Severity::Diag, text)
    }

    /// Pushes an annotation with [`Severity::Info`] and returns the erratum.
    #[inline]
    pub fn with_info(self, text: impl NoteText) -> Self {
        self.with_note(Severity::Info, text)
    }

    /// Pushes an annotation with [`Severity::Warn`] and returns the erratum.
    #[inline]
    pub fn with_warn(self, text: impl NoteText) -> Self {
        self.with_note(Severity::Warn, text)
    }

    /// Pushes an annotation with [`Severity::Error`] and returns the erratum.
    #[inline]
    pub fn with_error(self, text: impl NoteText) -> Self {
        self.with_note(Severity::Error, text)
    }

    /// Copies the annotations of `other` on top of this erratum.
    ///
    /// The copied annotations keep their relative order and become the most
    /// recent ones. They are nested below this erratum's current
    /// [nesting level](Erratum::nesting_level): an annotation at level `n` in
    /// `other` ends up at level `nesting_level() + 1 + n`. `other` keeps its
    /// own annotations and is still reported if it is abandoned; use
    /// [`Erratum::absorb`] to take them over instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::Erratum;
    ///
    /// let inner = Erratum::new().with_warn("slow disk");
    /// let mut outer = Erratum::new().with_info("saving");
    /// outer.merge(&inner);
    /// assert_eq!(outer.to_string(), "  Warn: slow disk\nInfo: saving");
    /// assert_eq!(inner.len(), 1);
    ///
    /// // Merged annotations stay below the receiver's own level
    /// outer.set_nesting_level(2).merge(&inner);
    /// assert_eq!(outer.front().map(|note| note.level()), Some(3));
    /// # outer.clear();
    /// ```
    pub fn merge(&mut self, other: &Erratum) -> &mut Self {
        if let Some(donor) = &other.raw
            && !donor.as_ref().is_empty()
        {
            self.raw_mut().append(donor.as_ref());
        }
        self
    }

    /// Takes over the annotations of `other`.
    ///
    /// The result is the same as [`Erratum::merge`], but `other` is silenced
    /// afterwards: its annotations are never reported through it. If this
    /// erratum is empty and `other` is the only handle to its block, the
    /// block is adopted without copying any text.
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::Erratum;
    ///
    /// fn step() -> Erratum {
    ///     Erratum::new().with_error("step failed")
    /// }
    ///
    /// let mut total = Erratum::new();
    /// total.absorb(step()).absorb(step());
    /// assert_eq!(total.len(), 2);
    /// assert!(total.iter().all(|note| note.level() == 1));
    /// total.clear();
    /// ```
    pub fn absorb(&mut self, mut other: Erratum) -> &mut Self {
        let Some(mut donor) = other.raw.take() else {
            return self;
        };

        if self.raw.is_none() && donor.strong_count() == 1 {
            let mut raw = donor.make_mut();
            raw.nest();
            raw.set_level(0);
            self.raw = Some(donor);
        } else {
            if !donor.as_ref().is_empty() {
                self.raw_mut().append(donor.as_ref());
            }
            donor.release_silently();
        }
        self
    }

    /// Discards the annotations of this handle without reporting them.
    ///
    /// If this is the last handle to its data block, the annotations are
    /// dropped and no sink is invoked. If other handles share the block, only
    /// this handle is detached from it; the other handles keep the
    /// annotations and still report them when they are abandoned.
    ///
    /// The erratum is empty afterwards.
    #[inline]
    pub fn clear(&mut self) -> &mut Self {
        if let Some(raw) = self.raw.take() {
            raw.release_silently();
        }
        self
    }

    /// Increments the nesting level of every annotation, and of annotations
    /// added from now on.
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::Erratum;
    ///
    /// let mut erratum = Erratum::new().with_info("inner");
    /// erratum.nest().info("outer");
    /// assert_eq!(erratum.to_string(), "  Info: outer\n  Info: inner");
    /// assert_eq!(erratum.nesting_level(), 1);
    /// ```
    #[inline]
    pub fn nest(&mut self) -> &mut Self {
        self.raw_mut().nest();
        self
    }

    /// Sets the nesting level of annotations added from now on.
    #[inline]
    pub fn set_nesting_level(&mut self, level: u32) -> &mut Self {
        self.raw_mut().set_level(level);
        self
    }

    /// Returns a read-only view of this erratum.
    #[inline]
    pub fn as_ref(&self) -> ErratumRef<'_> {
        ErratumRef::from_option(self.raw.as_ref().map(RawErratum::as_ref))
    }

    /// Returns `true` if no annotation is [`Severity::FAILURE`] or higher.
    ///
    /// An empty erratum is always ok.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.as_ref().is_ok()
    }

    /// Returns `true` if at least one annotation is [`Severity::FAILURE`] or
    /// higher.
    #[inline]
    pub fn is_failure(&self) -> bool {
        self.as_ref().is_failure()
    }

    /// Returns the highest severity over all annotations, or
    /// [`Severity::DEFAULT`] if there are none.
    #[inline]
    pub fn severity(&self) -> Severity {
        self.as_ref().severity()
    }

    /// Returns the number of annotations.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_ref().len()
    }

    /// Returns the number of annotations. Same as [`Erratum::len`].
    #[inline]
    pub fn count(&self) -> usize {
        self.len()
    }

    /// Returns `true` if there are no annotations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }

    /// Returns the nesting level given to annotations added from now on.
    #[inline]
    pub fn nesting_level(&self) -> u32 {
        self.as_ref().nesting_level()
    }

    /// Returns an iterator over the annotations, newest first.
    #[inline]
    pub fn iter(&self) -> Annotations<'_> {
        self.as_ref().iter()
    }

    /// Returns the most recently added annotation.
    #[inline]
    pub fn front(&self) -> Option<Annotation<'_>> {
        self.as_ref().front()
    }

    /// Returns the number of handles sharing the data block of this erratum,
    /// or `0` if it has none.
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::Erratum;
    ///
    /// let empty = Erratum::new();
    /// assert_eq!(empty.strong_count(), 0);
    ///
    /// let erratum = Erratum::new().with_info("shared");
    /// let alias = erratum.clone();
    /// assert_eq!(erratum.strong_count(), 2);
    /// # drop(alias);
    /// ```
    #[inline]
    pub fn strong_count(&self) -> usize {
        self.raw.as_ref().map_or(0, RawErratum::strong_count)
    }

    /// Returns `true` if both handles share the same data block.
    ///
    /// Two empty handles are never considered equal.
    #[inline]
    pub fn ptr_eq(&self, other: &Erratum) -> bool {
        match (&self.raw, &other.raw) {
            (Some(lhs), Some(rhs)) => lhs.ptr_eq(rhs),
            _ => false,
        }
    }

    /// Returns a value that renders the annotations separated by `glue`
    /// instead of [`DEFAULT_GLUE`].
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::Erratum;
    ///
    /// let erratum = Erratum::new().with_info("a").with_warn("b");
    /// assert_eq!(erratum.display_with_glue(" | ").to_string(), "Warn: b | Info: a");
    /// ```
    ///
    /// [`DEFAULT_GLUE`]: crate::DEFAULT_GLUE
    #[inline]
    pub fn display_with_glue<'a>(&'a self, glue: &'a str) -> ErratumDisplay<'a> {
        self.as_ref().display_with_glue(glue)
    }
}

impl<'a> IntoIterator for &'a Erratum {
    type Item = Annotation<'a>;
    type IntoIter = Annotations<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> From<ErratumRef<'a>> for Erratum {
    fn from(erratum: ErratumRef<'a>) -> Self {
        erratum.to_erratum()
    }
}

impl Extend<Erratum> for Erratum {
    fn extend<I: IntoIterator<Item = Erratum>>(&mut self, iter: I) {
        for erratum in iter {
            self.absorb(erratum);
        }
    }
}

impl FromIterator<Erratum> for Erratum {
    fn from_iter<I: IntoIterator<Item = Erratum>>(iter: I) -> Self {
        let mut erratum = Erratum::new();
        erratum.extend(iter);
        erratum
    }
}

impl fmt::Display for Erratum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_ref(), f)
    }
}

impl fmt::Debug for Erratum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_ref(), f)
    }
}
