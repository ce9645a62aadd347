use core::{
    fmt,
    ops::{Deref, DerefMut},
};

use crate::{Erratum, NoteText, Severity};

/// A result value that travels together with an [`Erratum`].
///
/// [`Rv`] is plain composition: a value of type `R` (default-constructed when
/// a function fails early) and the erratum describing how it was obtained.
/// It dereferences to the result, so a call site can use it as if it were
/// the bare value, while the annotations stay attached until somebody
/// inspects or clears them. Nothing is lost if nobody does: dropping the
/// [`Rv`] drops its erratum, which reports failures to the registered sinks.
///
/// # Examples
///
/// ```
/// use errata::{Erratum, Rv};
///
/// fn average(values: &[i32]) -> Rv<i32> {
///     if values.is_empty() {
///         return Erratum::new().with_error("no values").into();
///     }
///     let mut rv = Rv::new(values.iter().sum::<i32>() / values.len() as i32);
///     if values.len() == 1 {
///         rv.info("average of a single value");
///     }
///     rv
/// }
///
/// let rv = average(&[2, 4]);
/// assert_eq!(*rv + 1, 4);
/// assert!(rv.is_ok());
///
/// let mut failed = average(&[]);
/// assert_eq!(*failed, 0);
/// assert!(!failed.is_ok());
/// failed.clear();
/// ```
#[must_use = "dropping an Rv discards its result and reports its errata to the sinks"]
#[derive(Clone, Default)]
pub struct Rv<R> {
    result: R,
    errata: Erratum,
}

impl<R> Rv<R> {
    /// Creates an [`Rv`] holding `result` and an empty erratum.
    #[inline]
    pub const fn new(result: R) -> Self {
        Self {
            result,
            errata: Erratum::new(),
        }
    }

    /// Creates an [`Rv`] from a result and an erratum.
    #[inline]
    pub const fn with_errata(result: R, errata: Erratum) -> Self {
        Self { result, errata }
    }

    /// Returns a reference to the result.
    #[inline]
    pub fn result(&self) -> &R {
        &self.result
    }

    /// Returns a mutable reference to the result.
    #[inline]
    pub fn result_mut(&mut self) -> &mut R {
        &mut self.result
    }

    /// Returns a reference to the erratum.
    #[inline]
    pub fn errata(&self) -> &Erratum {
        &self.errata
    }

    /// Returns a mutable reference to the erratum.
    #[inline]
    pub fn errata_mut(&mut self) -> &mut Erratum {
        &mut self.errata
    }

    /// Replaces the result and returns a reference to the stored value.
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::Rv;
    ///
    /// let mut rv = Rv::new(String::new());
    /// rv.set("hello".to_owned()).push_str(", world");
    /// assert_eq!(*rv, "hello, world");
    /// ```
    #[inline]
    pub fn set(&mut self, result: R) -> &mut R {
        self.result = result;
        &mut self.result
    }

    /// Replaces the result and returns the [`Rv`].
    #[inline]
    pub fn assign(&mut self, result: R) -> &mut Self {
        self.result = result;
        self
    }

    /// Replaces the erratum.
    ///
    /// The previous erratum is dropped, and reported if it was the last
    /// handle to annotations that were never cleared. Use
    /// [`Erratum::absorb`] through [`Rv::errata_mut`] to keep them instead.
    #[inline]
    pub fn set_errata(&mut self, errata: Erratum) -> &mut Self {
        self.errata = errata;
        self
    }

    /// Pushes an annotation onto the erratum. See [`Erratum::note`].
    #[inline]
    pub fn note(&mut self, severity: Severity, text: impl NoteText) -> &mut Self {
        self.errata.note(severity, text);
        self
    }

    /// Pushes an annotation with [`Severity::Diag`] onto the erratum.
    #[inline]
    pub fn diag(&mut self, text: impl NoteText) -> &mut Self {
        self.note(Severity::Diag, text)
    }

    /// Pushes an annotation with [`Severity::Info`] onto the erratum.
    #[inline]
    pub fn info(&mut self, text: impl NoteText) -> &mut Self {
        self.note(Severity::Info, text)
    }

    /// Pushes an annotation with [`Severity::Warn`] onto the erratum.
    #[inline]
    pub fn warn(&mut self, text: impl NoteText) -> &mut Self {
        self.note(Severity::Warn, text)
    }

    /// Pushes an annotation with [`Severity::Error`] onto the erratum.
    #[inline]
    pub fn error(&mut self, text: impl NoteText) -> &mut Self {
        self.note(Severity::Error, text)
    }

    /// Returns `true` if the erratum does not represent a failure.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.errata.is_ok()
    }

    /// Returns `true` if the erratum represents a failure.
    #[inline]
    pub fn is_failure(&self) -> bool {
        self.errata.is_failure()
    }

    /// Returns the severity of the erratum.
    #[inline]
    pub fn severity(&self) -> Severity {
        self.errata.severity()
    }

    /// Discards the annotations of the erratum without reporting them. See
    /// [`Erratum::clear`].
    #[inline]
    pub fn clear(&mut self) -> &mut Self {
        self.errata.clear();
        self
    }

    /// Splits the [`Rv`] into its result and its erratum.
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::{Erratum, Rv};
    ///
    /// let rv = Rv::with_errata(7, Erratum::new().with_info("cached"));
    /// let (value, errata) = rv.into_parts();
    /// assert_eq!(value, 7);
    /// assert_eq!(errata.len(), 1);
    /// ```
    #[inline]
    pub fn into_parts(self) -> (R, Erratum) {
        (self.result, self.errata)
    }

    /// Returns references to the result and the erratum.
    #[inline]
    pub fn parts(&self) -> (&R, &Erratum) {
        (&self.result, &self.errata)
    }

    /// Returns mutable references to the result and the erratum.
    #[inline]
    pub fn parts_mut(&mut self) -> (&mut R, &mut Erratum) {
        (&mut self.result, &mut self.errata)
    }

    /// Converts into a [`Result`], which is an error if the erratum
    /// represents a failure.
    ///
    /// On success, the erratum is dropped. Any annotations below
    /// [`Severity::FAILURE`] it still holds are reported as abandoned, unless
    /// the [reporting threshold](crate::sinks::set_reporting_threshold) has
    /// been raised above them.
    ///
    /// # Examples
    ///
    /// ```
    /// use errata::{Erratum, Rv};
    ///
    /// fn checked(value: i32) -> Rv<i32> {
    ///     let mut rv = Rv::new(value);
    ///     if value < 0 {
    ///         rv.error(format_args!("{value} is negative"));
    ///     }
    ///     rv
    /// }
    ///
    /// assert_eq!(checked(3).into_result().ok(), Some(3));
    ///
    /// let mut errata: Erratum = checked(-1).into_result().unwrap_err();
    /// assert_eq!(errata.to_string(), "Error: -1 is negative");
    /// errata.clear();
    /// ```
    pub fn into_result(self) -> Result<R, Erratum> {
        if self.errata.is_ok() {
            Ok(self.result)
        } else {
            Err(self.errata)
        }
    }

    /// Maps the result, keeping the erratum.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Rv<U>
    where
        F: FnOnce(R) -> U,
    {
        Rv {
            result: f(self.result),
            errata: self.errata,
        }
    }
}

/// Creates an [`Rv`] from a result and an erratum. Same as
/// [`Rv::with_errata`].
#[inline]
pub const fn make_rv<R>(result: R, errata: Erratum) -> Rv<R> {
    Rv::with_errata(result, errata)
}

/// Creates an [`Rv`] with a default result, for returning early from a
/// function that failed.
impl<R: Default> From<Erratum> for Rv<R> {
    #[inline]
    fn from(errata: Erratum) -> Self {
        Self::with_errata(R::default(), errata)
    }
}

impl<R> From<(R, Erratum)> for Rv<R> {
    #[inline]
    fn from((result, errata): (R, Erratum)) -> Self {
        Self::with_errata(result, errata)
    }
}

/// Keeps the value on success and the erratum on failure, with a default
/// result.
impl<R: Default> From<Result<R, Erratum>> for Rv<R> {
    #[inline]
    fn from(result: Result<R, Erratum>) -> Self {
        match result {
            Ok(result) => Self::new(result),
            Err(errata) => errata.into(),
        }
    }
}

impl<R> From<Rv<R>> for (R, Erratum) {
    #[inline]
    fn from(rv: Rv<R>) -> Self {
        rv.into_parts()
    }
}

impl<R> Deref for Rv<R> {
    type Target = R;

    #[inline]
    fn deref(&self) -> &R {
        &self.result
    }
}

impl<R> DerefMut for Rv<R> {
    #[inline]
    fn deref_mut(&mut self) -> &mut R {
        &mut self.result
    }
}

impl<R> AsRef<R> for Rv<R> {
    #[inline]
    fn as_ref(&self) -> &R {
        &self.result
    }
}

impl<R> AsMut<R> for Rv<R> {
    #[inline]
    fn as_mut(&mut self) -> &mut R {
        &mut self.result
    }
}

impl<R: fmt::Debug> fmt::Debug for Rv<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rv")
            .field("result", &self.result)
            .field("errata", &self.errata)
            .finish()
    }
}
