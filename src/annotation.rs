use core::fmt;

use errata_internals::RawAnnotation;

use crate::Severity;

/// A single severity-tagged message of an [`Erratum`].
///
/// Annotations are only ever borrowed from the erratum that holds them; they
/// are obtained through [`Erratum::iter`], [`Erratum::front`] or the
/// [`ErratumRef`] handed to a [`Sink`].
///
/// # Examples
///
/// ```
/// use errata::{Erratum, Severity};
///
/// let erratum = Erratum::new().with_warn("cache miss").with_error("timeout");
/// let newest = erratum.front().unwrap();
/// assert_eq!(newest.severity(), Severity::Error);
/// assert_eq!(newest.text(), "timeout");
/// assert_eq!(newest.to_string(), "Error: timeout");
/// ```
///
/// [`Erratum`]: crate::Erratum
/// [`Erratum::iter`]: crate::Erratum::iter
/// [`Erratum::front`]: crate::Erratum::front
/// [`ErratumRef`]: crate::ErratumRef
/// [`Sink`]: crate::Sink
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Annotation<'a> {
    raw: &'a RawAnnotation,
}

impl<'a> Annotation<'a> {
    #[inline]
    pub(crate) fn from_raw(raw: &'a RawAnnotation) -> Self {
        Self { raw }
    }

    /// Returns the severity of this annotation.
    #[inline]
    pub fn severity(self) -> Severity {
        self.raw.severity()
    }

    /// Returns `true` if the severity of this annotation is
    /// [`Severity::FAILURE`] or higher.
    #[inline]
    pub fn is_failure(self) -> bool {
        self.raw.severity().is_failure()
    }

    /// Returns the nesting level of this annotation.
    ///
    /// Annotations start at the nesting level of the erratum they were added
    /// to, and move one level deeper each time they are merged into another
    /// erratum or the erratum is [nested](crate::Erratum::nest).
    #[inline]
    pub fn level(self) -> u32 {
        self.raw.level()
    }

    /// Returns the text of this annotation.
    #[inline]
    pub fn text(self) -> &'a str {
        self.raw.text()
    }
}

/// Renders the annotation as `"{severity}: {text}"`, indented by two spaces
/// per nesting level.
impl fmt::Display for Annotation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.level() {
            f.write_str("  ")?;
        }
        write!(f, "{}: {}", self.severity(), self.text())
    }
}

impl fmt::Debug for Annotation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotation")
            .field("severity", &self.severity())
            .field("level", &self.level())
            .field("text", &self.text())
            .finish()
    }
}

impl PartialEq<str> for Annotation<'_> {
    fn eq(&self, other: &str) -> bool {
        self.text() == other
    }
}

impl PartialEq<&str> for Annotation<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.text() == *other
    }
}
