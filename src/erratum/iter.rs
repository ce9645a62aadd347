use core::iter::{FusedIterator, Rev};

use errata_internals::RawAnnotation;

use crate::Annotation;

/// An iterator over the annotations of an erratum, newest first.
///
/// This iterator yields [`Annotation`] items and is created by calling
/// [`Erratum::iter`] or [`ErratumRef::iter`]. Iterating from the back yields
/// the oldest annotation first.
///
/// [`Erratum::iter`]: crate::Erratum::iter
/// [`ErratumRef::iter`]: crate::ErratumRef::iter
///
/// # Examples
///
/// ```
/// use errata::{Annotations, Erratum};
///
/// let erratum = Erratum::new().with_info("first").with_info("second");
///
/// let newest_first: Vec<&str> = erratum.iter().map(|note| note.text()).collect();
/// assert_eq!(newest_first, ["second", "first"]);
///
/// let oldest_first: Annotations<'_> = erratum.iter();
/// assert_eq!(oldest_first.rev().next().unwrap().text(), "first");
/// ```
#[must_use]
#[derive(Clone)]
pub struct Annotations<'a> {
    iter: Rev<core::slice::Iter<'a, RawAnnotation>>,
}

impl<'a> Annotations<'a> {
    /// Creates a new iterator from the raw annotations, stored oldest first
    pub(crate) fn from_raw(notes: &'a [RawAnnotation]) -> Self {
        Self {
            iter: notes.iter().rev(),
        }
    }

    /// Creates an iterator that yields nothing
    pub(crate) fn empty() -> Self {
        Self::from_raw(&[])
    }
}

impl<'a> Iterator for Annotations<'a> {
    type Item = Annotation<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(Annotation::from_raw)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl DoubleEndedIterator for Annotations<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.iter.next_back().map(Annotation::from_raw)
    }
}

impl ExactSizeIterator for Annotations<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.iter.len()
    }
}

impl FusedIterator for Annotations<'_> {}

impl core::fmt::Debug for Annotations<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
