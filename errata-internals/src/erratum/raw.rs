//! Handle types for the shared erratum data block.
//!
//! [`RawErratum`] owns one strong reference to an [`ErratumData`] stored in a
//! [`triomphe::Arc`]. Copying a handle is an atomic increment; the block is
//! destroyed exactly once, when the last handle is released, and reports its
//! annotations to its [`AbandonHandler`] at that point if it still has any.
//!
//! # Mutation
//!
//! A block is only ever mutated through a [`RawErratumMut`], which can only
//! be created while the strong count is `1`. [`RawErratum::get_mut`] refuses
//! to hand one out for a shared block, while [`RawErratum::make_mut`] first
//! replaces the shared block with a private copy (copy-on-write), so a
//! mutation is never observable through any other handle.
//!
//! [`AbandonHandler`]: crate::handlers::AbandonHandler

use core::fmt;

use crate::{
    annotation::RawAnnotation, erratum::data::ErratumData, handlers::AbandonHandler,
    severity::Severity,
};

/// An owning, reference-counted handle to an erratum data block.
///
/// Unlike the public `Erratum` type, a [`RawErratum`] always points to a
/// block; the empty state is represented by `Option<RawErratum>` one level
/// up.
#[derive(Clone)]
#[repr(transparent)]
pub struct RawErratum {
    /// The shared data block
    data: triomphe::Arc<ErratumData>,
}

impl RawErratum {
    /// Creates a new, empty data block that reports to the handler `H` when
    /// abandoned.
    ///
    /// The created block has a strong count of 1.
    #[inline]
    pub fn new<H: AbandonHandler>() -> Self {
        Self {
            data: triomphe::Arc::new(ErratumData::new::<H>()),
        }
    }

    /// Returns a shared reference to the data block.
    #[inline]
    pub fn as_ref(&self) -> RawErratumRef<'_> {
        RawErratumRef { data: &self.data }
    }

    /// Returns a mutable reference to the data block if this is the only
    /// handle to it.
    #[inline]
    pub fn get_mut(&mut self) -> Option<RawErratumMut<'_>> {
        triomphe::Arc::get_mut(&mut self.data).map(|data| RawErratumMut { data })
    }

    /// Returns a mutable reference to the data block, first replacing it with
    /// a private copy if other handles share it.
    ///
    /// The copy has the same annotations, severity, nesting level and abandon
    /// handler as the original. The original block is left untouched for the
    /// other handles.
    pub fn make_mut(&mut self) -> RawErratumMut<'_> {
        if !self.data.is_unique() {
            self.data = triomphe::Arc::new(self.data.fork());
        }

        match triomphe::Arc::get_mut(&mut self.data) {
            Some(data) => RawErratumMut { data },
            None => unreachable!("erratum data was shared right after being made unique"),
        }
    }

    /// Gets the strong count of the inner [`triomphe::Arc`].
    #[inline]
    pub fn strong_count(&self) -> usize {
        triomphe::ArcBorrow::strong_count(&triomphe::Arc::borrow_arc(&self.data))
    }

    /// Returns `true` if both handles point to the same data block.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        triomphe::Arc::ptr_eq(&self.data, &other.data)
    }

    /// Discards the annotations of the block if this is the only handle to
    /// it, then releases the handle.
    ///
    /// Returns `true` if the annotations were discarded, in which case the
    /// block is destroyed without being reported. If the block is shared,
    /// only this handle is released and the remaining handles keep the
    /// annotations.
    pub fn release_silently(mut self) -> bool {
        match self.get_mut() {
            Some(mut data) => {
                data.clear();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for RawErratum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_ref(), f)
    }
}

/// A lifetime-bound shared reference to an erratum data block.
///
/// This is what an [`AbandonHandler`] receives while a block is being
/// destroyed, so it cannot be turned back into an owning handle.
///
/// [`AbandonHandler`]: crate::handlers::AbandonHandler
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct RawErratumRef<'a> {
    /// The referenced data block
    data: &'a ErratumData,
}

impl<'a> RawErratumRef<'a> {
    /// Creates a reference from a borrowed data block.
    #[inline]
    pub(super) fn from_data(data: &'a ErratumData) -> Self {
        Self { data }
    }

    /// Returns the annotations, oldest first.
    ///
    /// The logical stack order is the reverse: the last element is the most
    /// recently added annotation.
    #[inline]
    pub fn notes(self) -> &'a [RawAnnotation] {
        self.data.notes()
    }

    /// Returns the number of annotations.
    #[inline]
    pub fn len(self) -> usize {
        self.data.notes().len()
    }

    /// Returns `true` if there are no annotations.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.data.notes().is_empty()
    }

    /// Returns the maximum severity over all annotations, or
    /// [`Severity::DEFAULT`] if there are none.
    #[inline]
    pub fn severity(self) -> Severity {
        self.data.severity()
    }

    /// Returns the nesting level given to newly added annotations.
    #[inline]
    pub fn level(self) -> u32 {
        self.data.level()
    }

    /// Returns `true` if both references point to the same data block.
    #[inline]
    pub fn ptr_eq(self, other: RawErratumRef<'_>) -> bool {
        core::ptr::eq(self.data, other.data)
    }

    /// Copies this block into a new, uniquely owned block with the same
    /// abandon handler.
    #[inline]
    pub fn fork(self) -> RawErratum {
        RawErratum {
            data: triomphe::Arc::new(self.data.fork()),
        }
    }

    /// Copies this block into a new, uniquely owned block that reports to
    /// the handler `H` instead.
    #[inline]
    pub fn fork_to<H: AbandonHandler>(self) -> RawErratum {
        RawErratum {
            data: triomphe::Arc::new(self.data.fork_to::<H>()),
        }
    }
}

impl fmt::Debug for RawErratumRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawErratum")
            .field("severity", &self.severity())
            .field("level", &self.level())
            .field("notes", &self.notes())
            .finish()
    }
}

/// A mutable reference to a data block that is not shared with any other
/// handle.
#[repr(transparent)]
pub struct RawErratumMut<'a> {
    /// The referenced data block, borrowed through a unique handle
    data: &'a mut ErratumData,
}

impl<'a> RawErratumMut<'a> {
    /// Reborrows the mutable reference for a shorter lifetime.
    #[inline]
    pub fn reborrow<'b>(&'b mut self) -> RawErratumMut<'b> {
        RawErratumMut {
            data: &mut *self.data,
        }
    }

    /// Returns a shared reference to the data block.
    #[inline]
    pub fn as_ref(&self) -> RawErratumRef<'_> {
        RawErratumRef { data: &*self.data }
    }

    /// Pushes an annotation whose text is a literal. The text is not copied.
    #[inline]
    pub fn push_static(&mut self, severity: Severity, text: &'static str) {
        self.data.push_literal(severity, text);
    }

    /// Pushes an annotation, copying `text` into the arena of the block.
    #[inline]
    pub fn push_str(&mut self, severity: Severity, text: &str) {
        self.data.push_localized(severity, text);
    }

    /// Pushes an annotation rendered from `args`.
    ///
    /// Arguments without any formatting placeholders are stored as literals.
    #[inline]
    pub fn push_fmt(&mut self, severity: Severity, args: fmt::Arguments<'_>) {
        match args.as_str() {
            Some(text) => self.data.push_literal(severity, text),
            None => self.data.push_rendered(severity, args),
        }
    }

    /// Copies every annotation of `other` on top of this block's stack.
    ///
    /// The copied annotations keep their relative order and become the most
    /// recent annotations. An annotation at level `n` in `other` is stored at
    /// level `self.level + 1 + n`. Their text is copied into this block's
    /// arena.
    #[inline]
    pub fn append(&mut self, other: RawErratumRef<'_>) {
        self.data.append(other.data);
    }

    /// Increments the nesting level of every annotation and of annotations
    /// added later.
    #[inline]
    pub fn nest(&mut self) {
        self.data.nest();
    }

    /// Sets the nesting level given to annotations added later.
    #[inline]
    pub fn set_level(&mut self, level: u32) {
        self.data.set_level(level);
    }

    /// Removes all annotations and resets the severity and nesting level.
    ///
    /// A cleared block is not reported when it is destroyed.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Returns the number of bytes left in the current chunk of the arena.
    #[inline]
    pub fn arena_remnant(&mut self) -> usize {
        self.data.remnant()
    }
}
