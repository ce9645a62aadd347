//! This module encapsulates the fields of [`RawAnnotation`]. Since this is the
//! only place they are visible, the text pointer of an annotation can only be
//! created by the data block that owns the arena it points into.
//!
//! # Safety Invariant
//!
//! A [`RawAnnotation`] holding [`Text::Local`] points into the [`Bump`] arena of
//! the [`ErratumData`] whose `notes` contain it. Annotations are never cloned,
//! never moved to another block and never handed out by mutable reference, so
//! any `&RawAnnotation` is always borrowed from a block that keeps its arena
//! alive for at least as long as the borrow.
//!
//! [`Bump`]: bumpalo::Bump
//! [`ErratumData`]: crate::erratum::data::ErratumData

use core::ptr::NonNull;

use crate::severity::Severity;

/// Storage of the text of an annotation.
pub(crate) enum Text {
    /// A literal supplied by the caller, which outlives every block.
    Literal(&'static str),
    /// A span localized in the arena of the owning block.
    ///
    /// # Safety
    ///
    /// The pointer is valid for reads for as long as the owning block is
    /// alive, and the bytes it points to are never written again.
    Local(NonNull<str>),
}

/// A single severity-tagged message stored in an erratum data block.
///
/// Values of this type only exist inside a data block and are only ever
/// observed through a shared reference.
pub struct RawAnnotation {
    /// The severity of this annotation.
    severity: Severity,
    /// Nesting level, used for indentation when rendering.
    level: u32,
    /// The annotation text.
    text: Text,
}

impl RawAnnotation {
    /// Creates an annotation with literal text.
    #[inline]
    pub(crate) fn literal(severity: Severity, level: u32, text: &'static str) -> Self {
        Self {
            severity,
            level,
            text: Text::Literal(text),
        }
    }

    /// Creates an annotation with text localized in an arena.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `text` points into the arena of the block that will store this
    ///    annotation, and stays valid and unmodified for the lifetime of that
    ///    block.
    #[inline]
    pub(crate) unsafe fn local(severity: Severity, level: u32, text: NonNull<str>) -> Self {
        Self {
            severity,
            level,
            text: Text::Local(text),
        }
    }

    /// Returns the severity of this annotation.
    #[inline]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the nesting level of this annotation.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Returns `true` if the text is a caller-supplied literal rather than a
    /// copy in the arena.
    #[inline]
    pub fn is_literal(&self) -> bool {
        matches!(self.text, Text::Literal(_))
    }

    /// Returns the text of this annotation.
    #[inline]
    pub fn text(&self) -> &str {
        match self.text {
            Text::Literal(text) => text,
            // SAFETY: An `&RawAnnotation` can only be obtained by borrowing
            // the `notes` of the block that owns the arena this pointer points
            // into (see the module documentation). That block outlives the
            // borrow of `self`, and localized bytes are never written again.
            Text::Local(text) => unsafe { text.as_ref() },
        }
    }

    /// Increments the nesting level.
    #[inline]
    pub(crate) fn nest(&mut self) {
        self.level = self.level.saturating_add(1);
    }

    /// Returns the text storage, for re-homing into another block.
    #[inline]
    pub(crate) fn text_storage(&self) -> &Text {
        &self.text
    }
}

impl core::fmt::Debug for RawAnnotation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RawAnnotation")
            .field("severity", &self.severity)
            .field("level", &self.level)
            .field("text", &self.text())
            .finish()
    }
}
