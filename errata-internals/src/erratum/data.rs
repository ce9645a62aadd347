//! This module encapsulates the fields of the [`ErratumData`]. Since this is
//! the only place they are visible, every localized annotation in `notes` is
//! guaranteed to point into the `arena` of the same [`ErratumData`]: text can
//! only be localized through the methods below, which always allocate from
//! `self.arena` and store the result in `self.notes`.

use alloc::vec::Vec;
use core::{fmt, ptr::NonNull};

use bumpalo::{Bump, collections::String as ArenaString};

use crate::{
    annotation::{RawAnnotation, Text},
    erratum::raw::RawErratumRef,
    handlers::AbandonHandler,
    severity::Severity,
};

/// The shared payload behind erratum handles.
///
/// The reference count lives in the [`triomphe::Arc`] wrapping this struct.
pub(crate) struct ErratumData {
    /// Called by [`Drop`] if the block still holds annotations
    abandon: fn(RawErratumRef<'_>),
    /// The annotation stack, oldest first
    notes: Vec<RawAnnotation>,
    /// Storage for localized annotation text
    arena: Bump,
    /// Nesting level given to newly pushed annotations
    level: u32,
    /// The maximum severity over `notes`
    severity: Severity,
}

// SAFETY: The raw text pointers in `notes` point into heap chunks owned by
// `arena`, which move along with the data block. `Bump` itself is `Send`.
unsafe impl Send for ErratumData {}

// SAFETY: Through a shared reference the only reachable state is `notes`, the
// scalar fields, and the localized bytes, none of which are ever written
// through `&ErratumData`. The arena (which uses interior mutability) is only
// accessed by methods taking `&mut self`.
unsafe impl Sync for ErratumData {}

impl ErratumData {
    /// Creates an empty data block that reports to the handler `H`.
    pub(super) fn new<H: AbandonHandler>() -> Self {
        Self::with_handler(H::abandoned)
    }

    /// Creates an empty data block that reports to `abandon`.
    fn with_handler(abandon: fn(RawErratumRef<'_>)) -> Self {
        Self {
            abandon,
            notes: Vec::new(),
            arena: Bump::new(),
            level: 0,
            severity: Severity::DEFAULT,
        }
    }

    /// Creates a private copy of this block, re-homing every localized text
    /// into the arena of the copy.
    pub(super) fn fork(&self) -> Self {
        self.fork_with_handler(self.abandon)
    }

    /// Like [`ErratumData::fork`], but the copy reports to the handler `H`.
    pub(super) fn fork_to<H: AbandonHandler>(&self) -> Self {
        self.fork_with_handler(H::abandoned)
    }

    fn fork_with_handler(&self, abandon: fn(RawErratumRef<'_>)) -> Self {
        let mut data = Self::with_handler(abandon);
        data.level = self.level;
        data.severity = self.severity;
        data.notes.reserve_exact(self.notes.len());
        for note in &self.notes {
            let note = data.rehome(note, note.level());
            data.notes.push(note);
        }
        data
    }

    /// The annotation stack, oldest first.
    #[inline]
    pub(super) fn notes(&self) -> &[RawAnnotation] {
        &self.notes
    }

    /// The aggregate severity.
    #[inline]
    pub(super) fn severity(&self) -> Severity {
        self.severity
    }

    /// The nesting level given to new annotations.
    #[inline]
    pub(super) fn level(&self) -> u32 {
        self.level
    }

    /// Sets the nesting level given to new annotations.
    #[inline]
    pub(super) fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    /// Pushes an annotation with literal text.
    pub(super) fn push_literal(&mut self, severity: Severity, text: &'static str) {
        let note = RawAnnotation::literal(severity, self.level, text);
        self.push(note);
    }

    /// Copies `text` into the arena and pushes it.
    pub(super) fn push_localized(&mut self, severity: Severity, text: &str) {
        let text = self.localize(text);
        // SAFETY:
        // 1. `text` was just allocated from `self.arena`, and the annotation is
        //    stored in `self.notes` below.
        let note = unsafe { RawAnnotation::local(severity, self.level, text) };
        self.push(note);
    }

    /// Renders `args` into the arena and pushes the result.
    pub(super) fn push_rendered(&mut self, severity: Severity, args: fmt::Arguments<'_>) {
        let text = self.render(args);
        // SAFETY:
        // 1. `text` was just allocated from `self.arena`, and the annotation is
        //    stored in `self.notes` below.
        let note = unsafe { RawAnnotation::local(severity, self.level, text) };
        self.push(note);
    }

    /// Copies every annotation of `other` on top of this stack.
    ///
    /// The annotations keep their relative order and become the newest ones.
    /// An annotation at level `n` in `other` lands at `self.level + 1 + n`,
    /// one level below whatever this block is currently adding.
    pub(super) fn append(&mut self, other: &ErratumData) {
        let base = self.level.saturating_add(1);
        self.notes.reserve(other.notes.len());
        for note in &other.notes {
            let note = self.rehome(note, base.saturating_add(note.level()));
            self.notes.push(note);
        }
        if !other.notes.is_empty() {
            self.severity = self.severity.max(other.severity);
        }
    }

    /// Increments the nesting level of every annotation and of the block.
    pub(super) fn nest(&mut self) {
        for note in &mut self.notes {
            note.nest();
        }
        self.level = self.level.saturating_add(1);
    }

    /// Drops all annotations and releases the text they used.
    pub(super) fn clear(&mut self) {
        self.notes.clear();
        self.arena.reset();
        self.level = 0;
        self.severity = Severity::DEFAULT;
    }

    /// Bytes left in the current chunk of the arena.
    #[inline]
    pub(super) fn remnant(&mut self) -> usize {
        self.arena.chunk_capacity()
    }

    /// Updates the aggregate severity and stores `note` as the newest
    /// annotation.
    #[inline]
    fn push(&mut self, note: RawAnnotation) {
        self.severity = self.severity.max(note.severity());
        self.notes.push(note);
    }

    /// Creates an annotation equal to `note` whose text is owned by this block.
    fn rehome(&mut self, note: &RawAnnotation, level: u32) -> RawAnnotation {
        match *note.text_storage() {
            Text::Literal(text) => RawAnnotation::literal(note.severity(), level, text),
            Text::Local(_) => {
                let text = self.localize(note.text());
                // SAFETY:
                // 1. `text` was just allocated from `self.arena`, and every
                //    caller stores the returned annotation in `self.notes`.
                unsafe { RawAnnotation::local(note.severity(), level, text) }
            }
        }
    }

    /// Copies `text` into the arena.
    fn localize(&mut self, text: &str) -> NonNull<str> {
        NonNull::from(self.arena.alloc_str(text))
    }

    /// Renders `args` into the arena without truncation.
    ///
    /// The text is first rendered into the unused remainder of the current
    /// chunk, keeping only the bytes actually written. If it does not fit, the
    /// length is measured and exactly that many bytes are reserved for a
    /// second render.
    fn render(&mut self, args: fmt::Arguments<'_>) -> NonNull<str> {
        let remnant = self.remnant();
        if remnant > 0 {
            let mut text = ArenaString::with_capacity_in(remnant, &self.arena);
            let mut writer = BoundedWriter {
                buffer: &mut text,
                limit: remnant,
            };
            if fmt::write(&mut writer, args).is_ok() {
                text.shrink_to_fit();
                return NonNull::from(text.into_bump_str());
            }
        }

        let mut measure = Measure(0);
        // A `Display` implementation that fails is a bug in that
        // implementation; whatever was written so far is kept.
        let _ = fmt::write(&mut measure, args);
        let mut text = ArenaString::with_capacity_in(measure.0, &self.arena);
        let _ = fmt::write(&mut text, args);
        NonNull::from(text.into_bump_str())
    }
}

impl Drop for ErratumData {
    fn drop(&mut self) {
        if !self.notes.is_empty() {
            (self.abandon)(RawErratumRef::from_data(self));
        }
    }
}

/// Writer that refuses to grow its buffer beyond `limit` bytes.
struct BoundedWriter<'a, 'bump> {
    /// Destination, allocated with a capacity of `limit`
    buffer: &'a mut ArenaString<'bump>,
    /// Maximum number of bytes to write
    limit: usize,
}

impl fmt::Write for BoundedWriter<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.buffer.len() + s.len() > self.limit {
            return Err(fmt::Error);
        }
        self.buffer.push_str(s);
        Ok(())
    }
}

/// Writer that only counts the bytes written to it.
struct Measure(usize);

impl fmt::Write for Measure {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String};

    use super::*;
    use crate::handlers::Discard;

    fn texts(data: &ErratumData) -> alloc::vec::Vec<&str> {
        data.notes().iter().map(RawAnnotation::text).collect()
    }

    #[test]
    fn test_push_updates_severity() {
        let mut data = ErratumData::new::<Discard>();
        assert_eq!(data.severity(), Severity::DEFAULT);

        data.push_literal(Severity::Info, "start");
        data.push_localized(Severity::Error, "broken");
        data.push_literal(Severity::Warn, "retrying");

        assert_eq!(data.severity(), Severity::Error);
        assert_eq!(texts(&data), ["start", "broken", "retrying"]);
        data.clear();
    }

    #[test]
    fn test_render_fits_in_remnant() {
        let mut data = ErratumData::new::<Discard>();
        data.push_localized(Severity::Diag, "warm up the arena");
        let remnant = data.remnant();
        assert!(remnant > 0);

        let attempt = 3;
        data.push_rendered(Severity::Warn, format_args!("retrying {attempt}"));
        assert_eq!(texts(&data)[1], "retrying 3");
        assert!(!data.notes()[1].is_literal());
        assert!(data.remnant() < remnant);
        data.clear();
    }

    #[test]
    fn test_render_larger_than_remnant() {
        let mut data = ErratumData::new::<Discard>();
        let long: String = core::iter::repeat_n('x', 64 * 1024).collect();
        let suffix = 7;
        data.push_rendered(Severity::Error, format_args!("{long}|{suffix}"));

        let text = texts(&data)[0];
        assert_eq!(text.len(), long.len() + 2);
        assert!(text.ends_with("|7"));
        data.clear();
    }

    #[test]
    fn test_fork_rehomes_text() {
        let mut data = ErratumData::new::<Discard>();
        data.push_localized(Severity::Info, &format!("value = {}", 12));
        data.push_literal(Severity::Warn, "literal");

        let mut fork = data.fork();
        data.clear();

        assert_eq!(texts(&fork), ["value = 12", "literal"]);
        assert!(!fork.notes()[0].is_literal());
        assert!(fork.notes()[1].is_literal());
        assert_eq!(fork.severity(), Severity::Warn);
        fork.clear();
    }

    #[test]
    fn test_append_nests_and_keeps_order() {
        let mut receiver = ErratumData::new::<Discard>();
        receiver.push_literal(Severity::Info, "outer");

        let mut donor = ErratumData::new::<Discard>();
        donor.push_localized(Severity::Diag, "first");
        donor.push_localized(Severity::Error, "second");

        receiver.append(&donor);
        donor.clear();

        assert_eq!(texts(&receiver), ["outer", "first", "second"]);
        let levels: alloc::vec::Vec<u32> = receiver.notes().iter().map(|n| n.level()).collect();
        assert_eq!(levels, [0, 1, 1]);
        assert_eq!(receiver.severity(), Severity::Error);
        receiver.clear();
    }

    #[test]
    fn test_append_below_receiver_level() {
        let mut receiver = ErratumData::new::<Discard>();
        receiver.set_level(2);
        receiver.push_literal(Severity::Info, "deep");

        let mut donor = ErratumData::new::<Discard>();
        donor.push_literal(Severity::Warn, "top of donor");
        donor.nest();
        donor.push_literal(Severity::Diag, "nested in donor");

        receiver.append(&donor);
        let levels: alloc::vec::Vec<u32> = receiver.notes().iter().map(|n| n.level()).collect();
        assert_eq!(levels, [2, 4, 4]);
        assert_eq!(receiver.level(), 2);
        donor.clear();
        receiver.clear();
    }

    #[test]
    fn test_fork_to_other_handler() {
        let mut data = ErratumData::new::<Discard>();
        data.push_localized(Severity::Error, "copied");
        let mut fork = data.fork_to::<Discard>();
        data.clear();
        assert_eq!(texts(&fork), ["copied"]);
        fork.clear();
    }
}
