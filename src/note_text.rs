use alloc::{borrow::Cow, boxed::Box, string::String};
use core::fmt;

use errata_internals::RawErratumMut;

use crate::Severity;

mod sealed {
    pub trait Sealed {}

    impl Sealed for &str {}
    impl Sealed for &alloc::string::String {}
    impl Sealed for alloc::string::String {}
    impl Sealed for alloc::boxed::Box<str> {}
    impl Sealed for alloc::borrow::Cow<'_, str> {}
    impl Sealed for core::fmt::Arguments<'_> {}
}

/// Text that can be stored as an annotation.
///
/// This is implemented for string slices, owned strings and the
/// [`fmt::Arguments`] produced by [`format_args!`]. Every text is copied into
/// the arena of the erratum it is added to, with one exception: arguments
/// that consist of a single literal and no placeholders, like
/// `format_args!("cache miss")`, are stored by reference without copying.
///
/// The trait is sealed; it cannot be implemented outside this crate.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
///
/// use errata::Erratum;
///
/// let path = String::from("/etc/hosts");
/// let mut erratum = Erratum::new();
/// erratum
///     .info("plain slice")
///     .info(&path)
///     .info(Cow::Borrowed("borrowed"))
///     .info(format_args!("opening {path}"));
/// erratum.info(path);
/// assert_eq!(erratum.len(), 5);
/// ```
pub trait NoteText: sealed::Sealed {
    #[doc(hidden)]
    fn push_into(self, severity: Severity, erratum: RawErratumMut<'_>);
}

impl NoteText for &str {
    #[inline]
    fn push_into(self, severity: Severity, mut erratum: RawErratumMut<'_>) {
        erratum.push_str(severity, self);
    }
}

impl NoteText for &String {
    #[inline]
    fn push_into(self, severity: Severity, mut erratum: RawErratumMut<'_>) {
        erratum.push_str(severity, self);
    }
}

impl NoteText for String {
    #[inline]
    fn push_into(self, severity: Severity, mut erratum: RawErratumMut<'_>) {
        erratum.push_str(severity, &self);
    }
}

impl NoteText for Box<str> {
    #[inline]
    fn push_into(self, severity: Severity, mut erratum: RawErratumMut<'_>) {
        erratum.push_str(severity, &self);
    }
}

impl NoteText for Cow<'_, str> {
    #[inline]
    fn push_into(self, severity: Severity, mut erratum: RawErratumMut<'_>) {
        erratum.push_str(severity, &self);
    }
}

impl NoteText for fmt::Arguments<'_> {
    #[inline]
    fn push_into(self, severity: Severity, mut erratum: RawErratumMut<'_>) {
        erratum.push_fmt(severity, self);
    }
}
