use core::fmt;

use crate::{Erratum, NoteText, Rv, Severity};

mod sealed {
    pub trait Sealed {}

    impl<T, E> Sealed for Result<T, E> {}
}

/// Extension methods for turning a [`Result`] into an [`Rv`].
///
/// On success, the value is kept and the erratum is empty. On failure, the
/// error is turned into a single annotation and the result is
/// default-constructed.
///
/// A `Result<T, Erratum>` converts into `Rv<T>` with [`From`] instead, which
/// keeps the erratum as it is.
///
/// # Examples
///
/// ```
/// use errata::{Rv, Severity, prelude::*};
///
/// fn port(text: &str) -> Rv<u16> {
///     text.parse::<u16>().into_rv()
/// }
///
/// let mut rv = port("http");
/// assert_eq!(*rv, 0);
/// assert_eq!(rv.severity(), Severity::Error);
/// assert_eq!(rv.errata().to_string(), "Error: invalid digit found in string");
/// rv.clear();
///
/// let rv = "70000"
///     .parse::<u16>()
///     .into_rv_with(Severity::Warn, |error| format!("port out of range: {error}"));
/// assert!(rv.is_failure());
/// # let (_, mut errata) = rv.into_parts();
/// # errata.clear();
/// ```
pub trait ResultExt<T, E>: sealed::Sealed {
    /// Converts the error into an annotation with [`Severity::Error`] using
    /// its [`Display`](fmt::Display) implementation.
    fn into_rv(self) -> Rv<T>
    where
        T: Default,
        E: fmt::Display;

    /// Converts the error into an annotation with the given severity, using
    /// the text returned by `f`.
    fn into_rv_with<F, N>(self, severity: Severity, f: F) -> Rv<T>
    where
        T: Default,
        F: FnOnce(E) -> N,
        N: NoteText;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn into_rv(self) -> Rv<T>
    where
        T: Default,
        E: fmt::Display,
    {
        match self {
            Ok(value) => Rv::new(value),
            Err(error) => {
                let errata = Erratum::new().with_error(format_args!("{error}"));
                Rv::from(errata)
            }
        }
    }

    fn into_rv_with<F, N>(self, severity: Severity, f: F) -> Rv<T>
    where
        T: Default,
        F: FnOnce(E) -> N,
        N: NoteText,
    {
        match self {
            Ok(value) => Rv::new(value),
            Err(error) => Rv::from(Erratum::new().with_note(severity, f(error))),
        }
    }
}
