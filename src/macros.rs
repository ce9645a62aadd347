/// Pushes a formatted annotation onto an erratum.
///
/// `note!(target, severity, "format", args...)` is shorthand for
/// `target.note(severity, format_args!("format", args...))`. The target can be
/// anything with a `note` method taking a severity and a [`NoteText`], such
/// as an [`Erratum`], a `&mut Erratum` or an [`Rv`]. The macro evaluates to
/// the `&mut` reference returned by `note`.
///
/// A format string without placeholders is stored by reference, without
/// copying it.
///
/// # Examples
///
/// ```
/// use errata::{Erratum, Rv, Severity, note};
///
/// let mut erratum = Erratum::new();
/// let attempt = 3;
/// note!(erratum, Severity::Warn, "retrying {}", attempt);
/// note!(erratum, Severity::Info, "starting over");
/// assert_eq!(erratum.to_string(), "Info: starting over\nWarn: retrying 3");
///
/// let mut rv = Rv::new(0u8);
/// let input = "0";
/// note!(rv, Severity::Diag, "parsed {input:?}");
/// assert_eq!(rv.errata().len(), 1);
/// # erratum.clear();
/// ```
///
/// [`NoteText`]: crate::NoteText
/// [`Erratum`]: crate::Erratum
/// [`Rv`]: crate::Rv
#[macro_export]
macro_rules! note {
    ($target:expr, $severity:expr, $($arg:tt)+) => {
        $target.note($severity, $crate::__private::format_args!($($arg)+))
    };
}

/// Creates an erratum.
///
/// Without arguments this is [`Erratum::new`]. With a severity and a format
/// string, it creates an erratum holding a single annotation, like
/// `Erratum::new().with_note(severity, format_args!(...))`.
///
/// # Examples
///
/// ```
/// use errata::{Erratum, Severity, erratum};
///
/// fn open(path: &str) -> Erratum {
///     erratum!(Severity::Error, "cannot open {path}")
/// }
///
/// let mut failure = open("/etc/shadow");
/// assert_eq!(failure.to_string(), "Error: cannot open /etc/shadow");
/// failure.clear();
///
/// let empty: Erratum = erratum!();
/// assert!(empty.is_empty());
/// ```
///
/// [`Erratum::new`]: crate::Erratum::new
#[macro_export]
macro_rules! erratum {
    () => {
        $crate::Erratum::new()
    };
    ($severity:expr, $($arg:tt)+) => {
        $crate::Erratum::new().with_note($severity, $crate::__private::format_args!($($arg)+))
    };
}
