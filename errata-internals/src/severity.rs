//! Ordered severity levels for annotations.

use core::{fmt, str::FromStr};

/// Severity of a single annotation, and the aggregate severity of an erratum.
///
/// Severities are totally ordered: `Diag < Info < Warn < Error`. An erratum
/// whose aggregate severity is at or above [`Severity::FAILURE`] represents a
/// failure.
///
/// # Examples
///
/// ```
/// use errata_internals::severity::Severity;
///
/// assert!(Severity::Diag < Severity::Error);
/// assert!(Severity::Warn.is_failure());
/// assert!(!Severity::Info.is_failure());
/// assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warn));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Severity {
    /// Diagnostic, for internal use.
    #[default]
    Diag = 0,
    /// User visible but not a problem.
    Info = 1,
    /// Warning.
    Warn = 2,
    /// Error.
    Error = 3,
}

impl Severity {
    /// Severity used when none is specified.
    pub const DEFAULT: Self = Self::Diag;

    /// Severity at and above which an erratum is a failure.
    pub const FAILURE: Self = Self::Warn;

    /// All severities, in ascending order.
    pub const ALL: [Self; 4] = [Self::Diag, Self::Info, Self::Warn, Self::Error];

    /// Returns `true` if this severity is at or above [`Severity::FAILURE`].
    #[inline]
    pub const fn is_failure(self) -> bool {
        self as u8 >= Self::FAILURE as u8
    }

    /// The short name of this severity.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Diag => "Diag",
            Self::Info => "Info",
            Self::Warn => "Warn",
            Self::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when parsing a [`Severity`] from an unknown name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseSeverityError;

impl fmt::Display for ParseSeverityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown severity name")
    }
}

impl core::error::Error for ParseSeverityError {}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("diag") || s.eq_ignore_ascii_case("debug") {
            Ok(Self::Diag)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(Self::Info)
        } else if s.eq_ignore_ascii_case("warn") || s.eq_ignore_ascii_case("warning") {
            Ok(Self::Warn)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(Self::Error)
        } else {
            Err(ParseSeverityError)
        }
    }
}

impl TryFrom<u8> for Severity {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(Self::Diag),
            1 => Ok(Self::Info),
            2 => Ok(Self::Warn),
            3 => Ok(Self::Error),
            other => Err(other),
        }
    }
}

impl From<Severity> for u8 {
    fn from(severity: Severity) -> Self {
        severity as u8
    }
}
