//! Conversions between errata and the [`anyhow`] error handling library.
//!
//! # Overview
//!
//! - [`IntoErratum`] turns an [`anyhow::Error`] into an [`Erratum`] holding
//!   one [`Severity::Error`] annotation per element of the error chain, the
//!   outermost context being the newest annotation.
//! - [`IntoAnyhow`] turns an [`Erratum`], an [`Rv`] or a
//!   `Result<T, Erratum>` into its anyhow counterpart. The erratum is wrapped
//!   in an [`ErratumAsError`] and counts as handled.
//!
//! # Examples
//!
//! ```
//! use errata::{Erratum, Rv, compat::anyhow1::IntoAnyhow};
//!
//! fn checked(value: i32) -> Rv<i32> {
//!     let mut rv = Rv::new(value);
//!     if value < 0 {
//!         rv.error("negative input");
//!     }
//!     rv
//! }
//!
//! fn uses_anyhow(value: i32) -> anyhow::Result<i32> {
//!     let value = checked(value).into_anyhow()?;
//!     Ok(value * 2)
//! }
//!
//! assert_eq!(uses_anyhow(4).unwrap(), 8);
//! assert_eq!(uses_anyhow(-4).unwrap_err().to_string(), "Error: negative input");
//! ```
//!
//! [`Severity::Error`]: crate::Severity::Error

use super::IntoErratum;
use crate::{Erratum, Rv, compat::ErratumAsError};

impl IntoErratum for anyhow::Error {
    type Output = Erratum;

    fn into_erratum(self) -> Self::Output {
        let chain: alloc::vec::Vec<&(dyn core::error::Error + 'static)> = self.chain().collect();
        let mut erratum = Erratum::new();
        for cause in chain.into_iter().rev() {
            erratum.error(format_args!("{cause}"));
        }
        erratum
    }
}

impl<T> IntoErratum for anyhow::Result<T> {
    type Output = Result<T, Erratum>;

    #[inline]
    fn into_erratum(self) -> Self::Output {
        self.map_err(IntoErratum::into_erratum)
    }
}

/// A trait for converting errata into [`anyhow::Error`].
///
/// # Examples
///
/// ```
/// use errata::{Erratum, compat::anyhow1::IntoAnyhow};
///
/// let error: anyhow::Error = Erratum::new().with_error("failed").into_anyhow();
/// assert_eq!(error.to_string(), "Error: failed");
///
/// // `From` works as well
/// let error: anyhow::Error = Erratum::new().with_warn("degraded").into();
/// assert_eq!(error.to_string(), "Warn: degraded");
/// ```
pub trait IntoAnyhow {
    /// The type produced by the conversion.
    ///
    /// - For [`Erratum`]: produces [`anyhow::Error`]
    /// - For [`Rv<R>`] and `Result<R, Erratum>`: produces
    ///   [`anyhow::Result<R>`]
    type Output;

    /// Converts this value into an anyhow type.
    ///
    /// An [`Rv`] becomes an error only if its erratum represents a failure;
    /// see [`Rv::into_result`].
    fn into_anyhow(self) -> Self::Output;
}

impl IntoAnyhow for Erratum {
    type Output = anyhow::Error;

    #[inline]
    fn into_anyhow(self) -> Self::Output {
        anyhow::Error::from(self)
    }
}

impl<R> IntoAnyhow for Rv<R> {
    type Output = anyhow::Result<R>;

    #[inline]
    fn into_anyhow(self) -> Self::Output {
        self.into_result().into_anyhow()
    }
}

impl<T> IntoAnyhow for Result<T, Erratum> {
    type Output = anyhow::Result<T>;

    #[inline]
    fn into_anyhow(self) -> Self::Output {
        self.map_err(IntoAnyhow::into_anyhow)
    }
}

impl From<Erratum> for anyhow::Error {
    fn from(erratum: Erratum) -> Self {
        anyhow::Error::new(ErratumAsError::new(erratum))
    }
}
