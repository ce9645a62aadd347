//! Interoperability with other error handling libraries.
//!
//! # Overview
//!
//! Errata usually stay inside a program and end up either cleared or
//! reported to the registered sinks. At the boundary to code built around
//! [`core::error::Error`], an [`Erratum`] can be handed over instead:
//!
//! - [`ErratumAsError`] wraps an erratum into a type implementing
//!   [`core::error::Error`], and boxed error trait objects can be created
//!   from an erratum directly with [`From`].
//! - [`anyhow1`] converts between errata and [`anyhow::Error`] (requires the
//!   `compat-anyhow1` feature flag).
//!
//! An erratum handed over this way counts as handled: the receiving error
//! value owns it, and it is not reported to the sinks when that value is
//! dropped.
//!
//! [`anyhow::Error`]: https://docs.rs/anyhow/latest/anyhow/struct.Error.html

use alloc::boxed::Box;
use core::fmt;

use crate::Erratum;

/// A trait for converting errors of other libraries into errata.
///
/// Implemented by the compatibility modules, for the error types themselves
/// and for results carrying them.
///
/// # Examples
///
/// ```
/// use errata::{Erratum, prelude::*};
///
/// # #[cfg(feature = "compat-anyhow1")] {
/// fn legacy() -> anyhow::Result<u32> {
///     anyhow::bail!("legacy service unavailable");
/// }
///
/// let mut erratum: Erratum = legacy().into_erratum().unwrap_err();
/// assert_eq!(erratum.to_string(), "Error: legacy service unavailable");
/// erratum.clear();
/// # }
/// ```
pub trait IntoErratum {
    /// The type produced by the conversion.
    ///
    /// For error types this is [`Erratum`]; for `Result` types it is
    /// `Result<T, Erratum>`.
    type Output;

    /// Converts this value into an erratum, or a result carrying one.
    fn into_erratum(self) -> Self::Output;
}

#[cfg(feature = "compat-anyhow1")]
#[cfg_attr(docsrs, doc(cfg(feature = "compat-anyhow1")))]
pub mod anyhow1;

/// An [`Erratum`] that implements [`core::error::Error`].
///
/// The error message is the rendered erratum, newest annotation first. The
/// wrapped erratum is considered handled: dropping the wrapper does not
/// report it to the sinks. Use [`ErratumAsError::into_inner`] to take it back
/// out.
///
/// # Examples
///
/// ```
/// use errata::{Erratum, compat::ErratumAsError};
///
/// fn load() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
///     Err(Erratum::new().with_error("config missing").into())
/// }
///
/// let error = load().unwrap_err();
/// assert_eq!(error.to_string(), "Error: config missing");
/// assert!(error.downcast_ref::<ErratumAsError>().is_some());
/// ```
#[derive(Clone)]
pub struct ErratumAsError(Erratum);

impl ErratumAsError {
    /// Wraps an erratum.
    #[inline]
    pub fn new(erratum: Erratum) -> Self {
        Self(erratum)
    }

    /// Returns a reference to the wrapped erratum.
    #[inline]
    pub fn erratum(&self) -> &Erratum {
        &self.0
    }

    /// Takes the erratum back out of the wrapper.
    ///
    /// The returned erratum is reported again if it is abandoned.
    #[inline]
    pub fn into_inner(mut self) -> Erratum {
        core::mem::take(&mut self.0)
    }
}

impl Drop for ErratumAsError {
    fn drop(&mut self) {
        self.0.clear();
    }
}

impl fmt::Debug for ErratumAsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErratumAsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl core::error::Error for ErratumAsError {}

impl From<Erratum> for ErratumAsError {
    #[inline]
    fn from(erratum: Erratum) -> Self {
        Self::new(erratum)
    }
}

impl From<Erratum> for Box<dyn core::error::Error + Send + Sync> {
    #[inline]
    fn from(erratum: Erratum) -> Self {
        Box::new(ErratumAsError::new(erratum))
    }
}

impl From<Erratum> for Box<dyn core::error::Error> {
    #[inline]
    fn from(erratum: Erratum) -> Self {
        Box::new(ErratumAsError::new(erratum))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    static_assertions::assert_impl_all!(ErratumAsError: core::error::Error, Send, Sync, Clone);

    #[test]
    fn test_into_inner_keeps_annotations() {
        let wrapped = ErratumAsError::from(Erratum::new().with_warn("kept"));
        assert_eq!(wrapped.to_string(), "Warn: kept");

        let mut erratum = wrapped.into_inner();
        assert_eq!(erratum.len(), 1);
        erratum.clear();
    }

    #[test]
    fn test_boxed_error() {
        let error: Box<dyn core::error::Error + Send + Sync> =
            Erratum::new().with_error("boxed").into();
        assert_eq!(error.to_string(), "Error: boxed");
        assert!(error.source().is_none());
    }
}
