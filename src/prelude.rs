//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```
//! use errata::prelude::*;
//!
//! fn half(value: u32) -> Rv<u32> {
//!     let mut rv = Rv::new(value / 2);
//!     if value % 2 == 1 {
//!         note!(rv, Severity::Info, "{value} is odd, rounded down");
//!     }
//!     rv
//! }
//!
//! let rv = half(7);
//! assert_eq!(*rv, 3);
//! assert!(rv.is_ok());
//! ```
//!
//! # What's Included
//!
//! - **[`Erratum`]**, **[`ErratumRef`]** and **[`Severity`]**: the annotation
//!   stack and its levels
//! - **[`Rv`]**: a result value travelling with an erratum
//! - **[`ResultExt`]**: turning a `Result` into an [`Rv`]
//! - **[`IntoErratum`]**: turning errors of other libraries into errata
//! - **[`note!`]** and **[`erratum!`]**: formatting macros
//! - **[`sinks`]**: registration of sinks for abandoned errata

pub use crate::{
    Erratum, ErratumRef, ResultExt, Rv, Severity, compat::IntoErratum, erratum, note, sinks,
};
