//! Module containing the shared erratum data block and its handle types

pub(crate) mod data;
mod raw;

pub use raw::{RawErratum, RawErratumMut, RawErratumRef};
