#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Cheap, stackable diagnostic annotations that travel up the call stack.
//!
//! ## Overview
//!
//! An [`Erratum`] is a handle to a stack of severity-tagged text messages,
//! called *annotations*. It is meant to be returned alongside (or instead of)
//! a regular value: functions push annotations as things go wrong, callers
//! inspect the aggregate [`Severity`] to decide whether the call failed, and
//! anything nobody looked at is not lost.
//!
//! The empty erratum is a single null pointer. Creating, returning, cloning
//! and dropping one on the success path never allocates. The first
//! annotation allocates a shared data block; every later annotation is
//! appended to it, with the text copied into an arena owned by that block.
//!
//! ```
//! use errata::{Erratum, Severity};
//!
//! fn connect(attempts: u32) -> Erratum {
//!     let mut erratum = Erratum::new();
//!     erratum.info("start");
//!     if attempts > 1 {
//!         erratum.warn(format_args!("retrying {}", attempts));
//!     }
//!     erratum
//! }
//!
//! let mut erratum = connect(3);
//! assert_eq!(erratum.len(), 2);
//! assert!(!erratum.is_ok());
//! assert_eq!(erratum.severity(), Severity::Warn);
//! # erratum.clear();
//! ```
//!
//! ## Abandoned errata
//!
//! Handles are reference counted. When the last handle to a block that still
//! holds annotations is dropped, the block is *abandoned*: before it is
//! destroyed, it is passed to every registered [`Sink`] (see the [`sinks`]
//! module), unless a [reporting threshold](sinks::set_reporting_threshold)
//! filters it out. Calling [`Erratum::clear`] acknowledges the annotations
//! and prevents this.
//!
//! ```
//! use errata::{Erratum, sinks};
//!
//! sinks::register_sink_fn(|erratum| {
//!     // Forward to your logger of choice.
//!     eprintln!("{erratum}");
//! });
//!
//! let mut erratum = Erratum::new();
//! erratum.error("disk full");
//! drop(erratum); // every registered sink sees the message
//! ```
//!
//! ## Returning a value with its errata
//!
//! [`Rv`] bundles a result value with an [`Erratum`] and dereferences to the
//! result:
//!
//! ```
//! use errata::{Erratum, Rv};
//!
//! fn parse(input: &str) -> Rv<i32> {
//!     match input.parse() {
//!         Ok(value) => Rv::new(value),
//!         Err(_) => Erratum::new().with_error("not a number").into(),
//!     }
//! }
//!
//! let mut rv = parse("forty-two");
//! assert_eq!(*rv, 0);
//! assert!(!rv.is_ok());
//! rv.clear();
//! ```
//!
//! For implementation details, see the [`errata-internals`] crate.
//!
//! [`errata-internals`]: errata_internals
//!
//! ## Ecosystem
//!
//! - **[`errata-tracing`]** - A sink that forwards abandoned errata as
//!   `tracing` events.
//!
//! [`errata-tracing`]: https://docs.rs/errata-tracing

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod macros;

pub mod compat;
pub mod prelude;
pub mod sinks;

mod annotation;
mod erratum;
mod format;
mod note_text;
mod result_ext;
mod rv;

pub use errata_internals::severity::{ParseSeverityError, Severity};

pub use self::{
    annotation::Annotation,
    erratum::{iter::Annotations, owned::Erratum, ref_::ErratumRef},
    format::{DEFAULT_GLUE, ErratumDisplay},
    note_text::NoteText,
    result_ext::ResultExt,
    rv::{Rv, make_rv},
    sinks::Sink,
};

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    pub use core::format_args;
}
