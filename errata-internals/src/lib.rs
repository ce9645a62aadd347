#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`errata`].
//!
//! # Overview
//!
//! This crate contains the low-level storage that powers the [`errata`]
//! diagnostic library: the reference-counted data block shared by erratum
//! handles, and the arena that backs the text of every annotation.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`errata`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`erratum`]**: The shared data block and the pointer types around it
//!   - [`RawErratum`]: Owning handle with [`Arc`]-based reference counting
//!   - [`RawErratumRef`]/[`RawErratumMut`]: Borrowed references (shared/mutable)
//!   - [`ErratumData`]: The annotation stack, its text arena and the aggregate
//!     severity
//!
//! - **[`annotation`]**: A single severity-tagged message whose text lives in
//!   the arena of the block that owns it
//!
//! - **[`handlers`]**: The [`AbandonHandler`] trait, invoked by a data block
//!   that is destroyed while it still holds annotations
//!
//! - **[`severity`]**: The ordered [`Severity`] levels
//!
//! # Safety Strategy
//!
//! Annotation text is stored as a raw pointer into the [`Bump`] arena owned by
//! the same data block. This crate maintains soundness through:
//!
//! - **Module-based encapsulation**: annotations can only be created by the
//!   data block that owns their arena, and are only handed out by reference,
//!   so no annotation can outlive or change the block it points into
//! - **Unique mutation**: the arena is only touched through a
//!   [`RawErratumMut`], which can only be obtained for a block whose strong
//!   count is `1`
//!
//! [`errata`]: https://docs.rs/errata/latest/errata/
//! [`ErratumData`]: erratum::data::ErratumData
//! [`AbandonHandler`]: handlers::AbandonHandler
//! [`Severity`]: severity::Severity
//! [`Arc`]: triomphe::Arc
//! [`Bump`]: bumpalo::Bump

extern crate alloc;

mod annotation;
mod erratum;
pub mod handlers;
pub mod severity;

pub use annotation::RawAnnotation;
pub use erratum::{RawErratum, RawErratumMut, RawErratumRef};
