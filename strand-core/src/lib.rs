//! Shared primitives, traits, and utilities for the strand sequence toolkit.
//!
//! `strand-core` provides the foundation that the other strand crates build on:
//!
//! - **Error types**: [`StrandError`] and [`Result`] for structured error handling
//! - **Traits**: [`ContentAddressable`], [`Annotated`], [`Summarizable`]
//! - **Hashing**: SHA-256 content addressing for data integrity
//! - **Memory mapping**: Zero-copy file access (std feature only)

pub mod error;
pub mod traits;
pub mod hash;

#[cfg(feature = "std")]
pub mod mmap;

pub use error::{Result, StrandError};
pub use traits::*;
