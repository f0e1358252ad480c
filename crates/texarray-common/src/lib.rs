//! Common utilities for texarray.
//!
//! This crate provides the binary plumbing shared by the texarray crates:
//!
//! - [`BinaryReader`] - Zero-copy, bounds-checked reading from byte slices
//! - [`BinaryWriter`] - Little-endian serialization into a growable buffer

mod error;
mod reader;
mod writer;

pub use error::{Error, Result};
pub use reader::BinaryReader;
pub use writer::BinaryWriter;

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
