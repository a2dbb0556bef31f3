#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the io module.
pub mod error;

/// JPEG image encoding and decoding for in-memory buffers.
pub mod jpeg;

pub use crate::error::IoError;
