//! Geometric image transformations.
//!
//! Resampling happens through inverse mapping: for every destination pixel the
//! inverse transform locates the source coordinate to sample, so the
//! destination is covered without holes.

mod perspective;

pub use perspective::warp_perspective;
