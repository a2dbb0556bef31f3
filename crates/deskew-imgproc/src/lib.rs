#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// corner ordering for quadrilateral regions.
pub mod corners;

/// homography estimation between quadrilaterals.
pub mod homography;

/// utilities for interpolation.
pub mod interpolation;

/// module containing parallelization utilities.
pub mod parallel;

/// quadrilateral rectification pipeline.
pub mod rectify;

/// image geometric transformations module.
pub mod warp;
