//! Media

mod homogeneous;

// Re-export.
pub use homogeneous::*;
