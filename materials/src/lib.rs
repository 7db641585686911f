//! Materials

mod matte;
mod mirror;

// Re-export.
pub use matte::*;
pub use mirror::*;
