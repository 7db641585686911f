//! Filters

mod boxf; // box is a reserved keyword
mod triangle;

// Re-export.
pub use boxf::*;
pub use triangle::*;
