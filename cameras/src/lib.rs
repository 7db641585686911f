//! Cameras

#[macro_use]
extern crate log;

mod perspective_camera;

// Re-export
pub use perspective_camera::*;
