//! Integrator

use crate::scene::Scene;

/// Integrator interface.
pub trait Integrator {
    /// Preprocess the scene.
    ///
    /// * `scene` - The scene.
    fn preprocess(&mut self, _scene: &Scene) {}

    /// Render the scene.
    ///
    /// * `scene` - The scene.
    fn render(&mut self, scene: &Scene);
}
