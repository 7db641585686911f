//! Filter

use crate::geometry::*;
use crate::pbrt::*;
use std::sync::Arc;

/// Common filter parameters.
pub struct FilterData {
    /// The filter's radius of support in x and y. The overall extent in each
    /// direction is twice the radius.
    pub radius: Vector2f,

    /// Reciprocal of the filter's radius.
    pub inv_radius: Vector2f,
}

impl FilterData {
    /// Create a new `FilterData`.
    ///
    /// * `radius` - The filter's radius of support in x and y.
    pub fn new(radius: Vector2f) -> Self {
        Self {
            radius,
            inv_radius: Vector2f::new(1.0 / radius.x, 1.0 / radius.y),
        }
    }
}

/// Filter interface for image reconstruction.
pub trait Filter {
    /// Returns the filter data.
    fn get_data(&self) -> &FilterData;

    /// Returns the filter's value at a sample position relative to the filter
    /// center. Samples outside the radius of support are never passed in.
    ///
    /// * `p` - The sample position relative to the filter center.
    fn evaluate(&self, p: &Point2f) -> Float;
}

/// Atomic reference counted `Filter`.
pub type ArcFilter = Arc<dyn Filter + Send + Sync>;
