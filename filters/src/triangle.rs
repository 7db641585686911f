//! Triangle Filter

use strata_core::filter::*;
use strata_core::geometry::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;

/// Implements the triangle filter where the weight falls off linearly from
/// the filter center.
pub struct TriangleFilter {
    /// The common filter data.
    pub data: FilterData,
}

impl TriangleFilter {
    /// Create a new `TriangleFilter`.
    ///
    /// * `radius` - The filter's radius of support in x and y.
    pub fn new(radius: Vector2f) -> Self {
        Self {
            data: FilterData::new(radius),
        }
    }
}

impl Filter for TriangleFilter {
    /// Returns the filter data.
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    /// Returns the filter's value at a sample position relative to the filter
    /// center.
    ///
    /// * `p` - The sample position relative to the filter center.
    fn evaluate(&self, p: &Point2f) -> Float {
        max(0.0, self.data.radius.x - abs(p.x)) * max(0.0, self.data.radius.y - abs(p.y))
    }
}

impl From<&ParamSet> for TriangleFilter {
    /// Create a `TriangleFilter` from given parameter set.
    ///
    /// * `params` - The parameter set.
    fn from(params: &ParamSet) -> Self {
        let xw = params.find_one_float("xwidth", 2.0);
        let yw = params.find_one_float("ywidth", 2.0);
        Self::new(Vector2f::new(xw, yw))
    }
}
