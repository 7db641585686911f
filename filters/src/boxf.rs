//! Box Filter

use strata_core::filter::*;
use strata_core::geometry::*;
use strata_core::paramset::*;
use strata_core::pbrt::*;

/// Implements the box filter which equally weights all samples within a
/// square region of the image.
pub struct BoxFilter {
    /// The common filter data.
    pub data: FilterData,
}

impl BoxFilter {
    /// Create a new `BoxFilter`.
    ///
    /// * `radius` - The filter's radius of support in x and y.
    pub fn new(radius: Vector2f) -> Self {
        Self {
            data: FilterData::new(radius),
        }
    }
}

impl Filter for BoxFilter {
    /// Returns the filter data.
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    /// Returns the filter's value at a sample position relative to the filter
    /// center.
    ///
    /// * `p` - The sample position relative to the filter center.
    fn evaluate(&self, _p: &Point2f) -> Float {
        1.0
    }
}

impl From<&ParamSet> for BoxFilter {
    /// Create a `BoxFilter` from given parameter set.
    ///
    /// * `params` - The parameter set.
    fn from(params: &ParamSet) -> Self {
        let xw = params.find_one_float("xwidth", 0.5);
        let yw = params.find_one_float("ywidth", 0.5);
        Self::new(Vector2f::new(xw, yw))
    }
}
