//! Parameter Sets

#![allow(dead_code)]

use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::collections::HashMap;

/// Stores typed, named parameter values used to configure renderer
/// components.
#[derive(Clone, Default)]
pub struct ParamSet {
    /// Boolean parameters.
    bools: HashMap<String, Vec<bool>>,

    /// Integer parameters.
    ints: HashMap<String, Vec<Int>>,

    /// Floating point parameters.
    floats: HashMap<String, Vec<Float>>,

    /// String parameters.
    strings: HashMap<String, Vec<String>>,

    /// Point parameters.
    point3fs: HashMap<String, Vec<Point3f>>,

    /// Spectrum parameters.
    spectra: HashMap<String, Vec<Spectrum>>,
}

impl ParamSet {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a boolean parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_bool(&mut self, name: &str, values: Vec<bool>) {
        self.bools.insert(String::from(name), values);
    }

    /// Add an integer parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_int(&mut self, name: &str, values: Vec<Int>) {
        self.ints.insert(String::from(name), values);
    }

    /// Add a floating point parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_float(&mut self, name: &str, values: Vec<Float>) {
        self.floats.insert(String::from(name), values);
    }

    /// Add a string parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_string(&mut self, name: &str, values: Vec<String>) {
        self.strings.insert(String::from(name), values);
    }

    /// Add a point parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_point3f(&mut self, name: &str, values: Vec<Point3f>) {
        self.point3fs.insert(String::from(name), values);
    }

    /// Add a spectrum parameter.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - Parameter values.
    pub fn add_spectrum(&mut self, name: &str, values: Vec<Spectrum>) {
        self.spectra.insert(String::from(name), values);
    }

    /// Return the first value of a boolean parameter or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_bool(&self, name: &str, default: bool) -> bool {
        self.bools.get(name).and_then(|v| v.first().copied()).unwrap_or(default)
    }

    /// Return the first value of an integer parameter or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_int(&self, name: &str, default: Int) -> Int {
        self.ints.get(name).and_then(|v| v.first().copied()).unwrap_or(default)
    }

    /// Return the first value of a floating point parameter or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_float(&self, name: &str, default: Float) -> Float {
        self.floats.get(name).and_then(|v| v.first().copied()).unwrap_or(default)
    }

    /// Return the first value of a string parameter or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_string(&self, name: &str, default: String) -> String {
        self.strings.get(name).and_then(|v| v.first().cloned()).unwrap_or(default)
    }

    /// Return the first value of a point parameter or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_point3f(&self, name: &str, default: Point3f) -> Point3f {
        self.point3fs.get(name).and_then(|v| v.first().copied()).unwrap_or(default)
    }

    /// Return the first value of a spectrum parameter or a default.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_spectrum(&self, name: &str, default: Spectrum) -> Spectrum {
        self.spectra.get(name).and_then(|v| v.first().copied()).unwrap_or(default)
    }

    /// Return all values of an integer parameter. Missing parameters yield an
    /// empty slice.
    ///
    /// * `name` - Parameter name.
    pub fn find_int(&self, name: &str) -> &[Int] {
        self.ints.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Return all values of a floating point parameter. Missing parameters
    /// yield an empty slice.
    ///
    /// * `name` - Parameter name.
    pub fn find_float(&self, name: &str) -> &[Float] {
        self.floats.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_falls_back_to_default() {
        let mut params = ParamSet::new();
        params.add_int("maxdepth", vec![7]);
        assert_eq!(params.find_one_int("maxdepth", 5), 7);
        assert_eq!(params.find_one_int("missing", 5), 5);
        assert_eq!(params.find_one_string("strategy", String::from("power")), "power");
    }

    #[test]
    fn vector_lookup() {
        let mut params = ParamSet::new();
        params.add_int("pixelbounds", vec![0, 8, 0, 8]);
        assert_eq!(params.find_int("pixelbounds"), &[0, 8, 0, 8]);
        assert!(params.find_int("other").is_empty());
    }
}
