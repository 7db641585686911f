//! 3-D Points

use super::Vector3;
use crate::pbrt::{Float, Int};
use num_traits::{Num, Zero};
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, Sub};

/// A 3-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,

    /// Z-coordinate.
    pub z: T,
}

/// 3-D point containing `Float` values.
pub type Point3f = Point3<Float>;

/// 3-D point containing `Int` values.
pub type Point3i = Point3<Int>;

impl Point3f {
    /// Origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
}

impl<T: Num> Point3<T> {
    /// Creates a new 3-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    /// Creates a new 3-D point at origin.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero(), T::zero())
    }

    /// Returns the square of the distance to another point.
    ///
    /// * `p` - The other point.
    pub fn distance_squared(self, p: Self) -> T
    where
        T: Mul<Output = T> + Add<Output = T> + Sub<Output = T> + Copy,
    {
        (self - p).length_squared()
    }

    /// Returns the distance to another point.
    ///
    /// * `p` - The other point.
    pub fn distance(self, p: Self) -> T
    where
        T: num_traits::Float,
    {
        (self - p).length()
    }

    /// Returns true if any coordinate is NaN.
    pub fn has_nans(&self) -> bool
    where
        T: num_traits::Float,
    {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
}

impl<T: Num> Add<Vector3<T>> for Point3<T> {
    type Output = Self;

    /// Offset the point by the given vector.
    ///
    /// * `v` - The vector offset.
    fn add(self, v: Vector3<T>) -> Self::Output {
        Self::Output::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl<T: Num + Copy> AddAssign<Vector3<T>> for Point3<T> {
    /// Offset the point by the given vector.
    ///
    /// * `v` - The vector offset.
    fn add_assign(&mut self, v: Vector3<T>) {
        *self = Self::new(self.x + v.x, self.y + v.y, self.z + v.z);
    }
}

impl<T: Num> Sub<Point3<T>> for Point3<T> {
    type Output = Vector3<T>;

    /// Returns the vector between this point and another.
    ///
    /// * `p` - The other point.
    fn sub(self, p: Point3<T>) -> Self::Output {
        Self::Output::new(self.x - p.x, self.y - p.y, self.z - p.z)
    }
}

impl<T: Num> Sub<Vector3<T>> for Point3<T> {
    type Output = Self;

    /// Offset the point backwards by the given vector.
    ///
    /// * `v` - The vector offset.
    fn sub(self, v: Vector3<T>) -> Self::Output {
        Self::Output::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl<T: Num + Copy> Mul<T> for Point3<T> {
    type Output = Point3<T>;

    /// Scale the point.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::Output::new(f * self.x, f * self.y, f * self.z)
    }
}

impl<T: Num + Copy> Div<T> for Point3<T> {
    type Output = Self;

    /// Scale the point by 1/f.
    ///
    /// * `f` - The scaling factor.
    fn div(self, f: T) -> Self::Output {
        debug_assert!(!f.is_zero());

        let inv = T::one() / f;
        Self::Output::new(inv * self.x, inv * self.y, inv * self.z)
    }
}

impl<T: Num + Copy> DivAssign<T> for Point3<T> {
    /// Scale the point by 1/f and assign the result.
    ///
    /// * `f` - The scaling factor.
    fn div_assign(&mut self, f: T) {
        debug_assert!(!f.is_zero());

        let inv = T::one() / f;
        *self = Self::new(inv * self.x, inv * self.y, inv * self.z);
    }
}

macro_rules! premul {
    ($t: ty) => {
        impl Mul<Point3<$t>> for $t {
            type Output = Point3<$t>;
            /// Scale the point.
            ///
            /// * `p` - The point.
            fn mul(self, p: Point3<$t>) -> Point3<$t> {
                Point3::<$t>::new(self * p.x, self * p.y, self * p.z)
            }
        }
    };
}

premul!(f32);
premul!(i32);

impl<T: Copy> Index<usize> for Point3<T> {
    type Output = T;

    /// Index the point to get the immutable coordinate value.
    ///
    /// * `i` - The index; 0 for x, 1 for y, 2 for z.
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("invalid index {} into Point3", i),
        }
    }
}

impl<T: Copy> std::ops::IndexMut<usize> for Point3<T> {
    /// Index the point to get a mutable coordinate value.
    ///
    /// * `i` - The index; 0 for x, 1 for y, 2 for z.
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        match i {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("invalid index {} into Point3", i),
        }
    }
}

impl<T> From<Vector3<T>> for Point3<T> {
    /// Convert a 3-D vector to a 3-D point.
    ///
    /// * `v` - 3-D vector.
    fn from(v: Vector3<T>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Point3<T> {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point3_f32() -> impl Strategy<Value = Point3f> {
        (-100.0..100.0f32, -100.0..100.0f32, -100.0..100.0f32).prop_map(|(x, y, z)| Point3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn distance_squared_f32(p1 in point3_f32(), p2 in point3_f32()) {
            let d = p1 - p2;
            prop_assert_eq!(p1.distance_squared(p2), d.length_squared());
        }

        #[test]
        fn add_vector_f32(p in point3_f32(), q in point3_f32()) {
            let v = q - p;
            let r = p + v;
            prop_assert!((r.x - q.x).abs() < 1e-3);
            prop_assert!((r.y - q.y).abs() < 1e-3);
            prop_assert!((r.z - q.z).abs() < 1e-3);
        }
    }
}
