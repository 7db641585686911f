//! 2-D Points

use super::Vector2;
use crate::pbrt::{Float, Int};
use num_traits::{Num, Zero};
use std::ops::{Add, AddAssign, Div, Index, Mul, Sub};

/// A 2-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,
}

/// 2-D point containing `Float` values.
pub type Point2f = Point2<Float>;

/// 2-D point containing `Int` values.
pub type Point2i = Point2<Int>;

impl Point2f {
    /// Origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Returns a point with coordinates rounded down to integers.
    pub fn floor(&self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Returns a point with coordinates rounded up to integers.
    pub fn ceil(&self) -> Self {
        Self::new(self.x.ceil(), self.y.ceil())
    }
}

impl<T: Num> Point2<T> {
    /// Creates a new 2-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Creates a new 2-D point at origin.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero())
    }
}

impl<T: Num> Add<Vector2<T>> for Point2<T> {
    type Output = Self;

    /// Offset the point by the given vector.
    ///
    /// * `v` - The vector offset.
    fn add(self, v: Vector2<T>) -> Self::Output {
        Self::Output::new(self.x + v.x, self.y + v.y)
    }
}

impl<T: Num> Add<Point2<T>> for Point2<T> {
    type Output = Self;

    /// Adds the coordinates of another point (useful for weighted sums).
    ///
    /// * `p` - The other point.
    fn add(self, p: Point2<T>) -> Self::Output {
        Self::Output::new(self.x + p.x, self.y + p.y)
    }
}

impl<T: Num + Copy> AddAssign<Vector2<T>> for Point2<T> {
    /// Offset the point by the given vector.
    ///
    /// * `v` - The vector offset.
    fn add_assign(&mut self, v: Vector2<T>) {
        *self = Self::new(self.x + v.x, self.y + v.y);
    }
}

impl<T: Num> Sub<Point2<T>> for Point2<T> {
    type Output = Vector2<T>;

    /// Returns the vector between this point and another.
    ///
    /// * `p` - The other point.
    fn sub(self, p: Point2<T>) -> Self::Output {
        Self::Output::new(self.x - p.x, self.y - p.y)
    }
}

impl<T: Num> Sub<Vector2<T>> for Point2<T> {
    type Output = Self;

    /// Offset the point backwards by the given vector.
    ///
    /// * `v` - The vector offset.
    fn sub(self, v: Vector2<T>) -> Self::Output {
        Self::Output::new(self.x - v.x, self.y - v.y)
    }
}

impl<T: Num + Copy> Mul<T> for Point2<T> {
    type Output = Point2<T>;

    /// Scale the point.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::Output::new(f * self.x, f * self.y)
    }
}

impl<T: Num + Copy> Div<T> for Point2<T> {
    type Output = Self;

    /// Scale the point by 1/f.
    ///
    /// * `f` - The scaling factor.
    fn div(self, f: T) -> Self::Output {
        debug_assert!(!f.is_zero());

        let inv = T::one() / f;
        Self::Output::new(inv * self.x, inv * self.y)
    }
}

impl<T: Copy> Index<usize> for Point2<T> {
    type Output = T;

    /// Index the point to get the immutable coordinate value.
    ///
    /// * `i` - The index; 0 for x, 1 for y.
    fn index(&self, i: usize) -> &Self::Output {
        match i {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("invalid index {} into Point2", i),
        }
    }
}

impl From<Point2i> for Point2f {
    /// Convert an integer point to a floating point one.
    ///
    /// * `p` - The integer point.
    fn from(p: Point2i) -> Self {
        Self::new(p.x as Float, p.y as Float)
    }
}

impl From<Point2f> for Point2i {
    /// Truncate a floating point point to an integer one.
    ///
    /// * `p` - The floating point point.
    fn from(p: Point2f) -> Self {
        Self::new(p.x as Int, p.y as Int)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Point2<T> {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}
