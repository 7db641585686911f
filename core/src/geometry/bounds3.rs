//! 3-D Bounding Boxes

use super::{Point3, Point3f, Vector3};
use crate::pbrt::{max, min, Float};
use num_traits::Num;

/// A 3-D axis aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3<T> {
    /// Minimum bound.
    pub p_min: Point3<T>,

    /// Maximum bound.
    pub p_max: Point3<T>,
}

/// 3-D bounding box containing `Float` points.
pub type Bounds3f = Bounds3<Float>;

impl Bounds3f {
    /// An empty box where any union operation would update the bounds.
    pub const EMPTY: Self = Self {
        p_min: Point3f {
            x: Float::INFINITY,
            y: Float::INFINITY,
            z: Float::INFINITY,
        },
        p_max: Point3f {
            x: -Float::INFINITY,
            y: -Float::INFINITY,
            z: -Float::INFINITY,
        },
    };

    /// Returns the center and radius of a sphere that bounds the bounding box.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        let center = (self.p_min + (self.p_max - Point3f::ZERO)) / 2.0;
        let radius = if self.contains(&center) {
            center.distance(self.p_max)
        } else {
            0.0
        };
        (center, radius)
    }

    /// Linearly interpolates between the corners of the box by the given
    /// amount in each dimension.
    ///
    /// * `t` - The interpolation parameter in x, y and z directions.
    pub fn lerp(&self, t: &Point3f) -> Point3f {
        Point3f::new(
            crate::pbrt::lerp(t.x, self.p_min.x, self.p_max.x),
            crate::pbrt::lerp(t.y, self.p_min.y, self.p_max.y),
            crate::pbrt::lerp(t.z, self.p_min.z, self.p_max.z),
        )
    }

    /// Returns the continuous position of a point relative to the corners of
    /// the box, where a point at the minimum corner has offset (0, 0, 0) and a
    /// point at the maximum corner has offset (1, 1, 1).
    ///
    /// * `p` - The point.
    pub fn offset(&self, p: &Point3f) -> Vector3<Float> {
        let mut o = *p - self.p_min;
        if self.p_max.x > self.p_min.x {
            o.x /= self.p_max.x - self.p_min.x;
        }
        if self.p_max.y > self.p_min.y {
            o.y /= self.p_max.y - self.p_min.y;
        }
        if self.p_max.z > self.p_min.z {
            o.z /= self.p_max.z - self.p_min.z;
        }
        o
    }
}

impl<T: Num + PartialOrd + Copy> Bounds3<T> {
    /// Creates a new 3-D bounding box from 2 points. The minimum and maximum
    /// bounds are computed component-wise.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3<T>, p2: Point3<T>) -> Self {
        Self {
            p_min: Point3::new(min(p1.x, p2.x), min(p1.y, p2.y), min(p1.z, p2.z)),
            p_max: Point3::new(max(p1.x, p2.x), max(p1.y, p2.y), max(p1.z, p2.z)),
        }
    }

    /// Returns a new bounding box containing both bounding boxes.
    ///
    /// * `other` - The other bounding box.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            p_min: Point3::new(
                min(self.p_min.x, other.p_min.x),
                min(self.p_min.y, other.p_min.y),
                min(self.p_min.z, other.p_min.z),
            ),
            p_max: Point3::new(
                max(self.p_max.x, other.p_max.x),
                max(self.p_max.y, other.p_max.y),
                max(self.p_max.z, other.p_max.z),
            ),
        }
    }

    /// Returns a new bounding box that additionally contains a point.
    ///
    /// * `p` - The point.
    pub fn union_point(&self, p: &Point3<T>) -> Self {
        Self {
            p_min: Point3::new(min(self.p_min.x, p.x), min(self.p_min.y, p.y), min(self.p_min.z, p.z)),
            p_max: Point3::new(max(self.p_max.x, p.x), max(self.p_max.y, p.y), max(self.p_max.z, p.z)),
        }
    }

    /// Returns the diagonal vector from the minimum to maximum bound.
    pub fn diagonal(&self) -> Vector3<T> {
        self.p_max - self.p_min
    }

    /// Returns true if the point is inside the bounds, inclusive of all
    /// boundaries.
    ///
    /// * `p` - The point.
    pub fn contains(&self, p: &Point3<T>) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }
}

impl Default for Bounds3f {
    /// Returns the empty box.
    fn default() -> Self {
        Self::EMPTY
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_grows_bounds() {
        let a = Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0));
        let b = Bounds3f::new(Point3f::new(-1.0, 0.5, 0.0), Point3f::new(0.5, 2.0, 3.0));
        let u = a.union(&b);
        assert_eq!(u.p_min, Point3f::new(-1.0, 0.0, 0.0));
        assert_eq!(u.p_max, Point3f::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn bounding_sphere_contains_corners() {
        let b = Bounds3f::new(Point3f::new(-1.0, -1.0, -1.0), Point3f::new(1.0, 1.0, 1.0));
        let (c, r) = b.bounding_sphere();
        assert_eq!(c, Point3f::ZERO);
        assert!((r - (3.0f32).sqrt()).abs() < 1e-5);
    }
}
