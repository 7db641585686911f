//! 2-D Bounding Boxes

use super::{Point2, Point2f, Point2i, Vector2};
use crate::pbrt::{max, min, Float, Int};
use num_traits::Num;

/// A 2-D axis aligned bounding box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds2<T> {
    /// Minimum bound.
    pub p_min: Point2<T>,

    /// Maximum bound.
    pub p_max: Point2<T>,
}

/// 2-D bounding box containing `Float` points.
pub type Bounds2f = Bounds2<Float>;

/// 2-D bounding box containing `Int` points.
pub type Bounds2i = Bounds2<Int>;

impl<T: Num + PartialOrd + Copy> Bounds2<T> {
    /// Creates a new 2-D bounding box from 2 points. The minimum and maximum
    /// bounds are computed component-wise.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point2<T>, p2: Point2<T>) -> Self {
        Self {
            p_min: Point2::new(min(p1.x, p2.x), min(p1.y, p2.y)),
            p_max: Point2::new(max(p1.x, p2.x), max(p1.y, p2.y)),
        }
    }

    /// Returns the diagonal vector from the minimum to maximum bound.
    pub fn diagonal(&self) -> Vector2<T> {
        self.p_max - self.p_min
    }

    /// Returns the area enclosed by the bounding box.
    pub fn area(&self) -> T {
        let d = self.diagonal();
        d.x * d.y
    }

    /// Returns the intersection of two bounding boxes.
    ///
    /// * `other` - The other bounding box.
    pub fn intersect(&self, other: &Self) -> Self {
        // Important: assign to p_min/p_max directly and don't run the
        // Bounds2() constructor, which would swap degenerate bounds.
        Self {
            p_min: Point2::new(max(self.p_min.x, other.p_min.x), max(self.p_min.y, other.p_min.y)),
            p_max: Point2::new(min(self.p_max.x, other.p_max.x), min(self.p_max.y, other.p_max.y)),
        }
    }

    /// Returns true if the point is inside the bounds, excluding the upper
    /// boundary.
    ///
    /// * `p` - The point.
    pub fn contains_exclusive(&self, p: &Point2<T>) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }
}

impl From<Bounds2f> for Bounds2i {
    /// Truncate floating point bounds to integer bounds.
    ///
    /// * `b` - The floating point bounds.
    fn from(b: Bounds2f) -> Self {
        Self {
            p_min: Point2i::from(b.p_min),
            p_max: Point2i::from(b.p_max),
        }
    }
}

impl From<Bounds2i> for Bounds2f {
    /// Convert integer bounds to floating point bounds.
    ///
    /// * `b` - The integer bounds.
    fn from(b: Bounds2i) -> Self {
        Self {
            p_min: Point2f::from(b.p_min),
            p_max: Point2f::from(b.p_max),
        }
    }
}

impl IntoIterator for Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2iIterator;

    /// Iterate over integer pixel coordinates in the bounds, row by row,
    /// excluding the upper boundary.
    fn into_iter(self) -> Self::IntoIter {
        Bounds2iIterator {
            bounds: self,
            p: Point2i::new(self.p_min.x - 1, self.p_min.y),
        }
    }
}

/// Iterator over the integer coordinates of a `Bounds2i`.
pub struct Bounds2iIterator {
    /// The bounds being iterated.
    bounds: Bounds2i,

    /// Last point returned.
    p: Point2i,
}

impl Iterator for Bounds2iIterator {
    type Item = Point2i;

    fn next(&mut self) -> Option<Self::Item> {
        self.p.x += 1;
        if self.p.x == self.bounds.p_max.x {
            self.p.x = self.bounds.p_min.x;
            self.p.y += 1;
        }
        if self.p.y >= self.bounds.p_max.y || self.bounds.p_min.x >= self.bounds.p_max.x {
            None
        } else {
            Some(self.p)
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Bounds2<T> {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} - {}]", self.p_min, self.p_max)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_all_pixels_row_major() {
        let b = Bounds2i::new(Point2i::new(0, 0), Point2i::new(3, 2));
        let pixels: Vec<Point2i> = b.into_iter().collect();
        assert_eq!(pixels.len(), 6);
        assert_eq!(pixels[0], Point2i::new(0, 0));
        assert_eq!(pixels[2], Point2i::new(2, 0));
        assert_eq!(pixels[3], Point2i::new(0, 1));
        assert_eq!(pixels[5], Point2i::new(2, 1));
    }

    #[test]
    fn empty_bounds_iterate_nothing() {
        let b = Bounds2i {
            p_min: Point2i::new(2, 2),
            p_max: Point2i::new(2, 2),
        };
        assert_eq!(b.into_iter().count(), 0);
    }

    #[test]
    fn intersect_preserves_degenerate_bounds() {
        let a = Bounds2i::new(Point2i::new(0, 0), Point2i::new(4, 4));
        let b = Bounds2i::new(Point2i::new(6, 6), Point2i::new(8, 8));
        let c = a.intersect(&b);
        assert!(c.area() <= 0);
    }
}
