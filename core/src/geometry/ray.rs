//! Rays

use super::{Dot, Normal3f, Point3f, Vector3f};
use crate::medium::ArcMedium;
use crate::pbrt::*;
use std::fmt;
use std::sync::Arc;

/// A ray with origin, direction and parametric extent.
#[derive(Clone, Default)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Maximum extent of the ray.
    pub t_max: Float,

    /// Time value associated with the ray.
    pub time: Float,

    /// The medium containing the ray origin.
    pub medium: Option<ArcMedium>,

    /// Offset rays for antialiasing, one pixel apart in x and y.
    pub differentials: Option<RayDifferential>,
}

impl Ray {
    /// Create a new ray.
    ///
    /// * `o`      - Origin.
    /// * `d`      - Direction.
    /// * `t_max`  - Maximum extent of the ray.
    /// * `time`   - Time value associated with the ray.
    /// * `medium` - The medium containing the ray origin.
    pub fn new(o: Point3f, d: Vector3f, t_max: Float, time: Float, medium: Option<ArcMedium>) -> Self {
        Self {
            o,
            d,
            t_max,
            time,
            medium,
            differentials: None,
        }
    }

    /// Returns the point at the given parameter along the ray.
    ///
    /// * `t` - The parameter.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Scale the ray differentials to account for spacing between samples when
    /// multiple samples are taken per pixel.
    ///
    /// * `s` - The scale factor.
    pub fn scale_differentials(&mut self, s: Float) {
        if let Some(d) = self.differentials.as_mut() {
            d.rx_origin = self.o + (d.rx_origin - self.o) * s;
            d.ry_origin = self.o + (d.ry_origin - self.o) * s;
            d.rx_direction = self.d + (d.rx_direction - self.d) * s;
            d.ry_direction = self.d + (d.ry_direction - self.d) * s;
        }
    }

    /// Offset a ray origin along the surface normal to avoid re-intersecting
    /// the surface it left from.
    ///
    /// * `p`       - The intersection point.
    /// * `p_error` - Floating point error bound at the intersection point.
    /// * `n`       - Surface normal at the intersection point.
    /// * `d`       - The new ray direction.
    pub fn offset_origin(p: &Point3f, p_error: &Vector3f, n: &Normal3f, d: &Vector3f) -> Point3f {
        let dist = Vector3f::new(abs(n.x), abs(n.y), abs(n.z)).dot(p_error);
        let mut offset = Vector3f::from(*n) * dist;
        if d.dot(n) < 0.0 {
            offset = -offset;
        }
        let mut po = *p + offset;

        // Round offset point away from p.
        for i in 0..3 {
            if offset[i] > 0.0 {
                po[i] = next_float_up(po[i]);
            } else if offset[i] < 0.0 {
                po[i] = next_float_down(po[i]);
            }
        }
        po
    }
}

impl fmt::Display for Ray {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ray {{ o: {}, d: {}, t_max: {}, time: {} }}",
            self.o, self.d, self.t_max, self.time
        )
    }
}

/// Offset rays one pixel apart in x and y on the film plane.
#[derive(Copy, Clone, Default)]
pub struct RayDifferential {
    /// Origin of the x offset ray.
    pub rx_origin: Point3f,

    /// Origin of the y offset ray.
    pub ry_origin: Point3f,

    /// Direction of the x offset ray.
    pub rx_direction: Vector3f,

    /// Direction of the y offset ray.
    pub ry_direction: Vector3f,
}

impl RayDifferential {
    /// Create new ray differentials.
    ///
    /// * `rx_origin`    - Origin of the x offset ray.
    /// * `ry_origin`    - Origin of the y offset ray.
    /// * `rx_direction` - Direction of the x offset ray.
    /// * `ry_direction` - Direction of the y offset ray.
    pub fn new(rx_origin: Point3f, ry_origin: Point3f, rx_direction: Vector3f, ry_direction: Vector3f) -> Self {
        Self {
            rx_origin,
            ry_origin,
            rx_direction,
            ry_direction,
        }
    }
}

/// Clone an optional medium reference.
///
/// * `medium` - The optional medium.
pub fn clone_medium(medium: &Option<ArcMedium>) -> Option<ArcMedium> {
    medium.as_ref().map(Arc::clone)
}
