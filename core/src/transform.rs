//! Transformations

#![allow(dead_code)]

use crate::geometry::*;
use crate::pbrt::*;
use std::ops::Mul;
use std::sync::Arc;

/// A 4x4 row-major matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4x4 {
    /// The matrix elements.
    pub m: [[Float; 4]; 4],
}

impl Matrix4x4 {
    /// The identity matrix.
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Create a matrix from the given elements in row-major order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        t00: Float, t01: Float, t02: Float, t03: Float,
        t10: Float, t11: Float, t12: Float, t13: Float,
        t20: Float, t21: Float, t22: Float, t23: Float,
        t30: Float, t31: Float, t32: Float, t33: Float,
    ) -> Self {
        Self {
            m: [
                [t00, t01, t02, t03],
                [t10, t11, t12, t13],
                [t20, t21, t22, t23],
                [t30, t31, t32, t33],
            ],
        }
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(&self) -> Self {
        let mut r = Self::IDENTITY;
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = self.m[j][i];
            }
        }
        r
    }

    /// Returns the inverse of the matrix using Gauss-Jordan elimination with
    /// full pivoting.
    pub fn inverse(&self) -> Self {
        let mut indxc = [0_usize; 4];
        let mut indxr = [0_usize; 4];
        let mut ipiv = [0_usize; 4];
        let mut minv = self.m;

        for i in 0..4 {
            let (mut irow, mut icol) = (0, 0);
            let mut big: Float = 0.0;

            // Choose pivot.
            for j in 0..4 {
                if ipiv[j] != 1 {
                    for (k, pivot) in ipiv.iter().enumerate() {
                        if *pivot == 0 && abs(minv[j][k]) >= big {
                            big = abs(minv[j][k]);
                            irow = j;
                            icol = k;
                        }
                    }
                }
            }
            ipiv[icol] += 1;

            // Swap rows for pivot.
            if irow != icol {
                for k in 0..4 {
                    let tmp = minv[irow][k];
                    minv[irow][k] = minv[icol][k];
                    minv[icol][k] = tmp;
                }
            }
            indxr[i] = irow;
            indxc[i] = icol;
            if minv[icol][icol] == 0.0 {
                warn!("Singular matrix in Matrix4x4::inverse()");
                return Self::IDENTITY;
            }

            // Set m[icol][icol] to one by scaling row.
            let pivinv = 1.0 / minv[icol][icol];
            minv[icol][icol] = 1.0;
            for k in 0..4 {
                minv[icol][k] *= pivinv;
            }

            // Subtract this row from others to zero out their columns.
            for j in 0..4 {
                if j != icol {
                    let save = minv[j][icol];
                    minv[j][icol] = 0.0;
                    for k in 0..4 {
                        minv[j][k] -= minv[icol][k] * save;
                    }
                }
            }
        }

        // Swap columns to reflect permutation.
        for j in (0..4).rev() {
            if indxr[j] != indxc[j] {
                for k in 0..4 {
                    let tmp = minv[k][indxr[j]];
                    minv[k][indxr[j]] = minv[k][indxc[j]];
                    minv[k][indxc[j]] = tmp;
                }
            }
        }

        Self { m: minv }
    }
}

impl Mul for Matrix4x4 {
    type Output = Matrix4x4;

    /// Matrix multiplication.
    ///
    /// * `other` - The right hand side matrix.
    fn mul(self, other: Matrix4x4) -> Self::Output {
        let mut r = Matrix4x4::IDENTITY;
        for i in 0..4 {
            for j in 0..4 {
                r.m[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j]
                    + self.m[i][3] * other.m[3][j];
            }
        }
        r
    }
}

/// A transformation that maps points, vectors and normals from one coordinate
/// frame to another. The inverse is cached alongside the forward matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    /// The transformation matrix.
    pub m: Matrix4x4,

    /// The inverse of the transformation matrix.
    pub m_inv: Matrix4x4,
}

/// Atomic reference counted `Transform`.
pub type ArcTransform = Arc<Transform>;

impl Default for Transform {
    /// Returns the identity transform.
    fn default() -> Self {
        Self {
            m: Matrix4x4::IDENTITY,
            m_inv: Matrix4x4::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a transform from a matrix. The inverse is computed.
    ///
    /// * `m` - The matrix.
    pub fn new(m: Matrix4x4) -> Self {
        Self { m, m_inv: m.inverse() }
    }

    /// Create a transform from a matrix and its known inverse.
    ///
    /// * `m`     - The matrix.
    /// * `m_inv` - The inverse matrix.
    pub fn from_pair(m: Matrix4x4, m_inv: Matrix4x4) -> Self {
        Self { m, m_inv }
    }

    /// Returns the inverse transform.
    pub fn inverse(&self) -> Self {
        Self {
            m: self.m_inv,
            m_inv: self.m,
        }
    }

    /// Returns a transform that translates by the given delta.
    ///
    /// * `delta` - The translation.
    pub fn translate(delta: &Vector3f) -> Self {
        let m = Matrix4x4::new(
            1.0, 0.0, 0.0, delta.x,
            0.0, 1.0, 0.0, delta.y,
            0.0, 0.0, 1.0, delta.z,
            0.0, 0.0, 0.0, 1.0,
        );
        let m_inv = Matrix4x4::new(
            1.0, 0.0, 0.0, -delta.x,
            0.0, 1.0, 0.0, -delta.y,
            0.0, 0.0, 1.0, -delta.z,
            0.0, 0.0, 0.0, 1.0,
        );
        Self { m, m_inv }
    }

    /// Returns a transform that scales each axis.
    ///
    /// * `x` - Scale in x.
    /// * `y` - Scale in y.
    /// * `z` - Scale in z.
    pub fn scale(x: Float, y: Float, z: Float) -> Self {
        let m = Matrix4x4::new(
            x, 0.0, 0.0, 0.0,
            0.0, y, 0.0, 0.0,
            0.0, 0.0, z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        let m_inv = Matrix4x4::new(
            1.0 / x, 0.0, 0.0, 0.0,
            0.0, 1.0 / y, 0.0, 0.0,
            0.0, 0.0, 1.0 / z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Self { m, m_inv }
    }

    /// Returns a transform that rotates around the x axis.
    ///
    /// * `theta` - The angle in degrees.
    pub fn rotate_x(theta: Float) -> Self {
        let sin_theta = theta.to_radians().sin();
        let cos_theta = theta.to_radians().cos();
        let m = Matrix4x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, cos_theta, -sin_theta, 0.0,
            0.0, sin_theta, cos_theta, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Self { m, m_inv: m.transpose() }
    }

    /// Returns a transform that rotates around the y axis.
    ///
    /// * `theta` - The angle in degrees.
    pub fn rotate_y(theta: Float) -> Self {
        let sin_theta = theta.to_radians().sin();
        let cos_theta = theta.to_radians().cos();
        let m = Matrix4x4::new(
            cos_theta, 0.0, sin_theta, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -sin_theta, 0.0, cos_theta, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Self { m, m_inv: m.transpose() }
    }

    /// Returns a transform that rotates around the z axis.
    ///
    /// * `theta` - The angle in degrees.
    pub fn rotate_z(theta: Float) -> Self {
        let sin_theta = theta.to_radians().sin();
        let cos_theta = theta.to_radians().cos();
        let m = Matrix4x4::new(
            cos_theta, -sin_theta, 0.0, 0.0,
            sin_theta, cos_theta, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Self { m, m_inv: m.transpose() }
    }

    /// Returns the camera-to-world transform for a camera at `pos` looking at
    /// the point `look` with the given up direction.
    ///
    /// * `pos`  - The camera position.
    /// * `look` - The point being looked at.
    /// * `up`   - The up direction.
    pub fn look_at(pos: &Point3f, look: &Point3f, up: &Vector3f) -> Self {
        let dir = (*look - *pos).normalize();
        let right = up.normalize().cross(&dir);
        if right.length_squared() == 0.0 {
            error!("look_at: up vector and viewing direction are parallel");
            return Self::default();
        }
        let right = right.normalize();
        let new_up = dir.cross(&right);

        let camera_to_world = Matrix4x4::new(
            right.x, new_up.x, dir.x, pos.x,
            right.y, new_up.y, dir.y, pos.y,
            right.z, new_up.z, dir.z, pos.z,
            0.0, 0.0, 0.0, 1.0,
        );

        Self {
            m: camera_to_world,
            m_inv: camera_to_world.inverse(),
        }
    }

    /// Returns a perspective projection transform.
    ///
    /// * `fov` - The field of view in degrees.
    /// * `n`   - Near plane.
    /// * `f`   - Far plane.
    pub fn perspective(fov: Float, n: Float, f: Float) -> Self {
        // Perform projective divide for perspective projection.
        let persp = Matrix4x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, f / (f - n), -f * n / (f - n),
            0.0, 0.0, 1.0, 0.0,
        );

        // Scale canonical perspective view to specified field of view.
        let inv_tan_ang = 1.0 / (fov.to_radians() / 2.0).tan();
        Self::scale(inv_tan_ang, inv_tan_ang, 1.0) * Self::new(persp)
    }

    /// Returns `true` if the transformation changes the handedness of the
    /// coordinate system.
    pub fn swaps_handedness(&self) -> bool {
        let m = &self.m.m;
        let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
        det < 0.0
    }

    /// Apply the transformation to a point.
    ///
    /// * `p` - The point.
    pub fn transform_point(&self, p: &Point3f) -> Point3f {
        let m = &self.m.m;
        let x = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let y = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let z = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let w = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if w == 1.0 {
            Point3f::new(x, y, z)
        } else {
            Point3f::new(x, y, z) / w
        }
    }

    /// Apply the transformation to a vector.
    ///
    /// * `v` - The vector.
    pub fn transform_vector(&self, v: &Vector3f) -> Vector3f {
        let m = &self.m.m;
        Vector3f::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Apply the transformation to a normal. Normals transform by the inverse
    /// transpose to stay perpendicular to the surface.
    ///
    /// * `n` - The normal.
    pub fn transform_normal(&self, n: &Normal3f) -> Normal3f {
        let m = &self.m_inv.m;
        Normal3f::new(
            m[0][0] * n.x + m[1][0] * n.y + m[2][0] * n.z,
            m[0][1] * n.x + m[1][1] * n.y + m[2][1] * n.z,
            m[0][2] * n.x + m[1][2] * n.y + m[2][2] * n.z,
        )
    }

    /// Apply the transformation to a ray.
    ///
    /// * `r` - The ray.
    pub fn transform_ray(&self, r: &Ray) -> Ray {
        let mut ray = Ray::new(
            self.transform_point(&r.o),
            self.transform_vector(&r.d),
            r.t_max,
            r.time,
            r.medium.clone(),
        );
        ray.differentials = r.differentials.map(|d| RayDifferential {
            rx_origin: self.transform_point(&d.rx_origin),
            ry_origin: self.transform_point(&d.ry_origin),
            rx_direction: self.transform_vector(&d.rx_direction),
            ry_direction: self.transform_vector(&d.ry_direction),
        });
        ray
    }

    /// Apply the transformation to a bounding box.
    ///
    /// * `b` - The bounding box.
    pub fn transform_bounds(&self, b: &Bounds3f) -> Bounds3f {
        let mut ret = Bounds3f::EMPTY;
        for i in 0..8 {
            let corner = Point3f::new(
                if i & 1 == 0 { b.p_min.x } else { b.p_max.x },
                if i & 2 == 0 { b.p_min.y } else { b.p_max.y },
                if i & 4 == 0 { b.p_min.z } else { b.p_max.z },
            );
            ret = ret.union_point(&self.transform_point(&corner));
        }
        ret
    }
}

impl Mul for Transform {
    type Output = Transform;

    /// Compose two transforms.
    ///
    /// * `other` - The transform applied first.
    fn mul(self, other: Transform) -> Self::Output {
        Transform {
            m: self.m * other.m,
            m_inv: other.m_inv * self.m_inv,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point3f, b: Point3f) {
        assert!((a.x - b.x).abs() < 1e-4, "{} != {}", a, b);
        assert!((a.y - b.y).abs() < 1e-4, "{} != {}", a, b);
        assert!((a.z - b.z).abs() < 1e-4, "{} != {}", a, b);
    }

    #[test]
    fn inverse_round_trip() {
        let t = Transform::translate(&Vector3f::new(1.0, -2.0, 3.0)) * Transform::scale(2.0, 3.0, 4.0);
        let p = Point3f::new(0.5, 0.25, -1.0);
        assert_point_eq(t.inverse().transform_point(&t.transform_point(&p)), p);
    }

    #[test]
    fn look_at_maps_origin_to_position() {
        let pos = Point3f::new(1.0, 2.0, 3.0);
        let t = Transform::look_at(&pos, &Point3f::ZERO, &Vector3f::new(0.0, 1.0, 0.0));
        assert_point_eq(t.transform_point(&Point3f::ZERO), pos);
    }

    #[test]
    fn rotation_preserves_length() {
        let t = Transform::rotate_y(37.0);
        let v = Vector3f::new(1.0, 2.0, 3.0);
        let r = t.transform_vector(&v);
        assert!((r.length() - v.length()).abs() < 1e-4);
    }

    #[test]
    fn matrix_inverse_identity() {
        let m = Matrix4x4::new(
            2.0, 0.0, 0.0, 1.0,
            0.0, 3.0, 0.0, 2.0,
            0.0, 0.0, 4.0, 3.0,
            0.0, 0.0, 0.0, 1.0,
        );
        let prod = m * m.inverse();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((prod.m[i][j] - expected).abs() < 1e-5);
            }
        }
    }
}
