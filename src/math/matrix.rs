// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Defines the `Mat3` rotation matrix type and its quaternion conversion.

use super::{Quaternion, Vec3};
use std::ops::Mul;

/// A 3x3 row-major matrix of `f64` values.
///
/// Only meaningful as a rotation matrix when built from (or convertible to) a
/// unit quaternion; nothing enforces orthonormality, that is the caller's
/// responsibility.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// The rows of the matrix. `rows[0]` is the first row, and so on.
    pub rows: [Vec3; 3],
}

impl Mat3 {
    /// The 3x3 identity matrix.
    pub const IDENTITY: Self = Self {
        rows: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    /// Creates a new matrix from three row vectors.
    #[inline]
    pub const fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self { rows: [r0, r1, r2] }
    }

    /// Returns a column of the matrix as a `Vec3`.
    #[inline]
    pub fn col(&self, index: usize) -> Vec3 {
        match index {
            0 => Vec3::new(self.rows[0].x, self.rows[1].x, self.rows[2].x),
            1 => Vec3::new(self.rows[0].y, self.rows[1].y, self.rows[2].y),
            _ => Vec3::new(self.rows[0].z, self.rows[1].z, self.rows[2].z),
        }
    }

    /// Returns the transposed matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_rows(self.col(0), self.col(1), self.col(2))
    }

    /// The sum of the diagonal elements.
    #[inline]
    pub fn trace(&self) -> f64 {
        self.rows[0].x + self.rows[1].y + self.rows[2].z
    }

    /// Creates a matrix for a rotation around the X-axis.
    #[inline]
    pub fn from_rotation_x(angle_radians: f64) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, c, -s),
            Vec3::new(0.0, s, c),
        )
    }

    /// Creates a matrix for a rotation around the Y-axis.
    #[inline]
    pub fn from_rotation_y(angle_radians: f64) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(
            Vec3::new(c, 0.0, s),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-s, 0.0, c),
        )
    }

    /// Creates a matrix for a rotation around the Z-axis.
    #[inline]
    pub fn from_rotation_z(angle_radians: f64) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self::from_rows(
            Vec3::new(c, -s, 0.0),
            Vec3::new(s, c, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Creates the rotation matrix equivalent to a quaternion.
    ///
    /// `q` should be of unit magnitude; the matrix of a non-unit quaternion
    /// scales as well as rotates.
    pub fn from_quaternion(q: Quaternion) -> Self {
        let (w, x, y, z) = (q.w, q.x, q.y, q.z);
        Self::from_rows(
            Vec3::new(
                1.0 - 2.0 * (y * y + z * z),
                2.0 * (x * y - w * z),
                2.0 * (x * z + w * y),
            ),
            Vec3::new(
                2.0 * (x * y + w * z),
                1.0 - 2.0 * (x * x + z * z),
                2.0 * (y * z - w * x),
            ),
            Vec3::new(
                2.0 * (x * z - w * y),
                2.0 * (y * z + w * x),
                1.0 - 2.0 * (x * x + y * y),
            ),
        )
    }
}

// --- Operator Overloads ---

impl Mul<Mat3> for Mat3 {
    type Output = Self;
    /// Standard matrix multiplication.
    fn mul(self, rhs: Mat3) -> Self::Output {
        let c0 = rhs.col(0);
        let c1 = rhs.col(1);
        let c2 = rhs.col(2);
        Self::from_rows(
            Vec3::new(self.rows[0].dot(c0), self.rows[0].dot(c1), self.rows[0].dot(c2)),
            Vec3::new(self.rows[1].dot(c0), self.rows[1].dot(c1), self.rows[1].dot(c2)),
            Vec3::new(self.rows[2].dot(c0), self.rows[2].dot(c1), self.rows[2].dot(c2)),
        )
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;
    /// Transforms a column vector by this matrix.
    #[inline]
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(
            self.rows[0].dot(rhs),
            self.rows[1].dot(rhs),
            self.rows[2].dot(rhs),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity() {
        let v = Vec3::new(1.0, -2.0, 3.5);
        assert_eq!(Mat3::IDENTITY * v, v);
        assert_relative_eq!(Mat3::IDENTITY.trace(), 3.0);
    }

    #[test]
    fn test_axis_rotations() {
        let v = Mat3::from_rotation_z(FRAC_PI_2) * Vec3::X;
        assert_relative_eq!(v.x, 0.0, epsilon = 1e-15);
        assert_relative_eq!(v.y, 1.0, epsilon = 1e-15);

        let v = Mat3::from_rotation_x(FRAC_PI_2) * Vec3::Y;
        assert_relative_eq!(v.z, 1.0, epsilon = 1e-15);

        let v = Mat3::from_rotation_y(FRAC_PI_2) * Vec3::Z;
        assert_relative_eq!(v.x, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_transpose_of_rotation_is_inverse() {
        let m = Mat3::from_rotation_y(0.77);
        let p = m * m.transpose();
        assert_relative_eq!(p.rows[0].x, 1.0, epsilon = 1e-15);
        assert_relative_eq!(p.rows[1].y, 1.0, epsilon = 1e-15);
        assert_relative_eq!(p.rows[2].z, 1.0, epsilon = 1e-15);
        assert_relative_eq!(p.rows[0].y, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_from_quaternion_matches_axis_matrix() {
        let angle = 0.9;
        let q = Quaternion::rotation(angle, Vec3::Z).unwrap();
        let mq = Mat3::from_quaternion(q);
        let mz = Mat3::from_rotation_z(angle);
        for r in 0..3 {
            assert_relative_eq!(mq.rows[r].x, mz.rows[r].x, epsilon = 1e-12);
            assert_relative_eq!(mq.rows[r].y, mz.rows[r].y, epsilon = 1e-12);
            assert_relative_eq!(mq.rows[r].z, mz.rows[r].z, epsilon = 1e-12);
        }
    }
}
