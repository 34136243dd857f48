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

//! Polar decomposition, rotation construction and interpolation.
//!
//! A quaternion decomposes as `length * (cos(phase) + axis * sin(phase))`
//! where `axis` is a unit 3-vector. Rotation quaternions use *half* the
//! rotation angle; `from_polar` uses the full phase and yields a non-unit
//! result for `length != 1`.

use super::{
    Quaternion, Vec3, NULL_QUAT_THRESHOLD, REAL_SINE_THRESHOLD, SLERP_LINEAR_THRESHOLD,
};
use crate::error::MathError;

/// The polar form of a quaternion: `length * (cos(phase) + axis * sin(phase))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    /// The magnitude of the quaternion.
    pub length: f64,
    /// The unit axis of the imaginary part.
    pub axis: Vec3,
    /// The angle, in radians, between the real axis and the quaternion.
    pub phase: f64,
}

impl Quaternion {
    /// Decomposes the quaternion into polar form.
    ///
    /// An essentially-null quaternion (magnitude below 1e-160) reports a
    /// zero phase, and an essentially-real one (imaginary sine below 1e-20)
    /// a phase of 0 or pi; both report the arbitrary fixed axis j, chosen
    /// so negative reals behave like their complex counterparts.
    ///
    /// The axis is sign-balanced: when its components sum negative, axis
    /// and phase are both negated. A quaternion with a single imaginary
    /// component thus always reports a positive axis, just as the complex
    /// imaginary unit is a unit vector in the positive direction.
    pub fn to_polar(&self) -> Polar {
        let length = self.abs();

        if length < NULL_QUAT_THRESHOLD {
            return Polar {
                length,
                axis: Vec3::Y,
                phase: 0.0,
            };
        }

        let c = self.w / length;
        let v = self.imag() / length;
        // v is already normalized, no overflow concerns here.
        let s = (v.x * v.x + v.y * v.y + v.z * v.z).sqrt();

        let mut phase = s.atan2(c);
        if s < REAL_SINE_THRESHOLD {
            return Polar {
                length,
                axis: Vec3::Y,
                phase,
            };
        }

        let mut axis = v / s;
        if axis.x + axis.y + axis.z < 0.0 {
            phase = -phase;
            axis = -axis;
        }

        Polar {
            length,
            axis,
            phase,
        }
    }

    /// Composes a quaternion from polar components,
    /// `length * (cos(phase) + axis * sin(phase))`.
    ///
    /// The axis is normalized if required. Unlike [`Quaternion::rotation`]
    /// this uses the full phase and the result is not unit length unless
    /// `length` is one.
    ///
    /// # Errors
    /// `MathError::ZeroAxis` for a zero-length axis.
    pub fn from_polar(length: f64, axis: Vec3, phase: f64) -> Result<Self, MathError> {
        let u = axis.length();
        if u == 0.0 {
            return Err(MathError::ZeroAxis);
        }
        let (s, c) = phase.sin_cos();
        // Combine length, sine and the normalization factor.
        let t = length * s / u;
        Ok(Self::new(length * c, t * axis.x, t * axis.y, t * axis.z))
    }

    /// Creates the unit rotation quaternion for a rotation of `angle`
    /// radians about `axis`.
    ///
    /// Uses half the angle, so the quaternion applied as `q·p·q̄` rotates a
    /// point by the full angle. The axis is normalized if required.
    ///
    /// # Errors
    /// `MathError::ZeroAxis` for a zero-length axis.
    pub fn rotation(angle: f64, axis: Vec3) -> Result<Self, MathError> {
        if axis.length() == 0.0 {
            return Err(MathError::ZeroAxis);
        }
        let u = axis.normalize();
        let (s, c) = (angle / 2.0).sin_cos();
        Ok(Self::new(c, u.x * s, u.y * s, u.z * s))
    }

    /// Rotates `point` about `origin` by this (rotation) quaternion,
    /// computing `q·(p - origin)·q̄ + origin`.
    pub fn rotate_point(&self, point: Vec3, origin: Vec3) -> Vec3 {
        let d = point - origin;
        let p = Self::new(0.0, d.x, d.y, d.z);
        let t = *self * p * self.conjugate();
        t.imag() + origin
    }

    /// Linear interpolation: the affine blend `a*(1-t) + b*t`.
    ///
    /// `t` is not clamped, so some level of extrapolation is possible.
    #[inline]
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        a * (1.0 - t) + b * t
    }

    /// Spherical linear interpolation between `a` and `b`.
    ///
    /// `slerp(a, b, 0)` is `a` (or `-a`: for a rotation quaternion `q` and
    /// `-q` specify the same rotation) and `slerp(a, b, 1)` is `b`. The
    /// shorter arc is taken, negating `a` when the operands' normalized dot
    /// product is negative. Nearly-parallel operands (and degenerate ones
    /// with a zero magnitude product) fall back to linear weights, where
    /// the spherical weights' `1/sin` would lose precision. `t` is not
    /// clamped, so some level of extrapolation is possible.
    pub fn slerp(a: Self, b: Self, t: f64) -> Self {
        let mut first = a;
        let k = a.abs() * b.abs();

        let (w1, w2) = if k > 0.0 {
            let mut dp = a.dot(b) / k;
            if dp < 0.0 {
                first = -first;
                dp = -dp;
            }
            if dp < SLERP_LINEAR_THRESHOLD {
                let theta = dp.acos();
                let sin_theta = theta.sin();
                (
                    ((1.0 - t) * theta).sin() / sin_theta,
                    (t * theta).sin() / sin_theta,
                )
            } else {
                (1.0 - t, t)
            }
        } else {
            (1.0 - t, t)
        };

        first * w1 + b * w2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn assert_quat_close(a: Quaternion, b: Quaternion, epsilon: f64) {
        assert_relative_eq!(a.w, b.w, epsilon = epsilon);
        assert_relative_eq!(a.x, b.x, epsilon = epsilon);
        assert_relative_eq!(a.y, b.y, epsilon = epsilon);
        assert_relative_eq!(a.z, b.z, epsilon = epsilon);
    }

    #[test]
    fn test_polar_round_trip() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let p = q.to_polar();
        assert_relative_eq!(p.axis.length(), 1.0, epsilon = 1e-15);
        let back = Quaternion::from_polar(p.length, p.axis, p.phase).unwrap();
        assert_quat_close(back, q, EPSILON);
    }

    #[test]
    fn test_polar_of_reals() {
        let p = Quaternion::from(2.0).to_polar();
        assert_relative_eq!(p.length, 2.0);
        assert_relative_eq!(p.phase, 0.0);
        assert_eq!(p.axis, Vec3::Y);

        // Negative reals need pi worth of phase, allocated to the j axis
        // like the complex plane.
        let p = Quaternion::from(-2.0).to_polar();
        assert_relative_eq!(p.length, 2.0);
        assert_relative_eq!(p.phase, PI);
        assert_eq!(p.axis, Vec3::Y);
    }

    #[test]
    fn test_polar_of_null() {
        let p = Quaternion::ZERO.to_polar();
        assert_eq!(p.length, 0.0);
        assert_eq!(p.phase, 0.0);
        assert_eq!(p.axis, Vec3::Y);
    }

    #[test]
    fn test_polar_axis_sign_balance() {
        // A single imaginary component always reports a positive axis.
        let p = Quaternion::new(1.0, -2.0, 0.0, 0.0).to_polar();
        assert_relative_eq!(p.axis.x, 1.0, epsilon = 1e-15);
        assert!(p.phase < 0.0);
        let back = Quaternion::from_polar(p.length, p.axis, p.phase).unwrap();
        assert_quat_close(back, Quaternion::new(1.0, -2.0, 0.0, 0.0), EPSILON);
    }

    #[test]
    fn test_from_polar_zero_axis() {
        assert_eq!(
            Quaternion::from_polar(1.0, Vec3::ZERO, 0.5),
            Err(MathError::ZeroAxis)
        );
        assert_eq!(
            Quaternion::rotation(0.5, Vec3::ZERO),
            Err(MathError::ZeroAxis)
        );
    }

    #[test]
    fn test_rotation_uses_half_angle() {
        let q = Quaternion::rotation(FRAC_PI_2, Vec3::Z).unwrap();
        assert_relative_eq!(q.w, (FRAC_PI_4).cos(), epsilon = 1e-15);
        assert_relative_eq!(q.z, (FRAC_PI_4).sin(), epsilon = 1e-15);
        assert_relative_eq!(q.abs(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_rotate_point() {
        let q = Quaternion::rotation(FRAC_PI_2, Vec3::Z).unwrap();
        let r = q.rotate_point(Vec3::X, Vec3::ZERO);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-15);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-15);
        assert_relative_eq!(r.z, 0.0, epsilon = 1e-15);

        // About a displaced origin.
        let origin = Vec3::new(1.0, 0.0, 0.0);
        let r = q.rotate_point(Vec3::new(2.0, 0.0, 0.0), origin);
        assert_relative_eq!(r.x, 1.0, epsilon = 1e-15);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_lerp() {
        let a = Quaternion::new(1.0, 0.0, 0.0, 0.0);
        let b = Quaternion::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(Quaternion::lerp(a, b, 0.0), a);
        assert_eq!(Quaternion::lerp(a, b, 1.0), b);
        assert_eq!(
            Quaternion::lerp(a, b, 0.5),
            Quaternion::new(0.5, 0.0, 0.0, 0.5)
        );
        // Unclamped: extrapolation past the end points.
        assert_eq!(
            Quaternion::lerp(a, b, 2.0),
            Quaternion::new(-1.0, 0.0, 0.0, 2.0)
        );
    }

    #[test]
    fn test_slerp_end_points() {
        let a = Quaternion::rotation(0.3, Vec3::X).unwrap();
        let b = Quaternion::rotation(1.8, Vec3::Y).unwrap();
        assert_quat_close(Quaternion::slerp(a, b, 0.0), a, EPSILON);
        assert_quat_close(Quaternion::slerp(a, b, 1.0), b, EPSILON);
    }

    #[test]
    fn test_slerp_halfway_is_half_rotation() {
        let a = Quaternion::ONE;
        let b = Quaternion::rotation(FRAC_PI_2, Vec3::Z).unwrap();
        let mid = Quaternion::slerp(a, b, 0.5);
        let expected = Quaternion::rotation(FRAC_PI_4, Vec3::Z).unwrap();
        assert_quat_close(mid, expected, EPSILON);
        assert_relative_eq!(mid.abs(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_slerp_takes_short_arc() {
        let a = Quaternion::rotation(0.4, Vec3::Z).unwrap();
        let b = -Quaternion::rotation(0.6, Vec3::Z).unwrap();
        // a and -b are nearby rotations; the first operand is negated so
        // the result stays on the short arc.
        let mid = Quaternion::slerp(a, b, 0.5);
        let expected = -Quaternion::rotation(0.5, Vec3::Z).unwrap();
        assert_quat_close(mid, expected, 1e-9);
    }

    #[test]
    fn test_slerp_nearly_parallel_falls_back_to_linear() {
        let a = Quaternion::rotation(0.5, Vec3::Z).unwrap();
        let b = Quaternion::rotation(0.5 + 1e-9, Vec3::Z).unwrap();
        let mid = Quaternion::slerp(a, b, 0.5);
        assert_quat_close(mid, a, 1e-8);
        assert!(mid.abs().is_finite());
    }

    #[test]
    fn test_slerp_zero_magnitude_uses_linear_weights() {
        let b = Quaternion::new(0.0, 0.0, 0.0, 2.0);
        let r = Quaternion::slerp(Quaternion::ZERO, b, 0.25);
        assert_quat_close(r, b * 0.25, 1e-15);
    }
}
