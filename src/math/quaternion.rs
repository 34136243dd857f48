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

//! Defines the `Quaternion` value type and its algebra.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::{Mat3, Vec3};
use crate::error::MathError;

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A quaternion `w + x·i + y·j + z·k` with `f64` components, following
/// Hamilton's convention (`i·j = k`).
///
/// The in-memory layout is four consecutive doubles in `(w, x, y, z)` order
/// with no padding; the flat-byte serialization of
/// [`QuaternionArray`](crate::QuaternionArray) depends on exactly this
/// 32-byte record shape.
///
/// Infallible arithmetic (addition, the Hamilton product, `abs`) follows
/// IEEE-754 rules for non-finite inputs; operations with genuine failure
/// modes return `Result<_, MathError>` instead.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
)]
#[repr(C)]
pub struct Quaternion {
    /// The real (scalar) part.
    pub w: f64,
    /// The coefficient of the imaginary unit i.
    pub x: f64,
    /// The coefficient of the imaginary unit j.
    pub y: f64,
    /// The coefficient of the imaginary unit k.
    pub z: f64,
}

impl Quaternion {
    /// The additive identity (all components zero).
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// The multiplicative identity.
    pub const ONE: Self = Self::new(1.0, 0.0, 0.0, 0.0);
    /// The imaginary unit i.
    pub const I: Self = Self::new(0.0, 1.0, 0.0, 0.0);
    /// The imaginary unit j.
    pub const J: Self = Self::new(0.0, 0.0, 1.0, 0.0);
    /// The imaginary unit k.
    pub const K: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a new quaternion from its four components.
    #[inline]
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// The imaginary (vector) part as a `Vec3`.
    #[inline]
    pub const fn imag(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// The conjugate `w - x·i - y·j - z·k`.
    #[inline]
    pub const fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// The squared magnitude `w² + x² + y² + z²`.
    ///
    /// Faster than `abs()` but overflows for components near
    /// `f64::MAX.sqrt()`; `abs()` does not.
    #[inline]
    pub fn quadrance(&self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// The four-component dot (inner) product.
    #[inline]
    pub fn dot(&self, rhs: Self) -> f64 {
        self.w * rhs.w + self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// The magnitude (Euclidean norm) of the quaternion.
    ///
    /// C99 rules apply for non-finite input: any infinite component makes
    /// the result infinity even if another component is NaN; otherwise any
    /// NaN component makes the result NaN. Finite components are scaled by
    /// the largest absolute component before squaring, so the result only
    /// overflows when it mathematically must.
    pub fn abs(&self) -> f64 {
        if !self.is_finite() {
            if self.w.is_infinite() {
                return self.w.abs();
            }
            if self.x.is_infinite() {
                return self.x.abs();
            }
            if self.y.is_infinite() {
                return self.y.abs();
            }
            if self.z.is_infinite() {
                return self.z.abs();
            }
            return f64::NAN;
        }

        let m = self.max_abs_component();
        if m == 0.0 {
            return 0.0;
        }
        let w = self.w / m;
        let x = self.x / m;
        let y = self.y / m;
        let z = self.z / m;
        m * (w * w + x * x + y * y + z * z).sqrt()
    }

    /// Like `abs`, but reports `MathError::Overflow` when every component is
    /// finite yet the magnitude still overflows to infinity.
    pub fn checked_abs(&self) -> Result<f64, MathError> {
        let r = self.abs();
        if r.is_infinite() && self.is_finite() {
            Err(MathError::Overflow)
        } else {
            Ok(r)
        }
    }

    /// The largest absolute component value.
    #[inline]
    fn max_abs_component(&self) -> f64 {
        self.w
            .abs()
            .max(self.x.abs())
            .max(self.y.abs())
            .max(self.z.abs())
    }

    /// Returns the unit quaternion with the same direction.
    ///
    /// # Errors
    /// `MathError::ZeroNorm` for the zero quaternion.
    pub fn normalize(&self) -> Result<Self, MathError> {
        let m = self.abs();
        if m == 0.0 {
            return Err(MathError::ZeroNorm);
        }
        Ok(Self::new(self.w / m, self.x / m, self.y / m, self.z / m))
    }

    /// Returns the multiplicative inverse, `conjugate / quadrance`.
    ///
    /// Components are pre-scaled by the largest absolute component so the
    /// intermediate quadrance cannot overflow for representable inputs.
    ///
    /// # Errors
    /// `MathError::ZeroNorm` for the zero quaternion.
    pub fn inverse(&self) -> Result<Self, MathError> {
        let m = self.max_abs_component();
        if m == 0.0 {
            return Err(MathError::ZeroNorm);
        }
        let s = *self / m;
        let d = s.quadrance() * m;
        Ok(Self::new(s.w / d, -s.x / d, -s.y / d, -s.z / d))
    }

    /// Divides by another quaternion: `self · rhs⁻¹`.
    ///
    /// The divisor is pre-scaled by its largest absolute component, keeping
    /// the intermediate quadrance representable.
    ///
    /// # Errors
    /// `MathError::DivisionByZero` when `rhs` is the zero quaternion.
    pub fn div_checked(&self, rhs: Self) -> Result<Self, MathError> {
        let m = rhs.max_abs_component();
        if m == 0.0 {
            return Err(MathError::DivisionByZero);
        }
        let s = rhs / m;
        let d = s.quadrance() * m;
        let n = *self * s.conjugate();
        Ok(n / d)
    }

    /// Raises the quaternion to a real power, through polar form.
    ///
    /// Special cases before decomposition: any base to the power zero is
    /// one (including the zero base), a base to the power one is itself,
    /// and the zero base to a positive power is zero.
    ///
    /// # Errors
    /// `MathError::ZeroToNegativePower` for `0 ** x` with negative `x`.
    pub fn powf(&self, exponent: f64) -> Result<Self, MathError> {
        if exponent == 0.0 {
            return Ok(Self::ONE);
        }
        if *self == Self::ZERO {
            if exponent < 0.0 {
                return Err(MathError::ZeroToNegativePower);
            }
            return Ok(Self::ZERO);
        }
        if exponent == 1.0 {
            return Ok(*self);
        }
        let p = self.to_polar();
        Self::from_polar(
            p.length.powf(exponent),
            p.axis,
            p.phase * exponent,
        )
    }

    /// Raises the quaternion to an integer power by repeated multiplication.
    ///
    /// `powi(0)` is one even for the zero base; negative exponents go
    /// through the inverse.
    ///
    /// # Errors
    /// `MathError::ZeroNorm` for a negative power of the zero quaternion.
    pub fn powi(&self, exponent: i64) -> Result<Self, MathError> {
        let (base, n) = if exponent < 0 {
            (self.inverse()?, exponent.unsigned_abs())
        } else {
            (*self, exponent as u64)
        };
        let mut r = Self::ONE;
        for _ in 0..n {
            r = r * base;
        }
        Ok(r)
    }

    /// Raises a real scalar to a quaternion power: `base ** q = exp(q · ln base)`.
    ///
    /// A negative base resolves its logarithm onto the j axis, matching the
    /// complex-compatibility convention of the transcendental functions.
    ///
    /// # Errors
    /// `MathError::ZeroToNegativePower` for a zero base unless the exponent
    /// is zero (giving one) or a positive real (giving zero).
    pub fn scalar_pow(base: f64, exponent: Self) -> Result<Self, MathError> {
        if exponent == Self::ZERO {
            return Ok(Self::ONE);
        }
        if base == 0.0 {
            if exponent.imag() == Vec3::ZERO && exponent.w > 0.0 {
                return Ok(Self::ZERO);
            }
            return Err(MathError::ZeroToNegativePower);
        }
        let ln_base = super::functions::ln(Self::from(base));
        Ok(super::functions::exp(exponent * ln_base))
    }

    /// Rounds every component to `ndigits` decimal places, half away from
    /// zero. Negative `ndigits` rounds to the left of the decimal point.
    pub fn round_to(&self, ndigits: i32) -> Self {
        let factor = 10.0_f64.powi(ndigits);
        Self::new(
            (self.w * factor).round() / factor,
            (self.x * factor).round() / factor,
            (self.y * factor).round() / factor,
            (self.z * factor).round() / factor,
        )
    }

    /// `true` when every component is finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// `true` when any component is infinite.
    #[inline]
    pub fn is_inf(&self) -> bool {
        self.w.is_infinite()
            || self.x.is_infinite()
            || self.y.is_infinite()
            || self.z.is_infinite()
    }

    /// `true` when any component is NaN.
    #[inline]
    pub fn is_nan(&self) -> bool {
        self.w.is_nan() || self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Closeness test with the default tolerances (`rel_tol = 1e-9`,
    /// `abs_tol = 0.0`).
    #[inline]
    pub fn is_close(&self, rhs: Self) -> bool {
        // Default tolerances cannot be negative, so this cannot fail.
        self.is_close_with(rhs, 1.0e-9, 0.0).unwrap_or(false)
    }

    /// Determines whether two quaternions are close in value.
    ///
    /// Exact equality short-circuits to `true` (this catches two like-signed
    /// infinities). Otherwise any infinite operand gives `false` (two
    /// infinities of opposite sign would have an infinite relative
    /// difference). NaN is not close to anything, itself included. The
    /// finite case accepts when the magnitude of the difference is within
    /// `rel_tol` of either operand's magnitude, or within `abs_tol`
    /// outright.
    ///
    /// # Errors
    /// `MathError::InvalidTolerance` when either tolerance is negative.
    pub fn is_close_with(
        &self,
        rhs: Self,
        rel_tol: f64,
        abs_tol: f64,
    ) -> Result<bool, MathError> {
        if rel_tol < 0.0 || abs_tol < 0.0 {
            return Err(MathError::InvalidTolerance { rel_tol, abs_tol });
        }
        if *self == rhs {
            return Ok(true);
        }
        if self.is_inf() || rhs.is_inf() {
            return Ok(false);
        }
        let diff = (*self - rhs).abs();
        let abs_a = self.abs();
        let abs_b = rhs.abs();
        Ok(diff <= rel_tol * abs_a || diff <= rel_tol * abs_b || diff <= abs_tol)
    }

    /// Extracts the unit rotation quaternion from a rotation matrix.
    ///
    /// Branches on the largest of the trace and the diagonal elements so
    /// the single square root is taken of the largest available quantity,
    /// then normalizes to absorb accumulated rounding.
    pub fn from_rotation_matrix(mat: &Mat3) -> Self {
        let [r0, r1, r2] = mat.rows;
        let trace = mat.trace();

        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new(
                0.25 * s,
                (r2.y - r1.z) / s,
                (r0.z - r2.x) / s,
                (r1.x - r0.y) / s,
            )
        } else if r0.x > r1.y && r0.x > r2.z {
            let s = (1.0 + r0.x - r1.y - r2.z).sqrt() * 2.0;
            Self::new(
                (r2.y - r1.z) / s,
                0.25 * s,
                (r0.y + r1.x) / s,
                (r0.z + r2.x) / s,
            )
        } else if r1.y > r2.z {
            let s = (1.0 + r1.y - r0.x - r2.z).sqrt() * 2.0;
            Self::new(
                (r0.z - r2.x) / s,
                (r0.y + r1.x) / s,
                0.25 * s,
                (r1.z + r2.y) / s,
            )
        } else {
            let s = (1.0 + r2.z - r0.x - r1.y).sqrt() * 2.0;
            Self::new(
                (r1.x - r0.y) / s,
                (r0.z + r2.x) / s,
                (r1.z + r2.y) / s,
                0.25 * s,
            )
        };

        q.normalize().unwrap_or(Self::ONE)
    }
}

// --- Operator Overloads ---

impl Add for Quaternion {
    type Output = Self;
    /// Adds two quaternions component-wise.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(
            self.w + rhs.w,
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
        )
    }
}

impl Sub for Quaternion {
    type Output = Self;
    /// Subtracts two quaternions component-wise.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(
            self.w - rhs.w,
            self.x - rhs.x,
            self.y - rhs.y,
            self.z - rhs.z,
        )
    }
}

impl Mul for Quaternion {
    type Output = Self;
    /// The Hamilton product. Not commutative: `i * j == k` but `j * i == -k`.
    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;
    /// Scales all components by a scalar.
    #[inline]
    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(
            self.w * scalar,
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
        )
    }
}

impl Mul<Quaternion> for f64 {
    type Output = Quaternion;
    /// Scales all components by a scalar.
    #[inline]
    fn mul(self, rhs: Quaternion) -> Self::Output {
        rhs * self
    }
}

impl Div<f64> for Quaternion {
    type Output = Self;
    /// Divides all components by a scalar.
    #[inline]
    fn div(self, scalar: f64) -> Self::Output {
        Self::new(
            self.w / scalar,
            self.x / scalar,
            self.y / scalar,
            self.z / scalar,
        )
    }
}

impl Neg for Quaternion {
    type Output = Self;
    /// Negates all components.
    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.w, -self.x, -self.y, -self.z)
    }
}

// --- Conversions ---

impl From<f64> for Quaternion {
    /// A real scalar becomes a quaternion with zero imaginary parts.
    #[inline]
    fn from(w: f64) -> Self {
        Self::new(w, 0.0, 0.0, 0.0)
    }
}

impl From<(f64, f64)> for Quaternion {
    /// A `(real, imaginary)` pair maps its imaginary part onto the j axis,
    /// so complex values and quaternions agree about negative reals.
    #[inline]
    fn from((re, im): (f64, f64)) -> Self {
        Self::new(re, 0.0, im, 0.0)
    }
}

impl From<Complex64> for Quaternion {
    /// Same convention as `From<(f64, f64)>`: imaginary onto j.
    #[inline]
    fn from(c: Complex64) -> Self {
        Self::new(c.re, 0.0, c.im, 0.0)
    }
}

impl From<[f64; 4]> for Quaternion {
    /// Components in `(w, x, y, z)` order.
    #[inline]
    fn from(parts: [f64; 4]) -> Self {
        Self::new(parts[0], parts[1], parts[2], parts[3])
    }
}

impl fmt::Display for Quaternion {
    /// Formats as `(w+xi+yj+zk)` with explicit signs on the imaginary parts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{:+}i{:+}j{:+}k)", self.w, self.x, self.y, self.z)
    }
}

// --- Approximate Comparison ---

use approx::{AbsDiffEq, RelativeEq};

impl AbsDiffEq for Quaternion {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.w.abs_diff_eq(&other.w, epsilon)
            && self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.w.relative_eq(&other.w, epsilon, max_relative)
            && self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hamilton_products() {
        assert_eq!(Quaternion::I * Quaternion::J, Quaternion::K);
        assert_eq!(Quaternion::J * Quaternion::I, -Quaternion::K);
        assert_eq!(Quaternion::J * Quaternion::K, Quaternion::I);
        assert_eq!(Quaternion::K * Quaternion::I, Quaternion::J);
        assert_eq!(Quaternion::I * Quaternion::I, -Quaternion::ONE);
        assert_eq!(Quaternion::ONE * Quaternion::K, Quaternion::K);
    }

    #[test]
    fn test_add_sub_neg() {
        let a = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let b = Quaternion::new(0.5, -1.0, 2.0, -4.0);
        assert_eq!(a + b, Quaternion::new(1.5, 1.0, 5.0, 0.0));
        assert_eq!(a - b, Quaternion::new(0.5, 3.0, 1.0, 8.0));
        assert_eq!(-a, Quaternion::new(-1.0, -2.0, -3.0, -4.0));
        assert_eq!(a * 2.0, 2.0 * a);
    }

    #[test]
    fn test_addition_and_product_are_associative() {
        // Dyadic components keep the additions exact.
        let p = Quaternion::new(0.5, -1.0, 2.0, 0.25);
        let q = Quaternion::new(-0.75, 0.5, 1.5, -2.0);
        let r = Quaternion::new(2.0, 0.125, -0.5, 1.0);

        assert_eq!((p + q) + r, p + (q + r));

        let a = (p * q) * r;
        let b = p * (q * r);
        assert_relative_eq!(a.w, b.w, epsilon = 1e-13);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-13);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-13);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-13);
    }

    #[test]
    fn test_abs() {
        let q = Quaternion::new(1.0, 1.0, 1.0, 1.0);
        assert_relative_eq!(q.abs(), 2.0);
        assert_relative_eq!(q.quadrance(), 4.0);
        assert_eq!(Quaternion::ZERO.abs(), 0.0);
    }

    #[test]
    fn test_abs_scaling_avoids_spurious_overflow() {
        let q = Quaternion::new(1.0e200, 1.0e200, 0.0, 0.0);
        assert!(q.abs().is_finite());
        assert_relative_eq!(q.abs(), 1.0e200 * std::f64::consts::SQRT_2);
    }

    #[test]
    fn test_abs_c99_rules() {
        // Infinity wins even in the presence of NaN.
        let q = Quaternion::new(f64::NAN, f64::NEG_INFINITY, 0.0, 0.0);
        assert_eq!(q.abs(), f64::INFINITY);
        // NaN with no infinity is NaN.
        let q = Quaternion::new(f64::NAN, 1.0, 0.0, 0.0);
        assert!(q.abs().is_nan());
    }

    #[test]
    fn test_checked_abs_overflow() {
        let q = Quaternion::new(1.7e308, 1.7e308, 0.0, 0.0);
        assert!(q.is_finite());
        assert_eq!(q.checked_abs(), Err(MathError::Overflow));
        // A genuinely infinite input is not an overflow.
        let q = Quaternion::new(f64::INFINITY, 0.0, 0.0, 0.0);
        assert_eq!(q.checked_abs(), Ok(f64::INFINITY));
    }

    #[test]
    fn test_conjugate_and_inverse() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q.conjugate(), Quaternion::new(1.0, -2.0, -3.0, -4.0));

        let inv = q.inverse().unwrap();
        let p = q * inv;
        assert_relative_eq!(p.w, 1.0, epsilon = 1e-15);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-15);

        assert_eq!(Quaternion::ZERO.inverse(), Err(MathError::ZeroNorm));
    }

    #[test]
    fn test_division() {
        let a = Quaternion::new(2.0, -1.0, 0.5, 3.0);
        let b = Quaternion::new(0.5, 1.0, -2.0, 1.5);
        let q = a.div_checked(b).unwrap();
        let back = q * b;
        assert_relative_eq!(back.w, a.w, epsilon = 1e-14);
        assert_relative_eq!(back.x, a.x, epsilon = 1e-14);
        assert_relative_eq!(back.y, a.y, epsilon = 1e-14);
        assert_relative_eq!(back.z, a.z, epsilon = 1e-14);

        assert_eq!(
            a.div_checked(Quaternion::ZERO),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn test_normalize() {
        let q = Quaternion::new(0.0, 3.0, 0.0, 4.0);
        let n = q.normalize().unwrap();
        assert_relative_eq!(n.abs(), 1.0);
        assert_relative_eq!(n.x, 0.6);
        assert_relative_eq!(n.z, 0.8);
        assert_eq!(Quaternion::ZERO.normalize(), Err(MathError::ZeroNorm));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let q = Quaternion::new(3.0, -4.0, 12.0, 0.5);
        let n = q.normalize().unwrap();
        let nn = n.normalize().unwrap();
        assert_relative_eq!(nn.w, n.w, epsilon = 1e-15);
        assert_relative_eq!(nn.x, n.x, epsilon = 1e-15);
        assert_relative_eq!(nn.y, n.y, epsilon = 1e-15);
        assert_relative_eq!(nn.z, n.z, epsilon = 1e-15);
    }

    #[test]
    fn test_powf_special_cases() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q.powf(0.0), Ok(Quaternion::ONE));
        assert_eq!(Quaternion::ZERO.powf(0.0), Ok(Quaternion::ONE));
        assert_eq!(Quaternion::ZERO.powf(2.0), Ok(Quaternion::ZERO));
        assert_eq!(
            Quaternion::ZERO.powf(-1.0),
            Err(MathError::ZeroToNegativePower)
        );
        assert_eq!(q.powf(1.0), Ok(q));
    }

    #[test]
    fn test_powf_agrees_with_powi() {
        let q = Quaternion::new(0.8, -0.3, 0.5, 0.1);
        let f = q.powf(3.0).unwrap();
        let i = q.powi(3).unwrap();
        assert_relative_eq!(f.w, i.w, epsilon = 1e-12);
        assert_relative_eq!(f.x, i.x, epsilon = 1e-12);
        assert_relative_eq!(f.y, i.y, epsilon = 1e-12);
        assert_relative_eq!(f.z, i.z, epsilon = 1e-12);
    }

    #[test]
    fn test_powi() {
        let q = Quaternion::new(1.0, 1.0, 0.0, 0.0);
        assert_eq!(q.powi(0), Ok(Quaternion::ONE));
        assert_eq!(q.powi(2), Ok(q * q));
        assert_eq!(Quaternion::ZERO.powi(0), Ok(Quaternion::ONE));
        assert_eq!(Quaternion::ZERO.powi(-1), Err(MathError::ZeroNorm));

        let p = q.powi(-2).unwrap();
        let back = p * q * q;
        assert_relative_eq!(back.w, 1.0, epsilon = 1e-14);
        assert_relative_eq!(back.x, 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_scalar_pow() {
        // 2 ** 3 through the quaternion path.
        let r = Quaternion::scalar_pow(2.0, Quaternion::from(3.0)).unwrap();
        assert_relative_eq!(r.w, 8.0, epsilon = 1e-12);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-12);

        assert_eq!(
            Quaternion::scalar_pow(0.0, Quaternion::ZERO),
            Ok(Quaternion::ONE)
        );
        assert_eq!(
            Quaternion::scalar_pow(0.0, Quaternion::from(2.0)),
            Ok(Quaternion::ZERO)
        );
        assert_eq!(
            Quaternion::scalar_pow(0.0, Quaternion::from(-1.0)),
            Err(MathError::ZeroToNegativePower)
        );
    }

    #[test]
    fn test_round_to() {
        let q = Quaternion::new(1.2345, -6.789, 0.5, 123.456);
        assert_eq!(
            q.round_to(2),
            Quaternion::new(1.23, -6.79, 0.5, 123.46)
        );
        assert_eq!(
            q.round_to(-1),
            Quaternion::new(0.0, -10.0, 0.0, 120.0)
        );
    }

    #[test]
    fn test_classification() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        assert!(q.is_finite() && !q.is_inf() && !q.is_nan());

        let q = Quaternion::new(1.0, f64::INFINITY, 0.0, 0.0);
        assert!(!q.is_finite() && q.is_inf() && !q.is_nan());

        let q = Quaternion::new(f64::NAN, 0.0, 0.0, 0.0);
        assert!(!q.is_finite() && !q.is_inf() && q.is_nan());
    }

    #[test]
    fn test_is_close() {
        let a = Quaternion::new(1.0e10, 0.0, 0.0, 0.0);
        let b = Quaternion::new(1.00001e10, 0.0, 0.0, 0.0);
        assert!(a.is_close_with(b, 1e-5, 0.0).unwrap());
        assert!(!a.is_close(b));

        // Exact equality short-circuits, catching like-signed infinities.
        let inf = Quaternion::new(f64::INFINITY, 0.0, 0.0, 0.0);
        assert!(inf.is_close(inf));
        assert!(!inf.is_close(-inf));
        assert!(!inf.is_close(a));

        // NaN is not close to anything, itself included.
        let nan = Quaternion::new(f64::NAN, 0.0, 0.0, 0.0);
        assert!(!nan.is_close(nan));

        assert_eq!(
            a.is_close_with(b, -1.0e-9, 0.0),
            Err(MathError::InvalidTolerance {
                rel_tol: -1.0e-9,
                abs_tol: 0.0
            })
        );
    }

    #[test]
    fn test_rotation_matrix_round_trip() {
        let q = Quaternion::rotation(1.1, Vec3::new(1.0, 2.0, -0.5)).unwrap();
        let m = Mat3::from_quaternion(q);
        let r = Quaternion::from_rotation_matrix(&m);
        // The round trip may negate the quaternion; both represent the
        // same rotation.
        let sign = if r.dot(q) < 0.0 { -1.0 } else { 1.0 };
        assert_relative_eq!(r.w * sign, q.w, epsilon = 1e-12);
        assert_relative_eq!(r.x * sign, q.x, epsilon = 1e-12);
        assert_relative_eq!(r.y * sign, q.y, epsilon = 1e-12);
        assert_relative_eq!(r.z * sign, q.z, epsilon = 1e-12);
    }

    #[test]
    fn test_conversions() {
        assert_eq!(Quaternion::from(2.5), Quaternion::new(2.5, 0.0, 0.0, 0.0));
        // Complex imaginary lands on j.
        assert_eq!(
            Quaternion::from((1.0, 2.0)),
            Quaternion::new(1.0, 0.0, 2.0, 0.0)
        );
        assert_eq!(
            Quaternion::from(Complex64::new(1.0, -3.0)),
            Quaternion::new(1.0, 0.0, -3.0, 0.0)
        );
        assert_eq!(
            Quaternion::from([1.0, 2.0, 3.0, 4.0]),
            Quaternion::new(1.0, 2.0, 3.0, 4.0)
        );
    }

    #[test]
    fn test_display() {
        let q = Quaternion::new(1.0, -2.0, 3.0, 0.5);
        assert_eq!(format!("{q}"), "(1-2i+3j+0.5k)");
    }
}
