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

//! Transcendental functions over quaternions.
//!
//! Each function factors the quaternion as `w + axis·s` where `s` is the
//! magnitude of the imaginary part and `axis` its unit direction. The pair
//! `(w, s)` behaves exactly like the complex number `w + s·i`, so the
//! scalar function is applied to that complex value and the imaginary
//! result is mapped back along `axis`. The axis is preserved; only the
//! angle and magnitude change.
//!
//! A quaternion with no imaginary part uses the fixed fallback axis j, so
//! functions of negative reals resolve the way complex numbers do:
//! `sqrt(-1) == j`.

use num_complex::Complex64;

use super::{Quaternion, Vec3, LOG10_E};

/// Applies a complex scalar function along the quaternion's imaginary axis.
fn lift(q: Quaternion, f: impl Fn(Complex64) -> Complex64) -> Quaternion {
    let v = q.imag();
    let s = v.length();
    let axis = if s > 0.0 { v / s } else { Vec3::Y };
    let c = f(Complex64::new(q.w, s));
    Quaternion::new(c.re, axis.x * c.im, axis.y * c.im, axis.z * c.im)
}

/// The square root of a quaternion. Negative reals resolve onto the j axis.
pub fn sqrt(q: Quaternion) -> Quaternion {
    lift(q, |c| c.sqrt())
}

/// The exponential of a quaternion.
pub fn exp(q: Quaternion) -> Quaternion {
    lift(q, |c| c.exp())
}

/// The natural logarithm of a quaternion. The logarithm of a negative real
/// carries pi worth of imaginary on the j axis, as `exp(pi·j) == -1`.
pub fn ln(q: Quaternion) -> Quaternion {
    lift(q, |c| c.ln())
}

/// The logarithm of a quaternion to an arbitrary real base.
pub fn log(q: Quaternion, base: f64) -> Quaternion {
    ln(q) * (1.0 / base.ln())
}

/// The base-10 logarithm of a quaternion.
pub fn log10(q: Quaternion) -> Quaternion {
    ln(q) * LOG10_E
}

/// The sine of a quaternion.
pub fn sin(q: Quaternion) -> Quaternion {
    lift(q, |c| c.sin())
}

/// The cosine of a quaternion.
pub fn cos(q: Quaternion) -> Quaternion {
    lift(q, |c| c.cos())
}

/// The tangent of a quaternion.
pub fn tan(q: Quaternion) -> Quaternion {
    lift(q, |c| c.tan())
}

/// The arc sine of a quaternion.
pub fn asin(q: Quaternion) -> Quaternion {
    lift(q, |c| c.asin())
}

/// The arc cosine of a quaternion.
pub fn acos(q: Quaternion) -> Quaternion {
    lift(q, |c| c.acos())
}

/// The arc tangent of a quaternion.
pub fn atan(q: Quaternion) -> Quaternion {
    lift(q, |c| c.atan())
}

/// The hyperbolic sine of a quaternion.
pub fn sinh(q: Quaternion) -> Quaternion {
    lift(q, |c| c.sinh())
}

/// The hyperbolic cosine of a quaternion.
pub fn cosh(q: Quaternion) -> Quaternion {
    lift(q, |c| c.cosh())
}

/// The hyperbolic tangent of a quaternion.
pub fn tanh(q: Quaternion) -> Quaternion {
    lift(q, |c| c.tanh())
}

/// The inverse hyperbolic sine of a quaternion.
pub fn asinh(q: Quaternion) -> Quaternion {
    lift(q, |c| c.asinh())
}

/// The inverse hyperbolic cosine of a quaternion.
pub fn acosh(q: Quaternion) -> Quaternion {
    lift(q, |c| c.acosh())
}

/// The inverse hyperbolic tangent of a quaternion.
pub fn atanh(q: Quaternion) -> Quaternion {
    lift(q, |c| c.atanh())
}
