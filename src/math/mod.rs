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

//! Quaternion mathematics: the value type, rotation geometry and the
//! transcendental function family.
//!
//! All angular quantities are in **radians**. The quaternion follows
//! Hamilton's convention (`i·j = k`, multiplication does not commute).

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons in tests and geometry.
pub const EPSILON: f64 = 1e-12;

/// Below this magnitude a quaternion is treated as null during polar
/// decomposition, to avoid dividing by a denormal-range norm.
pub(crate) const NULL_QUAT_THRESHOLD: f64 = 1.0e-160;

/// Below this sine value a quaternion is treated as purely real during polar
/// decomposition and an arbitrary fixed axis (j) is reported.
pub(crate) const REAL_SINE_THRESHOLD: f64 = 1.0e-20;

/// Above this cosine of the angle between two quaternions, slerp falls back
/// to linear weights to avoid the removable singularity as the angle goes
/// to zero. Corresponds to roughly half a degree.
pub(crate) const SLERP_LINEAR_THRESHOLD: f64 = 0.99996;

/// The multiplier taking a natural logarithm to base 10 (1 / ln 10).
pub(crate) const LOG10_E: f64 = 0.4342944819032518;

// Re-export standard mathematical constants for convenience.
pub use std::f64::consts::{E, FRAC_PI_2, FRAC_PI_4, LN_10, LN_2, PI, SQRT_2, TAU};

// --- Declare Sub-Modules ---

pub mod functions;
pub mod matrix;
pub mod polar;
pub mod quaternion;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::matrix::Mat3;
pub use self::polar::Polar;
pub use self::quaternion::Quaternion;
pub use self::vector::Vec3;
