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

//! # quatcore
//!
//! Quaternion algebra and a growable quaternion array buffer.
//!
//! The crate has two halves. [`math`] provides the [`Quaternion`] value type
//! with its arithmetic, polar/rotation geometry and transcendental function
//! family, together with the supporting [`Vec3`] and [`Mat3`] types.
//! [`array`] provides [`QuaternionArray`], a contiguous growable buffer of
//! quaternion records with explicit capacity control, Python-style slice
//! semantics and flat-byte serialization.
//!
//! Nothing in this crate is internally synchronized; if an array is shared
//! across threads it requires external locking (at most one mutator, and no
//! reader overlapping a mutator).

#![warn(missing_docs)]

pub mod array;
pub mod error;
pub mod math;

pub use array::{ArrayState, QuaternionArray, Slice};
pub use error::{ArrayError, MathError};
pub use math::{Mat3, Polar, Quaternion, Vec3};
