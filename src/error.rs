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

//! Defines the error types for quaternion math and the array container.

use std::fmt;
use std::io;

/// An error from a quaternion math operation.
///
/// Every fallible algebra operation returns `Result<_, MathError>` rather
/// than signalling through a global flag; infallible operations (addition,
/// the Hamilton product, `abs`) simply follow IEEE-754 rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MathError {
    /// Division by the zero quaternion.
    DivisionByZero,
    /// Inverse or normalization of the zero quaternion.
    ZeroNorm,
    /// A rotation axis (or polar axis) of zero length was supplied.
    ZeroAxis,
    /// Zero raised to a negative power.
    ZeroToNegativePower,
    /// A magnitude overflowed to infinity although every input part was finite.
    Overflow,
    /// A negative tolerance was passed to a closeness comparison.
    InvalidTolerance {
        /// The relative tolerance that was supplied.
        rel_tol: f64,
        /// The absolute tolerance that was supplied.
        abs_tol: f64,
    },
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::DivisionByZero => {
                write!(f, "quaternion division by zero")
            }
            MathError::ZeroNorm => {
                write!(f, "inverse/normalize of the zero quaternion")
            }
            MathError::ZeroAxis => {
                write!(f, "rotation axis has zero length")
            }
            MathError::ZeroToNegativePower => {
                write!(f, "0.0 cannot be raised to a negative power")
            }
            MathError::Overflow => {
                write!(f, "quaternion magnitude overflowed")
            }
            MathError::InvalidTolerance { rel_tol, abs_tol } => {
                write!(
                    f,
                    "tolerances must be non-negative (got rel_tol={rel_tol:.3e}, abs_tol={abs_tol:.3e})"
                )
            }
        }
    }
}

impl std::error::Error for MathError {}

/// An error from a [`QuaternionArray`](crate::QuaternionArray) operation.
#[derive(Debug)]
pub enum ArrayError {
    /// An integer index, after from-end resolution, fell outside `[0, count)`.
    IndexOutOfRange {
        /// The index as supplied by the caller.
        index: isize,
        /// The number of elements in the array at the time of the call.
        count: usize,
    },
    /// The requested quaternion is not present in the array.
    ValueNotFound,
    /// A slice with step zero was supplied.
    ZeroStep,
    /// An extended-slice assignment supplied the wrong number of elements.
    ExtendedSliceMismatch {
        /// The number of elements supplied for assignment.
        assigned: usize,
        /// The number of elements selected by the slice.
        selected: usize,
    },
    /// A byte buffer's length is not a whole number of quaternion records.
    ByteLength {
        /// The length of the supplied buffer in bytes.
        length: usize,
        /// The size of one quaternion record in bytes.
        item_size: usize,
    },
    /// A persisted state carried an unsupported format version.
    StateVersion {
        /// The version this crate reads and writes.
        expected: u32,
        /// The version found in the supplied state.
        got: u32,
    },
    /// A file read delivered fewer records than requested.
    UnexpectedEof {
        /// The number of bytes actually read.
        read: usize,
        /// The number of bytes requested.
        wanted: usize,
    },
    /// An underlying I/O operation failed.
    Io(io::Error),
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayError::IndexOutOfRange { index, count } => {
                write!(f, "array index {index} out of range for {count} elements")
            }
            ArrayError::ValueNotFound => {
                write!(f, "quaternion not in array")
            }
            ArrayError::ZeroStep => {
                write!(f, "slice step cannot be zero")
            }
            ArrayError::ExtendedSliceMismatch { assigned, selected } => {
                write!(
                    f,
                    "attempt to assign sequence of size {assigned} to extended slice of size {selected}"
                )
            }
            ArrayError::ByteLength { length, item_size } => {
                write!(
                    f,
                    "bytes length {length} not a multiple of quaternion size {item_size}"
                )
            }
            ArrayError::StateVersion { expected, got } => {
                write!(
                    f,
                    "expecting persisted quaternion array format version {expected} (got {got})"
                )
            }
            ArrayError::UnexpectedEof { read, wanted } => {
                write!(
                    f,
                    "read() didn't return enough bytes (read {read}, wanted {wanted})"
                )
            }
            ArrayError::Io(err) => {
                write!(f, "quaternion array I/O failed: {err}")
            }
        }
    }
}

impl std::error::Error for ArrayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArrayError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ArrayError {
    fn from(err: io::Error) -> Self {
        ArrayError::Io(err)
    }
}
