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

//! Versioned persisted state for [`QuaternionArray`].
//!
//! The state captures everything needed to reconstruct an array in a later
//! process: the element bytes and the reserve. The element count is not
//! stored, it derives from the byte length. The format version guards
//! against reading a state written by an incompatible release.

use serde::{Deserialize, Serialize};

use super::QuaternionArray;
use crate::error::ArrayError;

/// The state format version this crate writes and accepts.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// A self-contained snapshot of a [`QuaternionArray`].
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    bincode::Encode,
    bincode::Decode,
)]
pub struct ArrayState {
    /// The format version, [`STATE_FORMAT_VERSION`] when written by this
    /// crate.
    pub version: u32,
    /// The array's allocation floor.
    pub reserved: usize,
    /// The element records as flat bytes, 32 per element.
    pub data: Vec<u8>,
}

impl QuaternionArray {
    /// Captures the array as a persistable state.
    pub fn dump_state(&self) -> ArrayState {
        ArrayState {
            version: STATE_FORMAT_VERSION,
            reserved: self.reserved,
            data: self.to_bytes(),
        }
    }

    /// Reconstructs an array from a persisted state.
    ///
    /// # Errors
    /// `ArrayError::StateVersion` for a state written in an unsupported
    /// format version, `ArrayError::ByteLength` when the data is not a
    /// whole number of records.
    pub fn restore_state(state: &ArrayState) -> Result<Self, ArrayError> {
        if state.version != STATE_FORMAT_VERSION {
            return Err(ArrayError::StateVersion {
                expected: STATE_FORMAT_VERSION,
                got: state.version,
            });
        }
        let mut arr = Self::from_bytes(&state.data)?;
        arr.reserve(state.reserved);
        Ok(arr)
    }
}
