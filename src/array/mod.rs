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

//! A contiguous growable buffer of quaternion records.
//!
//! [`QuaternionArray`] keeps three sizes: `count` (elements in use),
//! `allocated` (slots backed by memory, always `>= count`) and `reserved`
//! (a floor below which the allocation never drops). Growth adds ~10%
//! headroom plus ten slots so steady appends reallocate rarely; slice
//! deletion gives memory back only once `count` falls well below 60% of
//! the allocation, so a delete/append flutter near the boundary cannot
//! thrash the allocator.
//!
//! Indexing follows Python sequence conventions: negative indices count
//! from the end, and `start:stop:step` slices (see [`Slice`]) clamp their
//! bounds instead of failing.

pub mod slice;
pub mod state;

pub use slice::{ResolvedSlice, Slice};
pub use state::{ArrayState, STATE_FORMAT_VERSION};

use crate::error::ArrayError;
use crate::math::Quaternion;

use std::fmt;
use std::io::{Read, Write};

/// File I/O moves at most this many bytes per read/write call.
const IO_BLOCK_SIZE: usize = 64 * 1024;

/// A growable array of quaternions stored as contiguous 32-byte records.
///
/// Elements are stored by value, four native-endian `f64`s per record in
/// `(w, x, y, z)` order, so the whole array can be serialized as flat
/// bytes with no per-element framing.
///
/// The array is not internally synchronized. Shared use across threads
/// needs external locking: at most one mutator, and no reader overlapping
/// a mutator.
#[derive(Clone)]
pub struct QuaternionArray {
    /// Backing slots; `buf.len()` is the allocated size, `>= count`.
    buf: Vec<Quaternion>,
    /// The number of slots in use.
    count: usize,
    /// The allocation never drops below this many slots.
    reserved: usize,
}

impl QuaternionArray {
    /// The size of one quaternion record in bytes.
    pub const ITEM_SIZE: usize = std::mem::size_of::<Quaternion>();

    // --- Construction ---

    /// Creates an empty array with the default allocation.
    pub fn new() -> Self {
        Self {
            buf: vec![Quaternion::ZERO; Self::next_allocated_size(0)],
            count: 0,
            reserved: 0,
        }
    }

    /// Creates an empty array whose allocation never drops below
    /// `reserved` slots.
    pub fn with_reserve(reserved: usize) -> Self {
        let allocated = Self::next_allocated_size(0).max(reserved);
        Self {
            buf: vec![Quaternion::ZERO; allocated],
            count: 0,
            reserved,
        }
    }

    /// Creates an array holding a copy of `items`.
    pub fn from_slice(items: &[Quaternion]) -> Self {
        let mut arr = Self {
            buf: vec![Quaternion::ZERO; Self::next_allocated_size(items.len())],
            count: items.len(),
            reserved: 0,
        };
        arr.buf[..items.len()].copy_from_slice(items);
        arr
    }

    /// Creates an array from flat bytes, 32 bytes per record in native
    /// endian `(w, x, y, z)` order.
    ///
    /// # Errors
    /// `ArrayError::ByteLength` when the length is not a whole number of
    /// records.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArrayError> {
        let items = Self::decode_records(bytes)?;
        Ok(Self::from_slice(&items))
    }

    // --- Accessors ---

    /// The number of elements in the array.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// `true` when the array holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The size of one element in bytes (always 32).
    #[inline]
    pub fn item_size(&self) -> usize {
        Self::ITEM_SIZE
    }

    /// The number of slots currently backed by memory.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.buf.len()
    }

    /// The slot count floor set by [`QuaternionArray::reserve`] or
    /// construction.
    #[inline]
    pub fn reserved(&self) -> usize {
        self.reserved
    }

    /// The elements in use, as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Quaternion] {
        &self.buf[..self.count]
    }

    /// Iterates the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Quaternion> {
        self.as_slice().iter()
    }

    /// A `(address, count)` snapshot of the buffer. The address is zero
    /// for an empty array, and stale as soon as the array reallocates.
    pub fn buffer_info(&self) -> (usize, usize) {
        let address = if self.count > 0 {
            self.buf.as_ptr() as usize
        } else {
            0
        };
        (address, self.count)
    }

    // --- Element Operations ---

    /// Appends a value to the end of the array.
    pub fn append(&mut self, value: impl Into<Quaternion>) {
        self.ensure_room(self.count + 1);
        self.buf[self.count] = value.into();
        self.count += 1;
    }

    /// Inserts a value before position `index`.
    ///
    /// Negative indices count from the end; an index beyond either end is
    /// clamped, so `insert` cannot fail on position.
    pub fn insert(&mut self, index: isize, value: impl Into<Quaternion>) {
        let mut i = if index < 0 {
            index + self.count as isize
        } else {
            index
        };
        if i < 0 {
            i = 0;
        }
        let i = (i as usize).min(self.count);

        self.ensure_room(self.count + 1);
        self.buf.copy_within(i..self.count, i + 1);
        self.buf[i] = value.into();
        self.count += 1;
    }

    /// Appends every value of an iterator, growing the allocation at most
    /// once.
    pub fn extend_from<T, I>(&mut self, values: I)
    where
        T: Into<Quaternion>,
        I: IntoIterator<Item = T>,
    {
        let items: Vec<Quaternion> = values.into_iter().map(Into::into).collect();
        self.ensure_room(self.count + items.len());
        self.buf[self.count..self.count + items.len()].copy_from_slice(&items);
        self.count += items.len();
    }

    /// Removes and returns the element at `index` (from-end for negative
    /// values).
    ///
    /// # Errors
    /// `ArrayError::IndexOutOfRange` when the index does not name an
    /// element; popping an empty array is always out of range.
    pub fn pop(&mut self, index: isize) -> Result<Quaternion, ArrayError> {
        let i = self.resolve_index(index)?;
        let value = self.buf[i];
        self.buf.copy_within(i + 1..self.count, i);
        self.count -= 1;
        Ok(value)
    }

    /// Removes the first occurrence of a value.
    ///
    /// # Errors
    /// `ArrayError::ValueNotFound` when the value is not present.
    pub fn remove(&mut self, value: impl Into<Quaternion>) -> Result<(), ArrayError> {
        let i = self.index_of(value)?;
        self.buf.copy_within(i + 1..self.count, i);
        self.count -= 1;
        Ok(())
    }

    /// The index of the first occurrence of a value.
    ///
    /// Comparison is element-wise `f64` equality, so `0.0` and `-0.0`
    /// match while NaN never does.
    ///
    /// # Errors
    /// `ArrayError::ValueNotFound` when the value is not present.
    pub fn index_of(&self, value: impl Into<Quaternion>) -> Result<usize, ArrayError> {
        let q = value.into();
        self.as_slice()
            .iter()
            .position(|&e| e == q)
            .ok_or(ArrayError::ValueNotFound)
    }

    /// The number of occurrences of a value.
    pub fn count_of(&self, value: impl Into<Quaternion>) -> usize {
        let q = value.into();
        self.as_slice().iter().filter(|&&e| e == q).count()
    }

    /// Removes all elements. The allocation returns to the default size,
    /// floored by the reserve.
    pub fn clear(&mut self) {
        self.count = 0;
        self.reallocate(0, false);
    }

    /// Raises the allocation floor to at least `reserved` slots, growing
    /// the allocation now if needed. Lowering the floor never releases
    /// memory by itself.
    pub fn reserve(&mut self, reserved: usize) {
        self.reserved = reserved;
        if self.buf.len() < reserved {
            self.reallocate(reserved, true);
        }
    }

    /// Returns the element at `index` (from-end for negative values).
    ///
    /// # Errors
    /// `ArrayError::IndexOutOfRange` when the index does not name an
    /// element.
    pub fn get(&self, index: isize) -> Result<Quaternion, ArrayError> {
        let i = self.resolve_index(index)?;
        Ok(self.buf[i])
    }

    /// Replaces the element at `index` (from-end for negative values).
    ///
    /// # Errors
    /// `ArrayError::IndexOutOfRange` when the index does not name an
    /// element.
    pub fn set(&mut self, index: isize, value: impl Into<Quaternion>) -> Result<(), ArrayError> {
        let i = self.resolve_index(index)?;
        self.buf[i] = value.into();
        Ok(())
    }

    /// Deletes the element at `index` (from-end for negative values).
    ///
    /// Single-element deletion never shrinks the allocation; only slice
    /// deletion applies the shrink policy.
    ///
    /// # Errors
    /// `ArrayError::IndexOutOfRange` when the index does not name an
    /// element.
    pub fn delete(&mut self, index: isize) -> Result<(), ArrayError> {
        self.pop(index).map(|_| ())
    }

    // --- Slice Operations ---

    /// Copies the elements selected by a slice into a new array.
    ///
    /// # Errors
    /// `ArrayError::ZeroStep` for a zero-step slice.
    pub fn get_slice(&self, slice: Slice) -> Result<Self, ArrayError> {
        let r = slice.resolve(self.count)?;
        let mut out = Self {
            buf: vec![Quaternion::ZERO; Self::next_allocated_size(r.count)],
            count: r.count,
            reserved: 0,
        };
        for (k, i) in r.indices().enumerate() {
            out.buf[k] = self.buf[i];
        }
        Ok(out)
    }

    /// Assigns `values` to the elements selected by a slice.
    ///
    /// A step-1 slice splices: the selected run is replaced by `values`
    /// whatever their number, shifting the tail. Any other step is an
    /// extended slice and requires exactly as many values as selected
    /// elements.
    ///
    /// # Errors
    /// `ArrayError::ZeroStep` for a zero-step slice, and
    /// `ArrayError::ExtendedSliceMismatch` when an extended slice gets the
    /// wrong number of values.
    pub fn set_slice(&mut self, slice: Slice, values: &[Quaternion]) -> Result<(), ArrayError> {
        let r = slice.resolve(self.count)?;
        let replaced = r.count;
        let assigned = values.len();

        if r.step == 1 {
            let start = r.start as usize;
            let stop = start + replaced;
            let new_count = self.count - replaced + assigned;

            self.ensure_room(new_count);
            if assigned != replaced {
                // Shift the tail before the replacement lands.
                self.buf
                    .copy_within(stop..self.count, start + assigned);
            }
            self.buf[start..start + assigned].copy_from_slice(values);
            self.count = new_count;
        } else {
            if assigned != replaced {
                return Err(ArrayError::ExtendedSliceMismatch {
                    assigned,
                    selected: replaced,
                });
            }
            for (k, i) in r.indices().enumerate() {
                self.buf[i] = values[k];
            }
        }
        Ok(())
    }

    /// Deletes the elements selected by a slice, then applies the shrink
    /// policy: when the remaining count falls more than ten elements
    /// below 60% of the allocation, the allocation drops to that 60%
    /// mark (floored by the reserve).
    ///
    /// # Errors
    /// `ArrayError::ZeroStep` for a zero-step slice.
    pub fn delete_slice(&mut self, slice: Slice) -> Result<(), ArrayError> {
        let r = slice.resolve(self.count)?;
        let deleted = r.count;

        if deleted > 0 {
            // Deletion order doesn't matter, so fold a negative step into
            // an equivalent ascending one.
            let (start, step) = if r.step < 0 {
                (
                    (r.start + (deleted as isize - 1) * r.step) as usize,
                    (-r.step) as usize,
                )
            } else {
                (r.start as usize, r.step as usize)
            };

            if step == 1 {
                self.buf.copy_within(start + deleted..self.count, start);
            } else {
                // Close each gap by pulling forward the surviving run
                // between consecutive selected indices.
                let per_move = step - 1;
                for j in 0..deleted {
                    let src = start + j * step + 1;
                    let dest = start + j * per_move;
                    let n = per_move.min(self.count.saturating_sub(src));
                    if n > 0 {
                        self.buf.copy_within(src..src + n, dest);
                    }
                }
                let last_src = start + deleted * step;
                if last_src < self.count {
                    let dest = start + deleted * per_move;
                    self.buf.copy_within(last_src..self.count, dest);
                }
            }
            self.count -= deleted;
        }

        self.maybe_shrink();
        Ok(())
    }

    // --- Bulk Operations ---

    /// Reverses the element order in place.
    pub fn reverse(&mut self) {
        let count = self.count;
        self.buf[..count].reverse();
    }

    /// Reverses the byte order of every `f64` in every element, for
    /// moving flat bytes between machines of opposite endianness.
    pub fn byteswap(&mut self) {
        for q in &mut self.buf[..self.count] {
            q.w = f64::from_bits(q.w.to_bits().swap_bytes());
            q.x = f64::from_bits(q.x.to_bits().swap_bytes());
            q.y = f64::from_bits(q.y.to_bits().swap_bytes());
            q.z = f64::from_bits(q.z.to_bits().swap_bytes());
        }
    }

    /// The elements as flat bytes, 32 per record in native endian
    /// `(w, x, y, z)` order.
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(self.as_slice()).to_vec()
    }

    /// Appends records decoded from flat bytes.
    ///
    /// # Errors
    /// `ArrayError::ByteLength` when the length is not a whole number of
    /// records; nothing is appended in that case.
    pub fn extend_from_bytes(&mut self, bytes: &[u8]) -> Result<(), ArrayError> {
        let items = Self::decode_records(bytes)?;
        self.extend_from(items);
        Ok(())
    }

    /// Returns a new array holding this array's elements followed by
    /// `other`'s.
    pub fn concat(&self, other: &Self) -> Self {
        let mut out = Self {
            buf: vec![Quaternion::ZERO; Self::next_allocated_size(self.count + other.count)],
            count: self.count + other.count,
            reserved: 0,
        };
        out.buf[..self.count].copy_from_slice(self.as_slice());
        out.buf[self.count..out.count].copy_from_slice(other.as_slice());
        out
    }

    /// Appends all of `other`'s elements to this array.
    pub fn concat_in_place(&mut self, other: &Self) {
        let new_count = self.count + other.count;
        self.ensure_room(new_count);
        self.buf[self.count..new_count].copy_from_slice(other.as_slice());
        self.count = new_count;
    }

    /// Returns a new array holding this array's elements `repeat` times
    /// over.
    pub fn repeat(&self, repeat: usize) -> Self {
        let mut out = Self {
            buf: vec![Quaternion::ZERO; Self::next_allocated_size(self.count * repeat)],
            count: self.count * repeat,
            reserved: 0,
        };
        for k in 0..repeat {
            out.buf[k * self.count..(k + 1) * self.count].copy_from_slice(self.as_slice());
        }
        out
    }

    /// Repeats this array's elements `repeat` times over, in place. The
    /// buffer is grown before any copy, so the source run is stable while
    /// it is duplicated. `repeat_in_place(0)` empties the array.
    pub fn repeat_in_place(&mut self, repeat: usize) {
        let unit = self.count;
        let new_count = unit * repeat;
        self.ensure_room(new_count);
        for k in 1..repeat {
            self.buf.copy_within(0..unit, k * unit);
        }
        self.count = new_count;
    }

    // --- File I/O ---

    /// Writes all elements as flat bytes, at most 64 KiB per write call.
    ///
    /// # Errors
    /// Any I/O failure, as `ArrayError::Io`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), ArrayError> {
        let bytes = bytemuck::cast_slice::<Quaternion, u8>(self.as_slice());
        for block in bytes.chunks(IO_BLOCK_SIZE) {
            writer.write_all(block)?;
        }
        Ok(())
    }

    /// Reads up to `n` records and appends them, at most 64 KiB per read
    /// call.
    ///
    /// A source that runs out early still contributes every whole record
    /// it delivered: those are appended, a ragged trailing fragment is
    /// dropped, and the shortfall reported as `ArrayError::UnexpectedEof`.
    ///
    /// # Errors
    /// `ArrayError::UnexpectedEof` after a short read, or any I/O failure
    /// as `ArrayError::Io`.
    pub fn read_from<R: Read>(&mut self, reader: &mut R, n: usize) -> Result<(), ArrayError> {
        let wanted = n * Self::ITEM_SIZE;
        if wanted == 0 {
            return Ok(());
        }

        let mut data = Vec::with_capacity(wanted.min(IO_BLOCK_SIZE));
        let mut block = vec![0u8; wanted.min(IO_BLOCK_SIZE)];
        while data.len() < wanted {
            let ask = (wanted - data.len()).min(block.len());
            let got = reader.read(&mut block[..ask])?;
            if got == 0 {
                break;
            }
            data.extend_from_slice(&block[..got]);
        }

        // Keep the whole records even when the source ran dry mid-record.
        let whole = data.len() / Self::ITEM_SIZE * Self::ITEM_SIZE;
        self.extend_from_bytes(&data[..whole])?;
        if data.len() < wanted {
            return Err(ArrayError::UnexpectedEof {
                read: data.len(),
                wanted,
            });
        }
        Ok(())
    }

    // --- Capacity Internals ---

    /// The allocation for at least `minimum` slots: +10% or +10,
    /// whichever is more.
    fn next_allocated_size(minimum: usize) -> usize {
        (minimum * 11 / 10).max(minimum + 10)
    }

    /// Resizes the backing buffer to `new_size` slots (exact) or to
    /// `new_size` plus headroom, floored by the reserve either way.
    fn reallocate(&mut self, new_size: usize, exact: bool) {
        let target = if exact {
            new_size
        } else {
            Self::next_allocated_size(new_size)
        }
        .max(self.reserved);

        if target != self.buf.len() {
            log::trace!(
                "quaternion array realloc: {} -> {} slots ({} in use)",
                self.buf.len(),
                target,
                self.count
            );
            self.buf.resize(target, Quaternion::ZERO);
        }
    }

    /// Grows the allocation (with headroom) when `needed` exceeds it.
    fn ensure_room(&mut self, needed: usize) {
        if needed > self.buf.len() {
            self.reallocate(needed, false);
        }
    }

    /// Releases memory after deletion: shrink to 60% of the allocation
    /// once the count is more than ten elements under that mark.
    fn maybe_shrink(&mut self) {
        let threshold = self.buf.len() * 3 / 5;
        if self.count + 10 < threshold {
            log::trace!(
                "quaternion array shrink: {} -> {} slots ({} in use)",
                self.buf.len(),
                threshold,
                self.count
            );
            self.reallocate(threshold, true);
        }
    }

    /// Resolves a possibly-negative element index against the count.
    fn resolve_index(&self, index: isize) -> Result<usize, ArrayError> {
        let i = if index < 0 {
            index + self.count as isize
        } else {
            index
        };
        if i < 0 || i >= self.count as isize {
            return Err(ArrayError::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        Ok(i as usize)
    }

    /// Decodes flat bytes into quaternion records.
    fn decode_records(bytes: &[u8]) -> Result<Vec<Quaternion>, ArrayError> {
        if bytes.len() % Self::ITEM_SIZE != 0 {
            return Err(ArrayError::ByteLength {
                length: bytes.len(),
                item_size: Self::ITEM_SIZE,
            });
        }
        // Byte-wise decode; the input has no alignment guarantee.
        let mut items = Vec::with_capacity(bytes.len() / Self::ITEM_SIZE);
        for record in bytes.chunks_exact(Self::ITEM_SIZE) {
            let mut parts = [0.0_f64; 4];
            for (part, chunk) in parts.iter_mut().zip(record.chunks_exact(8)) {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(chunk);
                *part = f64::from_ne_bytes(raw);
            }
            items.push(Quaternion::new(parts[0], parts[1], parts[2], parts[3]));
        }
        Ok(items)
    }
}

impl Default for QuaternionArray {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for QuaternionArray {
    /// Element-wise equality over the elements in use; allocation and
    /// reserve play no part. There is no ordering between arrays.
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Into<Quaternion>> FromIterator<T> for QuaternionArray {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<Quaternion> = iter.into_iter().map(Into::into).collect();
        Self::from_slice(&items)
    }
}

impl<'a> IntoIterator for &'a QuaternionArray {
    type Item = &'a Quaternion;
    type IntoIter = std::slice::Iter<'a, Quaternion>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for QuaternionArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuaternionArray")
            .field("count", &self.count)
            .field("allocated", &self.buf.len())
            .field("reserved", &self.reserved)
            .field("items", &self.as_slice())
            .finish()
    }
}

impl fmt::Display for QuaternionArray {
    /// Formats as a bracketed, comma-separated element list.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (k, q) in self.iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{q}")?;
        }
        write!(f, "]")
    }
}
