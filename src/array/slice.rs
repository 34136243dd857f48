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

//! Python-style slice normalization.
//!
//! A [`Slice`] carries the caller's raw `start:stop:step` triple, with
//! `None` for omitted bounds. [`Slice::resolve`] adjusts it against a
//! concrete array length the way Python adjusts slice indices: negative
//! bounds count from the end, out-of-range bounds clamp instead of
//! failing, and an empty selection is an ordinary outcome.

use crate::error::ArrayError;

/// A `start:stop:step` selection over an array, before length adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    /// First selected index; `None` means the step-direction default.
    pub start: Option<isize>,
    /// One-past-last selected index; `None` means the step-direction default.
    pub stop: Option<isize>,
    /// The stride between selected indices. May be negative, never zero.
    pub step: isize,
}

impl Slice {
    /// The slice selecting every element in order (`[:]`).
    pub const FULL: Self = Self {
        start: None,
        stop: None,
        step: 1,
    };

    /// Creates a slice from raw bounds and step.
    #[inline]
    pub const fn new(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Self { start, stop, step }
    }

    /// Creates a step-1 slice `[start:stop]`.
    #[inline]
    pub const fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), 1)
    }

    /// Adjusts the slice against an array of `len` elements.
    ///
    /// Negative bounds count back from the end; bounds still outside the
    /// array after that are clamped. Omitted bounds default to the whole
    /// array in the step's direction.
    ///
    /// # Errors
    /// `ArrayError::ZeroStep` when the step is zero.
    pub fn resolve(&self, len: usize) -> Result<ResolvedSlice, ArrayError> {
        if self.step == 0 {
            return Err(ArrayError::ZeroStep);
        }
        let step = self.step;
        let len = len as isize;

        let adjust = |bound: Option<isize>, omitted: isize, low: isize| -> isize {
            match bound {
                None => omitted,
                Some(mut b) => {
                    if b < 0 {
                        b += len;
                        if b < 0 {
                            b = low;
                        }
                    } else if b >= len {
                        b = if step < 0 { len - 1 } else { len };
                    }
                    b
                }
            }
        };

        let (start, stop) = if step > 0 {
            (adjust(self.start, 0, 0), adjust(self.stop, len, 0))
        } else {
            (adjust(self.start, len - 1, -1), adjust(self.stop, -1, -1))
        };

        let count = if step > 0 {
            if stop > start {
                ((stop - start + step - 1) / step) as usize
            } else {
                0
            }
        } else if start > stop {
            ((start - stop - step - 1) / -step) as usize
        } else {
            0
        };

        Ok(ResolvedSlice {
            start,
            stop,
            step,
            count,
        })
    }
}

impl Default for Slice {
    fn default() -> Self {
        Self::FULL
    }
}

/// A slice adjusted against a concrete array length.
///
/// Every index it yields is in range for the array it was resolved
/// against, as long as the array has not shrunk since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSlice {
    /// The first selected index (meaningful only when `count > 0`).
    pub start: isize,
    /// The adjusted stop bound; `-1` is a valid bound for a negative step.
    pub stop: isize,
    /// The stride, never zero.
    pub step: isize,
    /// The number of selected elements.
    pub count: usize,
}

impl ResolvedSlice {
    /// The array index of the `k`-th selected element, `k < count`.
    #[inline]
    pub fn index(&self, k: usize) -> usize {
        (self.start + k as isize * self.step) as usize
    }

    /// Iterates the selected array indices in slice order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).map(|k| self.index(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(slice: Slice, len: usize) -> Vec<usize> {
        slice.resolve(len).unwrap().indices().collect()
    }

    #[test]
    fn test_full_slice() {
        assert_eq!(indices(Slice::FULL, 4), vec![0, 1, 2, 3]);
        assert_eq!(indices(Slice::FULL, 0), Vec::<usize>::new());
    }

    #[test]
    fn test_stepped_slice() {
        // [2:8:2] selects 2, 4, 6.
        let s = Slice::new(Some(2), Some(8), 2);
        assert_eq!(indices(s, 10), vec![2, 4, 6]);
        let r = s.resolve(10).unwrap();
        assert_eq!(r.count, 3);
    }

    #[test]
    fn test_negative_bounds_count_from_end() {
        assert_eq!(indices(Slice::range(-3, -1), 5), vec![2, 3]);
        assert_eq!(indices(Slice::new(Some(-2), None, 1), 5), vec![3, 4]);
    }

    #[test]
    fn test_out_of_range_bounds_clamp() {
        assert_eq!(indices(Slice::range(5, 100), 7), vec![5, 6]);
        assert_eq!(indices(Slice::range(-100, 2), 7), vec![0, 1]);
        assert_eq!(indices(Slice::range(8, 100), 7), Vec::<usize>::new());
    }

    #[test]
    fn test_negative_step() {
        // [::-1] walks the whole array backwards.
        let s = Slice::new(None, None, -1);
        assert_eq!(indices(s, 4), vec![3, 2, 1, 0]);

        // [::-2] on five elements selects 4, 2, 0.
        let s = Slice::new(None, None, -2);
        assert_eq!(indices(s, 5), vec![4, 2, 0]);

        // [3:0:-1] excludes the stop bound.
        let s = Slice::new(Some(3), Some(0), -1);
        assert_eq!(indices(s, 5), vec![3, 2, 1]);
    }

    #[test]
    fn test_empty_selections() {
        assert_eq!(indices(Slice::range(3, 3), 5), Vec::<usize>::new());
        assert_eq!(indices(Slice::range(4, 2), 5), Vec::<usize>::new());
        let s = Slice::new(Some(1), Some(3), -1);
        assert_eq!(indices(s, 5), Vec::<usize>::new());
    }

    #[test]
    fn test_zero_step_is_an_error() {
        let s = Slice::new(None, None, 0);
        assert!(matches!(s.resolve(5), Err(ArrayError::ZeroStep)));
    }
}
