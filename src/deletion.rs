// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Row splicing
//!
//! Every map in this crate shrinks the same way: a row loses a
//! handful of columns and everything to the right of each one slides
//! left.  Rather than shuffle the row in place one removal at a time,
//! we allocate the shorter row once and copy the surviving spans into
//! it in bulk.

use crate::errors::{SeamError, SeamResult};

/// Return a copy of `array` without the `elements_per_removal`-wide
/// chunks starting at each of `indices`.  The indices must be
/// strictly ascending, and no chunk may overlap the next one; all the
/// callers in this crate sort their lists first, so a violation here
/// is a bug, not bad input.
pub fn delete_array_indices<T: Copy>(
    array: &[T],
    indices: &[usize],
    elements_per_removal: usize,
) -> SeamResult<Vec<T>> {
    let removed = indices.len() * elements_per_removal;
    let mut result = Vec::with_capacity(array.len().saturating_sub(removed));
    let mut source_start = 0;
    let mut previous: Option<usize> = None;

    for &index in indices {
        if let Some(previous) = previous {
            if index == previous {
                return Err(SeamError::DuplicateIndex { index });
            }
            if index < previous {
                return Err(SeamError::UnsortedIndices { previous, index });
            }
            // Chunks that overlap claim the same element twice.
            if index < source_start {
                return Err(SeamError::DuplicateIndex { index });
            }
        }
        if index + elements_per_removal > array.len() {
            return Err(SeamError::IndexOutOfBounds {
                index,
                len: array.len(),
            });
        }

        result.extend_from_slice(&array[source_start..index]);
        source_start = index + elements_per_removal;
        previous = Some(index);
    }

    result.extend_from_slice(&array[source_start..]);
    Ok(result)
}

/// The common case: remove single elements.
pub fn delete_indices<T: Copy>(array: &[T], indices: &[usize]) -> SeamResult<Vec<T>> {
    delete_array_indices(array, indices, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_single_elements() {
        let source: Vec<u32> = vec![10, 11, 12, 13, 14, 15];
        let result = delete_indices(&source, &[0, 3, 5]).unwrap();
        assert_eq!(result, vec![11, 12, 14]);
    }

    #[test]
    fn empty_index_list_is_identity() {
        let source: Vec<u16> = vec![4, 8, 15, 16, 23, 42];
        let result = delete_indices(&source, &[]).unwrap();
        assert_eq!(result, source);
    }

    #[test]
    fn removes_fixed_width_chunks() {
        // Four RGBA pixels; drop the second and the fourth.
        let source: Vec<u8> = (0..16).collect();
        let result = delete_array_indices(&source, &[4, 12], 4).unwrap();
        assert_eq!(result, vec![0, 1, 2, 3, 8, 9, 10, 11]);
        assert_eq!(result.len(), source.len() - 2 * 4);
    }

    #[test]
    fn keeps_the_element_type() {
        let source: Vec<i8> = vec![-1, 0, 1];
        let result: Vec<i8> = delete_indices(&source, &[1]).unwrap();
        assert_eq!(result, vec![-1, 1]);

        let source: Vec<f32> = vec![0.5, 1.5, 2.5];
        let result: Vec<f32> = delete_indices(&source, &[2]).unwrap();
        assert_eq!(result, vec![0.5, 1.5]);
    }

    #[test]
    fn removes_everything() {
        let source: Vec<u32> = vec![1, 2, 3];
        assert!(delete_indices(&source, &[0, 1, 2]).unwrap().is_empty());
    }

    #[test]
    fn rejects_duplicates() {
        let source: Vec<u32> = vec![1, 2, 3, 4];
        assert_eq!(
            delete_indices(&source, &[1, 1]),
            Err(SeamError::DuplicateIndex { index: 1 })
        );
    }

    #[test]
    fn rejects_unsorted() {
        let source: Vec<u32> = vec![1, 2, 3, 4];
        assert_eq!(
            delete_indices(&source, &[2, 0]),
            Err(SeamError::UnsortedIndices {
                previous: 2,
                index: 0
            })
        );
    }

    #[test]
    fn rejects_overlapping_chunks() {
        let source: Vec<u8> = (0..8).collect();
        assert_eq!(
            delete_array_indices(&source, &[0, 2], 4),
            Err(SeamError::DuplicateIndex { index: 2 })
        );
    }

    #[test]
    fn rejects_out_of_bounds() {
        let source: Vec<u32> = vec![1, 2, 3];
        assert_eq!(
            delete_indices(&source, &[3]),
            Err(SeamError::IndexOutOfBounds { index: 3, len: 3 })
        );
    }

    #[test]
    fn survivors_match_a_filter() {
        let source: Vec<u16> = (0..100).map(|v| v * 3).collect();
        let indices: Vec<usize> = (0..100).filter(|i| i % 7 == 2).collect();
        let expected: Vec<u16> = source
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 7 != 2)
            .map(|(_, v)| *v)
            .collect();
        let result = delete_indices(&source, &indices).unwrap();
        assert_eq!(result.len(), source.len() - indices.len());
        assert_eq!(result, expected);
    }
}
