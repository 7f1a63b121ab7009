// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors
//!
//! Two kinds of thing go wrong here.  The caller can ask for
//! something impossible (more seams than the image has columns, a
//! mask that doesn't fit the image), and the seam machinery can
//! contradict itself (two seams through one pixel, an unsorted splice
//! list).  The first kind is the caller's to fix; the second kind
//! means the generation session is dead.

use failure::Fail;

/// Everything that can go wrong while building a seam priority grid.
#[derive(Debug, Fail, PartialEq)]
pub enum SeamError {
    #[fail(display = "invalid image dimensions {}x{}", width, height)]
    InvalidDimensions { width: u32, height: u32 },

    #[fail(display = "buffer holds {} bytes, expected {}", actual, expected)]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[fail(
        display = "mask is {}x{} but the image is {}x{}",
        mask_width, mask_height, width, height
    )]
    MaskDimensionMismatch {
        width: u32,
        height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[fail(
        display = "insufficient width: cannot generate {} seams for image with width {}",
        requested, width
    )]
    InsufficientWidth { requested: usize, width: usize },

    #[fail(display = "indices out of order: {} follows {}", index, previous)]
    UnsortedIndices { previous: usize, index: usize },

    #[fail(display = "duplicate index {}", index)]
    DuplicateIndex { index: usize },

    #[fail(display = "index {} out of bounds for length {}", index, len)]
    IndexOutOfBounds { index: usize, len: usize },

    #[fail(display = "seam overlap detected at original pixel {}", original_index)]
    SeamOverlap { original_index: usize },

    #[fail(display = "seam has {} rows, expected {}", actual, expected)]
    SeamLength { expected: usize, actual: usize },

    #[fail(display = "the {} generator is not implemented", generator)]
    Unimplemented { generator: &'static str },

    #[fail(display = "generation session aborted by an earlier failure")]
    Poisoned,

    #[fail(display = "an energy map worker panicked")]
    WorkerPanicked,
}

impl SeamError {
    /// Contract violations are internal inconsistencies: the session
    /// that produced one cannot continue.
    pub fn is_fatal(&self) -> bool {
        match self {
            SeamError::UnsortedIndices { .. }
            | SeamError::DuplicateIndex { .. }
            | SeamError::IndexOutOfBounds { .. }
            | SeamError::SeamOverlap { .. }
            | SeamError::SeamLength { .. }
            | SeamError::WorkerPanicked
            | SeamError::Poisoned => true,
            _ => false,
        }
    }
}

pub type SeamResult<T> = Result<T, SeamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_width_is_recoverable() {
        let err = SeamError::InsufficientWidth {
            requested: 8,
            width: 8,
        };
        assert!(!err.is_fatal());
        assert!(err.to_string().starts_with("insufficient width"));
    }

    #[test]
    fn overlap_is_fatal() {
        assert!(SeamError::SeamOverlap { original_index: 3 }.is_fatal());
    }
}
