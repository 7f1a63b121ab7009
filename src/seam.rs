// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seams
//!
//! A vertical seam is one column index per row, top to bottom.
//! Columns are stored as `u16`, which caps the images we accept at
//! 65535 pixels wide.

use crate::errors::{SeamError, SeamResult};
use itertools::Itertools;

/// One column index per image row.
pub type Seam = Vec<u16>;

/// A candidate seam and the score it was ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSeam {
    pub path: Seam,
    pub energy: u64,
}

/// True when every step between adjacent rows moves at most one
/// column left or right.
pub fn is_connected(seam: &[u16]) -> bool {
    seam.iter()
        .tuple_windows()
        .all(|(a, b)| (i32::from(*a) - i32::from(*b)).abs() <= 1)
}

/// Every seam in a batch has to span the whole map.
pub fn check_lengths<S: AsRef<[u16]>>(seams: &[S], height: usize) -> SeamResult<()> {
    match seams.iter().find(|s| s.as_ref().len() != height) {
        Some(seam) => Err(SeamError::SeamLength {
            expected: height,
            actual: seam.as_ref().len(),
        }),
        None => Ok(()),
    }
}

/// The columns a batch of seams removes from row `y`, ascending.
/// Duplicates are left in place for the splice to reject.
pub fn row_indices<S: AsRef<[u16]>>(seams: &[S], y: usize) -> Vec<usize> {
    seams
        .iter()
        .map(|seam| usize::from(seam.as_ref()[y]))
        .sorted()
        .collect()
}

/// Keep the `count` cheapest candidates.  The sort is stable, so ties
/// keep their starting-column order.
pub fn select_cheapest(mut seams: Vec<ScoredSeam>, count: usize) -> Vec<Seam> {
    seams.sort_by_key(|seam| seam.energy);
    seams.truncate(count);
    seams.into_iter().map(|seam| seam.path).collect()
}
