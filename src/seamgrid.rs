// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam priority grid
//!
//! One cell per pixel of the original image, holding the order in
//! which that pixel's seam was carved out, or `SENTINEL` if no seam
//! has claimed it.  Orders count up across every batch of a session.

use crate::errors::{SeamError, SeamResult};
use crate::twodmap::RowMap;
use log::warn;

/// The value of an unclaimed cell.
pub const SENTINEL: u16 = u16::max_value();

#[derive(Debug, Clone, PartialEq)]
pub struct SeamPriorityGrid {
    width: usize,
    height: usize,
    cells: Vec<u16>,
    next_order: u16,
}

impl SeamPriorityGrid {
    pub fn new(width: usize, height: usize) -> Self {
        SeamPriorityGrid {
            width,
            height,
            cells: vec![SENTINEL; width * height],
            next_order: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// How many seams have been written so far.
    pub fn claimed_seams(&self) -> usize {
        usize::from(self.next_order)
    }

    /// Write the next order number under every pixel of `seam`, where
    /// `original_indices` maps the current columns back to the original
    /// image.  Nothing is written unless every pixel is still free.
    pub fn claim(&mut self, seam: &[u16], original_indices: &RowMap<u32>) -> SeamResult<u16> {
        if seam.len() != original_indices.height() {
            return Err(SeamError::SeamLength {
                expected: original_indices.height(),
                actual: seam.len(),
            });
        }

        let mut targets = Vec::with_capacity(seam.len());
        for (y, &x) in seam.iter().enumerate() {
            let row = original_indices.row(y);
            let x = usize::from(x);
            if x >= row.len() {
                return Err(SeamError::IndexOutOfBounds {
                    index: x,
                    len: row.len(),
                });
            }
            let original = row[x] as usize;
            if original >= self.cells.len() {
                return Err(SeamError::IndexOutOfBounds {
                    index: original,
                    len: self.cells.len(),
                });
            }
            if self.cells[original] != SENTINEL {
                warn!(
                    "seam {} collides with seam {} at pixel {}",
                    self.next_order, self.cells[original], original
                );
                return Err(SeamError::SeamOverlap {
                    original_index: original,
                });
            }
            targets.push(original);
        }

        let order = self.next_order;
        for original in targets {
            self.cells[original] = order;
        }
        self.next_order += 1;
        Ok(order)
    }

    /// The priority of original pixel `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> u16 {
        self.cells[y * self.width + x]
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<u16> {
        self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(width: usize, height: usize) -> RowMap<u32> {
        RowMap::from_rows(
            (0..height)
                .map(|y| (0..width).map(|x| (y * width + x) as u32).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn orders_count_up() {
        let originals = identity(4, 2);
        let mut grid = SeamPriorityGrid::new(4, 2);
        assert_eq!(grid.claim(&[1, 2], &originals), Ok(0));
        assert_eq!(grid.claim(&[3, 3], &originals), Ok(1));
        assert_eq!(grid.claimed_seams(), 2);
        assert_eq!(
            grid.as_slice(),
            &[SENTINEL, 0, SENTINEL, 1, SENTINEL, SENTINEL, 0, 1]
        );
        assert_eq!(grid.get(2, 1), 0);
    }

    #[test]
    fn claims_follow_original_indices() {
        // Column 1 of a 3-wide image is already gone.
        let originals = RowMap::from_rows(vec![vec![0u32, 2], vec![3, 5]]).unwrap();
        let mut grid = SeamPriorityGrid::new(3, 2);
        grid.claim(&[1, 1], &originals).unwrap();
        assert_eq!(grid.get(2, 0), 0);
        assert_eq!(grid.get(2, 1), 0);
    }

    #[test]
    fn overlap_is_refused_without_writing() {
        let originals = identity(3, 3);
        let mut grid = SeamPriorityGrid::new(3, 3);
        grid.claim(&[0, 1, 2], &originals).unwrap();
        let before = grid.clone();
        assert_eq!(
            grid.claim(&[2, 2, 2], &originals),
            Err(SeamError::SeamOverlap { original_index: 8 })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn tall_seams_claim_in_linear_time() {
        let height = 40_000;
        let originals = identity(2, height);
        let mut grid = SeamPriorityGrid::new(2, height);
        let seam = vec![1u16; height];
        let start = std::time::Instant::now();
        assert_eq!(grid.claim(&seam, &originals), Ok(0));
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
        assert!((0..height).all(|y| grid.get(1, y) == 0 && grid.get(0, y) == SENTINEL));
    }

    #[test]
    fn bad_seams_are_rejected() {
        let originals = identity(3, 2);
        let mut grid = SeamPriorityGrid::new(3, 2);
        assert!(grid.claim(&[0], &originals).is_err());
        assert!(grid.claim(&[0, 3], &originals).is_err());
        assert_eq!(grid.claimed_seams(), 0);
    }
}
