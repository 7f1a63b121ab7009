// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Row maps
//!
//! Every per-pixel quantity we track (grayscale, energy, original
//! index, cumulative cost) lives in one of these: a vector of
//! independently owned rows, all the same width.  Keeping rows
//! separate means a seam batch can shrink each one with a single
//! splice instead of rebuilding a flat buffer.

use crate::deletion::delete_indices;
use crate::errors::{SeamError, SeamResult};
use crate::seam::{check_lengths, row_indices};
use std::ops::{Index, IndexMut};

/// An addressable two-dimensional field of `P`, stored as rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RowMap<P: Default + Copy> {
    width: usize,
    height: usize,
    rows: Vec<Vec<P>>,
}

impl<P: Default + Copy> RowMap<P> {
    /// Define a new map filled with the default value.
    pub fn new(width: usize, height: usize) -> Self {
        RowMap {
            width,
            height,
            rows: vec![vec![P::default(); width]; height],
        }
    }

    /// Adopt a set of rows, which must all be the same length.
    pub fn from_rows(rows: Vec<Vec<P>>) -> SeamResult<Self> {
        let width = rows.first().map_or(0, |row| row.len());
        if let Some(row) = rows.iter().find(|row| row.len() != width) {
            return Err(SeamError::BufferSizeMismatch {
                expected: width,
                actual: row.len(),
            });
        }
        Ok(RowMap {
            width,
            height: rows.len(),
            rows,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row(&self, y: usize) -> &[P] {
        &self.rows[y]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [P] {
        &mut self.rows[y]
    }

    pub fn rows(&self) -> &[Vec<P>] {
        &self.rows
    }

    /// Copy the map out in row-major order.
    pub fn to_flat(&self) -> Vec<P> {
        self.rows.iter().flat_map(|row| row.iter().cloned()).collect()
    }

    /// Remove one column per seam from every row.  Each row shrinks by
    /// the number of seams; two seams through the same pixel of a row
    /// make the splice fail.
    pub fn remove_seams<S: AsRef<[u16]>>(&mut self, seams: &[S]) -> SeamResult<()> {
        if seams.is_empty() {
            return Ok(());
        }
        check_lengths(seams, self.height)?;
        for y in 0..self.height {
            let indices = row_indices(seams, y);
            self.rows[y] = delete_indices(&self.rows[y], &indices)?;
        }
        self.width -= seams.len();
        Ok(())
    }
}

impl<P: Default + Copy + Send> RowMap<P> {
    /// Rewrite every row with `f(y, row)`.  Rows are independent, so
    /// with the `threaded` feature they are handed out to one worker
    /// per CPU in contiguous bands.
    #[cfg(not(feature = "threaded"))]
    pub fn fill_rows<F>(&mut self, f: F) -> SeamResult<()>
    where
        F: Fn(usize, &mut [P]) + Sync,
    {
        self.rows
            .iter_mut()
            .enumerate()
            .for_each(|(y, row)| f(y, row));
        Ok(())
    }

    #[cfg(feature = "threaded")]
    pub fn fill_rows<F>(&mut self, f: F) -> SeamResult<()>
    where
        F: Fn(usize, &mut [P]) + Sync,
    {
        let workers = num_cpus::get().max(1);
        let band = ((self.height + workers - 1) / workers).max(1);
        let f = &f;
        crossbeam::scope(|scope| {
            for (b, rows) in self.rows.chunks_mut(band).enumerate() {
                scope.spawn(move |_| {
                    for (i, row) in rows.iter_mut().enumerate() {
                        f(b * band + i, row);
                    }
                });
            }
        })
        .map_err(|_| SeamError::WorkerPanicked)
    }
}

impl<P: Default + Copy> Index<(usize, usize)> for RowMap<P> {
    type Output = P;

    /// A convenience addressing mode for getting values.
    fn index(&self, (x, y): (usize, usize)) -> &P {
        &self.rows[y][x]
    }
}

impl<P: Default + Copy> IndexMut<(usize, usize)> for RowMap<P> {
    /// A convenience addressing mode for setting values.
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut P {
        &mut self.rows[y][x]
    }
}

/// A dynamic-programming cell: the best cost of reaching a pixel and
/// the column offset (-1, 0, +1) of the neighbor it was reached from.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct EnergyAndBackPointer<P: Default + Copy> {
    pub energy: P,
    pub parent: i8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RowMap<u32> {
        RowMap::from_rows(vec![vec![0, 1, 2, 3], vec![10, 11, 12, 13]]).unwrap()
    }

    #[test]
    fn indexes_by_x_then_y() {
        let mut map = sample();
        assert_eq!(map[(2, 1)], 12);
        map[(0, 1)] = 99;
        assert_eq!(map.row(1), &[99, 11, 12, 13]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(RowMap::from_rows(vec![vec![0u8, 1], vec![2]]).is_err());
    }

    #[test]
    fn seams_shrink_every_row() {
        let mut map = sample();
        let seams: Vec<Vec<u16>> = vec![vec![3, 2], vec![0, 1]];
        map.remove_seams(&seams).unwrap();
        assert_eq!(map.width(), 2);
        assert_eq!(map.row(0), &[1, 2]);
        assert_eq!(map.row(1), &[10, 13]);
    }

    #[test]
    fn crossing_seams_fail() {
        let mut map = sample();
        let seams: Vec<Vec<u16>> = vec![vec![1, 2], vec![1, 3]];
        assert_eq!(
            map.remove_seams(&seams),
            Err(SeamError::DuplicateIndex { index: 1 })
        );
    }

    #[test]
    fn fill_rows_sees_row_numbers() {
        let mut map: RowMap<usize> = RowMap::new(3, 5);
        map.fill_rows(|y, row| row.iter_mut().for_each(|v| *v = y))
            .unwrap();
        assert_eq!(map.to_flat(), vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
    }
}
