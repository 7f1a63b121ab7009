// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Single optimal seams
//!
//! The textbook seam is a dynamic program over the whole image with a
//! back pointer per pixel.  This one runs two half-height programs
//! instead, one down from the top edge and one up from the bottom,
//! and joins them across the middle.  The answer is the same globally
//! minimal seam.

use crate::seam::Seam;
use crate::twodmap::{EnergyAndBackPointer, RowMap};

/// This trait defines how we will return seams from an energy map.
/// It's a primitive interface, just enough to make room for more than
/// one finder.
pub trait SeamFinder {
    /// Request the cheapest vertical seam.
    fn find_vertical_seam(&self) -> Seam;
}

type Sweep = RowMap<EnergyAndBackPointer<u64>>;

/// Accumulate minimal path cost along `rows`, in the order given.
/// Row `i` of the result belongs to image row `rows[i]`, and its parent
/// offsets point into row `i - 1`.  Ties go straight first, then left.
fn sweep(energy: &RowMap<u16>, rows: &[usize]) -> Sweep {
    let width = energy.width();
    let mut target: Sweep = RowMap::new(width, rows.len());

    // Populate the starting row with its native energies.
    for x in 0..width {
        target[(x, 0)].energy = u64::from(energy[(x, rows[0])]);
    }

    for (i, &y) in rows.iter().enumerate().skip(1) {
        for x in 0..width {
            let mut best = EnergyAndBackPointer {
                energy: target[(x, i - 1)].energy,
                parent: 0,
            };
            if x > 0 && target[(x - 1, i - 1)].energy < best.energy {
                best = EnergyAndBackPointer {
                    energy: target[(x - 1, i - 1)].energy,
                    parent: -1,
                };
            }
            if x + 1 < width && target[(x + 1, i - 1)].energy < best.energy {
                best = EnergyAndBackPointer {
                    energy: target[(x + 1, i - 1)].energy,
                    parent: 1,
                };
            }
            target[(x, i)] = EnergyAndBackPointer {
                energy: u64::from(energy[(x, y)]) + best.energy,
                parent: best.parent,
            };
        }
    }
    target
}

/// Walk the back pointers of `sweep` from column `start` on its last
/// row, writing each column into `seam` at the image row it came from.
fn trace(sweep: &Sweep, rows: &[usize], start: usize, seam: &mut Seam) {
    (0..rows.len()).rev().fold(start, |x, i| {
        seam[rows[i]] = x as u16;
        (x as isize + isize::from(sweep[(x, i)].parent)) as usize
    });
}

/// The meet-in-the-middle finder: borrows an energy map and answers
/// with its single cheapest seam.
pub struct MeetInTheMiddle<'a> {
    energy: &'a RowMap<u16>,
}

impl<'a> MeetInTheMiddle<'a> {
    pub fn new(energy: &'a RowMap<u16>) -> Self {
        MeetInTheMiddle { energy }
    }
}

impl<'a> SeamFinder for MeetInTheMiddle<'a> {
    fn find_vertical_seam(&self) -> Seam {
        let (width, height) = (self.energy.width(), self.energy.height());
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let middle = (height - 1) / 2;
        let top_rows: Vec<usize> = (0..=middle).collect();
        let top = sweep(self.energy, &top_rows);
        let mut seam = vec![0; height];

        if middle + 1 == height {
            // One row: nothing to meet.
            let start = (0..width)
                .min_by_key(|&x| top[(x, middle)].energy)
                .unwrap_or(0);
            trace(&top, &top_rows, start, &mut seam);
            return seam;
        }

        let bottom_rows: Vec<usize> = (middle + 1..height).rev().collect();
        let bottom = sweep(self.energy, &bottom_rows);
        let (top_end, bottom_end) = (top_rows.len() - 1, bottom_rows.len() - 1);

        // For every column on the middle row, the cheapest connected
        // column just below it.
        let (_, best_top, best_bottom) = (0..width)
            .map(|x1| {
                let mut x2 = x1;
                if x1 > 0 && bottom[(x1 - 1, bottom_end)].energy < bottom[(x2, bottom_end)].energy
                {
                    x2 = x1 - 1;
                }
                if x1 + 1 < width
                    && bottom[(x1 + 1, bottom_end)].energy < bottom[(x2, bottom_end)].energy
                {
                    x2 = x1 + 1;
                }
                (
                    top[(x1, top_end)].energy + bottom[(x2, bottom_end)].energy,
                    x1,
                    x2,
                )
            })
            .min_by_key(|&(total, _, _)| total)
            .unwrap_or((0, 0, 0));

        trace(&top, &top_rows, best_top, &mut seam);
        trace(&bottom, &bottom_rows, best_bottom, &mut seam);
        seam
    }
}
