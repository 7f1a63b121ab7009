// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Minimal cumulative energy
//!
//! The classic seam-carving dynamic program: each cell holds the
//! cheapest cost of any connected path from the starting edge down
//! (or up) to it.  We don't keep back pointers here; the predictive
//! generator only ever compares neighboring cells, so the totals are
//! all it needs.

use crate::energymap::EnergyMap;
use crate::errors::SeamResult;
use crate::twodmap::RowMap;
use num_traits::PrimInt;

/// How the accumulation runs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CumulativeOptions {
    /// Start at the bottom row and accumulate upward.
    pub accumulate_up: bool,
    /// Store 16-bit cells, shifting the sums down to fit tall images.
    pub constrain_to_16bit: bool,
    /// Never take the straight-ahead neighbor.
    pub constrain_to_diagonals: bool,
}

/// Cumulative rows at either width.
#[derive(Debug, Clone, PartialEq)]
pub enum CumulativeRows {
    Wide(RowMap<u32>),
    Narrow(RowMap<u16>),
}

#[derive(Debug, Clone)]
pub struct MinimalCumulativeEnergyMap {
    options: CumulativeOptions,
    width: usize,
    height: usize,
    rows: CumulativeRows,
}

/// Bits to drop from each sum so a 16-bit cell survives an image
/// `height` rows tall: `ceil(log2(height / 256))`, never negative.
pub fn shift_amount(height: usize) -> u32 {
    let mut shift = 0;
    while (256usize << shift) < height {
        shift += 1;
    }
    shift
}

fn accumulate<T: PrimInt + Default>(
    energy: &RowMap<u16>,
    options: CumulativeOptions,
    shift: u32,
) -> RowMap<T> {
    let (width, height) = (energy.width(), energy.height());
    let mut target: RowMap<T> = RowMap::new(width, height);
    if height == 0 {
        return target;
    }

    let saturate = |v: u64| <T as num_traits::NumCast>::from(v).unwrap_or_else(T::max_value);
    let widen = |v: T| v.to_u64().unwrap_or(u64::max_value());

    let rows: Vec<usize> = if options.accumulate_up {
        (0..height).rev().collect()
    } else {
        (0..height).collect()
    };

    // The starting edge is just its own energy.
    for x in 0..width {
        target[(x, rows[0])] = saturate(u64::from(energy[(x, rows[0])]));
    }

    for pair in rows.windows(2) {
        let (previous, row) = (pair[0], pair[1]);
        for x in 0..width {
            let left = if x > 0 {
                Some(widen(target[(x - 1, previous)]))
            } else {
                None
            };
            let right = if x + 1 < width {
                Some(widen(target[(x + 1, previous)]))
            } else {
                None
            };
            let straight = widen(target[(x, previous)]);
            let best = if options.constrain_to_diagonals {
                // A one-pixel-wide image has no diagonals to take.
                left.into_iter().chain(right).min().unwrap_or(straight)
            } else {
                left.into_iter().chain(right).fold(straight, u64::min)
            };
            target[(x, row)] = saturate((u64::from(energy[(x, row)]) + best) >> shift);
        }
    }
    target
}

impl MinimalCumulativeEnergyMap {
    pub fn new(energy_map: &EnergyMap, options: CumulativeOptions) -> Self {
        Self::from_energy(energy_map.energy_map(), options)
    }

    pub fn from_energy(energy: &RowMap<u16>, options: CumulativeOptions) -> Self {
        let rows = if options.constrain_to_16bit {
            CumulativeRows::Narrow(accumulate(energy, options, shift_amount(energy.height())))
        } else {
            CumulativeRows::Wide(accumulate(energy, options, 0))
        };
        MinimalCumulativeEnergyMap {
            options,
            width: energy.width(),
            height: energy.height(),
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn options(&self) -> CumulativeOptions {
        self.options
    }

    pub fn rows(&self) -> &CumulativeRows {
        &self.rows
    }

    /// The cumulative cost at `(x, y)`, whatever the cell width.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        match &self.rows {
            CumulativeRows::Wide(rows) => rows[(x, y)],
            CumulativeRows::Narrow(rows) => u32::from(rows[(x, y)]),
        }
    }

    /// Drop the same columns the energy map dropped.  Nothing is
    /// recomputed; build a fresh map from the updated energy map when
    /// the totals matter again.
    pub fn remove_seams<S: AsRef<[u16]>>(&mut self, seams: &[S]) -> SeamResult<()> {
        if seams.is_empty() {
            return Ok(());
        }
        match &mut self.rows {
            CumulativeRows::Wide(rows) => rows.remove_seams(seams)?,
            CumulativeRows::Narrow(rows) => rows.remove_seams(seams)?,
        }
        self.width -= seams.len();
        Ok(())
    }
}
