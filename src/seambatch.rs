// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam batches
//!
//! A batcher looks at the energy map as it stands, proposes a batch of
//! mutually disjoint seams, and knows how to take them back out of the
//! map.  The generator does the bookkeeping in between.

use crate::energymap::EnergyMap;
use crate::errors::SeamResult;
use crate::seam::Seam;

/// How many seams a batch should hold for a given width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchSizing {
    pub batch_percentage: f64,
    pub min_batch_size: usize,
}

impl Default for BatchSizing {
    fn default() -> Self {
        BatchSizing {
            batch_percentage: 0.05,
            min_batch_size: 10,
        }
    }
}

impl BatchSizing {
    /// The percentage of `width`, rounded down to an even count, but
    /// never below the floor and never above `width`.
    pub fn batch_size(&self, width: usize) -> usize {
        let share = (width as f64 * self.batch_percentage).ceil().max(0.0) as usize;
        (share & !1).max(self.min_batch_size.min(width)).min(width)
    }
}

/// One seam-selection strategy.
pub trait SeamBatcher {
    /// A short name, for logging.
    fn name(&self) -> &'static str;

    /// The number of seams this strategy takes from a map `width`
    /// columns wide.
    fn batch_size(&self, sizing: &BatchSizing, width: usize) -> usize {
        sizing.batch_size(width)
    }

    /// Propose up to `batch_size` disjoint seams, cheapest first.
    fn next_batch(&mut self, energy: &EnergyMap, batch_size: usize) -> SeamResult<Vec<Seam>>;

    /// Take a claimed batch out of the map.
    fn remove(&self, energy: &mut EnergyMap, seams: &[Seam]) -> SeamResult<()> {
        energy.remove_seams(seams)
    }
}
