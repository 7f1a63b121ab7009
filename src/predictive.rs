// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Predictive seams
//!
//! Start one seam in every column and sweep down the image a row at a
//! time.  At each row, look at neighboring seams in pairs: the bottom-up
//! cumulative map says which of the two columns leads to the cheaper
//! finish, and if the cheaper seam so far isn't already standing on it,
//! the two seams trade places.  Like the random walks, each row is a
//! permutation of the one above, so the seams never collide.
//!
//! Seams are scored by the running maximum of the last few pixels
//! rather than raw energy, which punishes a seam that has to punch
//! through an edge more than one that wanders across a mild texture.

use crate::cumulative::{CumulativeOptions, MinimalCumulativeEnergyMap};
use crate::energymap::EnergyMap;
use crate::errors::SeamResult;
use crate::seam::{select_cheapest, ScoredSeam, Seam};
use crate::seambatch::SeamBatcher;
use crate::slidingmax::SlidingWindowMaximum;
use crate::twodmap::RowMap;

pub const DEFAULT_PEAK_WINDOW: usize = 10;

struct Candidate {
    path: Seam,
    score: u64,
    peaks: SlidingWindowMaximum<u16>,
}

impl Candidate {
    fn new(height: usize, window: usize) -> Self {
        Candidate {
            path: vec![0; height],
            score: 0,
            peaks: SlidingWindowMaximum::with_capacity(window, window * 2),
        }
    }

    fn step(&mut self, energy: &RowMap<u16>, x: usize, y: usize) {
        self.path[y] = x as u16;
        self.score += u64::from(self.peaks.add_and_get_max(energy[(x, y)]));
    }
}

#[derive(Debug, Clone)]
pub struct PredictiveBatcher {
    peak_window: usize,
}

impl Default for PredictiveBatcher {
    fn default() -> Self {
        PredictiveBatcher::new(DEFAULT_PEAK_WINDOW)
    }
}

impl PredictiveBatcher {
    pub fn new(peak_window: usize) -> Self {
        PredictiveBatcher {
            peak_window: peak_window.max(1),
        }
    }

    pub fn peak_window(&self) -> usize {
        self.peak_window
    }

    /// Trace one seam from every column of the top row.  The result is
    /// indexed by starting column.
    pub fn trace(
        &self,
        energy: &RowMap<u16>,
        cumulative: &MinimalCumulativeEnergyMap,
    ) -> Vec<ScoredSeam> {
        let (width, height) = (energy.width(), energy.height());
        let mut candidates: Vec<Candidate> = (0..width)
            .map(|x| {
                let mut candidate = Candidate::new(height, self.peak_window);
                if height > 0 {
                    candidate.step(energy, x, 0);
                }
                candidate
            })
            .collect();

        // Which candidate stands on each column of the current row.
        let mut at_column: Vec<usize> = (0..width).collect();

        for y in 1..height {
            let mut x = 0;
            while x < width {
                let current = at_column[x];
                if x + 1 == width {
                    candidates[current].step(energy, x, y);
                    break;
                }
                let next = at_column[x + 1];
                let seam_lower = candidates[current].score < candidates[next].score;
                let path_lower = cumulative.get(x, y) < cumulative.get(x + 1, y);
                if seam_lower == path_lower {
                    candidates[current].step(energy, x, y);
                    x += 1;
                } else {
                    candidates[current].step(energy, x + 1, y);
                    candidates[next].step(energy, x, y);
                    at_column.swap(x, x + 1);
                    x += 2;
                }
            }
        }

        candidates
            .into_iter()
            .map(|candidate| ScoredSeam {
                path: candidate.path,
                energy: candidate.score,
            })
            .collect()
    }
}

impl SeamBatcher for PredictiveBatcher {
    fn name(&self) -> &'static str {
        "predictive"
    }

    fn next_batch(&mut self, energy: &EnergyMap, batch_size: usize) -> SeamResult<Vec<Seam>> {
        let cumulative = MinimalCumulativeEnergyMap::new(
            energy,
            CumulativeOptions {
                accumulate_up: true,
                ..CumulativeOptions::default()
            },
        );
        let seams = self.trace(energy.energy_map(), &cumulative);
        Ok(select_cheapest(seams, batch_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seam::is_connected;
    use itertools::Itertools;

    fn trace(rows: Vec<Vec<u16>>, window: usize) -> Vec<ScoredSeam> {
        let energy = RowMap::from_rows(rows).unwrap();
        let cumulative = MinimalCumulativeEnergyMap::from_energy(
            &energy,
            CumulativeOptions {
                accumulate_up: true,
                ..CumulativeOptions::default()
            },
        );
        PredictiveBatcher::new(window).trace(&energy, &cumulative)
    }

    #[test]
    fn cheap_seam_steps_onto_the_cheap_column() {
        // Seam 0 is cheaper after row 0, but column 1 is the cheap way
        // down, so the two trade places.
        let seams = trace(vec![vec![1, 5], vec![9, 1], vec![9, 1]], 10);
        assert_eq!(seams[0].path, vec![0, 1, 1]);
        assert_eq!(seams[1].path, vec![1, 0, 0]);
        assert_eq!(seams[0].energy, 1 + 1 + 1);
        assert_eq!(seams[1].energy, 5 + 9 + 9);
    }

    #[test]
    fn agreeing_seams_go_straight() {
        let seams = trace(vec![vec![1, 5], vec![1, 9], vec![1, 9]], 10);
        assert_eq!(seams[0].path, vec![0, 0, 0]);
        assert_eq!(seams[1].path, vec![1, 1, 1]);
    }

    #[test]
    fn scores_accumulate_window_peaks() {
        // One spike, remembered for two rows.
        let seams = trace(vec![vec![0], vec![8], vec![1], vec![1], vec![1]], 2);
        assert_eq!(seams[0].energy, 0 + 8 + 8 + 1 + 1);
    }

    #[test]
    fn traces_are_disjoint_and_connected() {
        let rows: Vec<Vec<u16>> = (0..12)
            .map(|y| (0..9).map(|x| ((x * 31 + y * 17) % 23) as u16).collect())
            .collect();
        let seams = trace(rows, 3);
        assert_eq!(seams.len(), 9);
        for seam in &seams {
            assert!(is_connected(&seam.path));
        }
        for y in 0..12 {
            let columns: Vec<u16> = seams.iter().map(|s| s.path[y]).sorted().collect();
            assert_eq!(columns, (0..9).collect::<Vec<u16>>());
        }
    }
}
