// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Random walks
//!
//! For every row, pair up neighboring columns at random and decide
//! whether each pair swaps places going down.  Following those swaps
//! from every starting column gives one seam per column, and because
//! each row is just a permutation of the one above, no two seams ever
//! share a pixel.  Keep the cheapest, throw the rest away, and do it
//! all again on the smaller image.
//!
//! The coin is seeded by the image size, so the same image always
//! gets the same seams.

use crate::coinflip::deterministic_binary_rnd;
use crate::energymap::EnergyMap;
use crate::errors::SeamResult;
use crate::seam::{select_cheapest, ScoredSeam, Seam};
use crate::seambatch::SeamBatcher;
use crate::twodmap::RowMap;

#[derive(Debug, Clone)]
pub struct RandomBatcher {
    seed: u32,
    connections: RowMap<i8>,
}

impl RandomBatcher {
    /// `seed` is mixed into the per-batch seed, for callers who want a
    /// different but still repeatable set of walks.
    pub fn new(seed: u32) -> Self {
        RandomBatcher {
            seed,
            connections: RowMap::new(0, 0),
        }
    }

    /// Fill the connection table for a `width` by `height` map: `1` moves
    /// right, `-1` moves left, `0` goes straight.  The last column in a
    /// row has no partner and always goes straight.
    pub fn generate_connections(&mut self, width: usize, height: usize) {
        let coin = deterministic_binary_rnd(((width * height + 1) as u32) ^ self.seed);
        let mut connections = RowMap::new(width, height);
        for y in 0..height {
            let row = connections.row_mut(y);
            let mut x = 0;
            while x < width {
                if x + 1 == width || coin((y * width + x) as u32) {
                    row[x] = 0;
                    x += 1;
                } else {
                    row[x] = 1;
                    row[x + 1] = -1;
                    x += 2;
                }
            }
        }
        self.connections = connections;
    }

    pub fn connections(&self) -> &RowMap<i8> {
        &self.connections
    }

    /// Follow the connections down from column `start`.
    fn walk(&self, energy: &RowMap<u16>, start: usize) -> ScoredSeam {
        let mut x = start;
        let mut total = 0u64;
        let path = (0..energy.height())
            .map(|y| {
                x = (x as isize + isize::from(self.connections[(x, y)])) as usize;
                total += u64::from(energy[(x, y)]);
                x as u16
            })
            .collect();
        ScoredSeam {
            path,
            energy: total,
        }
    }
}

impl SeamBatcher for RandomBatcher {
    fn name(&self) -> &'static str {
        "random"
    }

    fn next_batch(&mut self, energy: &EnergyMap, batch_size: usize) -> SeamResult<Vec<Seam>> {
        let (width, height) = (energy.width(), energy.height());
        self.generate_connections(width, height);
        let candidates = (0..width)
            .map(|start| self.walk(energy.energy_map(), start))
            .collect();
        Ok(select_cheapest(candidates, batch_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::EnergyAlgorithm;
    use crate::grayscale::LumaMode;
    use crate::pixelbuffer::PixelBuffer;
    use crate::seam::is_connected;
    use itertools::Itertools;

    #[test]
    fn connections_pair_neighbors() {
        let mut batcher = RandomBatcher::new(0);
        for &(width, height) in &[(1, 3), (2, 5), (7, 9), (16, 4)] {
            batcher.generate_connections(width, height);
            let table = batcher.connections();
            for y in 0..height {
                let row = table.row(y);
                assert_ne!(row[width - 1], 1);
                let mut x = 0;
                while x < width {
                    match row[x] {
                        0 => x += 1,
                        1 => {
                            assert_eq!(row[x + 1], -1);
                            x += 2;
                        }
                        other => panic!("unpaired {} at ({}, {})", other, x, y),
                    }
                }
            }
        }
    }

    #[test]
    fn same_map_same_connections() {
        let (mut a, mut b) = (RandomBatcher::new(5), RandomBatcher::new(5));
        a.generate_connections(12, 6);
        b.generate_connections(12, 6);
        assert_eq!(a.connections(), b.connections());
    }

    #[test]
    fn walks_are_disjoint_and_connected() {
        let data: Vec<u8> = (0..11 * 7)
            .flat_map(|i| vec![(i * 37 % 256) as u8, 0, 0, 255])
            .collect();
        let pixels = PixelBuffer::from_raw(11, 7, data).unwrap();
        let map =
            EnergyMap::new(&pixels, None, EnergyAlgorithm::Sobel, LumaMode::Weighted).unwrap();

        let mut batcher = RandomBatcher::new(0);
        let seams = batcher.next_batch(&map, 11).unwrap();
        assert_eq!(seams.len(), 11);
        for seam in &seams {
            assert_eq!(seam.len(), 7);
            assert!(is_connected(seam));
        }
        for y in 0..7 {
            let columns: Vec<u16> = seams.iter().map(|s| s[y]).sorted().collect();
            assert_eq!(columns, (0..11).collect::<Vec<u16>>());
        }

        let cheapest = batcher.next_batch(&map, 3).unwrap();
        let energies: Vec<u64> = cheapest.iter().map(|s| map.seam_energy(s)).collect();
        let worst_kept = energies.iter().max().unwrap();
        let all: Vec<u64> = seams.iter().map(|s| map.seam_energy(s)).sorted().collect();
        assert_eq!(*worst_kept, all[2]);
    }
}
