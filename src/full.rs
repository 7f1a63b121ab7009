// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Exact seams, one at a time
//!
//! The slow and careful strategy: every batch is the single globally
//! cheapest seam of the map as it stands, and the map is patched up
//! around the cut rather than recomputed.

use crate::energymap::EnergyMap;
use crate::errors::SeamResult;
use crate::seam::Seam;
use crate::seambatch::{BatchSizing, SeamBatcher};
use crate::seamfinder::{MeetInTheMiddle, SeamFinder};

#[derive(Debug, Clone, Copy, Default)]
pub struct FullBatcher;

impl SeamBatcher for FullBatcher {
    fn name(&self) -> &'static str {
        "full"
    }

    fn batch_size(&self, _sizing: &BatchSizing, width: usize) -> usize {
        width.min(1)
    }

    fn next_batch(&mut self, energy: &EnergyMap, batch_size: usize) -> SeamResult<Vec<Seam>> {
        if batch_size == 0 || energy.width() == 0 {
            return Ok(Vec::new());
        }
        Ok(vec![
            MeetInTheMiddle::new(energy.energy_map()).find_vertical_seam()
        ])
    }

    fn remove(&self, energy: &mut EnergyMap, seams: &[Seam]) -> SeamResult<()> {
        for seam in seams {
            energy.remove_seam(seam)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::energy::EnergyAlgorithm;
    use crate::grayscale::LumaMode;
    use crate::pixelbuffer::PixelBuffer;

    #[test]
    fn takes_the_flat_column() {
        // A flat gray band in column 2 of an otherwise noisy image.
        let (width, height) = (6u32, 5u32);
        let data: Vec<u8> = (0..width * height)
            .flat_map(|i| {
                let (x, y) = (i % width, i / width);
                let v = if x >= 1 && x <= 3 {
                    128
                } else {
                    ((x * 97 + y * 61) % 256) as u8
                };
                vec![v, v, v, 255]
            })
            .collect();
        let pixels = PixelBuffer::from_raw(width, height, data).unwrap();
        let mut map =
            EnergyMap::new(&pixels, None, EnergyAlgorithm::Sobel, LumaMode::Weighted).unwrap();

        let mut batcher = FullBatcher;
        assert_eq!(batcher.batch_size(&BatchSizing::default(), 6), 1);
        let batch = batcher.next_batch(&map, 1).unwrap();
        assert_eq!(batch, vec![vec![2u16; 5]]);

        batcher.remove(&mut map, &batch).unwrap();
        assert_eq!(map.width(), 5);
    }
}
