// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The energy map
//!
//! Holds everything a generation session knows about the shrinking
//! image: the grayscale map the kernels read, the energy map the seam
//! finders read, and the original-index map that remembers where each
//! surviving pixel started out.  All of them share one width, and
//! every seam removed takes exactly one pixel out of every row of
//! every one of them.

use crate::energy::{clamp_energy, pixel_energy, EnergyAlgorithm};
use crate::errors::SeamResult;
use crate::grayscale::{grayscale_rows, LumaMode};
use crate::pixelbuffer::{MaskBuffer, PixelBuffer};
use crate::seam::check_lengths;
use crate::twodmap::RowMap;
use log::trace;

// Everything needed to compute one energy cell, borrowed so that the
// energy rows can be rewritten while it is held.
struct EnergySource<'a> {
    algorithm: EnergyAlgorithm,
    gray: &'a RowMap<u8>,
    color: Option<&'a RowMap<[u8; 4]>>,
    mask: Option<&'a [u8]>,
    original_indices: &'a RowMap<u32>,
}

impl<'a> EnergySource<'a> {
    fn energy_at(&self, x: usize, y: usize) -> u16 {
        let raw = pixel_energy(self.algorithm, self.gray, self.color, x, y);
        match self.mask {
            Some(mask) => {
                let weight = mask[self.original_indices[(x, y)] as usize];
                clamp_energy(raw * f32::from(weight) / 255.0)
            }
            None => clamp_energy(raw),
        }
    }
}

/// The per-pixel cost of removal, and the maps that keep it honest as
/// the image shrinks.
#[derive(Debug, Clone)]
pub struct EnergyMap {
    width: usize,
    height: usize,
    original_width: usize,
    algorithm: EnergyAlgorithm,
    grayscale: RowMap<u8>,
    color: Option<RowMap<[u8; 4]>>,
    energy: RowMap<u16>,
    original_indices: RowMap<u32>,
    mask: Option<Vec<u8>>,
}

impl EnergyMap {
    /// Build the grayscale and original-index maps from `pixels`, then
    /// compute the full energy map.
    pub fn new(
        pixels: &PixelBuffer,
        mask: Option<&MaskBuffer>,
        algorithm: EnergyAlgorithm,
        luma: LumaMode,
    ) -> SeamResult<Self> {
        if let Some(mask) = mask {
            mask.check_fits(pixels)?;
        }
        let (width, height) = pixels.dimensions();
        let (width, height) = (width as usize, height as usize);

        let mut original_indices = RowMap::new(width, height);
        original_indices.fill_rows(|y, row| {
            for (x, index) in row.iter_mut().enumerate() {
                *index = (y * width + x) as u32;
            }
        })?;

        let color = if algorithm.needs_color() {
            let mut color = RowMap::new(width, height);
            color.fill_rows(|y, row| {
                for (x, rgba) in row.iter_mut().enumerate() {
                    *rgba = pixels.rgba(x, y);
                }
            })?;
            Some(color)
        } else {
            None
        };

        let mut map = EnergyMap {
            width,
            height,
            original_width: width,
            algorithm,
            grayscale: grayscale_rows(pixels, luma)?,
            color,
            energy: RowMap::new(width, height),
            original_indices,
            mask: mask.map(|m| m.as_raw().to_vec()),
        };
        map.compute_full_energy_map()?;
        Ok(map)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn original_width(&self) -> usize {
        self.original_width
    }

    pub fn algorithm(&self) -> EnergyAlgorithm {
        self.algorithm
    }

    pub fn energy_map(&self) -> &RowMap<u16> {
        &self.energy
    }

    pub fn grayscale_map(&self) -> &RowMap<u8> {
        &self.grayscale
    }

    /// Where each surviving pixel sat in the original image, as
    /// `row * original_width + column`.
    pub fn original_indices(&self) -> &RowMap<u32> {
        &self.original_indices
    }

    /// Sum of the energies along `seam`.
    pub fn seam_energy(&self, seam: &[u16]) -> u64 {
        seam.iter()
            .enumerate()
            .map(|(y, x)| u64::from(self.energy[(usize::from(*x), y)]))
            .sum()
    }

    fn source(&self) -> EnergySource<'_> {
        EnergySource {
            algorithm: self.algorithm,
            gray: &self.grayscale,
            color: self.color.as_ref(),
            mask: self.mask.as_ref().map(|m| m.as_slice()),
            original_indices: &self.original_indices,
        }
    }

    fn compute_full_energy_map(&mut self) -> SeamResult<()> {
        trace!(
            "full {} energy recompute at {}x{}",
            self.algorithm.name(),
            self.width,
            self.height
        );
        let mut energy = RowMap::new(self.width, self.height);
        {
            let source = self.source();
            energy.fill_rows(|y, row| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = source.energy_at(x, y);
                }
            })?;
        }
        self.energy = energy;
        Ok(())
    }

    // Take the same columns out of every map.
    fn remove_columns<S: AsRef<[u16]>>(&mut self, seams: &[S]) -> SeamResult<()> {
        check_lengths(seams, self.height)?;
        self.energy.remove_seams(seams)?;
        self.grayscale.remove_seams(seams)?;
        self.original_indices.remove_seams(seams)?;
        if let Some(color) = self.color.as_mut() {
            color.remove_seams(seams)?;
        }
        self.width -= seams.len();
        Ok(())
    }

    /// Remove a single seam and recompute only the cells whose kernel
    /// window reached across it.  For the Sobel kernel and a straight
    /// seam that's the two columns either side of the cut; a seam that
    /// wanders between rows widens the band by however far it moved
    /// within the kernel's vertical reach.
    pub fn remove_seam(&mut self, seam: &[u16]) -> SeamResult<()> {
        self.remove_columns(&[seam])?;
        trace!("incremental energy update, width now {}", self.width);

        let reach = self.algorithm.reach();
        let mut updates = Vec::new();
        {
            let source = self.source();
            for y in 0..self.height {
                for x in affected_columns(seam, y, reach, self.width) {
                    updates.push((x, y, source.energy_at(x, y)));
                }
            }
        }
        for (x, y, value) in updates {
            self.energy[(x, y)] = value;
        }
        Ok(())
    }

    /// Remove a whole batch of seams, then recompute the energy map
    /// from scratch.  No two seams may share a pixel in any row.
    pub fn remove_seams<S: AsRef<[u16]>>(&mut self, seams: &[S]) -> SeamResult<()> {
        if seams.is_empty() {
            return Ok(());
        }
        self.remove_columns(seams)?;
        self.compute_full_energy_map()
    }
}

/// The columns of row `y`, in post-removal coordinates, whose kernel
/// window straddled a removed pixel in some row within `reach` of `y`.
/// A removed column `s` sits between new columns `s - 1` and `s`, so
/// any window overlapping that gap sees different pixels than before.
fn affected_columns(
    seam: &[u16],
    y: usize,
    reach: usize,
    width: usize,
) -> std::ops::Range<usize> {
    let first = y.saturating_sub(reach);
    let last = (y + reach).min(seam.len() - 1);
    let window = &seam[first..=last];
    let lo = window.iter().min().map_or(0, |&s| usize::from(s));
    let hi = window.iter().max().map_or(0, |&s| usize::from(s));
    lo.saturating_sub(reach)..(hi + reach).min(width)
}
