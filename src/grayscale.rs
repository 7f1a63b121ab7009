// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! RGBA to luma
//!
//! Two weightings are offered: the usual Rec. 601 weights, and a
//! cheaper straight average for callers who'd rather be fast.  Both
//! are scaled by alpha, so transparent pixels read as black.

use crate::errors::SeamResult;
use crate::pixelbuffer::PixelBuffer;
use crate::twodmap::RowMap;
use std::str::FromStr;

/// How a pixel's channels are folded down to one luma value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LumaMode {
    /// `0.299R + 0.587G + 0.114B`, scaled by `alpha / 255`.
    Weighted,
    /// `(R + G + B) / 3`, scaled by `alpha / 255`.
    Linear,
}

impl Default for LumaMode {
    fn default() -> Self {
        LumaMode::Weighted
    }
}

impl FromStr for LumaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighted" => Ok(LumaMode::Weighted),
            "linear" => Ok(LumaMode::Linear),
            _ => Err(format!("unknown luma mode '{}'", s)),
        }
    }
}

/// Luma of a single RGBA pixel.  Fixed-point, truncating, so white
/// at full alpha comes out at exactly 255.
#[inline]
pub fn luma([r, g, b, a]: [u8; 4], mode: LumaMode) -> u8 {
    let (r, g, b, a) = (u32::from(r), u32::from(g), u32::from(b), u32::from(a));
    let value = match mode {
        LumaMode::Weighted => (299 * r + 587 * g + 114 * b) * a / (1000 * 255),
        LumaMode::Linear => (r + g + b) * a / (3 * 255),
    };
    value as u8
}

/// One luma byte per pixel, row-major.
pub fn grayscale_flat(pixels: &PixelBuffer, mode: LumaMode) -> Vec<u8> {
    pixels
        .as_raw()
        .chunks_exact(4)
        .map(|p| luma([p[0], p[1], p[2], p[3]], mode))
        .collect()
}

/// One luma row per image row.
pub fn grayscale_rows(pixels: &PixelBuffer, mode: LumaMode) -> SeamResult<RowMap<u8>> {
    let (width, height) = pixels.dimensions();
    let mut rows = RowMap::new(width as usize, height as usize);
    rows.fill_rows(|y, row| {
        for (x, value) in row.iter_mut().enumerate() {
            *value = luma(pixels.rgba(x, y), mode);
        }
    })?;
    Ok(rows)
}
