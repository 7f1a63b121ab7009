// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Diagnostic rasters
//!
//! Turn the internals into something a person can look at: the energy
//! map as a graymap, or the original image with its cheapest seams
//! painted red.  Written out as binary PNM.

use crate::pixelbuffer::PixelBuffer;
use crate::seamgrid::SeamPriorityGrid;
use crate::twodmap::RowMap;
use image::pnm::{PNMEncoder, PNMSubtype, SampleEncoding};
use image::{ColorType, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use itertools::{Itertools, MinMaxResult};
use std::io::{self, Write};

/// Stretch the energy map over 0..=255.  A map with no range at all
/// comes out black.
pub fn energy_to_image(energy: &RowMap<u16>) -> GrayImage {
    let (min, max) = match energy.rows().iter().flatten().minmax() {
        MinMaxResult::NoElements => (0, 0),
        MinMaxResult::OneElement(&e) => (e, e),
        MinMaxResult::MinMax(&lo, &hi) => (lo, hi),
    };
    let range = u32::from(max - min);

    ImageBuffer::from_fn(energy.width() as u32, energy.height() as u32, |x, y| {
        let e = u32::from(energy[(x as usize, y as usize)] - min);
        Luma([cq!(range == 0, 0, (e * 255 / range) as u8)])
    })
}

/// The original image with every pixel whose seam order is below
/// `threshold` painted red.
pub fn seams_to_image(pixels: &PixelBuffer, grid: &SeamPriorityGrid, threshold: u16) -> RgbImage {
    ImageBuffer::from_fn(pixels.width(), pixels.height(), |x, y| {
        let (x, y) = (x as usize, y as usize);
        if grid.get(x, y) < threshold {
            Rgb([255, 0, 0])
        } else {
            let [r, g, b, _] = pixels.rgba(x, y);
            Rgb([r, g, b])
        }
    })
}

pub fn write_graymap<W: Write>(out: W, image: &GrayImage) -> io::Result<()> {
    PNMEncoder::new(out)
        .with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary))
        .encode(&**image, image.width(), image.height(), ColorType::Gray(8))
}

pub fn write_pixmap<W: Write>(out: W, image: &RgbImage) -> io::Result<()> {
    PNMEncoder::new(out)
        .with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary))
        .encode(&**image, image.width(), image.height(), ColorType::RGB(8))
}
