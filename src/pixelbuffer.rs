// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pixel and mask buffers
//!
//! The seam machinery never looks at an image directly; it takes a
//! flat RGBA buffer with explicit dimensions, and optionally a
//! grayscale mask of the same size.  Either can be lifted out of
//! anything `image` can view.

use crate::errors::{SeamError, SeamResult};
use crate::grayscale::{grayscale_flat, LumaMode};
use image::{GenericImageView, Pixel, Primitive};

// Seam columns are u16 and original indices u32.
fn check_dimensions(width: u32, height: u32) -> SeamResult<()> {
    let too_many = u64::from(width) * u64::from(height) > u64::from(u32::max_value());
    if width == 0 || height == 0 || width > u32::from(u16::max_value()) || too_many {
        return Err(SeamError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Row-major RGBA, eight bits per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> SeamResult<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(SeamError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(PixelBuffer {
            width,
            height,
            data,
        })
    }

    /// Capture any image as RGBA8.  Wider subpixels are rescaled to
    /// the 0..=255 range.
    pub fn from_image<I, P, S>(image: &I) -> SeamResult<Self>
    where
        I: GenericImageView<Pixel = P>,
        P: Pixel<Subpixel = S> + 'static,
        S: Primitive + 'static,
    {
        let (width, height) = image.dimensions();
        check_dimensions(width, height)?;
        let scale: f32 = num_traits::NumCast::from(S::max_value()).unwrap_or(255.0);
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let rgba = image.get_pixel(x, y).to_rgba();
                for channel in rgba.channels() {
                    let c: f32 = num_traits::NumCast::from(*channel).unwrap_or(0.0);
                    data.push((c * 255.0 / scale).round() as u8);
                }
            }
        }
        PixelBuffer::from_raw(width, height, data)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// The four channels of the pixel at `(x, y)`.
    #[inline]
    pub fn rgba(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width as usize + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

/// One grayscale byte per pixel.  Multiplies the energy of the pixel
/// beneath it by `value / 255`: zero makes a pixel free to remove,
/// 255 leaves its energy alone.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl MaskBuffer {
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> SeamResult<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(SeamError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(MaskBuffer {
            width,
            height,
            data,
        })
    }

    /// Run an RGBA buffer through the grayscale converter.
    pub fn from_pixels(pixels: &PixelBuffer, mode: LumaMode) -> Self {
        MaskBuffer {
            width: pixels.width,
            height: pixels.height,
            data: grayscale_flat(pixels, mode),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Mask values, keyed by original pixel index.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// A mask is only meaningful over an image of the same size.
    pub fn check_fits(&self, pixels: &PixelBuffer) -> SeamResult<()> {
        if self.dimensions() != pixels.dimensions() {
            return Err(SeamError::MaskDimensionMismatch {
                width: pixels.width,
                height: pixels.height,
                mask_width: self.width,
                mask_height: self.height,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgba};

    #[test]
    fn raw_buffers_are_checked() {
        assert_eq!(
            PixelBuffer::from_raw(2, 2, vec![0; 15]),
            Err(SeamError::BufferSizeMismatch {
                expected: 16,
                actual: 15
            })
        );
        assert_eq!(
            PixelBuffer::from_raw(0, 2, vec![]),
            Err(SeamError::InvalidDimensions {
                width: 0,
                height: 2
            })
        );
        assert!(MaskBuffer::from_raw(70_000, 1, vec![0; 70_000]).is_err());
    }

    #[test]
    fn captures_gray_images_as_rgba() {
        let buf: ImageBuffer<Luma<u8>, _> =
            ImageBuffer::from_raw(2, 1, vec![10u8, 200]).unwrap();
        let pixels = PixelBuffer::from_image(&buf).unwrap();
        assert_eq!(pixels.as_raw(), &[10, 10, 10, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn rescales_sixteen_bit_channels() {
        let buf: ImageBuffer<Rgba<u16>, _> =
            ImageBuffer::from_raw(1, 1, vec![65535u16, 0, 32768, 65535]).unwrap();
        let pixels = PixelBuffer::from_image(&buf).unwrap();
        assert_eq!(pixels.rgba(0, 0), [255, 0, 128, 255]);
    }

    #[test]
    fn mask_must_fit() {
        let pixels = PixelBuffer::from_raw(2, 2, vec![255; 16]).unwrap();
        let mask = MaskBuffer::from_raw(2, 1, vec![0, 0]).unwrap();
        assert!(mask.check_fits(&pixels).is_err());
        let mask = MaskBuffer::from_pixels(&pixels, LumaMode::Weighted);
        assert!(mask.check_fits(&pixels).is_ok());
        assert_eq!(mask.as_raw(), &[255, 255, 255, 255]);
    }
}
