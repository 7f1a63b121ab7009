// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of a pixel
//!
//! Energy is the cost of removing a pixel.  The base calculation is a
//! 3x3 Sobel gradient over the grayscale map, summed as |gx| + |gy|
//! (or the true magnitude, with the `square_root` feature).  Two
//! richer variants layer more terms on top of it: a forward energy
//! estimate of the discontinuity that removing the pixel would
//! create, and a penalty for cutting through what looks like an
//! object boundary.

use crate::twodmap::RowMap;
use std::str::FromStr;

/// The largest value an energy cell can hold.
pub const MAX_ENERGY: u16 = u16::max_value();

/// Which energy function drives seam selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnergyAlgorithm {
    /// Gradient energy alone.
    Sobel,
    /// Gradient energy plus weighted forward energy.
    Dual { forward_energy_weight: f32 },
    /// Gradient energy, forward energy, and a boundary penalty.
    BoundaryAware {
        boundary_penalty_weight: f32,
        uniformity_threshold: f32,
        edge_threshold: f32,
    },
}

impl Default for EnergyAlgorithm {
    fn default() -> Self {
        EnergyAlgorithm::Sobel
    }
}

impl EnergyAlgorithm {
    pub fn dual() -> Self {
        EnergyAlgorithm::Dual {
            forward_energy_weight: 1.0,
        }
    }

    pub fn boundary_aware() -> Self {
        EnergyAlgorithm::BoundaryAware {
            boundary_penalty_weight: 5.0,
            uniformity_threshold: 10.0,
            edge_threshold: 20.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnergyAlgorithm::Sobel => "sobel",
            EnergyAlgorithm::Dual { .. } => "dual",
            EnergyAlgorithm::BoundaryAware { .. } => "boundary-aware",
        }
    }

    /// Whether the algorithm reads full colour as well as luma.
    pub fn needs_color(&self) -> bool {
        *self != EnergyAlgorithm::Sobel
    }

    /// How far, in pixels, the kernel reaches from its centre in any
    /// direction.  The boundary detector samples 2-pixel regions 3
    /// pixels away.
    pub fn reach(&self) -> usize {
        match self {
            EnergyAlgorithm::Sobel | EnergyAlgorithm::Dual { .. } => 1,
            EnergyAlgorithm::BoundaryAware { .. } => 5,
        }
    }
}

impl FromStr for EnergyAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sobel" => Ok(EnergyAlgorithm::Sobel),
            "dual" => Ok(EnergyAlgorithm::dual()),
            "boundary-aware" => Ok(EnergyAlgorithm::boundary_aware()),
            _ => Err(format!("unknown energy algorithm '{}'", s)),
        }
    }
}

/// The Sobel gradient at `(x, y)`.  Neighbors past the border are
/// clamped to the border.
pub fn sobel(gray: &RowMap<u8>, x: usize, y: usize) -> f32 {
    let (mw, mh) = (gray.width() - 1, gray.height() - 1);
    let (x1, x3) = (cq!(x == 0, 0, x - 1), cq!(x >= mw, mw, x + 1));
    let (y1, y3) = (cq!(y == 0, 0, y - 1), cq!(y >= mh, mh, y + 1));

    let g = |xx: usize, yy: usize| i32::from(gray[(xx, yy)]);

    let gx = -g(x1, y1) + g(x3, y1) - 2 * g(x1, y) + 2 * g(x3, y) - g(x1, y3) + g(x3, y3);
    let gy = -g(x1, y1) - 2 * g(x, y1) - g(x3, y1) + g(x1, y3) + 2 * g(x, y3) + g(x3, y3);

    magnitude(gx, gy)
}

#[cfg(not(feature = "square_root"))]
#[inline]
fn magnitude(gx: i32, gy: i32) -> f32 {
    (gx.abs() + gy.abs()) as f32
}

#[cfg(feature = "square_root")]
#[inline]
fn magnitude(gx: i32, gy: i32) -> f32 {
    ((gx * gx + gy * gy) as f32).sqrt()
}

// Euclidean RGB distance.  Pairs that fall off the image contribute
// nothing.
fn color_distance(
    color: &RowMap<[u8; 4]>,
    (x1, y1): (isize, isize),
    (x2, y2): (isize, isize),
) -> f32 {
    let inside = |x: isize, y: isize| {
        x >= 0 && y >= 0 && (x as usize) < color.width() && (y as usize) < color.height()
    };
    if !inside(x1, y1) || !inside(x2, y2) {
        return 0.0;
    }
    let p1 = color[(x1 as usize, y1 as usize)];
    let p2 = color[(x2 as usize, y2 as usize)];
    let sum: i32 = (0..3)
        .map(|c| {
            let d = i32::from(p1[c]) - i32::from(p2[c]);
            d * d
        })
        .sum();
    (sum as f32).sqrt()
}

/// The discontinuity left behind if `(x, y)` is removed: its left and
/// right neighbors become adjacent, as do the ones above and below.
/// The diagonal joins count for half.
pub fn forward_energy(color: &RowMap<[u8; 4]>, x: usize, y: usize, diagonals: bool) -> f32 {
    let (x, y) = (x as isize, y as isize);
    let horizontal = color_distance(color, (x - 1, y), (x + 1, y));
    let vertical = color_distance(color, (x, y - 1), (x, y + 1));
    if !diagonals {
        return horizontal + vertical;
    }

    let mut diagonal = 0.0;
    if x >= 1 && y >= 1 {
        diagonal += color_distance(color, (x - 1, y - 1), (x + 1, y));
    }
    if ((x + 1) as usize) < color.width() && ((y + 1) as usize) < color.height() {
        diagonal += color_distance(color, (x + 1, y + 1), (x - 1, y));
    }
    horizontal + vertical + diagonal * 0.5
}

/// Standard deviation of the luma in the square of `radius` around
/// `(cx, cy)`, ignoring whatever falls outside the map.
fn region_deviation(gray: &RowMap<u8>, cx: isize, cy: isize, radius: isize) -> f32 {
    let (mut sum, mut squares, mut count) = (0.0f32, 0.0f32, 0u32);
    for y in (cy - radius)..=(cy + radius) {
        for x in (cx - radius)..=(cx + radius) {
            if x >= 0 && y >= 0 && (x as usize) < gray.width() && (y as usize) < gray.height() {
                let v = f32::from(gray[(x as usize, y as usize)]);
                sum += v;
                squares += v * v;
                count += 1;
            }
        }
    }
    if count < 2 {
        return 0.0;
    }
    let mean = sum / count as f32;
    (squares / count as f32 - mean * mean).max(0.0).sqrt()
}

/// A penalty for cutting across what looks like an object edge.
/// Weak gradients are never penalised.  Three tests can flag a
/// boundary, and the strongest one wins:
///
/// 1. one side of the pixel is nearly uniform (a building against sky),
/// 2. the two sides have very different texture (a building against trees),
/// 3. the gradient is simply very strong.
pub fn boundary_penalty(
    gray: &RowMap<u8>,
    x: usize,
    y: usize,
    gradient: f32,
    uniformity_threshold: f32,
    edge_threshold: f32,
) -> f32 {
    if gradient < edge_threshold * 0.3 {
        return 0.0;
    }

    let (x, y) = (x as isize, y as isize);
    let left = region_deviation(gray, x - 3, y, 2);
    let right = region_deviation(gray, x + 3, y, 2);
    let top = region_deviation(gray, x, y - 3, 2);
    let bottom = region_deviation(gray, x, y + 3, 2);

    let mut strength: f32 = 0.0;

    let uniform = uniformity_threshold * 0.5;
    let flattest = left.min(right).min(top).min(bottom);
    if flattest < uniform {
        strength = strength.max(((uniform - flattest) / uniform).max(0.0) * 0.3);
    }

    let texture = (left - right).abs().max((top - bottom).abs());
    if texture > uniformity_threshold * 4.0 && gradient > edge_threshold {
        strength = strength.max((texture / (uniformity_threshold * 8.0)).min(1.0) * 0.2);
    }

    if gradient > edge_threshold * 2.5 {
        strength = strength.max((gradient / (edge_threshold * 4.0)).min(1.0) * 0.15);
    }

    if strength > 0.0 {
        let edge = (gradient / (edge_threshold * 2.0)).min(1.0);
        strength * edge * 200.0
    } else {
        0.0
    }
}

/// Round and clamp a raw energy into a storable cell.
#[inline]
pub fn clamp_energy(raw: f32) -> u16 {
    cq!(
        raw.is_nan() || raw <= 0.0,
        0,
        cq!(raw >= f32::from(MAX_ENERGY), MAX_ENERGY, raw.round() as u16)
    )
}

/// The unmasked energy of one pixel under `algorithm`.  `color` must
/// be present for the algorithms that need it; without it they fall
/// back to gradient energy alone.
pub fn pixel_energy(
    algorithm: EnergyAlgorithm,
    gray: &RowMap<u8>,
    color: Option<&RowMap<[u8; 4]>>,
    x: usize,
    y: usize,
) -> f32 {
    let gradient = sobel(gray, x, y);
    match (algorithm, color) {
        (EnergyAlgorithm::Dual { forward_energy_weight }, Some(color)) => {
            gradient + forward_energy_weight * forward_energy(color, x, y, true)
        }
        (
            EnergyAlgorithm::BoundaryAware {
                boundary_penalty_weight,
                uniformity_threshold,
                edge_threshold,
            },
            Some(color),
        ) => {
            gradient
                + forward_energy(color, x, y, false)
                + boundary_penalty_weight
                    * boundary_penalty(gray, x, y, gradient, uniformity_threshold, edge_threshold)
        }
        _ => gradient,
    }
}
