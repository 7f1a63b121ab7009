// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam priority grids
//!
//! Content-aware resizing removes low-energy, top-to-bottom paths
//! through an image.  This crate works out which paths those are, in
//! batches, and records the order in which each pixel would be carved
//! away.  What to do with that order (shrink, stretch, blend) is left
//! to whoever reads the grid.

#[macro_use]
pub mod ternary;

pub mod errors;
pub use errors::{SeamError, SeamResult};

pub mod deletion;
pub use deletion::{delete_array_indices, delete_indices};

pub mod seam;
pub use seam::{ScoredSeam, Seam};

pub mod twodmap;
pub use twodmap::{EnergyAndBackPointer, RowMap};

pub mod pixelbuffer;
pub use pixelbuffer::{MaskBuffer, PixelBuffer};

pub mod grayscale;
pub use grayscale::LumaMode;

pub mod energy;
pub use energy::EnergyAlgorithm;

pub mod energymap;
pub use energymap::EnergyMap;

pub mod cumulative;
pub use cumulative::{CumulativeOptions, MinimalCumulativeEnergyMap};

pub mod slidingmax;
pub use slidingmax::SlidingWindowMaximum;

pub mod coinflip;

pub mod seamgrid;
pub use seamgrid::{SeamPriorityGrid, SENTINEL};

pub mod seamfinder;
pub use seamfinder::{MeetInTheMiddle, SeamFinder};

pub mod seambatch;
pub use seambatch::{BatchSizing, SeamBatcher};

pub mod full;
pub mod predictive;
pub mod random;

pub mod generator;
pub use generator::{BatchReport, GeneratorKind, GeneratorOptions, SeamGenerator};

pub mod dump;
pub use dump::{energy_to_image, seams_to_image};
