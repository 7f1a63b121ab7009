// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seam generation sessions
//!
//! A `SeamGenerator` owns one image, its energy map and the priority
//! grid being filled in, and runs batches of the chosen strategy until
//! the grid holds as many seams as were asked for.  Batches are
//! strictly sequential: each one sees the map exactly as the previous
//! one left it.  Callers that want to do something between batches can
//! drive the `batches` iterator themselves.

use crate::energy::EnergyAlgorithm;
use crate::energymap::EnergyMap;
use crate::errors::{SeamError, SeamResult};
use crate::full::FullBatcher;
use crate::grayscale::LumaMode;
use crate::pixelbuffer::{MaskBuffer, PixelBuffer};
use crate::predictive::{PredictiveBatcher, DEFAULT_PEAK_WINDOW};
use crate::random::RandomBatcher;
use crate::seambatch::{BatchSizing, SeamBatcher};
use crate::seamgrid::SeamPriorityGrid;
use log::debug;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeneratorKind {
    Random,
    Predictive,
    Full,
    Cached,
}

impl GeneratorKind {
    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::Random => "random",
            GeneratorKind::Predictive => "predictive",
            GeneratorKind::Full => "full",
            GeneratorKind::Cached => "cached",
        }
    }
}

impl Default for GeneratorKind {
    fn default() -> Self {
        GeneratorKind::Random
    }
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(GeneratorKind::Random),
            "predictive" => Ok(GeneratorKind::Predictive),
            "full" => Ok(GeneratorKind::Full),
            "cached" => Ok(GeneratorKind::Cached),
            _ => Err(format!("unknown generator '{}'", s)),
        }
    }
}

/// Tunables for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorOptions {
    pub batch_percentage: f64,
    pub min_batch_size: usize,
    pub energy: EnergyAlgorithm,
    pub luma: LumaMode,
    /// How many rows back the predictive scorer remembers a peak.
    pub peak_window: usize,
    /// Mixed into the random walks' seed.
    pub seed: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        let sizing = BatchSizing::default();
        GeneratorOptions {
            batch_percentage: sizing.batch_percentage,
            min_batch_size: sizing.min_batch_size,
            energy: EnergyAlgorithm::default(),
            luma: LumaMode::default(),
            peak_window: DEFAULT_PEAK_WINDOW,
            seed: 0,
        }
    }
}

enum Batcher {
    Random(RandomBatcher),
    Predictive(PredictiveBatcher),
    Full(FullBatcher),
}

impl Batcher {
    fn new(kind: GeneratorKind, options: &GeneratorOptions) -> SeamResult<Self> {
        match kind {
            GeneratorKind::Random => Ok(Batcher::Random(RandomBatcher::new(options.seed))),
            GeneratorKind::Predictive => Ok(Batcher::Predictive(PredictiveBatcher::new(
                options.peak_window,
            ))),
            GeneratorKind::Full => Ok(Batcher::Full(FullBatcher)),
            GeneratorKind::Cached => Err(SeamError::Unimplemented {
                generator: kind.name(),
            }),
        }
    }

    fn strategy(&mut self) -> &mut dyn SeamBatcher {
        match self {
            Batcher::Random(batcher) => batcher as &mut dyn SeamBatcher,
            Batcher::Predictive(batcher) => batcher,
            Batcher::Full(batcher) => batcher,
        }
    }
}

/// What one batch did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchReport {
    /// Map width when the batch started.
    pub width_before: usize,
    /// Seams claimed by this batch.
    pub seams: usize,
    /// Seams claimed by the session so far.
    pub generated: usize,
}

pub struct SeamGenerator {
    kind: GeneratorKind,
    pixels: PixelBuffer,
    mask: Option<MaskBuffer>,
    options: GeneratorOptions,
    sizing: BatchSizing,
    batcher: Batcher,
    energy_map: Option<EnergyMap>,
    grid: SeamPriorityGrid,
    generated_seams: usize,
    poisoned: bool,
}

impl SeamGenerator {
    /// Set up a session.  The energy map isn't built until the first
    /// batch runs.
    pub fn new(
        kind: GeneratorKind,
        pixels: PixelBuffer,
        mask: Option<MaskBuffer>,
        options: GeneratorOptions,
    ) -> SeamResult<Self> {
        let batcher = Batcher::new(kind, &options)?;
        if let Some(mask) = &mask {
            mask.check_fits(&pixels)?;
        }
        let (width, height) = pixels.dimensions();
        Ok(SeamGenerator {
            kind,
            grid: SeamPriorityGrid::new(width as usize, height as usize),
            pixels,
            mask,
            sizing: BatchSizing {
                batch_percentage: options.batch_percentage,
                min_batch_size: options.min_batch_size,
            },
            options,
            batcher,
            energy_map: None,
            generated_seams: 0,
            poisoned: false,
        })
    }

    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    pub fn set_batch_percentage(&mut self, percentage: f64) {
        self.options.batch_percentage = percentage;
        self.sizing.batch_percentage = percentage;
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// The energy map, once the first batch has built it.
    pub fn energy_map(&self) -> Option<&EnergyMap> {
        self.energy_map.as_ref()
    }

    pub fn current_width(&self) -> usize {
        self.energy_map
            .as_ref()
            .map_or(self.pixels.width() as usize, |map| map.width())
    }

    pub fn generated_seams(&self) -> usize {
        self.generated_seams
    }

    pub fn grid(&self) -> &SeamPriorityGrid {
        &self.grid
    }

    pub fn into_grid(self) -> SeamPriorityGrid {
        self.grid
    }

    fn check_target(&self, min_seams: usize) -> SeamResult<()> {
        if self.poisoned {
            return Err(SeamError::Poisoned);
        }
        let remaining = min_seams.saturating_sub(self.generated_seams);
        let width = self.current_width();
        if remaining > 0 && remaining >= width {
            return Err(SeamError::InsufficientWidth {
                requested: min_seams,
                width,
            });
        }
        Ok(())
    }

    /// Run one batch toward a total of `target` seams.  A batch never
    /// takes more seams than the target still needs.
    pub fn generate_seam_batch(&mut self, target: usize) -> SeamResult<BatchReport> {
        self.check_target(target)?;
        let result = self.run_batch(target);
        if let Err(error) = &result {
            if error.is_fatal() {
                self.poisoned = true;
            }
        }
        result
    }

    fn run_batch(&mut self, target: usize) -> SeamResult<BatchReport> {
        let remaining = target.saturating_sub(self.generated_seams);
        if remaining == 0 {
            return Ok(BatchReport {
                width_before: self.current_width(),
                seams: 0,
                generated: self.generated_seams,
            });
        }

        let mut map = match self.energy_map.take() {
            Some(map) => map,
            None => EnergyMap::new(
                &self.pixels,
                self.mask.as_ref(),
                self.options.energy,
                self.options.luma,
            )?,
        };
        let outcome = self.batch_on(&mut map, remaining);
        self.energy_map = Some(map);
        outcome
    }

    fn batch_on(&mut self, map: &mut EnergyMap, remaining: usize) -> SeamResult<BatchReport> {
        let width = map.width();
        let batcher = self.batcher.strategy();
        let size = batcher
            .batch_size(&self.sizing, width)
            .max(1)
            .min(remaining);
        let seams = batcher.next_batch(map, size)?;
        if seams.is_empty() {
            return Err(SeamError::InsufficientWidth {
                requested: remaining,
                width,
            });
        }

        for seam in &seams {
            self.grid.claim(seam, map.original_indices())?;
        }
        batcher.remove(map, &seams)?;
        self.generated_seams += seams.len();

        debug!(
            "{} batch: width {}, batch size {}, claimed {} ({} total)",
            batcher.name(),
            width,
            size,
            seams.len(),
            self.generated_seams
        );
        Ok(BatchReport {
            width_before: width,
            seams: seams.len(),
            generated: self.generated_seams,
        })
    }

    /// Iterate over the batches needed to reach `min_seams`, one report
    /// per batch.  Fails up front if the image is too narrow.
    pub fn batches(&mut self, min_seams: usize) -> SeamResult<Batches<'_>> {
        self.check_target(min_seams)?;
        Ok(Batches {
            generator: self,
            target: min_seams,
            done: false,
        })
    }

    /// Run batches until at least `min_seams` seams are in the grid.
    pub fn generate_seam_grid(&mut self, min_seams: usize) -> SeamResult<&SeamPriorityGrid> {
        for report in self.batches(min_seams)? {
            report?;
        }
        Ok(&self.grid)
    }
}

/// The batches of one `generate_seam_grid` call, run one at a time as
/// the iterator is advanced.  Stops after the first error.
pub struct Batches<'a> {
    generator: &'a mut SeamGenerator,
    target: usize,
    done: bool,
}

impl<'a> Iterator for Batches<'a> {
    type Item = SeamResult<BatchReport>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.generator.generated_seams >= self.target {
            return None;
        }
        let report = self.generator.generate_seam_batch(self.target);
        self.done = report.is_err();
        Some(report)
    }
}
