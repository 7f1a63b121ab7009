// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{value_t, App, Arg, ArgMatches};
use failure::err_msg;
use log::debug;
use seamgrid::dump::{write_graymap, write_pixmap};
use seamgrid::{
    energy_to_image, seams_to_image, EnergyAlgorithm, EnergyMap, GeneratorKind, GeneratorOptions,
    LumaMode, MaskBuffer, PixelBuffer, SeamGenerator,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process;

fn is_number<T: std::str::FromStr>(value: String) -> Result<(), String> {
    value
        .parse::<T>()
        .map(|_| ())
        .map_err(|_| format!("'{}' is not a valid number", value))
}

fn load(path: &str) -> Result<PixelBuffer, failure::Error> {
    let image = image::open(path)?;
    Ok(PixelBuffer::from_image(&image)?)
}

fn output(matches: &ArgMatches) -> Result<Box<dyn Write>, failure::Error> {
    Ok(match matches.value_of("out") {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    })
}

fn run() -> Result<(), failure::Error> {
    let matches = App::new("seamgrid")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Seam priority grids for content-aware resizing")
        .arg(
            Arg::with_name("image")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("seams")
                .long("seams")
                .short("n")
                .takes_value(true)
                .default_value("10")
                .validator(is_number::<usize>)
                .help("How many seams to find"),
        )
        .arg(
            Arg::with_name("generator")
                .long("generator")
                .short("g")
                .takes_value(true)
                .possible_values(&["random", "predictive", "full", "cached"])
                .default_value("random"),
        )
        .arg(
            Arg::with_name("energy")
                .long("energy")
                .short("e")
                .takes_value(true)
                .possible_values(&["sobel", "dual", "boundary-aware"])
                .default_value("sobel"),
        )
        .arg(
            Arg::with_name("mask")
                .long("mask")
                .short("m")
                .takes_value(true)
                .help("A grayscale image the same size as the input; dark areas are carved first"),
        )
        .arg(
            Arg::with_name("batch-percentage")
                .long("batch-percentage")
                .takes_value(true)
                .validator(is_number::<f64>),
        )
        .arg(
            Arg::with_name("min-batch-size")
                .long("min-batch-size")
                .takes_value(true)
                .validator(is_number::<usize>),
        )
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .takes_value(true)
                .possible_values(&["energy", "seams"])
                .default_value("energy")
                .help("Dump the energy map, or the image with its seams in red"),
        )
        .arg(
            Arg::with_name("out")
                .long("out")
                .takes_value(true)
                .help("Write here instead of standard output"),
        )
        .get_matches();

    let mut options = GeneratorOptions::default();
    options.energy = matches
        .value_of("energy")
        .unwrap_or("sobel")
        .parse::<EnergyAlgorithm>()
        .map_err(err_msg)?;
    if matches.is_present("batch-percentage") {
        options.batch_percentage = value_t!(matches, "batch-percentage", f64)?;
    }
    if matches.is_present("min-batch-size") {
        options.min_batch_size = value_t!(matches, "min-batch-size", usize)?;
    }

    let pixels = load(matches.value_of("image").unwrap_or_default())?;
    let mask = match matches.value_of("mask") {
        Some(path) => Some(MaskBuffer::from_pixels(&load(path)?, LumaMode::Weighted)),
        None => None,
    };

    if matches.value_of("output") == Some("seams") {
        let kind = matches
            .value_of("generator")
            .unwrap_or("random")
            .parse::<GeneratorKind>()
            .map_err(err_msg)?;
        let seams = value_t!(matches, "seams", usize)?;
        let mut generator = SeamGenerator::new(kind, pixels, mask, options)?;
        for report in generator.batches(seams)? {
            let report = report?;
            debug!(
                "batch of {} at width {}, {} so far",
                report.seams, report.width_before, report.generated
            );
        }
        let overlay = seams_to_image(generator.pixels(), generator.grid(), seams as u16);
        write_pixmap(output(&matches)?, &overlay)?;
    } else {
        let map = EnergyMap::new(&pixels, mask.as_ref(), options.energy, options.luma)?;
        write_graymap(output(&matches)?, &energy_to_image(map.energy_map()))?;
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(error) = run() {
        eprintln!("seamgrid: {}", error);
        process::exit(1);
    }
}
