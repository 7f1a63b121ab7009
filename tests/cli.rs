// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, TempDir};

// An 8x8 binary pixmap with a bright vertical bar down column 5.
fn write_pixmap(dir: &Path) -> PathBuf {
    let path = dir.join("input.ppm");
    let mut bytes = b"P6\n8 8\n255\n".to_vec();
    for y in 0..8u8 {
        for x in 0..8u8 {
            let v = if x == 5 { 250 } else { 10 + y * 3 + x };
            bytes.extend_from_slice(&[v, v / 2, 255 - v]);
        }
    }
    fs::write(&path, bytes).unwrap();
    path
}

fn setup() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let input = write_pixmap(dir.path());
    (dir, input)
}

#[test]
fn energy_map_goes_to_stdout() {
    let (_dir, input) = setup();
    let output = Command::cargo_bin("seamgrid")
        .unwrap()
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.starts_with(b"P5"));
}

#[test]
fn seam_overlay_goes_to_a_file() {
    let (dir, input) = setup();
    let out = dir.path().join("seams.ppm");
    Command::cargo_bin("seamgrid")
        .unwrap()
        .arg(&input)
        .args(&["--output", "seams", "--seams", "3", "--generator", "predictive"])
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    let written = fs::read(&out).unwrap();
    assert!(written.starts_with(b"P6"));

    let image = image::open(&out).unwrap().to_rgb();
    let red = image.pixels().filter(|p| p.0 == [255, 0, 0]).count();
    assert_eq!(red, 3 * 8);
}

#[test]
fn every_energy_algorithm_runs() {
    let (_dir, input) = setup();
    for energy in &["sobel", "dual", "boundary-aware"] {
        Command::cargo_bin("seamgrid")
            .unwrap()
            .arg(&input)
            .args(&["--energy", *energy, "--output", "seams", "--seams", "2"])
            .args(&["--generator", "full"])
            .assert()
            .success();
    }
}

#[test]
fn too_many_seams_fail() {
    let (_dir, input) = setup();
    Command::cargo_bin("seamgrid")
        .unwrap()
        .arg(&input)
        .args(&["--output", "seams", "--seams", "8"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient width"));
}

#[test]
fn cached_generator_is_refused() {
    let (_dir, input) = setup();
    Command::cargo_bin("seamgrid")
        .unwrap()
        .arg(&input)
        .args(&["--output", "seams", "--generator", "cached", "--seams", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not implemented"));
}

#[test]
fn bad_numbers_are_rejected() {
    let (_dir, input) = setup();
    Command::cargo_bin("seamgrid")
        .unwrap()
        .arg(&input)
        .args(&["--seams", "many"])
        .assert()
        .failure();
}
