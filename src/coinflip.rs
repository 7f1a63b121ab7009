// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A reproducible coin.  Given one seed for the batch and one for the
//! pixel, always lands the same way.

/// The 32-bit finalizer from MurmurHash3.
#[inline]
fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

/// Fix the first seed and return a coin keyed on the second.
pub fn deterministic_binary_rnd(seed1: u32) -> impl Fn(u32) -> bool {
    move |seed2| fmix32(seed1 ^ seed2) & 1 == 1
}
