// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sliding window maximum
//!
//! A monotonic queue: values held between `tail` and `head` are
//! strictly decreasing, each stamped with the tick it arrived on.  The
//! oldest (and largest) sits at `tail`.  Storage never grows past its
//! initial capacity; when `head` runs off the end the live span is
//! copied back down to zero.

#[derive(Debug, Clone)]
pub struct SlidingWindowMaximum<T: Copy + PartialOrd + Default> {
    window: u64,
    time: u64,
    head: usize,
    tail: usize,
    timing: Vec<u64>,
    values: Vec<T>,
}

const DEFAULT_CAPACITY: usize = 1000;

impl<T: Copy + PartialOrd + Default> SlidingWindowMaximum<T> {
    pub fn new(window: usize) -> Self {
        Self::with_capacity(window, DEFAULT_CAPACITY)
    }

    /// The capacity is raised to the window size if it is smaller; the
    /// live span can never be longer than the window.
    pub fn with_capacity(window: usize, capacity: usize) -> Self {
        let window = window.max(1);
        let capacity = capacity.max(window);
        SlidingWindowMaximum {
            window: window as u64,
            time: 0,
            head: 0,
            tail: 0,
            timing: vec![0; capacity],
            values: vec![T::default(); capacity],
        }
    }

    pub fn window(&self) -> usize {
        self.window as usize
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Push `value` and return the maximum of the last `window` values.
    pub fn add_and_get_max(&mut self, value: T) -> T {
        self.time += 1;

        while self.head > self.tail && self.timing[self.tail] + self.window <= self.time {
            self.tail += 1;
        }

        while self.head > self.tail && self.values[self.head - 1] <= value {
            self.head -= 1;
        }

        if self.head >= self.values.len() {
            self.timing.copy_within(self.tail..self.head, 0);
            self.values.copy_within(self.tail..self.head, 0);
            self.head -= self.tail;
            self.tail = 0;
        }

        self.values[self.head] = value;
        self.timing[self.head] = self.time;
        self.head += 1;

        self.values[self.tail]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(window: usize, capacity: usize, values: &[u32], expected: &[u32]) {
        let mut swm = SlidingWindowMaximum::with_capacity(window, capacity);
        let found: Vec<u32> = values.iter().map(|&v| swm.add_and_get_max(v)).collect();
        assert_eq!(found, expected);
    }

    fn brute_force(window: usize, values: &[u32]) -> Vec<u32> {
        (0..values.len())
            .map(|t| {
                let start = (t + 1).saturating_sub(window);
                values[start..=t].iter().cloned().max().unwrap()
            })
            .collect()
    }

    #[test]
    fn ascending() {
        run(5, 10, &[1, 2, 3, 4, 5], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn steady_max() {
        run(3, 5, &[1, 2, 3, 1, 2], &[1, 2, 3, 3, 3]);
        run(3, 5, &[1, 2, 1, 4], &[1, 2, 2, 4]);
    }

    #[test]
    fn old_max_expires() {
        run(3, 5, &[5, 4, 3, 2, 1], &[5, 5, 5, 4, 3]);
        run(3, 10, &[10, 1, 2, 3, 4], &[10, 10, 10, 3, 4]);
    }

    #[test]
    fn compacts_at_capacity() {
        run(2, 3, &[10, 9, 8, 12, 7], &[10, 10, 9, 12, 12]);
    }

    #[test]
    fn replacement_as_max_leaves() {
        run(3, 5, &[5, 1, 1, 6], &[5, 5, 5, 6]);
    }

    #[test]
    fn duplicates() {
        run(4, 10, &[5, 5, 2, 2, 3, 4], &[5, 5, 5, 5, 5, 4]);
    }

    #[test]
    fn long_sequences() {
        let zigzag = [
            1, 5, 3, 6, 2, 7, 4, 8, 5, 9, 1, 10, 2, 11, 3, 12, 4, 13, 5, 14,
        ];
        run(
            5,
            10,
            &zigzag,
            &[1, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13, 13, 14],
        );
        let falling: Vec<u32> = (1..=20).rev().collect();
        run(
            5,
            25,
            &falling,
            &[20, 20, 20, 20, 20, 19, 18, 17, 16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5],
        );
    }

    #[test]
    fn matches_brute_force_under_compaction() {
        let values: Vec<u32> = (0..500u32).map(|i| (i * 7919 + 13) % 97).collect();
        for &(window, capacity) in &[(1, 1), (3, 4), (7, 7), (10, 1000)] {
            run(window, capacity, &values, &brute_force(window, &values));
        }
    }

    #[test]
    fn capacity_never_below_window() {
        let swm: SlidingWindowMaximum<u16> = SlidingWindowMaximum::with_capacity(8, 2);
        assert_eq!(swm.capacity(), 8);
        assert_eq!(swm.window(), 8);
    }
}
