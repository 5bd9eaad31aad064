// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Sample-wise comparison of two waves.

use std::fmt;

/// Differences above these values are counted.
pub const THRESHOLDS: [f64; 4] = [0.001, 0.01, 0.1, 0.2];

/// How much two sequences of samples differ.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub len_a: usize,
    pub len_b: usize,
    /// For every entry of `THRESHOLDS`, the number of samples differing by more than it.
    pub exceeding: [usize; 4],
}

impl Comparison {
    /// Compare the common prefix of both sample sequences.
    ///
    /// ```
    /// # use syn_wav::compare::Comparison;
    /// let cmp = Comparison::new(&[0.0, 0.5, 1.0], &[0.0, 0.45, 1.0]);
    /// assert_eq!(cmp.exceeding, [1, 1, 0, 0]);
    /// assert!(!cmp.is_identical());
    /// ```
    pub fn new(a: &[f64], b: &[f64]) -> Self {
        let mut exceeding = [0; 4];
        for (x, y) in a.iter().zip(b) {
            let diff = (x - y).abs();
            for (count, threshold) in exceeding.iter_mut().zip(THRESHOLDS.iter()) {
                if diff > *threshold {
                    *count += 1;
                }
            }
        }
        Comparison {
            len_a: a.len(),
            len_b: b.len(),
            exceeding,
        }
    }

    pub fn same_length(&self) -> bool {
        self.len_a == self.len_b
    }

    /// No compared sample differs by more than the smallest threshold.
    ///
    /// A length mismatch alone does not make files differ, only the common samples count.
    pub fn is_identical(&self) -> bool {
        self.exceeding.iter().all(|&count| count == 0)
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.same_length() {
            writeln!(
                f,
                "The number of samples does not match: {} vs {}",
                self.len_a, self.len_b
            )?;
        }
        for (count, threshold) in self.exceeding.iter().zip(THRESHOLDS.iter()) {
            if *count > 0 {
                writeln!(f, "Number of samples (> {}): {}", threshold, count)?;
            }
        }
        if self.is_identical() {
            writeln!(f, "Files are identical!")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use expect_test::expect;

    #[test]
    fn identical() {
        let samples = [0.1, -0.2, 0.3];
        let cmp = Comparison::new(&samples, &samples);
        assert!(cmp.is_identical());
        expect![[r#"
            Files are identical!
        "#]]
        .assert_eq(&cmp.to_string());
    }

    #[test]
    fn differences_per_threshold() {
        let a = [0.0, 0.0, 0.0, 0.0, 0.0];
        let b = [0.0005, 0.005, 0.05, 0.15, 0.5];
        let cmp = Comparison::new(&a, &b);
        assert_eq!(cmp.exceeding, [4, 3, 2, 1]);
        expect![[r#"
            Number of samples (> 0.001): 4
            Number of samples (> 0.01): 3
            Number of samples (> 0.1): 2
            Number of samples (> 0.2): 1
        "#]]
        .assert_eq(&cmp.to_string());
    }

    #[test]
    fn length_mismatch_compares_prefix() {
        let cmp = Comparison::new(&[0.5, 0.5, 0.5], &[0.5, 0.25]);
        assert!(!cmp.same_length());
        assert_eq!(cmp.exceeding, [1, 1, 1, 1]);
        expect![[r#"
            The number of samples does not match: 3 vs 2
            Number of samples (> 0.001): 1
            Number of samples (> 0.01): 1
            Number of samples (> 0.1): 1
            Number of samples (> 0.2): 1
        "#]]
        .assert_eq(&cmp.to_string());
    }

    #[test]
    fn length_mismatch_with_equal_prefix() {
        let cmp = Comparison::new(&[0.5], &[0.5, 0.25]);
        expect![[r#"
            The number of samples does not match: 1 vs 2
            Files are identical!
        "#]]
        .assert_eq(&cmp.to_string());
    }
}
