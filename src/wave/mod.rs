// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! This is the namespace for all parts dealing with data in sampled waves.

pub mod riff;

use std::fmt;
use std::ops;
use std::path::Path;

use crate::synth::{WaveShape, DEFAULT_SAMPLE_RATE};

/// Sampled audio with interleaved channels, backed by floating point samples in `[-1, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    channels: u16,
    sample_rate: u32,
    samples: Vec<f64>,
}

impl Wave {
    /// A silent wave of `frames` samples per channel.
    pub fn new(frames: usize, channels: u16) -> Self {
        assert!(channels > 0, "a wave needs at least one channel");
        Self {
            channels,
            sample_rate: DEFAULT_SAMPLE_RATE,
            samples: vec![0.0; frames * channels as usize],
        }
    }

    /// Wrap already interleaved samples.
    ///
    /// # Panics
    ///
    /// If `channels` is zero or the samples do not divide into whole frames.
    pub fn from_samples(channels: u16, sample_rate: u32, samples: Vec<f64>) -> Self {
        assert!(channels > 0, "a wave needs at least one channel");
        assert_eq!(
            samples.len() % channels as usize,
            0,
            "samples must form whole frames"
        );
        Self {
            channels,
            sample_rate,
            samples,
        }
    }

    /// A mono tone of the given shape sampled at the default rate.
    ///
    /// ```
    /// # use syn_wav::wave::Wave;
    /// # use syn_wav::synth::WaveShape;
    /// let tone = Wave::tone(WaveShape::Square, 100, 441.0, 0.5);
    /// assert_eq!(tone.frames(), 100);
    /// assert_eq!(tone.samples()[0], 0.5);
    /// ```
    pub fn tone(shape: WaveShape, frames: usize, frequency: f64, amplitude: f64) -> Self {
        let mut wave = Wave::new(frames, 1);
        let rate = f64::from(wave.sample_rate);
        shape.fill(&mut wave.samples, frequency, amplitude, rate);
        wave
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples per channel.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [f64] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// The RIFF header fields describing this wave as 16 bit PCM.
    ///
    /// Sizes are computed in 64 bit, the writer checks that they fit the file format.
    pub fn header(&self) -> WaveHeader {
        let data_chunk_size = self.samples.len() as u64 * 2;
        WaveHeader {
            channels: self.channels,
            sample_rate: self.sample_rate,
            byte_rate: u64::from(self.sample_rate) * u64::from(self.channels) * 2,
            block_align: u32::from(self.channels) * 2,
            fmt_chunk_size: riff::PCM_FMT_CHUNK_SIZE,
            data_chunk_size,
            riff_chunk_size: 4 + (8 + u64::from(riff::PCM_FMT_CHUNK_SIZE)) + (8 + data_chunk_size),
            samples: self.samples.len(),
        }
    }

    pub fn read_file(path: &Path) -> Result<Wave, riff::Error> {
        riff::read_file(path)
    }

    pub fn write_file(&self, path: &Path) -> Result<(), riff::Error> {
        riff::write_file(self, path)
    }
}

/// Summary of the header fields of a 16 bit PCM wave file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveHeader {
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u64,
    pub block_align: u32,
    pub fmt_chunk_size: u32,
    pub data_chunk_size: u64,
    pub riff_chunk_size: u64,
    /// Total number of samples over all channels.
    pub samples: usize,
}

impl fmt::Display for WaveHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Num channels: {}", self.channels)?;
        writeln!(f, "Sample rate: {}", self.sample_rate)?;
        writeln!(f, "Byte rate: {}", self.byte_rate)?;
        writeln!(f, "Block align: {}", self.block_align)?;
        writeln!(f, "Sub-chunk size 1: {}", self.fmt_chunk_size)?;
        writeln!(f, "Sub-chunk size 2: {}", self.data_chunk_size)?;
        writeln!(f, "Chunk size: {}", self.riff_chunk_size)?;
        writeln!(f, "Num data: {}", self.samples)
    }
}

/// Convenience type for making things stereo, e.g. individual samples or gains.
///
/// ```
/// use syn_wav::wave::*;
///
/// let stereo = Stereo::new(0.25, 0.5);
/// let stereo2 = stereo + Stereo::new(0.5, -0.25);
/// assert_eq!(stereo2 * 2.0, Stereo::new(1.5, 0.5));
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stereo<T> {
    pub left: T,
    pub right: T,
}

impl<T> Stereo<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn mono(mono: T) -> Self
    where
        T: Copy,
    {
        Self::new(mono, mono)
    }
}

impl<T: ops::Add> ops::Add for Stereo<T> {
    type Output = Stereo<T::Output>;

    fn add(self, rhs: Self) -> Self::Output {
        Stereo {
            left: self.left + rhs.left,
            right: self.right + rhs.right,
        }
    }
}

impl<T: ops::AddAssign> ops::AddAssign for Stereo<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.left += rhs.left;
        self.right += rhs.right;
    }
}

impl<T: ops::Mul + Copy> ops::Mul<T> for Stereo<T> {
    type Output = Stereo<T::Output>;

    fn mul(self, rhs: T) -> Self::Output {
        Stereo {
            left: self.left * rhs,
            right: self.right * rhs,
        }
    }
}
