// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Sampling of the basic wave shapes into buffers.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// The wave shapes an instrument can be built from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WaveShape {
    Sine,
    Square,
    Sawtooth,
    /// Six decaying harmonics, cubed and normalized.
    Complex,
    /// A plucked string (Karplus-Strong).
    String,
}

impl WaveShape {
    pub const ALL: [WaveShape; 5] = [
        WaveShape::Sine,
        WaveShape::Square,
        WaveShape::Sawtooth,
        WaveShape::Complex,
        WaveShape::String,
    ];

    /// The numeric code of the shape as used in music scores (1 to 5).
    pub fn code(self) -> u8 {
        match self {
            WaveShape::Sine => 1,
            WaveShape::Square => 2,
            WaveShape::Sawtooth => 3,
            WaveShape::Complex => 4,
            WaveShape::String => 5,
        }
    }

    /// ```
    /// # use syn_wav::synth::oscillator::WaveShape;
    /// assert_eq!(WaveShape::from_code(3), Some(WaveShape::Sawtooth));
    /// assert_eq!(WaveShape::from_code(0), None);
    /// ```
    pub fn from_code(code: i64) -> Option<WaveShape> {
        WaveShape::ALL.iter().copied().find(|s| i64::from(s.code()) == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            WaveShape::Sine => "sine",
            WaveShape::Square => "square",
            WaveShape::Sawtooth => "sawtooth",
            WaveShape::Complex => "complex",
            WaveShape::String => "string",
        }
    }

    /// Overwrite `buffer` with this wave shape, starting at phase zero.
    pub fn fill(self, buffer: &mut [f64], frequency: f64, amplitude: f64, sample_rate: f64) {
        match self {
            WaveShape::Sine => sine(buffer, frequency, amplitude, sample_rate),
            WaveShape::Square => square(buffer, frequency, amplitude, sample_rate),
            WaveShape::Sawtooth => sawtooth(buffer, frequency, amplitude, sample_rate),
            WaveShape::Complex => complex(buffer, frequency, amplitude, sample_rate),
            WaveShape::String => string(buffer, frequency, amplitude, sample_rate),
        }
    }
}

impl fmt::Display for WaveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WaveShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<i64>() {
            return WaveShape::from_code(code).ok_or_else(|| format!("unknown wave type {}", code));
        }
        WaveShape::ALL
            .iter()
            .copied()
            .find(|shape| shape.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown wave shape {:?}", s))
    }
}

pub fn sine(buffer: &mut [f64], frequency: f64, amplitude: f64, sample_rate: f64) {
    for (i, sample) in buffer.iter_mut().enumerate() {
        let t = i as f64 / sample_rate;
        *sample = amplitude * (2.0 * PI * frequency * t).sin();
    }
}

/// Flips between `amplitude` and `-amplitude` with the sign of the matching sine.
pub fn square(buffer: &mut [f64], frequency: f64, amplitude: f64, sample_rate: f64) {
    for (i, sample) in buffer.iter_mut().enumerate() {
        let t = i as f64 / sample_rate;
        *sample = if (2.0 * PI * t * frequency).sin() >= 0.0 {
            amplitude
        } else {
            -amplitude
        };
    }
}

pub fn sawtooth(buffer: &mut [f64], frequency: f64, amplitude: f64, sample_rate: f64) {
    for (i, sample) in buffer.iter_mut().enumerate() {
        let t = i as f64 / sample_rate;
        let cycles = t * frequency;
        let phase = cycles - cycles.trunc();
        *sample = (2.0 * phase - 1.0) * amplitude;
    }
}

/// Sum of six harmonics with halving weights under a slow exponential decay.
/// The sum is cubed and then normalized so that its peak equals `amplitude`.
///
/// A buffer without any non-zero raw sample (e.g. of length one) stays silent.
pub fn complex(buffer: &mut [f64], frequency: f64, amplitude: f64, sample_rate: f64) {
    for (i, sample) in buffer.iter_mut().enumerate() {
        let t = i as f64 / sample_rate;
        let decay = (-0.0008 * PI * t * frequency).exp();
        let harmonics: f64 = (1..=6)
            .map(|j| {
                let j = f64::from(j);
                (2.0 * j * PI * t * frequency).sin() * decay / 2.0f64.powf(j - 1.0)
            })
            .sum();
        *sample = harmonics.powf(3.0);
    }

    let peak = buffer.iter().fold(0.0f64, |peak, s| peak.max(s.abs()));
    if peak > 0.0 {
        for sample in buffer.iter_mut() {
            *sample = *sample / peak * amplitude;
        }
    } else {
        buffer.iter_mut().for_each(|s| *s = 0.0);
    }
}

/// Karplus-Strong plucked string.
///
/// The delay line holds one period of the note and is excited with a square wave
/// at a hundred times the note frequency. Every output sample is the average of
/// two neighbouring delay line entries and is fed back into the line.
pub fn string(buffer: &mut [f64], frequency: f64, amplitude: f64, sample_rate: f64) {
    let period = ((sample_rate / frequency) as usize).max(1);
    let mut delay_line = vec![0.0; period];
    square(&mut delay_line, frequency * 100.0, amplitude, sample_rate);

    let mut prev = period - 1;
    let mut cur = 0;
    for sample in buffer.iter_mut() {
        let value = (delay_line[prev] + delay_line[cur]) / 2.0;
        *sample = value;
        delay_line[cur] = value;
        prev = cur;
        cur = (cur + 1) % period;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const RATE: f64 = 44100.0;

    fn sampled(shape: WaveShape, len: usize, frequency: f64) -> Vec<f64> {
        let mut buffer = vec![0.0; len];
        shape.fill(&mut buffer, frequency, 0.8, RATE);
        buffer
    }

    #[test]
    fn codes_round_trip() {
        for shape in WaveShape::ALL.iter() {
            assert_eq!(WaveShape::from_code(shape.code().into()), Some(*shape));
            assert_eq!(shape.name().parse::<WaveShape>(), Ok(*shape));
        }
        assert_eq!("4".parse::<WaveShape>(), Ok(WaveShape::Complex));
        assert!("6".parse::<WaveShape>().is_err());
        assert!("triangle".parse::<WaveShape>().is_err());
    }

    #[test]
    fn sine_quarter_period() {
        // 441 Hz has a period of exactly 100 samples
        let wave = sampled(WaveShape::Sine, 101, 441.0);
        assert_eq!(wave[0], 0.0);
        assert!((wave[25] - 0.8).abs() < 1e-12);
        assert!((wave[75] + 0.8).abs() < 1e-12);
        assert!(wave[100].abs() < 1e-12);
    }

    #[test]
    fn square_only_takes_two_values() {
        let wave = sampled(WaveShape::Square, 1000, 441.0);
        assert!(wave.iter().all(|&s| s == 0.8 || s == -0.8));
        assert_eq!(wave[0], 0.8);
        assert_eq!(wave[10], 0.8);
        assert_eq!(wave[60], -0.8);
    }

    #[test]
    fn sawtooth_ramps() {
        let wave = sampled(WaveShape::Sawtooth, 200, 441.0);
        assert!((wave[0] + 0.8).abs() < 1e-12);
        assert!((wave[50] - 0.0).abs() < 1e-9);
        assert!(wave[1] > wave[0]);
        // wraps around after one period
        assert!(wave[99] > 0.7);
        assert!(wave[101] < -0.7);
    }

    #[test]
    fn complex_is_normalized_to_amplitude() {
        let wave = sampled(WaveShape::Complex, 4410, 493.88);
        let peak = wave.iter().fold(0.0f64, |p, s| p.max(s.abs()));
        assert!((peak - 0.8).abs() < 1e-12);
        assert_eq!(wave[0], 0.0);
    }

    #[test]
    fn complex_harmonic_weights() {
        // one cycle per eight samples, so the harmonics land on multiples of π/4
        let mut wave = vec![0.0; 3];
        complex(&mut wave, 1.0, 0.8, 8.0);
        let h = 0.5f64.sqrt();
        let first = (-0.0001 * PI).exp() * (h * (1.0 + 0.25 - 0.0625) + 0.5 - 0.03125);
        let second = (-0.0002 * PI).exp() * (1.0 - 0.25 + 0.0625);
        assert_eq!(wave[0], 0.0);
        assert!((wave[1] - 0.8).abs() < 1e-12);
        assert!((wave[2] - 0.8 * (second / first).powi(3)).abs() < 1e-12);
    }

    #[test]
    fn string_delay_line_feedback() {
        // a period of three samples, excited with [1, 1, -1]
        let mut wave = vec![0.0; 5];
        string(&mut wave, 2.0, 1.0, 6.0);
        assert_eq!(wave, vec![0.0, 0.5, -0.25, -0.125, 0.1875]);
    }

    #[test]
    fn complex_silent_without_signal() {
        assert_eq!(sampled(WaveShape::Complex, 1, 440.0), vec![0.0]);
        assert!(sampled(WaveShape::Complex, 0, 440.0).is_empty());
    }

    #[test]
    fn string_decays() {
        let wave = sampled(WaveShape::String, 44100, 329.63);
        let energy = |s: &[f64]| s.iter().map(|x| x * x).sum::<f64>();
        let start = energy(&wave[..4410]);
        let end = energy(&wave[39690..]);
        assert!(start > 0.0);
        assert!(end < start);
        assert!(wave.iter().all(|s| s.abs() <= 0.8));
    }

    #[test]
    fn string_above_sample_rate_does_not_panic() {
        let wave = sampled(WaveShape::String, 16, 50000.0);
        assert_eq!(wave.len(), 16);
    }
}
