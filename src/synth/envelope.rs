// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Amplitude envelopes applied to whole notes.

/// Which envelope an instrument shapes its notes with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// The note is left as it is.
    None,
    /// Linear rise to the middle of the note, then a linear fall back to zero.
    RiseFall,
    /// Attack-Decay-Sustain-Release with phase lengths measured in samples.
    Adsr(ADSR),
}

impl Envelope {
    /// The numeric code of the envelope as used in music scores.
    pub fn code(self) -> u8 {
        match self {
            Envelope::None => 0,
            Envelope::RiseFall => 1,
            Envelope::Adsr(_) => 2,
        }
    }

    /// ```
    /// # use syn_wav::synth::envelope::*;
    /// assert_eq!(Envelope::from_code(1), Some(Envelope::RiseFall));
    /// assert_eq!(Envelope::from_code(2), Some(Envelope::Adsr(ADSR::default())));
    /// assert_eq!(Envelope::from_code(3), None);
    /// ```
    pub fn from_code(code: i64) -> Option<Envelope> {
        match code {
            0 => Some(Envelope::None),
            1 => Some(Envelope::RiseFall),
            2 => Some(Envelope::Adsr(ADSR::default())),
            _ => None,
        }
    }

    pub fn apply(self, audio: &mut [f64]) {
        match self {
            Envelope::None => {}
            Envelope::RiseFall => rise_fall(audio),
            Envelope::Adsr(adsr) => adsr.apply(audio),
        }
    }
}

/// Ramp linearly from zero up to full gain at the middle sample and back down to zero
/// at the last sample.
///
/// Buffers of fewer than two samples have no room for a ramp and are silenced.
///
/// ```
/// # use syn_wav::synth::envelope::rise_fall;
/// let mut audio = vec![1.0; 5];
/// rise_fall(&mut audio);
/// assert_eq!(audio, vec![0.0, 0.5, 1.0, 0.5, 0.0]);
/// ```
pub fn rise_fall(audio: &mut [f64]) {
    let len = audio.len();
    if len < 2 {
        audio.iter_mut().for_each(|s| *s = 0.0);
        return;
    }
    let middle = len / 2;
    for (i, sample) in audio.iter_mut().enumerate() {
        let gain = if i <= middle {
            i as f64 / middle as f64
        } else {
            (len - 1 - i) as f64 / (len - 1 - middle) as f64
        };
        *sample *= gain;
    }
}

/// An Attack-Decay-Sustain-Release envelope over a note of known length.
///
/// The gain rises from zero to `peak` over `attack` samples, decays back to one over
/// `decay` samples, is held at one and finally falls to zero over the last `release`
/// samples of the note. Notes too short to fit all three phases get a rise/fall
/// envelope instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ADSR {
    pub attack: usize,
    pub decay: usize,
    pub release: usize,
    /// Gain reached at the end of the attack phase.
    pub peak: f64,
}

/// 20 ms per phase at 44.1 kHz.
impl Default for ADSR {
    fn default() -> Self {
        ADSR {
            attack: 882,
            decay: 882,
            release: 882,
            peak: 1.2,
        }
    }
}

impl ADSR {
    /// The shortest note that is shaped by the full envelope.
    pub fn min_len(&self) -> usize {
        self.attack + self.decay + self.release
    }

    /// Gain at sample `i` of a note with `len` samples, zero past the end of the note.
    fn gain(&self, i: usize, len: usize) -> f64 {
        let decay_end = self.attack + self.decay;
        if i < self.attack {
            self.peak * i as f64 / self.attack as f64
        } else if i < decay_end {
            1.0 + (self.peak - 1.0) * (decay_end - i) as f64 / self.decay as f64
        } else if i < len.saturating_sub(self.release) {
            1.0
        } else {
            len.saturating_sub(i).saturating_sub(1) as f64 / self.release as f64
        }
    }

    pub fn apply(&self, audio: &mut [f64]) {
        let len = audio.len();
        if len < self.min_len() {
            log::trace!("{} samples are too short for ADSR, using rise/fall", len);
            rise_fall(audio);
            return;
        }
        for (i, sample) in audio.iter_mut().enumerate() {
            *sample *= self.gain(i, len);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rise_fall_even_length() {
        let mut audio = vec![1.0; 4];
        rise_fall(&mut audio);
        assert_eq!(audio, vec![0.0, 0.5, 1.0, 0.0]);
    }

    #[test]
    fn rise_fall_degenerate() {
        let mut empty: Vec<f64> = vec![];
        rise_fall(&mut empty);
        let mut one = vec![0.7];
        rise_fall(&mut one);
        assert_eq!(one, vec![0.0]);
        let mut two = vec![0.7, 0.7];
        rise_fall(&mut two);
        assert_eq!(two, vec![0.0, 0.7]);
    }

    #[test]
    fn adsr_phases() {
        let adsr = ADSR::default();
        let len = 5000;
        let mut audio = vec![1.0; len];
        adsr.apply(&mut audio);
        assert_eq!(audio[0], 0.0);
        assert!((audio[441] - 0.6).abs() < 1e-12);
        // start of decay is at peak
        assert!((audio[882] - 1.2).abs() < 1e-12);
        assert!((audio[1323] - 1.1).abs() < 1e-12);
        assert_eq!(audio[1764], 1.0);
        assert_eq!(audio[len - 882 - 1], 1.0);
        assert!((audio[len - 882] - 881.0 / 882.0).abs() < 1e-12);
        assert_eq!(audio[len - 1], 0.0);
    }

    #[test]
    fn adsr_short_note_falls_back() {
        let adsr = ADSR::default();
        let mut a = vec![1.0; adsr.min_len() - 1];
        let mut b = a.clone();
        adsr.apply(&mut a);
        rise_fall(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn custom_adsr_lengths() {
        let adsr = ADSR {
            attack: 2,
            decay: 2,
            release: 2,
            peak: 2.0,
        };
        let mut audio = vec![1.0; 8];
        Envelope::Adsr(adsr).apply(&mut audio);
        assert_eq!(audio, vec![0.0, 1.0, 2.0, 1.5, 1.0, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn adsr_gain_past_the_end_is_silent() {
        let adsr = ADSR::default();
        let len = adsr.min_len();
        assert_eq!(adsr.gain(len - 1, len), 0.0);
        assert_eq!(adsr.gain(len, len), 0.0);
        assert_eq!(adsr.gain(len + 10, len), 0.0);
    }

    #[test]
    fn no_envelope() {
        let mut audio = vec![0.25; 3];
        Envelope::None.apply(&mut audio);
        assert_eq!(audio, vec![0.25; 3]);
    }
}
