// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

use crate::note::*;

/// Defines the tuning of an instrument by assinging a frequency to a certain note.
/// This defines the frequencies of all other notes at a standard tuning of 12 half-tones per octave.
///
/// # Examples
///
/// ```
/// use syn_wav::note::*;
/// use syn_wav::synth::tuning::*;
/// assert_eq!(Tuning::default().frequency(Note::from_midi(57)), 220.0);
/// assert_eq!(Tuning::default().frequency(Note::from_midi(81)), 880.0);
/// ```
#[derive(Debug, Clone)]
pub struct Tuning {
    pub reference_note: Note,
    pub reference_frequency: f64,
}

impl Tuning {
    /// Return the frequency of a note relative to this tuning.
    pub fn frequency(&self, other: Note) -> f64 {
        let semitones = other.index() - self.reference_note.index();
        let octaves = semitones as f64 / 12.0;
        self.reference_frequency * 2.0f64.powf(octaves)
    }
}

/// Default concert tuning, where A4 corresponds to 440 Hz.
impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            reference_note: Note::named(NoteName::A, Accidental::Base, 4),
            reference_frequency: 440.0,
        }
    }
}

/// Frequency of a MIDI note number in concert tuning.
///
/// ```
/// # use syn_wav::synth::tuning::note_frequency;
/// assert_eq!(note_frequency(69), 440.0);
/// assert!((note_frequency(60) - 261.6256).abs() < 1e-4);
/// ```
pub fn note_frequency(note_number: i32) -> f64 {
    440.0 * 2.0f64.powf((note_number - 69) as f64 / 12.0)
}
