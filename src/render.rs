// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The glue responsible for turning a score into actual waveforms.

use log::{debug, info, trace};
use snafu::{ResultExt, Snafu};

use crate::mix::{self, Channel, MixError};
use crate::score::{Instrument, Score, ScoreNote};
use crate::synth::{Tuning, DEFAULT_SAMPLE_RATE};
use crate::wave::Wave;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Could not mix instrument {}: {}", instrument, source))]
    Mix { instrument: usize, source: MixError },
}

/// Renders scores into stereo waves.
#[derive(Debug, Clone)]
pub struct SongRenderer {
    pub sample_rate: u32,
    pub tuning: Tuning,
}

impl Default for SongRenderer {
    fn default() -> Self {
        SongRenderer {
            sample_rate: DEFAULT_SAMPLE_RATE,
            tuning: Tuning::default(),
        }
    }
}

/// Accumulated notes of a single instrument.
///
/// Overlapping notes are averaged rather than summed, so an instrument never gets
/// louder than its loudest note.
struct Track {
    sum: Vec<f64>,
    count: Vec<u32>,
}

impl Track {
    fn new(samples: usize) -> Self {
        Self {
            sum: vec![0.0; samples],
            count: vec![0; samples],
        }
    }

    fn add(&mut self, start: usize, audio: &[f64]) {
        let end = start + audio.len();
        for ((sum, count), sample) in self.sum[start..end]
            .iter_mut()
            .zip(&mut self.count[start..end])
            .zip(audio)
        {
            *sum += sample;
            *count += 1;
        }
    }

    fn into_average(mut self) -> Vec<f64> {
        for (sum, &count) in self.sum.iter_mut().zip(&self.count) {
            if count > 0 {
                *sum /= f64::from(count);
            }
        }
        self.sum
    }
}

impl SongRenderer {
    /// Sample a single note of an instrument, including its envelope.
    pub fn render_note(&self, instrument: &Instrument, note: &ScoreNote) -> Vec<f64> {
        let frequency = self.tuning.frequency(note.note);
        let mut audio = vec![0.0; note.len()];
        instrument.shape.fill(
            &mut audio,
            frequency,
            note.amplitude,
            f64::from(self.sample_rate),
        );
        instrument.envelope.apply(&mut audio);
        audio
    }

    pub fn render(&self, score: &Score) -> Result<Wave, Error> {
        info!(
            "rendering {} notes on {} instruments ({:.2} seconds)",
            score.notes.len(),
            score.instruments.len(),
            score.samples as f64 / f64::from(self.sample_rate)
        );

        let mut tracks: Vec<Track> = score
            .instruments
            .iter()
            .map(|_| Track::new(score.samples))
            .collect();

        for (index, note) in score.notes.iter().enumerate() {
            trace!(
                "{:7}: note {} ({}) on instrument {} for {} samples",
                note.start,
                index,
                note.note,
                note.instrument,
                note.len()
            );
            let instrument = &score.instruments[note.instrument];
            let audio = self.render_note(instrument, note);
            tracks[note.instrument].add(note.start, &audio);
        }

        let mut samples = vec![0.0; score.samples * 2];
        for (index, (instrument, track)) in score.instruments.iter().zip(tracks).enumerate() {
            let gains = mix::stereo_gains(instrument.pan) * instrument.amplitude;
            debug!(
                "mixing instrument {} ({}) with gains {:.3}/{:.3}",
                index, instrument.shape, gains.left, gains.right
            );
            let track = track.into_average();
            for (side, gain) in [gains.left, gains.right].iter().enumerate() {
                let channel = Channel::from_index(side).context(Mix { instrument: index })?;
                let mut audio = track.clone();
                mix::multiply_gain(&mut audio, *gain);
                mix::mix_in(&mut samples, &audio, channel).context(Mix { instrument: index })?;
            }
        }

        Ok(Wave::from_samples(2, self.sample_rate, samples))
    }
}
