// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Gains, panning and mixing of mono channels into interleaved stereo data.

use snafu::{ensure, Snafu};

use crate::wave::Stereo;

/// One side of an interleaved stereo buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

#[derive(Debug, PartialEq, Eq, Snafu)]
pub enum MixError {
    #[snafu(display(
        "Stereo data must hold twice the samples of the channel data ({} vs {})",
        stereo,
        channel
    ))]
    LengthMismatch { stereo: usize, channel: usize },
    #[snafu(display("Invalid channel number {}. Use 0 for left or 1 for right", index))]
    InvalidChannel { index: usize },
}

impl Channel {
    /// Position of the channel inside a stereo frame.
    pub fn index(self) -> usize {
        match self {
            Channel::Left => 0,
            Channel::Right => 1,
        }
    }

    pub fn from_index(index: usize) -> Result<Channel, MixError> {
        match index {
            0 => Ok(Channel::Left),
            1 => Ok(Channel::Right),
            _ => InvalidChannel { index }.fail(),
        }
    }
}

/// Left and right gains for a pan angle in radians.
///
/// An angle of zero places the sound in the center at `√2/2` on both sides;
/// positive angles move it to the left, negative ones to the right.
///
/// ```
/// # use syn_wav::mix::stereo_gains;
/// let center = stereo_gains(0.0);
/// assert!((center.left - 0.5f64.sqrt()).abs() < 1e-12);
/// assert_eq!(center.left, center.right);
/// ```
pub fn stereo_gains(angle: f64) -> Stereo<f64> {
    let half_sqrt2 = 2.0f64.sqrt() / 2.0;
    Stereo::new(
        half_sqrt2 * (angle.cos() + angle.sin()),
        half_sqrt2 * (angle.cos() - angle.sin()),
    )
}

pub fn multiply_gain(audio: &mut [f64], gain: f64) {
    audio.iter_mut().for_each(|s| *s *= gain);
}

/// Add mono `channel_data` onto one side of the interleaved `stereo` buffer.
pub fn mix_in(stereo: &mut [f64], channel_data: &[f64], channel: Channel) -> Result<(), MixError> {
    ensure!(
        stereo.len() == 2 * channel_data.len(),
        LengthMismatch {
            stereo: stereo.len(),
            channel: channel_data.len(),
        }
    );
    for (frame, sample) in stereo.chunks_exact_mut(2).zip(channel_data) {
        frame[channel.index()] += sample;
    }
    Ok(())
}

/// Spread a mono signal onto two channels using the gains of the pan `angle`.
///
/// ```
/// # use syn_wav::mix::pan;
/// let stereo = pan(&[1.0, -1.0], std::f64::consts::FRAC_PI_4);
/// assert!((stereo[0] - 1.0).abs() < 1e-12);
/// assert!(stereo[1].abs() < 1e-12);
/// assert!((stereo[2] + 1.0).abs() < 1e-12);
/// ```
pub fn pan(mono: &[f64], angle: f64) -> Vec<f64> {
    let gains = stereo_gains(angle);
    let mut stereo = Vec::with_capacity(mono.len() * 2);
    for sample in mono {
        stereo.push(sample * gains.left);
        stereo.push(sample * gains.right);
    }
    stereo
}
