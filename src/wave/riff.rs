// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Reading and writing 16 bit PCM data in RIFF wave files.
//!
//! See <http://soundfile.sapp.org/doc/WaveFormat/> for the layout.

use std::convert::TryFrom;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader};
use log::debug;
use snafu::{ensure, OptionExt, ResultExt, Snafu};

use super::Wave;

/// Size of the `fmt ` chunk body for plain PCM.
pub const PCM_FMT_CHUNK_SIZE: u32 = 16;
/// The most samples (over all channels) whose 16 bit data still fits into a RIFF file.
pub const MAX_SAMPLES: u64 = (u32::MAX as u64 - 36) / 2;
const PCM_FORMAT: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Could not open {}: {}", path.display(), source))]
    Open { path: PathBuf, source: io::Error },
    #[snafu(display("Could not create {}: {}", path.display(), source))]
    Create { path: PathBuf, source: io::Error },
    #[snafu(display("Failed to decode wave data: {}", source))]
    Decode { source: hound::Error },
    #[snafu(display("Failed to write wave data: {}", source))]
    WriteData { source: io::Error },
    #[snafu(display("{:?} samples are not supported, expected integer PCM", format))]
    NotPcm { format: SampleFormat },
    #[snafu(display("{} bits per sample are not supported, expected 16", bits))]
    UnsupportedBits { bits: u16 },
    #[snafu(display(
        "Wave data ends after {} of {} samples: {}",
        found,
        expected,
        source
    ))]
    Truncated {
        expected: u32,
        found: usize,
        source: io::Error,
    },
    #[snafu(display("{} samples do not fit into a wave file", samples))]
    TooLarge { samples: usize },
    #[snafu(display("{} of {} does not fit into a wave header", field, value))]
    HeaderField { field: &'static str, value: u64 },
}

/// Convert a sample to 16 bit, clipping it to `[-1, 1]` first.
///
/// ```
/// # use syn_wav::wave::riff::{quantize, dequantize};
/// assert_eq!(quantize(1.5), 32767);
/// assert_eq!(quantize(-1.0), -32768);
/// assert_eq!(quantize(0.5), 16383);
/// assert_eq!(dequantize(-32768), -1.0);
/// assert_eq!(dequantize(32767), 1.0);
/// ```
pub fn quantize(sample: f64) -> i16 {
    if sample.is_nan() {
        return 0;
    }
    let clipped = sample.max(-1.0).min(1.0);
    let scale = if clipped < 0.0 { 32768.0 } else { 32767.0 };
    (clipped * scale) as i16
}

pub fn dequantize(value: i16) -> f64 {
    if value < 0 {
        f64::from(value) / 32768.0
    } else {
        f64::from(value) / 32767.0
    }
}

fn header_field<T: TryFrom<u64>>(field: &'static str, value: u64) -> Result<T, Error> {
    T::try_from(value).ok().context(HeaderField { field, value })
}

/// Write the canonical 44 byte header followed by the quantized samples.
pub fn write_wave<W: Write>(wave: &Wave, out: &mut W) -> Result<(), Error> {
    let samples = wave.samples().len();
    ensure!(samples as u64 <= MAX_SAMPLES, TooLarge { samples });
    let header = wave.header();
    let byte_rate: u32 = header_field("byte rate", header.byte_rate)?;
    let block_align: u16 = header_field("block align", u64::from(header.block_align))?;
    let data_chunk_size: u32 = header_field("data chunk size", header.data_chunk_size)?;
    let riff_chunk_size: u32 = header_field("chunk size", header.riff_chunk_size)?;

    let mut bytes = Vec::with_capacity(44 + samples * 2);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&riff_chunk_size.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");

    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&header.fmt_chunk_size.to_le_bytes());
    bytes.extend_from_slice(&PCM_FORMAT.to_le_bytes());
    bytes.extend_from_slice(&header.channels.to_le_bytes());
    bytes.extend_from_slice(&header.sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_chunk_size.to_le_bytes());
    for &sample in wave.samples() {
        bytes.extend_from_slice(&quantize(sample).to_le_bytes());
    }

    out.write_all(&bytes).context(WriteData)?;
    out.flush().context(WriteData)
}

pub fn write_file(wave: &Wave, path: &Path) -> Result<(), Error> {
    let file = File::create(path).context(Create { path })?;
    debug!(
        "writing {} frames in {} channel(s) to {}",
        wave.frames(),
        wave.channels(),
        path.display()
    );
    write_wave(wave, &mut BufWriter::new(file))
}

pub fn read_file(path: &Path) -> Result<Wave, Error> {
    let file = File::open(path).context(Open { path })?;
    let wave = read_wave(&mut BufReader::new(file))?;
    debug!(
        "read {} frames in {} channel(s) from {}",
        wave.frames(),
        wave.channels(),
        path.display()
    );
    Ok(wave)
}

/// Decode a 16 bit integer PCM wave.
///
/// Header validation and skipping of chunks other than `fmt ` and `data` is left to
/// `hound`, which also rejects data that does not end on a frame boundary.
pub fn read_wave<R: Read>(input: &mut R) -> Result<Wave, Error> {
    let mut reader = WavReader::new(input).context(Decode)?;
    let spec = reader.spec();
    ensure!(
        spec.sample_format == SampleFormat::Int,
        NotPcm {
            format: spec.sample_format
        }
    );
    ensure!(
        spec.bits_per_sample == BITS_PER_SAMPLE,
        UnsupportedBits {
            bits: spec.bits_per_sample
        }
    );

    let expected = reader.len();
    let mut samples = Vec::with_capacity((expected as usize).min(1 << 24));
    for sample in reader.samples::<i16>() {
        match sample {
            Ok(value) => samples.push(dequantize(value)),
            Err(hound::Error::IoError(source)) => {
                return Err(source).context(Truncated {
                    expected,
                    found: samples.len(),
                })
            }
            Err(source) => return Err(source).context(Decode),
        }
    }
    Ok(Wave::from_samples(spec.channels, spec.sample_rate, samples))
}
