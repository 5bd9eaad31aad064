// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! A plain text format describing songs sample by sample.
//!
//! ```text
//! num_of_samples
//! num_of_instruments
//! wave_type envelope_type amplitude pan_angle          (once per instrument)
//! instrument note_number amplitude start_sample end_sample    (once per note)
//! ```
//!
//! Wave types are numbered 1 (sine) to 5 (string), envelopes 0 (none), 1 (rise/fall)
//! and 2 (ADSR). Note boundaries are inclusive sample indices. Blank lines are ignored.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use snafu::{ensure, OptionExt, ResultExt, Snafu};

use crate::note::Note;
use crate::synth::{Envelope, WaveShape};
use crate::wave::riff;

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    /// Length of the song in samples per channel.
    pub samples: usize,
    pub instruments: Vec<Instrument>,
    pub notes: Vec<ScoreNote>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    pub shape: WaveShape,
    pub envelope: Envelope,
    /// Gain applied when mixing the instrument into the song.
    pub amplitude: f64,
    /// Pan angle in radians, positive values move the instrument to the left.
    pub pan: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreNote {
    /// Index into `Score::instruments`.
    pub instrument: usize,
    pub note: Note,
    pub amplitude: f64,
    /// First sample of the note.
    pub start: usize,
    /// Last sample of the note (inclusive).
    pub end: usize,
}

#[allow(clippy::len_without_is_empty)]
impl ScoreNote {
    /// Number of samples the note sounds for.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Could not read score {}: {}", path.display(), source))]
    ReadScore { path: PathBuf, source: io::Error },
    #[snafu(display("Unexpected end of score, expected {}", expected))]
    UnexpectedEnd { expected: &'static str },
    #[snafu(display("line {}: expected {} fields but found {}", line, expected, found))]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[snafu(display("line {}: {} {:?} is not a valid number", line, field, text))]
    BadNumber {
        line: usize,
        field: &'static str,
        text: String,
    },
    #[snafu(display("line {}: {} must be finite", line, field))]
    NotFinite { line: usize, field: &'static str },
    #[snafu(display("line {}: unknown wave type {}", line, code))]
    UnknownWaveType { line: usize, code: i64 },
    #[snafu(display("line {}: unknown envelope type {}", line, code))]
    UnknownEnvelope { line: usize, code: i64 },
    #[snafu(display(
        "line {}: instrument {} does not exist, the score has {} instruments",
        line,
        index,
        count
    ))]
    UnknownInstrument {
        line: usize,
        index: usize,
        count: usize,
    },
    #[snafu(display(
        "line {}: a song of {} samples does not fit into a stereo wave file",
        line,
        samples
    ))]
    TooLong { line: usize, samples: usize },
    #[snafu(display("line {}: note number {} is outside of 0 to 127", line, number))]
    BadNote { line: usize, number: i64 },
    #[snafu(display("line {}: note ends at {} before it starts at {}", line, end, start))]
    Reversed {
        line: usize,
        start: usize,
        end: usize,
    },
    #[snafu(display(
        "line {}: note ends at sample {} but the song only has {} samples",
        line,
        end,
        samples
    ))]
    PastEnd {
        line: usize,
        end: usize,
        samples: usize,
    },
}

impl Score {
    pub fn read_file(path: &Path) -> Result<Score, Error> {
        let text = std::fs::read_to_string(path).context(ReadScore { path })?;
        let score: Score = text.parse()?;
        log::debug!(
            "{}: {} samples, {} instruments, {} notes",
            path.display(),
            score.samples,
            score.instruments.len(),
            score.notes.len()
        );
        Ok(score)
    }
}

impl FromStr for Score {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut records = Records::new(input);

        let samples = records.next_record("number of samples")?;
        samples.expect_fields(1)?;
        let line = samples.line;
        let samples = samples.parse::<usize>(0, "number of samples")?;
        // the rendered song is stereo
        let fits = (samples as u64)
            .checked_mul(2)
            .map_or(false, |stereo| stereo <= riff::MAX_SAMPLES);
        ensure!(fits, TooLong { line, samples });

        let count = records.next_record("number of instruments")?;
        count.expect_fields(1)?;
        let count = count.parse::<usize>(0, "number of instruments")?;

        let mut instruments = Vec::with_capacity(count);
        for _ in 0..count {
            let record = records.next_record("an instrument")?;
            instruments.push(record.instrument()?);
        }

        let mut notes = Vec::new();
        for record in records {
            notes.push(record.note(&instruments, samples)?);
        }

        Ok(Score {
            samples,
            instruments,
            notes,
        })
    }
}

/// Writes the score back in its text format.
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.samples)?;
        writeln!(f, "{}", self.instruments.len())?;
        for inst in &self.instruments {
            writeln!(
                f,
                "{} {} {} {}",
                inst.shape.code(),
                inst.envelope.code(),
                inst.amplitude,
                inst.pan
            )?;
        }
        for note in &self.notes {
            writeln!(
                f,
                "{} {} {} {} {}",
                note.instrument,
                note.note.to_midi(),
                note.amplitude,
                note.start,
                note.end
            )?;
        }
        Ok(())
    }
}

/// Non-blank lines split into whitespace separated fields.
struct Records<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

struct Record<'a> {
    /// 1-based line number
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Records<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
        }
    }

    fn next_record(&mut self, expected: &'static str) -> Result<Record<'a>, Error> {
        self.next().context(UnexpectedEnd { expected })
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Record<'a>> {
        for (index, line) in &mut self.lines {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if !fields.is_empty() {
                return Some(Record {
                    line: index + 1,
                    fields,
                });
            }
        }
        None
    }
}

impl<'a> Record<'a> {
    fn expect_fields(&self, expected: usize) -> Result<(), Error> {
        ensure!(
            self.fields.len() == expected,
            FieldCount {
                line: self.line,
                expected,
                found: self.fields.len(),
            }
        );
        Ok(())
    }

    fn parse<T: FromStr>(&self, index: usize, field: &'static str) -> Result<T, Error> {
        let text = self.fields[index];
        text.parse().ok().context(BadNumber {
            line: self.line,
            field,
            text,
        })
    }

    fn finite(&self, index: usize, field: &'static str) -> Result<f64, Error> {
        let value: f64 = self.parse(index, field)?;
        ensure!(
            value.is_finite(),
            NotFinite {
                line: self.line,
                field,
            }
        );
        Ok(value)
    }

    fn instrument(&self) -> Result<Instrument, Error> {
        self.expect_fields(4)?;
        let line = self.line;
        let code = self.parse::<i64>(0, "wave type")?;
        let shape = WaveShape::from_code(code).context(UnknownWaveType { line, code })?;
        let code = self.parse::<i64>(1, "envelope type")?;
        let envelope = Envelope::from_code(code).context(UnknownEnvelope { line, code })?;
        Ok(Instrument {
            shape,
            envelope,
            amplitude: self.finite(2, "instrument amplitude")?,
            pan: self.finite(3, "pan angle")?,
        })
    }

    fn note(&self, instruments: &[Instrument], samples: usize) -> Result<ScoreNote, Error> {
        self.expect_fields(5)?;
        let line = self.line;

        let instrument = self.parse::<usize>(0, "instrument index")?;
        ensure!(
            instrument < instruments.len(),
            UnknownInstrument {
                line,
                index: instrument,
                count: instruments.len(),
            }
        );
        let number = self.parse::<i64>(1, "note number")?;
        let note = Note::try_from_midi(number).context(BadNote { line, number })?;
        let amplitude = self.finite(2, "note amplitude")?;
        let start = self.parse::<usize>(3, "start sample")?;
        let end = self.parse::<usize>(4, "end sample")?;
        ensure!(start <= end, Reversed { line, start, end });
        ensure!(end < samples, PastEnd { line, end, samples });

        Ok(ScoreNote {
            instrument,
            note,
            amplitude,
            start,
            end,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SCALE: &str = "441001
1
1 2 0.8 0.02
0 45 0.63 0 22004
0 47 0.63 22050 44054

0 48 0.63 44100 66104
";

    #[test]
    fn parses_scale() {
        let score: Score = SCALE.parse().unwrap();
        assert_eq!(score.samples, 441001);
        assert_eq!(
            score.instruments,
            vec![Instrument {
                shape: WaveShape::Sine,
                envelope: Envelope::Adsr(Default::default()),
                amplitude: 0.8,
                pan: 0.02,
            }]
        );
        assert_eq!(score.notes.len(), 3);
        assert_eq!(
            score.notes[2],
            ScoreNote {
                instrument: 0,
                note: Note::from_midi(48),
                amplitude: 0.63,
                start: 44100,
                end: 66104,
            }
        );
        assert_eq!(score.notes[0].len(), 22005);
    }

    #[test]
    fn display_is_parseable() {
        let score: Score = SCALE.parse().unwrap();
        let reparsed: Score = score.to_string().parse().unwrap();
        assert_eq!(score, reparsed);
    }

    #[test]
    fn no_notes_is_fine() {
        let score: Score = "10\n0\n".parse().unwrap();
        assert_eq!(score.samples, 10);
        assert!(score.instruments.is_empty());
        assert!(score.notes.is_empty());
    }

    fn error(input: &str) -> String {
        input.parse::<Score>().unwrap_err().to_string()
    }

    #[test]
    fn reports_errors_with_lines() {
        assert_eq!(
            error(""),
            "Unexpected end of score, expected number of samples"
        );
        assert_eq!(
            error("100\n2\n1 0 1 0\n"),
            "Unexpected end of score, expected an instrument"
        );
        assert_eq!(
            error("100\n1\n7 0 1 0\n"),
            "line 3: unknown wave type 7"
        );
        assert_eq!(
            error("100\n1\n1 3 1 0\n"),
            "line 3: unknown envelope type 3"
        );
        assert_eq!(
            error("100\n1\n1 0 1\n"),
            "line 3: expected 4 fields but found 3"
        );
        assert_eq!(
            error("100\n1\n1 0 loud 0\n"),
            "line 3: instrument amplitude \"loud\" is not a valid number"
        );
        assert_eq!(
            error("100\n1\n1 0 inf 0\n"),
            "line 3: instrument amplitude must be finite"
        );
        assert_eq!(
            error("100\n1\n1 0 1 0\n1 60 1 0 10\n"),
            "line 4: instrument 1 does not exist, the score has 1 instruments"
        );
        assert_eq!(
            error("100\n1\n1 0 1 0\n\n0 128 1 0 10\n"),
            "line 5: note number 128 is outside of 0 to 127"
        );
        assert_eq!(
            error("100\n1\n1 0 1 0\n0 60 1 10 5\n"),
            "line 4: note ends at 5 before it starts at 10"
        );
        assert_eq!(
            error("100\n1\n1 0 1 0\n0 60 1 10 100\n"),
            "line 4: note ends at sample 100 but the song only has 100 samples"
        );
        assert_eq!(
            error("-5\n"),
            "line 1: number of samples \"-5\" is not a valid number"
        );
    }

    #[test]
    fn song_length_is_bounded_by_the_wave_format() {
        // 4 bytes per stereo frame plus 36 header bytes must fit into 32 bits
        let longest: Score = "1073741814\n0\n".parse().unwrap();
        assert_eq!(longest.samples, 1073741814);
        assert_eq!(
            error("\n1073741815\n0\n"),
            "line 2: a song of 1073741815 samples does not fit into a stereo wave file"
        );
        assert_eq!(
            error("18446744073709551615\n0\n"),
            "line 1: a song of 18446744073709551615 samples does not fit into a stereo wave file"
        );
    }
}
