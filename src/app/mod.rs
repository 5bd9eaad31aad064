// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Implementation of the `synwav` command line tool.

pub mod menu;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::info;
use snafu::{ensure, ResultExt, Snafu};
use structopt::StructOpt;

use crate::compare::Comparison;
use crate::mix;
use crate::note::Note;
use crate::render::{self, SongRenderer};
use crate::score::{self, Score};
use crate::synth::{Envelope, Tuning, WaveShape, ADSR};
use crate::wave::{riff, Wave};

#[derive(Debug, StructOpt)]
#[structopt(name = "synwav", about = "Sampling tones, envelopes and songs into wav files")]
pub struct Opt {
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    pub verbose: usize,

    /// What to do. Without a command, an interactive menu asks for it.
    #[structopt(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, StructOpt)]
pub enum Command {
    /// Sample a simple tone of one of the basic wave shapes.
    Tone {
        /// sine, square, sawtooth, complex or string (or their numbers 1 to 5).
        shape: WaveShape,
        /// Length of the tone in samples.
        #[structopt(short = "n", long)]
        samples: usize,
        /// Frequency in Hz.
        #[structopt(short, long, required_unless = "note")]
        freq: Option<f64>,
        /// Pitch as note name (e.g. `C4`) or MIDI number, instead of a frequency.
        #[structopt(long, conflicts_with = "freq")]
        note: Option<Note>,
        #[structopt(short, long, default_value = "0.8")]
        amplitude: f64,
        #[structopt(short, long, parse(from_os_str))]
        output: PathBuf,
    },
    /// Pan a mono wave file into stereo.
    Stereo {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        /// Pan angle in radians, positive values move the sound to the left.
        #[structopt(short, long, allow_hyphen_values = true)]
        angle: f64,
        #[structopt(short, long, parse(from_os_str))]
        output: PathBuf,
    },
    /// Apply a rise/fall envelope to a wave file.
    RiseFall {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        #[structopt(short, long, parse(from_os_str))]
        output: PathBuf,
    },
    /// Apply an ADSR envelope to a wave file.
    Adsr {
        #[structopt(parse(from_os_str))]
        input: PathBuf,
        #[structopt(short, long, parse(from_os_str))]
        output: PathBuf,
    },
    /// Render a music score into a stereo wave file.
    Song {
        #[structopt(parse(from_os_str))]
        score: PathBuf,
        #[structopt(short, long, parse(from_os_str))]
        output: PathBuf,
        /// Dump the parsed score.
        #[structopt(long)]
        #[allow(clippy::option_option)]
        dump_description: Option<Option<PathBuf>>,
    },
    /// Count the samples by which two wave files differ.
    Compare {
        #[structopt(parse(from_os_str))]
        first: PathBuf,
        #[structopt(parse(from_os_str))]
        second: PathBuf,
    },
    /// Print the header fields of a wave file.
    Info {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },
    /// Choose what to do from an interactive menu.
    Menu,
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("{}", source))]
    WaveFile { source: riff::Error },
    #[snafu(display("{}", source))]
    ScoreFile { source: score::Error },
    #[snafu(display("Could not render the song: {}", source))]
    Render { source: render::Error },
    #[snafu(display("Could not set up logging: {}", source))]
    Logger { source: log::SetLoggerError },
    #[snafu(display("Could not write output: {}", source))]
    Output { source: io::Error },
    #[snafu(display("Could not dump the score to {}: {}", path.display(), source))]
    Dump { path: PathBuf, source: io::Error },
    #[snafu(display("Could not read input: {}", source))]
    Prompt { source: io::Error },
    #[snafu(display("Frequency {} Hz is not positive", frequency))]
    InvalidFrequency { frequency: f64 },
    #[snafu(display("Neither frequency nor note given"))]
    MissingPitch,
    #[snafu(display("{} has {} channels, expected a mono wave", path.display(), channels))]
    NotMono { path: PathBuf, channels: u16 },
    #[snafu(display("{} and {} differ", first.display(), second.display()))]
    FilesDiffer { first: PathBuf, second: PathBuf },
}

/// Set up logging and run the selected command, or the menu if none was given.
pub fn run(opt: Opt) -> Result<(), Error> {
    let level = match opt.verbose {
        0 => log::Level::Info,
        1 => log::Level::Debug,
        _ => log::Level::Trace,
    };
    simple_logger::init_with_level(level).context(Logger)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match opt.command {
        None | Some(Command::Menu) => {
            let stdin = io::stdin();
            let command = menu::choose(&mut stdin.lock(), &mut out)?;
            execute(&command, &mut out)
        }
        Some(command) => execute(&command, &mut out),
    }
}

/// Run a single command, writing human readable reports to `out`.
pub fn execute<W: Write>(command: &Command, out: &mut W) -> Result<(), Error> {
    match command {
        Command::Tone {
            shape,
            samples,
            freq,
            note,
            amplitude,
            output,
        } => {
            let frequency = match (freq, note) {
                (Some(freq), _) => *freq,
                (None, Some(note)) => Tuning::default().frequency(*note),
                (None, None) => return MissingPitch.fail(),
            };
            ensure!(
                frequency > 0.0 && frequency.is_finite(),
                InvalidFrequency { frequency }
            );
            info!(
                "sampling {} samples of a {} wave at {:.2} Hz",
                samples, shape, frequency
            );
            let wave = Wave::tone(*shape, *samples, frequency, *amplitude);
            save(&wave, output)
        }
        Command::Stereo {
            input,
            angle,
            output,
        } => {
            let mono = Wave::read_file(input).context(WaveFile)?;
            ensure!(
                mono.channels() == 1,
                NotMono {
                    path: input,
                    channels: mono.channels(),
                }
            );
            let panned = mix::pan(mono.samples(), *angle);
            let stereo = Wave::from_samples(2, mono.sample_rate(), panned);
            save(&stereo, output)
        }
        Command::RiseFall { input, output } => apply_envelope(Envelope::RiseFall, input, output),
        Command::Adsr { input, output } => {
            apply_envelope(Envelope::Adsr(ADSR::default()), input, output)
        }
        Command::Song {
            score,
            output,
            dump_description,
        } => {
            let score = Score::read_file(score).context(ScoreFile)?;
            if let Some(dump) = dump_description {
                dump_score(&score, dump.as_deref(), out)?;
            }
            let song = SongRenderer::default().render(&score).context(Render)?;
            save(&song, output)
        }
        Command::Compare { first, second } => {
            writeln!(out, "Comparing {} and {}", first.display(), second.display())
                .context(Output)?;
            let a = Wave::read_file(first).context(WaveFile)?;
            let b = Wave::read_file(second).context(WaveFile)?;
            let comparison = Comparison::new(a.samples(), b.samples());
            write!(out, "{}", comparison).context(Output)?;
            ensure!(comparison.is_identical(), FilesDiffer { first, second });
            Ok(())
        }
        Command::Info { file } => {
            let wave = Wave::read_file(file).context(WaveFile)?;
            write!(out, "{}", wave.header()).context(Output)
        }
        Command::Menu => {
            let stdin = io::stdin();
            let command = menu::choose(&mut stdin.lock(), out)?;
            execute(&command, out)
        }
    }
}

/// Envelopes shape each channel of the wave separately.
fn apply_envelope(envelope: Envelope, input: &Path, output: &Path) -> Result<(), Error> {
    let wave = Wave::read_file(input).context(WaveFile)?;
    let channels = usize::from(wave.channels());
    let sample_rate = wave.sample_rate();
    let mut samples = wave.into_samples();
    for channel in 0..channels {
        let mut audio: Vec<f64> = samples.iter().skip(channel).step_by(channels).copied().collect();
        envelope.apply(&mut audio);
        for (target, sample) in samples.iter_mut().skip(channel).step_by(channels).zip(audio) {
            *target = sample;
        }
    }
    save(&Wave::from_samples(channels as u16, sample_rate, samples), output)
}

fn dump_score<W: Write>(score: &Score, path: Option<&Path>, out: &mut W) -> Result<(), Error> {
    match path {
        None => write!(out, "{}", score).context(Output),
        Some(path) => std::fs::write(path, score.to_string()).context(Dump { path }),
    }
}

fn save(wave: &Wave, output: &Path) -> Result<(), Error> {
    wave.write_file(output).context(WaveFile)?;
    info!(
        "wrote {} ({} frames, {} channel(s))",
        output.display(),
        wave.frames(),
        wave.channels()
    );
    Ok(())
}
