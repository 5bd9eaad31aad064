// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! The interactive menu, asking for one of the commands and its parameters.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use snafu::ResultExt;

use super::{Command, Error, Prompt};
use crate::synth::{WaveShape, DEFAULT_AMPLITUDE};

const OPTIONS: [&str; 9] = [
    "Create a simple sine wave tone",
    "Create a simple square wave tone",
    "Create a simple sawtooth wave tone",
    "Create a simple complex wave tone",
    "Create a simple string wave tone",
    "Apply stereo",
    "Apply rise/fall envelope",
    "Apply ADSR envelope",
    "Generate a song",
];

/// Show the menu until a valid option is picked, then ask for the parameters it needs.
pub fn choose<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Command, Error> {
    let selection = loop {
        print_menu(out).context(Prompt)?;
        match ask::<usize, _, _>(input, out, "Enter [1-9]: ")? {
            Some(n) if (1..=OPTIONS.len()).contains(&n) => break n,
            _ => writeln!(out, "Invalid input! Please try again.").context(Prompt)?,
        }
    };
    log::debug!("selected {}) {}", selection, OPTIONS[selection - 1]);

    let command = match selection {
        1..=5 => {
            let shape = WaveShape::ALL[selection - 1];
            let samples = ask_until(input, out, "Number of samples: ")?;
            let freq = ask_until(input, out, "Wave frequency: ")?;
            Command::Tone {
                shape,
                samples,
                freq: Some(freq),
                note: None,
                amplitude: DEFAULT_AMPLITUDE,
                output: ask_filename(input, out, false)?,
            }
        }
        6 => Command::Stereo {
            input: ask_filename(input, out, true)?,
            angle: ask_until(input, out, "Angle: ")?,
            output: ask_filename(input, out, false)?,
        },
        7 => Command::RiseFall {
            input: ask_filename(input, out, true)?,
            output: ask_filename(input, out, false)?,
        },
        8 => Command::Adsr {
            input: ask_filename(input, out, true)?,
            output: ask_filename(input, out, false)?,
        },
        _ => Command::Song {
            score: ask_filename(input, out, true)?,
            output: ask_filename(input, out, false)?,
            dump_description: None,
        },
    };
    Ok(command)
}

fn print_menu<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Select one of the below test options:")?;
    for (i, option) in OPTIONS.iter().enumerate() {
        writeln!(out, "\t{}) {}", i + 1, option)?;
    }
    writeln!(out)
}

/// Print `prompt` and parse the answer. Returns `None` if it does not parse.
fn ask<T: FromStr, R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<Option<T>, Error> {
    write!(out, "{}", prompt).context(Prompt)?;
    out.flush().context(Prompt)?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context(Prompt)?;
    if read == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input ended before all answers were given",
        ))
        .context(Prompt);
    }
    Ok(line.trim().parse().ok())
}

fn ask_until<T: FromStr, R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<T, Error> {
    loop {
        if let Some(value) = ask(input, out, prompt)? {
            return Ok(value);
        }
        writeln!(out, "Invalid input! Please try again.").context(Prompt)?;
    }
}

fn ask_filename<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    ask_for_input: bool,
) -> Result<PathBuf, Error> {
    let prompt = if ask_for_input { "Input file: " } else { "Output file: " };
    loop {
        let name: String = ask_until(input, out, prompt)?;
        if !name.is_empty() {
            return Ok(name.into());
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn answer(script: &str) -> (Result<Command, Error>, String) {
        let mut input = script.as_bytes();
        let mut out = Vec::new();
        let command = choose(&mut input, &mut out);
        (command, String::from_utf8(out).unwrap())
    }

    #[test]
    fn tone_prompts() {
        let (command, out) = answer("4\n44100\n493.88\ncomplex_b.wav\n");
        assert_eq!(
            command.unwrap(),
            Command::Tone {
                shape: WaveShape::Complex,
                samples: 44100,
                freq: Some(493.88),
                note: None,
                amplitude: 0.8,
                output: "complex_b.wav".into(),
            }
        );
        assert!(out.starts_with("Select one of the below test options:\n\t1) Create a simple sine wave tone\n"));
        assert!(out.ends_with("Number of samples: Wave frequency: Output file: "));
    }

    #[test]
    fn retries_invalid_choices() {
        let (command, out) = answer("0\nten\n7\nin.wav\nout.wav\n");
        assert_eq!(
            command.unwrap(),
            Command::RiseFall {
                input: "in.wav".into(),
                output: "out.wav".into(),
            }
        );
        assert_eq!(out.matches("Invalid input! Please try again.").count(), 2);
        assert_eq!(out.matches("Select one of the below test options:").count(), 3);
    }

    #[test]
    fn stereo_prompts_retry_numbers() {
        let (command, _) = answer("6\nsine_c.wav\nleft\n0.18\nsine_c_stereo.wav\n");
        assert_eq!(
            command.unwrap(),
            Command::Stereo {
                input: "sine_c.wav".into(),
                angle: 0.18,
                output: "sine_c_stereo.wav".into(),
            }
        );
    }

    #[test]
    fn song_prompts() {
        let (command, _) = answer("9\n\nsimple.txt\nsimple.wav\n");
        assert_eq!(
            command.unwrap(),
            Command::Song {
                score: "simple.txt".into(),
                output: "simple.wav".into(),
                dump_description: None,
            }
        );
    }

    #[test]
    fn end_of_input_is_an_error() {
        let (command, _) = answer("8\nin.wav\n");
        assert!(matches!(command, Err(Error::Prompt { .. })));
        let (command, _) = answer("");
        assert!(matches!(command, Err(Error::Prompt { .. })));
    }
}
