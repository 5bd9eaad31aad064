// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! `synwav` - samples tones, applies envelopes and renders music scores to wav files.

use structopt::StructOpt;

use syn_wav::app::{self, Error, Opt};

fn main() {
    let opt = Opt::from_args();
    match app::run(opt) {
        Ok(()) => {}
        // the comparison report was already printed
        Err(Error::FilesDiffer { .. }) => std::process::exit(1),
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(2);
        }
    }
}
