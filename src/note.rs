// syn.wav -- a sample based synthesizer for the command line
// Copyright (C) 2020  Fabian Thorand
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation.
//
// A copy of the license can be found in the LICENSE file in the root of
// this repository.

//! Definitions of what a note is.

use std::fmt;
use std::str::FromStr;

/// A "note" is just an index on the synthesizers keyboard.
/// This definition follows the MIDI standard where C4 corresponds to index 60.
///
/// Note indices range from 0 to 127. At 12 semitones per octave,
/// this corresponds to a dynamic range of more then 10 octaves.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct Note(u8);

/// The name of a note in standard notation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NoteName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

/// Any offset applied to a note in standard notation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Accidental {
    /// The note is a half-tone lower then indicated by its name.
    Flat,
    /// The note is left unchanged.
    Base,
    /// The note is a half-tone higher then indicated by its name.
    Sharp,
}

impl Note {
    /// Convert a note from standard notation to a MIDI note index.
    /// Note that different names may refer to the same note, e.g. a G♯ is the same as a A♭.
    /// Returns `None` if the note is not representable in the MIDI note system.
    ///
    /// # Examples
    ///
    /// ```
    /// use syn_wav::note::*;
    ///
    /// assert_eq!(Note::try_named(NoteName::A, Accidental::Base, 4), Some(Note::from_midi(69)));
    /// assert_eq!(Note::try_named(NoteName::C, Accidental::Sharp, 6), Some(Note::from_midi(85)));
    /// assert_eq!(Note::try_named(NoteName::G, Accidental::Flat, 2), Some(Note::from_midi(42)));
    /// assert_eq!(Note::try_named(NoteName::C, Accidental::Flat, -1), None);
    /// ```
    pub fn try_named(name: NoteName, accidental: Accidental, octave: i32) -> Option<Note> {
        let name_index = match name {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        };
        let accidental_index = match accidental {
            Accidental::Base => 0,
            Accidental::Flat => -1,
            Accidental::Sharp => 1,
        };
        // C4 is MIDI note number 60
        let normalize_index = 60 - 4 * 12;
        let note_index = octave
            .checked_mul(12)?
            .checked_add(name_index + accidental_index + normalize_index)?;
        Note::try_from_midi(i64::from(note_index))
    }

    /// Convert a note from standard notation to a MIDI note index.
    ///
    /// # Panics
    ///
    /// - If the note is not representable in the MIDI note system.
    pub fn named(name: NoteName, accidental: Accidental, octave: i32) -> Note {
        Note::try_named(name, accidental, octave).expect("Note not representable in MIDI system.")
    }

    /// Parse a name string of the format `<letter><accidental><octave>`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use syn_wav::note::*;
    ///
    /// assert_eq!(Note::named_str("A4"), Some(Note::from_midi(69)));
    /// assert_eq!(Note::named_str("a4"), Some(Note::from_midi(69)));
    /// assert_eq!(Note::named_str("Csharp6"), Some(Note::from_midi(85)));
    /// assert_eq!(Note::named_str("C♯6"), Some(Note::from_midi(85)));
    /// assert_eq!(Note::named_str("Gb2"), Some(Note::from_midi(42)));
    /// assert_eq!(Note::named_str("H2"), None);
    /// ```
    pub fn named_str(name_str: &str) -> Option<Note> {
        let mut name_chars = name_str.chars();
        let name_ch = name_chars.next()?;
        let name = match name_ch.to_ascii_uppercase() {
            'A' => NoteName::A,
            'B' => NoteName::B,
            'C' => NoteName::C,
            'D' => NoteName::D,
            'E' => NoteName::E,
            'F' => NoteName::F,
            'G' => NoteName::G,
            _ => return None,
        };

        let rest = name_chars.as_str();
        let accidental_str = rest.trim_end_matches(|ch: char| ch.is_ascii_digit() || ch == '-');
        let accidental = match accidental_str {
            "sharp" | "♯" | "#" => Accidental::Sharp,
            "flat" | "♭" | "b" => Accidental::Flat,
            "" => Accidental::Base,
            _ => return None,
        };

        let octave = rest[accidental_str.len()..].parse().ok()?;
        Note::try_named(name, accidental, octave)
    }

    /// # Panics
    ///
    /// - If `midi_note` is 128 or larger.
    pub fn from_midi(midi_note: u8) -> Note {
        assert!(midi_note < 128, "MIDI only has notes 0 - 127");
        Note(midi_note)
    }

    pub fn try_from_midi(midi_note: i64) -> Option<Note> {
        if (0..128).contains(&midi_note) {
            Some(Note(midi_note as u8))
        } else {
            None
        }
    }

    pub fn to_midi(self) -> u8 {
        self.0
    }

    /// Return the note index in a signed type, convenient for further calculations.
    pub fn index(self) -> i32 {
        self.0 as i32
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        let octave = self.index() / 12 - 1;
        write!(f, "{}{}", NAMES[self.0 as usize % 12], octave)
    }
}

/// Accepts either a note name (`A4`, `Bb3`) or a plain MIDI number (`69`).
impl FromStr for Note {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(midi) = s.parse::<i64>() {
            return Note::try_from_midi(midi).ok_or_else(|| format!("{} is not a MIDI note", midi));
        }
        Note::named_str(s).ok_or_else(|| format!("{:?} is not a note name", s))
    }
}
