use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::NoteError;

const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Canonical pitch class + octave, e.g. `C#4`. Flats parse to their sharp
/// spelling, so `Db4` and `C#4` are the same key.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteName {
    octave: i8,
    pitch_class: u8,
}

impl NoteName {
    /// MIDI numbering: C-1 is 0, A4 is 69.
    pub fn from_midi(midi: u8) -> Option<Self> {
        if midi > 127 {
            return None;
        }
        Some(Self {
            octave: (midi / 12) as i8 - 1,
            pitch_class: midi % 12,
        })
    }

    pub fn midi(&self) -> u8 {
        ((self.octave as i16 + 1) * 12 + self.pitch_class as i16) as u8
    }

    pub fn pitch_class(&self) -> u8 {
        self.pitch_class
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    /// Equal temperament, A4 = 440 Hz.
    pub fn frequency(&self) -> f32 {
        440.0 * 2.0_f32.powf((self.midi() as f32 - 69.0) / 12.0)
    }
}

impl FromStr for NoteName {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || NoteError::Malformed(s.to_string());
        let mut chars = s.trim().chars();

        let base: i16 = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(malformed()),
        };

        let rest = chars.as_str();
        let (accidental, octave_str) = match rest.as_bytes().first() {
            Some(b'#') => (1, &rest[1..]),
            Some(b'b') => (-1, &rest[1..]),
            _ => (0, rest),
        };

        let octave: i16 = octave_str.parse().map_err(|_| malformed())?;
        let midi = (octave + 1) * 12 + base + accidental;
        if !(0..=127).contains(&midi) {
            return Err(NoteError::OutOfRange(s.to_string()));
        }

        Self::from_midi(midi as u8).ok_or_else(malformed)
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", SHARP_NAMES[self.pitch_class as usize], self.octave)
    }
}
