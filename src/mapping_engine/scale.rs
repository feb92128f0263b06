//! Musical scale registry, pitch quantization and note naming.
//!
//! Pitches are located relative to A4 = 440 Hz, which is semitone 9 of
//! octave 4 when octaves are counted from C.

use std::fmt;
use std::str::FromStr;

use crate::mapping_engine::constants::{A4_FREQ, A4_OCTAVE, A4_SEMITONE};
use crate::mapping_engine::errors::ConfigError;

const SEMITONES_PER_OCTAVE: i32 = 12;

const CHROMATIC: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];
const MAJOR: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];
const MINOR: [u8; 7] = [0, 2, 3, 5, 7, 8, 10];
const PENTATONIC: [u8; 5] = [0, 2, 4, 7, 9];
const BLUES: [u8; 6] = [0, 3, 5, 6, 7, 10];

const LETTER_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const SOLFEGE_NAMES: [&str; 12] = [
    "Do", "Do#", "Re", "Re#", "Mi", "Fa", "Fa#", "Sol", "Sol#", "La", "La#", "Si",
];

/// The named scales a performer can choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scale {
    /// All twelve semitones; quantization is disabled.
    #[default]
    Chromatic,
    Major,
    Minor,
    Pentatonic,
    Blues,
}

impl Scale {
    pub const ALL: [Scale; 5] = [
        Scale::Chromatic,
        Scale::Major,
        Scale::Minor,
        Scale::Pentatonic,
        Scale::Blues,
    ];

    /// Semitone offsets from the root, in declaration order.
    pub fn semitones(self) -> &'static [u8] {
        match self {
            Scale::Chromatic => &CHROMATIC,
            Scale::Major => &MAJOR,
            Scale::Minor => &MINOR,
            Scale::Pentatonic => &PENTATONIC,
            Scale::Blues => &BLUES,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scale::Chromatic => "chromatic",
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::Pentatonic => "pentatonic",
            Scale::Blues => "blues",
        }
    }

    /// Snaps `frequency` to this scale transposed to `root_semitone`.
    pub fn quantize(self, frequency: f32, root_semitone: u8) -> f32 {
        quantize(frequency, self.semitones(), root_semitone)
    }
}

impl FromStr for Scale {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromatic" | "cromatica" => Ok(Scale::Chromatic),
            "major" | "maggiore" => Ok(Scale::Major),
            "minor" | "minore" => Ok(Scale::Minor),
            "pentatonic" | "pentatonica" => Ok(Scale::Pentatonic),
            "blues" => Ok(Scale::Blues),
            _ => Err(ConfigError::UnknownScale(s.to_string())),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Note-name table used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteNaming {
    /// C, C#, D, ...
    #[default]
    Letter,
    /// Do, Do#, Re, ...
    Solfege,
}

impl NoteNaming {
    fn table(self) -> &'static [&'static str; 12] {
        match self {
            NoteNaming::Letter => &LETTER_NAMES,
            NoteNaming::Solfege => &SOLFEGE_NAMES,
        }
    }
}

impl FromStr for NoteNaming {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letter" | "english" => Ok(NoteNaming::Letter),
            "solfege" | "italian" => Ok(NoteNaming::Solfege),
            _ => Err(ConfigError::UnknownNoteNaming(s.to_string())),
        }
    }
}

/// A frequency rounded to the nearest equal-tempered semitone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    /// Signed semitone distance from A4.
    pub semitone_from_a4: i32,
    /// Octave number, C-based (A4 is in octave 4).
    pub octave: i32,
    /// Position within the octave, 0 = C, 9 = A.
    pub note_index: u8,
}

impl Pitch {
    /// Returns `None` for frequencies that have no logarithm.
    pub fn from_frequency(frequency: f32) -> Option<Self> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return None;
        }

        let semitone_from_a4 =
            (SEMITONES_PER_OCTAVE as f32 * (frequency / A4_FREQ).log2()).round() as i32;
        Some(Self::from_semitone(semitone_from_a4))
    }

    pub fn from_semitone(semitone_from_a4: i32) -> Self {
        let from_c = semitone_from_a4 + A4_SEMITONE;
        Self {
            semitone_from_a4,
            octave: A4_OCTAVE + from_c.div_euclid(SEMITONES_PER_OCTAVE),
            note_index: from_c.rem_euclid(SEMITONES_PER_OCTAVE) as u8,
        }
    }

    pub fn frequency(self) -> f32 {
        A4_FREQ * 2f32.powf(self.semitone_from_a4 as f32 / SEMITONES_PER_OCTAVE as f32)
    }

    pub fn name(self, naming: NoteNaming) -> String {
        format!("{}{}", naming.table()[self.note_index as usize], self.octave)
    }
}

/// Signed offset from `note` to `member` with the smallest magnitude, looking
/// across the octave boundary in both directions.
fn circular_offset(member: i32, note: i32) -> i32 {
    let direct = member - note;
    [direct, direct + SEMITONES_PER_OCTAVE, direct - SEMITONES_PER_OCTAVE]
        .into_iter()
        .min_by_key(|offset| offset.abs())
        .unwrap_or(direct)
}

/// Snaps `frequency` to the nearest member of `semitones` transposed by
/// `root_semitone`.
///
/// A set covering all twelve semitones leaves the input untouched. When two
/// members are equally close the one declared first wins. Non-positive or
/// non-finite input is returned unchanged.
pub fn quantize(frequency: f32, semitones: &[u8], root_semitone: u8) -> f32 {
    if is_chromatic(semitones) {
        return frequency;
    }
    let Some(pitch) = Pitch::from_frequency(frequency) else {
        return frequency;
    };

    let note = i32::from(pitch.note_index);
    let mut best: Option<i32> = None;
    for &member in semitones {
        let transposed = (i32::from(member) + i32::from(root_semitone)) % SEMITONES_PER_OCTAVE;
        let offset = circular_offset(transposed, note);
        match best {
            Some(current) if offset.abs() >= current.abs() => {}
            _ => best = Some(offset),
        }
    }

    match best {
        Some(offset) => Pitch::from_semitone(pitch.semitone_from_a4 + offset).frequency(),
        None => frequency,
    }
}

fn is_chromatic(semitones: &[u8]) -> bool {
    (0..SEMITONES_PER_OCTAVE as u8).all(|s| semitones.contains(&s))
}

/// Display name such as `A4` for the semitone nearest to `frequency`.
pub fn note_name(frequency: f32, naming: NoteNaming) -> Option<String> {
    Pitch::from_frequency(frequency).map(|pitch| pitch.name(naming))
}
