//! Chromatic tones.
//!
//! A tone is a semitone index where 0 is C in octave 0 and 69 is A in
//! octave 5 (A440). Tones built from a bare glyph are *canonical*: they carry
//! a pitch class only, and arithmetic on them wraps around the octave.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Add;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, TonalError};

pub const TONES_PER_OCTAVE: u32 = 12;

/// Index of A440.
const A440_INDEX: f64 = 69.0;

/// Glyph for each pitch class, using `+` for sharps.
pub const GLYPHS: [&str; 12] = [
    "c", "c+", "d", "d+", "e", "f", "f+", "g", "g+", "a", "a+", "b",
];

/// Every accepted spelling and the pitch class it names.
const SPELLINGS: &[(&str, u32)] = &[
    ("c", 0),
    ("c+", 1),
    ("c#", 1),
    ("d-", 1),
    ("db", 1),
    ("d", 2),
    ("d+", 3),
    ("d#", 3),
    ("e-", 3),
    ("eb", 3),
    ("e", 4),
    ("f", 5),
    ("f+", 6),
    ("f#", 6),
    ("g-", 6),
    ("gb", 6),
    ("g", 7),
    ("g+", 8),
    ("g#", 8),
    ("a-", 8),
    ("ab", 8),
    ("a", 9),
    ("a+", 10),
    ("a#", 10),
    ("b-", 10),
    ("bb", 10),
    ("b", 11),
];

/// Pitch classes around the circle of fifths, starting from C.
pub const CIRCLE_OF_FIFTHS: [&str; 12] = [
    "c", "g", "d", "a", "e", "b", "g-", "d-", "a-", "e-", "b-", "f",
];

fn pitch_class_of(glyph: &str) -> Result<u32> {
    let lowered = glyph.trim().to_lowercase();
    SPELLINGS
        .iter()
        .find(|(spelling, _)| *spelling == lowered)
        .map(|(_, pc)| *pc)
        .ok_or_else(|| TonalError::InvalidGlyph(glyph.to_string()))
}

/// A chromatic pitch, with or without an octave.
///
/// Identity is the index alone: a canonical `c` equals the absolute tone at
/// index 0, and spelling (`c#` vs `db`) is never stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tone {
    index: u32,
    canonical: bool,
}

impl Tone {
    /// An absolute tone at the given semitone index.
    pub fn from_index(index: u32) -> Self {
        Tone {
            index,
            canonical: false,
        }
    }

    /// A tone from a glyph such as `"c"`, `"C#"`, `"e-"` or `"bb"`.
    ///
    /// Without an octave the tone is canonical (pitch class only). Fails
    /// with [`TonalError::OctaveOutOfRange`] when the index would not fit.
    pub fn from_glyph(glyph: &str, octave: Option<u32>) -> Result<Self> {
        let pitch_class = pitch_class_of(glyph)?;
        match octave {
            Some(octave) => TONES_PER_OCTAVE
                .checked_mul(octave)
                .and_then(|base| base.checked_add(pitch_class))
                .map(Tone::from_index)
                .ok_or(TonalError::OctaveOutOfRange(octave)),
            None => Ok(Tone {
                index: pitch_class,
                canonical: true,
            }),
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// Octave number, or `None` for a canonical tone.
    pub fn octave(&self) -> Option<u32> {
        if self.canonical {
            None
        } else {
            Some(self.index / TONES_PER_OCTAVE)
        }
    }

    pub fn pitch_class(&self) -> u32 {
        self.index % TONES_PER_OCTAVE
    }

    pub fn glyph(&self) -> &'static str {
        GLYPHS[self.pitch_class() as usize]
    }

    /// Equal-tempered frequency in Hz, A440 at index 69.
    pub fn frequency(&self) -> f64 {
        440.0 * 2f64.powf((self.index as f64 - A440_INDEX) / TONES_PER_OCTAVE as f64)
    }

    /// The same pitch class with its octave dropped.
    pub fn to_canonical(&self) -> Self {
        Tone {
            index: self.pitch_class(),
            canonical: true,
        }
    }
}

/// Canonical tones wrap around the octave. Absolute tones transpose, and
/// saturate at `u32::MAX` rather than overflow.
impl Add<u32> for Tone {
    type Output = Tone;

    fn add(self, semitones: u32) -> Tone {
        if self.canonical {
            Tone {
                index: (self.index + semitones % TONES_PER_OCTAVE) % TONES_PER_OCTAVE,
                canonical: true,
            }
        } else {
            Tone::from_index(self.index.saturating_add(semitones))
        }
    }
}

impl Add<Tone> for Tone {
    type Output = Tone;

    fn add(self, other: Tone) -> Tone {
        self + other.index
    }
}

impl PartialEq for Tone {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Tone {}

impl Hash for Tone {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl PartialOrd for Tone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.octave() {
            Some(octave) => write!(f, "{}{}", self.glyph(), octave),
            None => f.write_str(self.glyph()),
        }
    }
}

/// Parses `"c"`, `"c#4"`, `"e-5"` and the like: a glyph followed by an
/// optional octave number.
impl FromStr for Tone {
    type Err = TonalError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
        let (glyph, octave) = s.split_at(split);
        if octave.is_empty() {
            return Tone::from_glyph(glyph, None);
        }
        let octave = octave
            .parse()
            .map_err(|_| TonalError::InvalidGlyph(s.to_string()))?;
        Tone::from_glyph(glyph, Some(octave))
    }
}

impl TryFrom<String> for Tone {
    type Error = TonalError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Tone> for String {
    fn from(tone: Tone) -> String {
        tone.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(g: &str) -> Tone {
        Tone::from_glyph(g, None).unwrap()
    }

    #[test]
    fn a440() {
        let t = Tone::from_index(69);
        assert_eq!(t.frequency(), 440.0);
        assert_eq!(t.glyph(), "a");
        assert_eq!(t.octave(), Some(5));
        assert_eq!(t.to_string(), "a5");
    }

    #[test]
    fn a220() {
        let t = Tone::from_index(69 - TONES_PER_OCTAVE);
        assert_eq!(t.frequency(), 220.0);
        assert_eq!(t.index(), 57);
        assert_eq!(t.octave(), Some(4));
        assert_eq!(t.to_string(), "a4");
    }

    #[test]
    fn glyph_table_covers_every_pitch_class() {
        let expected = "c c+ d d+ e f f+ g g+ a a+ b".split_whitespace();
        for (i, want) in expected.enumerate() {
            assert_eq!(Tone::from_index(i as u32).glyph(), want);
        }
    }

    #[test]
    fn canonical_tone_has_no_octave() {
        let t = glyph("c");
        assert!(t.is_canonical());
        assert_eq!(t.octave(), None);
        assert_eq!(t.to_string(), "c");
    }

    #[test]
    fn spellings_are_synonyms() {
        for spelling in ["c#", "C+", "d-", "Db"] {
            assert_eq!(glyph(spelling), Tone::from_index(1), "{spelling}");
        }
        assert_eq!(glyph("bb"), glyph("a+"));
    }

    #[test]
    fn glyph_with_octave_matches_index() {
        let c5 = Tone::from_glyph("C", Some(5)).unwrap();
        assert_eq!(c5, Tone::from_index(60));
        assert_ne!(c5, Tone::from_index(61));
    }

    #[test]
    fn bad_glyph_is_rejected() {
        assert_eq!(
            Tone::from_glyph("h", None),
            Err(TonalError::InvalidGlyph("h".to_string()))
        );
    }

    #[test]
    fn ordering_follows_index() {
        let a4 = Tone::from_glyph("A", Some(4)).unwrap();
        let a_sharp4 = Tone::from_glyph("A#", Some(4)).unwrap();
        assert!(a4 < a_sharp4);
        assert!(glyph("c") < glyph("a"));
    }

    #[test]
    fn absolute_addition_transposes() {
        let t = Tone::from_index(60);
        assert_eq!(t + Tone::from_index(5), Tone::from_index(65));
        assert_eq!(t + 5, Tone::from_index(65));
        assert_eq!((t + 24).octave(), Some(7));
    }

    #[test]
    fn canonical_addition_wraps() {
        let g = glyph("c") + 7;
        assert_eq!(g, glyph("g"));
        assert!(g.is_canonical());

        let wrapped = glyph("b") + 2;
        assert_eq!(wrapped, glyph("c#"));
        assert!(wrapped.index() < TONES_PER_OCTAVE);
    }

    #[test]
    fn parses_display_form() {
        assert_eq!("c+4".parse::<Tone>().unwrap(), Tone::from_index(49));
        assert_eq!("eb".parse::<Tone>().unwrap(), glyph("d+"));
        assert!("q4".parse::<Tone>().is_err());
    }

    #[test]
    fn huge_octave_is_an_error() {
        assert_eq!(
            Tone::from_glyph("c", Some(400_000_000)),
            Err(TonalError::OctaveOutOfRange(400_000_000))
        );
        assert_eq!(
            "c400000000".parse::<Tone>(),
            Err(TonalError::OctaveOutOfRange(400_000_000))
        );
        // the largest octave that still fits
        let top = u32::MAX / TONES_PER_OCTAVE;
        assert!(Tone::from_glyph("c", Some(top)).is_ok());
        assert!(Tone::from_glyph("b", Some(top)).is_err());
    }

    #[test]
    fn absolute_addition_saturates() {
        let t = Tone::from_index(u32::MAX - 1) + 5;
        assert_eq!(t.index(), u32::MAX);
    }

    #[test]
    fn to_canonical_keeps_the_pitch_class() {
        let c = Tone::from_index(60).to_canonical();
        assert!(c.is_canonical());
        assert_eq!(c, glyph("c"));
        assert_eq!(c.to_string(), "c");
    }
}
