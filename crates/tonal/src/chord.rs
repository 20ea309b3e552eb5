//! Chord qualities and chords drawn from scales.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::scale::Scale;
use crate::tone::{Tone, TONES_PER_OCTAVE};
use crate::{Result, TonalError};

/// A chord quality: positions in a scale's tone list, not semitone offsets.
pub struct ChordPattern {
    pub name: &'static str,
    pub degrees: &'static [usize],
}

impl ChordPattern {
    const fn new(name: &'static str, degrees: &'static [usize]) -> Self {
        Self { name, degrees }
    }
}

/// All recognized chord qualities.
pub static CHORD_QUALITIES: &[ChordPattern] = &[
    ChordPattern::new("3rd", &[0, 2]),
    ChordPattern::new("dim", &[0, 2, 3]),
    ChordPattern::new("5th", &[0, 2, 4]),
    ChordPattern::new("aug", &[0, 2, 5]),
    ChordPattern::new("dim7th", &[0, 2, 3, 5]),
    ChordPattern::new("7th", &[0, 2, 4, 6]),
    ChordPattern::new("aug7th", &[0, 2, 5, 7]),
    ChordPattern::new("9th", &[0, 2, 4, 6, 8]),
    ChordPattern::new("11th", &[0, 2, 4, 6, 8, 10]),
];

fn lookup(name: &str) -> Result<&'static ChordPattern> {
    CHORD_QUALITIES
        .iter()
        .find(|q| q.name == name)
        .ok_or_else(|| TonalError::UnknownChordQuality(name.to_string()))
}

/// Scale degrees for a named chord quality.
pub fn chord_pattern(name: &str) -> Result<&'static [usize]> {
    lookup(name).map(|q| q.degrees)
}

pub fn chord_quality_names() -> impl Iterator<Item = &'static str> {
    CHORD_QUALITIES.iter().map(|q| q.name)
}

/// Tones picked out of a scale by a chord quality, repeated per octave.
#[derive(Clone)]
pub struct Chord {
    scale: Scale,
    quality: &'static ChordPattern,
    octaves: u32,
    tones: Vec<Tone>,
}

impl Chord {
    pub fn new(scale: Scale, quality: &str, octaves: u32) -> Result<Self> {
        let quality = lookup(quality)?;
        let mut tones = Vec::with_capacity(quality.degrees.len() * octaves as usize);

        for octave in 0..octaves {
            for &degree in quality.degrees {
                let base = scale.tones().get(degree).copied().ok_or_else(|| {
                    TonalError::DegreeOutOfRange {
                        quality: quality.name.to_string(),
                        degree,
                        len: scale.tones().len(),
                    }
                })?;
                tones.push(base + TONES_PER_OCTAVE * octave);
            }
        }

        Ok(Chord {
            scale,
            quality,
            octaves,
            tones,
        })
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn quality(&self) -> &'static str {
        self.quality.name
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn root(&self) -> Tone {
        self.scale.tonic()
    }
}

impl fmt::Debug for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chord")
            .field("scale", &self.scale)
            .field("quality", &self.quality.name)
            .field("octaves", &self.octaves)
            .field("tones", &self.tones)
            .finish()
    }
}

impl PartialEq for Chord {
    fn eq(&self, other: &Self) -> bool {
        self.scale == other.scale && self.quality.name == other.quality.name
    }
}

impl Eq for Chord {}

impl Hash for Chord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scale.hash(state);
        self.quality.name.hash(state);
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scale, self.quality.name)
    }
}
