//! Chord shapes: which fret to hold on each string, low E first.

use tonal::Chord;

use crate::{FretboardError, Result};

/// Fingering for one chord symbol. `-1` skips the string, `0` is open.
pub struct ChordShape {
    pub symbol: &'static str,
    pub frets: [i32; 6],
}

impl ChordShape {
    const fn new(symbol: &'static str, frets: [i32; 6]) -> Self {
        Self { symbol, frets }
    }
}

/// Every chord the guitar knows how to hold.
pub static CHORD_SHAPES: &[ChordShape] = &[
    ChordShape::new("none", [-1, -1, -1, -1, -1, -1]),
    // Majors, plus two barre voicings
    ChordShape::new("C", [-1, 3, 2, 0, 1, 0]),
    ChordShape::new("F", [-1, -1, 3, 2, 1, 1]),
    ChordShape::new("G", [3, 2, 0, 0, 0, 3]),
    ChordShape::new("G'", [3, 5, 5, 4, 3, 3]),
    ChordShape::new("D", [-1, -1, 0, 2, 3, 2]),
    ChordShape::new("A", [0, 0, 2, 2, 2, 0]),
    ChordShape::new("A''", [5, 7, 7, 6, 5, 5]),
    ChordShape::new("E", [0, 2, 2, 1, 0, 0]),
    ChordShape::new("Bb", [-1, -1, 3, 3, 3, 1]),
    ChordShape::new("Eb", [-1, -1, 5, 3, 4, 3]),
    ChordShape::new("Ab", [-1, -1, 6, 5, 4, 4]),
    ChordShape::new("Db", [-1, -1, 3, 1, 2, 1]),
    ChordShape::new("Gb", [-1, -1, 4, 2, 1, 1]),
    ChordShape::new("B", [-1, -1, 4, 4, 4, 2]),
    // Minors
    ChordShape::new("Cm", [-1, -1, 5, 5, 4, 3]),
    ChordShape::new("Fm", [-1, -1, 3, 1, 1, 1]),
    ChordShape::new("Gm", [-1, -1, 5, 3, 3, 3]),
    ChordShape::new("Dm", [-1, 0, 0, 2, 3, 1]),
    ChordShape::new("Am", [0, 0, 2, 2, 1, 0]),
    ChordShape::new("Em", [0, 2, 2, 0, 0, 0]),
    ChordShape::new("Bbm", [-1, -1, 3, 3, 2, 1]),
    ChordShape::new("Ebm", [-1, -1, 4, 3, 4, 2]),
    ChordShape::new("Abm", [-1, -1, 6, 4, 4, 4]),
    ChordShape::new("Dbm", [-1, -1, 2, 1, 2, 0]),
    ChordShape::new("Gbm", [-1, -1, 4, 2, 2, 2]),
    ChordShape::new("Bm", [-1, -1, 4, 4, 3, 2]),
    // Dominant sevenths
    ChordShape::new("C7", [-1, 3, 2, 3, 1, -1]),
    ChordShape::new("F7", [-1, -1, 1, 2, 1, 1]),
    ChordShape::new("G7", [3, 2, 0, 0, 0, 1]),
    ChordShape::new("D7", [-1, -1, 0, 2, 1, 2]),
    ChordShape::new("A7", [-1, -1, 2, 2, 2, 3]),
    ChordShape::new("E7", [0, 2, 0, 1, 0, 0]),
    ChordShape::new("Bb7", [-1, -1, 3, 3, 3, 4]),
    ChordShape::new("Eb7", [-1, -1, 1, 3, 2, 3]),
    ChordShape::new("Ab7", [-1, -1, 1, 1, 1, 2]),
    ChordShape::new("Db7", [-1, -1, 3, 4, 2, 4]),
    ChordShape::new("Gb7", [-1, -1, 4, 3, 2, 0]),
    ChordShape::new("B7", [-1, 2, 1, 2, 0, 2]),
    // Diminished and augmented; each shape also covers its inversions
    ChordShape::new("Ddim", [-1, -1, 0, 1, 0, 1]),
    ChordShape::new("Ebdim", [-1, -1, 1, 2, 1, 2]),
    ChordShape::new("Edim", [-1, -1, 2, 3, 2, 3]),
    ChordShape::new("Eaug", [-1, -1, 2, 1, 1, 0]),
    ChordShape::new("Faug", [-1, -1, 3, 2, 2, 1]),
    ChordShape::new("Gaug", [-1, -1, 5, 4, 4, 3]),
    // Ninths
    ChordShape::new("C9", [3, -1, 2, 3, 3, 3]),
    ChordShape::new("F9", [-1, 3, -1, 2, 4, 3]),
    ChordShape::new("G9", [-1, -1, 0, 2, 0, 1]),
    ChordShape::new("D9", [-1, -1, 4, 2, 1, 0]),
    ChordShape::new("A9", [0, 0, 2, 4, 2, 3]),
    ChordShape::new("E9", [0, 2, 0, 1, 3, 2]),
    ChordShape::new("Bb9", [-1, -1, 0, 1, 1, 1]),
    ChordShape::new("Eb9", [-1, -1, 1, 0, 2, 1]),
    ChordShape::new("Ab9", [-1, -1, 1, 3, 1, 2]),
    ChordShape::new("Db9", [4, -1, 3, 4, 4, 4]),
    ChordShape::new("Gb9", [-1, 4, -1, 3, 5, 4]),
    ChordShape::new("B9", [2, -1, 1, 2, 2, 2]),
];

const ROOT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

pub fn chord_shape(symbol: &str) -> Result<[i32; 6]> {
    CHORD_SHAPES
        .iter()
        .find(|shape| shape.symbol == symbol)
        .map(|shape| shape.frets)
        .ok_or_else(|| FretboardError::UnknownChord(symbol.to_string()))
}

pub fn chord_symbols() -> impl Iterator<Item = &'static str> {
    CHORD_SHAPES.iter().map(|shape| shape.symbol)
}

/// Chord symbol for a scale-built chord, when the shape table has one.
///
/// Triads ("5th") on major or ionian scales give the bare root, on minor or
/// aeolian scales the root plus `m`. Sevenths and ninths on mixolydian give
/// the dominant chords. Roots are spelled with flats.
pub fn chord_symbol(chord: &Chord) -> Option<String> {
    let root = ROOT_NAMES[chord.root().pitch_class() as usize];
    let suffix = match (chord.scale().pattern(), chord.quality()) {
        ("major" | "ionian", "5th") => "",
        ("minor" | "aeolian", "5th") => "m",
        ("mixolydian", "7th") => "7",
        ("mixolydian", "9th") => "9",
        _ => return None,
    };
    if chord.octaves() != 1 {
        return None;
    }
    Some(format!("{root}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use tonal::{Scale, Tone};

    fn chord(root: &str, pattern: &str, octaves: u32, quality: &str) -> Chord {
        let tonic = Tone::from_glyph(root, None).unwrap();
        Chord::new(Scale::new(tonic, pattern, octaves).unwrap(), quality, 1).unwrap()
    }

    #[test]
    fn symbols_are_unique() {
        let symbols: HashSet<&str> = chord_symbols().collect();
        assert_eq!(symbols.len(), CHORD_SHAPES.len());
    }

    #[test]
    fn every_major_and_minor_root_has_a_shape() {
        for root in ROOT_NAMES {
            assert!(chord_shape(root).is_ok(), "{root}");
            assert!(chord_shape(&format!("{root}m")).is_ok(), "{root}m");
            assert!(chord_shape(&format!("{root}7")).is_ok(), "{root}7");
            assert!(chord_shape(&format!("{root}9")).is_ok(), "{root}9");
        }
    }

    #[test]
    fn lookup() {
        assert_eq!(chord_shape("E").unwrap(), [0, 2, 2, 1, 0, 0]);
        assert_eq!(chord_shape("G'").unwrap(), [3, 5, 5, 4, 3, 3]);
        assert!(matches!(
            chord_shape("H"),
            Err(FretboardError::UnknownChord(s)) if s == "H"
        ));
    }

    #[test]
    fn symbols_for_scale_chords() {
        assert_eq!(chord_symbol(&chord("e", "major", 1, "5th")).as_deref(), Some("E"));
        assert_eq!(chord_symbol(&chord("a+", "ionian", 1, "5th")).as_deref(), Some("Bb"));
        assert_eq!(chord_symbol(&chord("c#", "minor", 1, "5th")).as_deref(), Some("Dbm"));
        assert_eq!(chord_symbol(&chord("a", "aeolian", 1, "5th")).as_deref(), Some("Am"));
        assert_eq!(chord_symbol(&chord("g", "mixolydian", 1, "7th")).as_deref(), Some("G7"));
        assert_eq!(chord_symbol(&chord("d", "mixolydian", 2, "9th")).as_deref(), Some("D9"));
        assert_eq!(chord_symbol(&chord("c", "major", 1, "7th")), None);
        assert_eq!(chord_symbol(&chord("c", "dorian", 1, "5th")), None);
    }

    #[test]
    fn multi_octave_chords_have_no_symbol() {
        let c = Tone::from_glyph("c", None).unwrap();
        let wide = Chord::new(Scale::major(c), "5th", 2).unwrap();
        assert_eq!(chord_symbol(&wide), None);
    }
}
