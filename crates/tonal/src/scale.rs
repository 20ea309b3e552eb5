//! Scale patterns and scales.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::tone::{Tone, TONES_PER_OCTAVE};
use crate::{Result, TonalError};

/// A named scale: semitone offsets from the tonic covering one octave.
pub struct ScalePattern {
    pub name: &'static str,
    pub offsets: &'static [u32],
}

impl ScalePattern {
    const fn new(name: &'static str, offsets: &'static [u32]) -> Self {
        Self { name, offsets }
    }
}

/// Every known scale pattern.
pub static SCALE_PATTERNS: &[ScalePattern] = &[
    ScalePattern::new("chromatic", &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]),
    ScalePattern::new("major", &[0, 2, 4, 5, 7, 9, 11]),
    ScalePattern::new("minor", &[0, 2, 3, 5, 7, 8, 10]),
    ScalePattern::new("aeolian", &[0, 2, 3, 5, 7, 8, 10]),
    ScalePattern::new("ionian", &[0, 2, 4, 5, 7, 9, 11]),
    ScalePattern::new("dorian", &[0, 2, 3, 5, 7, 9, 10]),
    ScalePattern::new("phrygian", &[0, 1, 3, 5, 7, 8, 10]),
    ScalePattern::new("lydian", &[0, 2, 4, 6, 7, 9, 11]),
    ScalePattern::new("mixolydian", &[0, 2, 4, 5, 7, 9, 10]),
    ScalePattern::new("locrian", &[0, 1, 3, 5, 6, 8, 10]),
    ScalePattern::new("pentatonic", &[0, 2, 5, 7, 9]),
];

fn lookup(name: &str) -> Result<&'static ScalePattern> {
    SCALE_PATTERNS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| TonalError::UnknownPattern(name.to_string()))
}

/// Semitone offsets for a named scale pattern.
pub fn scale_pattern(name: &str) -> Result<&'static [u32]> {
    lookup(name).map(|p| p.offsets)
}

pub fn scale_names() -> impl Iterator<Item = &'static str> {
    SCALE_PATTERNS.iter().map(|p| p.name)
}

/// A tonic, a pattern and an octave count, materialized into tones.
///
/// With a canonical tonic the tones are canonical pitch classes in scale
/// degree order; with an absolute tonic they ascend from the tonic.
#[derive(Clone)]
pub struct Scale {
    tonic: Tone,
    pattern: &'static ScalePattern,
    octaves: u32,
    tones: Vec<Tone>,
}

impl Scale {
    pub fn new(tonic: Tone, pattern: &str, octaves: u32) -> Result<Self> {
        Ok(Self::build(tonic, lookup(pattern)?, octaves))
    }

    /// One octave of the major scale on `tonic`.
    pub fn major(tonic: Tone) -> Self {
        Self::build(tonic, &SCALE_PATTERNS[1], 1)
    }

    /// Twelve octaves of the chromatic scale from c0, covering indices 0..144.
    pub fn chromatic_reference() -> Self {
        Self::build(Tone::from_index(0), &SCALE_PATTERNS[0], 12)
    }

    fn build(tonic: Tone, pattern: &'static ScalePattern, octaves: u32) -> Self {
        let tones = (0..octaves)
            .flat_map(|octave| {
                pattern
                    .offsets
                    .iter()
                    .map(move |offset| tonic + (TONES_PER_OCTAVE * octave + offset))
            })
            .collect();

        Scale {
            tonic,
            pattern,
            octaves,
            tones,
        }
    }

    pub fn tonic(&self) -> Tone {
        self.tonic
    }

    pub fn pattern(&self) -> &'static str {
        self.pattern.name
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    pub fn contains(&self, tone: Tone) -> bool {
        self.tones.contains(&tone)
    }

    /// Position of `tone` in this scale's tone list.
    pub fn position(&self, tone: Tone) -> Option<usize> {
        self.tones.iter().position(|t| *t == tone)
    }

    /// Tones of this scale also in `other`, by index, sorted and deduplicated.
    pub fn intersect(&self, other: &Scale) -> Vec<Tone> {
        let mut shared: Vec<Tone> = self
            .tones
            .iter()
            .copied()
            .filter(|t| other.contains(*t))
            .collect();
        shared.sort();
        shared.dedup();
        shared
    }

    /// This scale's pattern on each of the twelve tonics reachable from its
    /// own, ranked by how many tones they share with it.
    pub fn similarities(&self) -> Vec<Similarity> {
        let mut ranked: Vec<Similarity> = (0..TONES_PER_OCTAVE)
            .map(|step| {
                let candidate = Scale::build(self.tonic + step, self.pattern, self.octaves);
                let shared = self.intersect(&candidate);
                Similarity {
                    tonic: candidate.tonic,
                    shared,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.shared
                .len()
                .cmp(&a.shared.len())
                .then_with(|| b.tonic.cmp(&a.tonic))
        });
        ranked
    }

    fn pitch_classes(&self) -> BTreeSet<Tone> {
        self.tones.iter().map(Tone::to_canonical).collect()
    }
}

/// One entry of [`Scale::similarities`].
#[derive(Debug, Clone, PartialEq)]
pub struct Similarity {
    pub tonic: Tone,
    pub shared: Vec<Tone>,
}

impl fmt::Debug for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scale")
            .field("tonic", &self.tonic)
            .field("pattern", &self.pattern.name)
            .field("octaves", &self.octaves)
            .field("tones", &self.tones)
            .finish()
    }
}

impl PartialEq for Scale {
    fn eq(&self, other: &Self) -> bool {
        self.tonic == other.tonic && self.pattern.name == other.pattern.name
    }
}

impl Eq for Scale {}

impl Hash for Scale {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tonic.hash(state);
        self.pattern.name.hash(state);
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.tonic, self.pattern.name)?;
        if self.octaves > 1 {
            write!(f, "_{}octaves", self.octaves)?;
        }
        Ok(())
    }
}

/// Every scale (any of the twelve tonics, any of `patterns`) whose pitch
/// classes include all of `tones`. Octaves are ignored on both sides.
pub fn scales_containing(tones: &[Tone], patterns: &[&str]) -> Result<Vec<Scale>> {
    let wanted: BTreeSet<Tone> = tones.iter().map(Tone::to_canonical).collect();
    let mut found = Vec::new();

    for name in patterns {
        let pattern = lookup(name)?;
        for tonic in 0..TONES_PER_OCTAVE {
            let scale = Scale::build(Tone::from_index(tonic), pattern, 1);
            if wanted.is_subset(&scale.pitch_classes()) {
                found.push(scale);
            }
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tone(g: &str) -> Tone {
        Tone::from_glyph(g, None).unwrap()
    }

    fn glyphs(tones: &[Tone]) -> Vec<&'static str> {
        tones.iter().map(Tone::glyph).collect()
    }

    #[test]
    fn c_major_tones() {
        let scale = Scale::new(tone("c"), "major", 1).unwrap();
        assert_eq!(glyphs(scale.tones()), ["c", "d", "e", "f", "g", "a", "b"]);
    }

    #[test]
    fn c_minor_tones() {
        let scale = Scale::new(tone("c"), "minor", 1).unwrap();
        assert_eq!(
            glyphs(scale.tones()),
            ["c", "d", "d+", "f", "g", "g+", "a+"]
        );
    }

    #[test]
    fn unknown_pattern_is_rejected() {
        assert_eq!(
            Scale::new(tone("c"), "bebop", 1).unwrap_err(),
            TonalError::UnknownPattern("bebop".to_string())
        );
    }

    #[test]
    fn absolute_tonic_spans_octaves() {
        let c4 = Tone::from_glyph("c", Some(4)).unwrap();
        let scale = Scale::new(c4, "pentatonic", 2).unwrap();
        assert_eq!(scale.tones().len(), 10);
        let indices: Vec<u32> = scale.tones().iter().map(Tone::index).collect();
        assert_eq!(indices, [48, 50, 53, 55, 57, 60, 62, 65, 67, 69]);
    }

    #[test]
    fn equality_ignores_spelling_and_octave_count() {
        let a = Scale::new(tone("a"), "major", 1).unwrap();
        assert_eq!(a, Scale::new(tone("A"), "major", 1).unwrap());
        assert_eq!(a, Scale::new(tone("a"), "major", 3).unwrap());
        assert_ne!(a, Scale::new(tone("b"), "major", 1).unwrap());
        assert_ne!(a, Scale::new(tone("a"), "minor", 1).unwrap());
    }

    #[test]
    fn display_names() {
        assert_eq!(Scale::major(tone("c")).to_string(), "c_major");
        let c4 = Tone::from_glyph("c", Some(4)).unwrap();
        assert_eq!(Scale::new(c4, "minor", 1).unwrap().to_string(), "c4_minor");
        assert_eq!(
            Scale::new(c4, "major", 3).unwrap().to_string(),
            "c4_major_3octaves"
        );
    }

    #[test]
    fn intersect_neighbouring_keys() {
        let c = Scale::major(tone("c"));
        let g = Scale::major(tone("g"));
        let b = Scale::major(tone("b"));
        assert_eq!(c.intersect(&g).len(), 6);
        assert_eq!(c.intersect(&b), vec![tone("e"), tone("b")]);
    }

    #[test]
    fn similarities_rank_the_scale_itself_first() {
        let ranked = Scale::major(tone("c")).similarities();
        assert_eq!(ranked.len(), 12);
        assert_eq!(ranked[0].tonic, tone("c"));
        assert_eq!(ranked[0].shared.len(), 7);
        // fifth above and below share six tones
        let runners_up: BTreeSet<u32> = ranked[1..3].iter().map(|s| s.tonic.index()).collect();
        assert_eq!(runners_up, BTreeSet::from([5, 7]));
    }

    #[test]
    fn scales_containing_compares_pitch_classes() {
        let wanted = [
            Tone::from_glyph("c", Some(4)).unwrap(),
            tone("d"),
            Tone::from_glyph("e", Some(6)).unwrap(),
            tone("b"),
        ];
        let found = scales_containing(&wanted, &["major", "minor"]).unwrap();
        for expected in [
            Scale::major(tone("c")),
            Scale::major(tone("g")),
            Scale::new(tone("a"), "minor", 1).unwrap(),
            Scale::new(tone("e"), "minor", 1).unwrap(),
        ] {
            assert!(found.contains(&expected), "missing {expected}");
        }
        assert!(!found.contains(&Scale::major(tone("f"))));
    }

    #[test]
    fn scales_containing_flats() {
        let wanted = [tone("e-"), tone("b-"), tone("g")];
        let found = scales_containing(&wanted, &["major"]).unwrap();
        for root in ["e-", "a-", "b-"] {
            assert!(found.contains(&Scale::major(tone(root))), "missing {root}");
        }
    }

    #[test]
    fn scales_containing_rejects_unknown_candidates() {
        assert!(scales_containing(&[tone("c")], &["major", "nope"]).is_err());
    }
}
