//! Chromatic pitch, scales and chords.
//!
//! Music theory here is catalog-driven: scale patterns and chord qualities
//! are static tables keyed by name, and the arithmetic that materializes
//! them lives on [`Tone`], [`Scale`] and [`Chord`].
//!
//! ```
//! use tonal::{Chord, Scale, Tone};
//!
//! let c = Tone::from_glyph("c", None).unwrap();
//! let triad = Chord::new(Scale::major(c), "5th", 1).unwrap();
//! let glyphs: Vec<_> = triad.tones().iter().map(|t| t.glyph()).collect();
//! assert_eq!(glyphs, ["c", "e", "g"]);
//! ```

pub mod chord;
pub mod scale;
pub mod tone;

pub use chord::{chord_pattern, chord_quality_names, Chord, CHORD_QUALITIES};
pub use scale::{scale_names, scale_pattern, scales_containing, Scale, SCALE_PATTERNS};
pub use tone::{Tone, CIRCLE_OF_FIFTHS, GLYPHS, TONES_PER_OCTAVE};

/// Errors from building tones, scales and chords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TonalError {
    #[error("unrecognized glyph: {0:?}")]
    InvalidGlyph(String),

    #[error("octave {0} is too high for a tone index")]
    OctaveOutOfRange(u32),

    #[error("unknown scale pattern: {0:?}")]
    UnknownPattern(String),

    #[error("unknown chord quality: {0:?}")]
    UnknownChordQuality(String),

    #[error("chord quality {quality:?} needs scale degree {degree} but the scale has {len} tones")]
    DegreeOutOfRange {
        quality: String,
        degree: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, TonalError>;
