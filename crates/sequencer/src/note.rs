//! Notes, loose and placed on a beat.

use serde::Serialize;
use tonal::Tone;

use crate::{Result, SequenceError};

pub const DEFAULT_DURATION: f64 = 0.25;
pub const DEFAULT_STRENGTH: f64 = 0.75;

/// A tone with a length and a loudness.
///
/// The duration is in seconds on its own and in beats once the note is
/// placed in a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Note {
    tone: Tone,
    duration: f64,
    strength: f64,
}

impl Note {
    /// Fails when `duration` is negative or `strength` is outside `[0, 1]`.
    pub fn new(tone: Tone, duration: f64, strength: f64) -> Result<Self> {
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(SequenceError::OutOfRange {
                what: "duration",
                value: duration,
            });
        }
        if !(0.0..=1.0).contains(&strength) {
            return Err(SequenceError::OutOfRange {
                what: "strength",
                value: strength,
            });
        }
        Ok(Note {
            tone,
            duration,
            strength,
        })
    }

    /// A note of the given length at the default strength.
    pub fn with_duration(tone: Tone, duration: f64) -> Result<Self> {
        Note::new(tone, duration, DEFAULT_STRENGTH)
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub(crate) fn retuned(self, tone: Tone) -> Self {
        Note { tone, ..self }
    }

    pub(crate) fn scaled(self, ratio: f64) -> Self {
        Note {
            duration: self.duration * ratio,
            ..self
        }
    }
}

impl From<Tone> for Note {
    fn from(tone: Tone) -> Self {
        Note {
            tone,
            duration: DEFAULT_DURATION,
            strength: DEFAULT_STRENGTH,
        }
    }
}

/// A note anchored `beat` beats after the start of its sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SequenceNote {
    pub beat: f64,
    pub note: Note,
}

impl SequenceNote {
    pub fn new(beat: f64, note: Note) -> Self {
        SequenceNote { beat, note }
    }

    /// Beat at which this note stops.
    pub fn end_beat(&self) -> f64 {
        self.beat + self.note.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let n = Note::from(Tone::from_index(60));
        assert_eq!(n.duration(), DEFAULT_DURATION);
        assert_eq!(n.strength(), DEFAULT_STRENGTH);
    }

    #[test]
    fn equality_covers_every_field() {
        let c = Tone::from_index(60);
        let n = Note::new(c, 1.0, 0.5).unwrap();
        assert_eq!(n, Note::new(c, 1.0, 0.5).unwrap());
        assert_ne!(n, Note::new(c, 2.0, 0.5).unwrap());
        assert_ne!(n, Note::new(c, 1.0, 0.6).unwrap());
        assert_ne!(n, Note::new(Tone::from_index(61), 1.0, 0.5).unwrap());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let c = Tone::from_index(60);
        assert!(matches!(
            Note::new(c, 1.0, 1.5),
            Err(SequenceError::OutOfRange { what: "strength", .. })
        ));
        assert!(matches!(
            Note::new(c, -0.5, 0.5),
            Err(SequenceError::OutOfRange { what: "duration", .. })
        ));
        assert!(Note::new(c, 0.0, 0.0).is_ok());
    }

    #[test]
    fn end_beat() {
        let sn = SequenceNote::new(2.0, Note::with_duration(Tone::from_index(60), 1.5).unwrap());
        assert_eq!(sn.end_beat(), 3.5);
    }
}
