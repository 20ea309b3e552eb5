use serde::Serialize;

use crate::{Result, SequenceError};

/// Tempo of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rhythm {
    beats_per_minute: f64,
}

impl Rhythm {
    /// Fails unless `beats_per_minute` is finite and positive.
    pub fn new(beats_per_minute: f64) -> Result<Self> {
        if beats_per_minute.is_finite() && beats_per_minute > 0.0 {
            Ok(Rhythm { beats_per_minute })
        } else {
            Err(SequenceError::OutOfRange {
                what: "tempo",
                value: beats_per_minute,
            })
        }
    }

    pub fn beats_per_minute(&self) -> f64 {
        self.beats_per_minute
    }

    pub fn beats_per_second(&self) -> f64 {
        self.beats_per_minute / 60.0
    }
}
