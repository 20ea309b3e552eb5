//! A simulated fretted instrument.
//!
//! Strings are pressed at a fret and plucked; each transition turns into
//! note-on and note-off events on a [`channel::Channel`] passed in by the
//! caller. A [`Guitar`] is six strings plus a table of chord shapes and a
//! strum that plucks a run of strings one after another.

pub mod guitar;
pub mod shapes;
pub mod string;
pub mod twelve;

pub use guitar::{Direction, Guitar, StrumParams, STANDARD_TUNING, STRINGS};
pub use shapes::{chord_shape, chord_symbol, chord_symbols, ChordShape, CHORD_SHAPES};
pub use string::{FrettedString, StringState, MUTED};
pub use twelve::{TwelveStringGuitar, OCTAVE_COURSE_TUNING};

use channel::ChannelError;

#[derive(Debug, thiserror::Error)]
pub enum FretboardError {
    #[error("no chord shape for {0:?}")]
    UnknownChord(String),

    #[error("no string {0}; strings are numbered 0 to 5")]
    NoSuchString(usize),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

pub type Result<T> = std::result::Result<T, FretboardError>;
