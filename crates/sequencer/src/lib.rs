//! Notes placed on a beat grid, and their playback.
//!
//! A [`Sequence`] holds [`SequenceNote`]s measured in beats and a [`Rhythm`]
//! that turns beats into seconds. Playback converts each note to absolute
//! start and stop times and hands them to a [`channel::Channel`].

pub mod note;
pub mod pacing;
pub mod rhythm;
pub mod sequence;
pub mod tune;

pub use note::{Note, SequenceNote, DEFAULT_DURATION, DEFAULT_STRENGTH};
pub use pacing::{Pacing, Sleeper, ThreadSleeper};
pub use rhythm::Rhythm;
pub use sequence::Sequence;

use channel::ChannelError;
use tonal::{TonalError, Tone};

/// Errors from building, transforming and playing sequences.
#[derive(Debug, thiserror::Error)]
pub enum SequenceError {
    #[error("sequence has no notes")]
    EmptySequence,

    #[error("tone {tone} is not in the reference scale")]
    ToneNotInScale { tone: Tone },

    #[error("{what} {value} is out of range")]
    OutOfRange { what: &'static str, value: f64 },

    #[error("malformed note token: {0:?}")]
    InvalidToken(String),

    #[error(transparent)]
    Tonal(#[from] TonalError),

    #[error(transparent)]
    Channel(#[from] ChannelError),
}

pub type Result<T> = std::result::Result<T, SequenceError>;
