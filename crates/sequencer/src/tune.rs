//! Compact note tokens: `c4` is a one-beat c4, `gg4` a two-beat g4.
//!
//! The first character is the glyph, the last is the octave digit, and the
//! token's length minus one is the duration in beats.

use tonal::Tone;

use crate::{Note, Result, Rhythm, Sequence, SequenceError};

pub fn parse_token(token: &str) -> Result<Note> {
    let invalid = || SequenceError::InvalidToken(token.to_string());

    let mut chars = token.chars();
    let glyph = chars.next().ok_or_else(invalid)?;
    let octave = chars
        .next_back()
        .and_then(|c| c.to_digit(10))
        .ok_or_else(invalid)?;

    let tone = Tone::from_glyph(glyph.encode_utf8(&mut [0; 4]), Some(octave))?;
    let beats = token.chars().count() - 1;
    Note::with_duration(tone, beats as f64)
}

/// Append each whitespace-separated token in `tokens` to a new sequence.
pub fn parse_tune(rhythm: Rhythm, tokens: &str) -> Result<Sequence> {
    let mut seq = Sequence::new(rhythm);
    for token in tokens.split_whitespace() {
        seq.append(parse_token(token)?);
    }
    Ok(seq)
}

const TWINKLE_A: &str = "c4 c4 g4 g4 a4 a4 gg4";
const TWINKLE_B: &str = "f4 f4 e4 e4 d4 d4 cc4";
const TWINKLE_C: &str = "g4 g4 f4 f4 e4 e4 dd4";

pub const TWINKLE_BPM: f64 = 144.0;

/// "Twinkle Twinkle Little Star": A B C C A B.
pub fn twinkle(rhythm: Rhythm) -> Result<Sequence> {
    let tokens = [TWINKLE_A, TWINKLE_B, TWINKLE_C, TWINKLE_C, TWINKLE_A, TWINKLE_B].join(" ");
    parse_tune(rhythm, &tokens)
}
