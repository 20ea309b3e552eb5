//! Scale lookups that print rather than play.

use anyhow::{Context, Result};
use serde_json::json;
use tonal::{scales_containing, Scale, Tone};

fn spelled(tones: &[Tone]) -> String {
    tones
        .iter()
        .map(Tone::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Every transposition of `tonic`'s `pattern` scale, most shared tones first.
pub fn similar(tonic: Tone, pattern: &str, as_json: bool) -> Result<String> {
    let scale = Scale::new(tonic, pattern, 1)
        .with_context(|| format!("Cannot build {tonic} {pattern}"))?;

    let mut lines = Vec::new();
    for similarity in scale.similarities() {
        let candidate = Scale::new(similarity.tonic, pattern, 1)?;
        let line = if as_json {
            json!({
                "scale": candidate.to_string(),
                "tonic": similarity.tonic,
                "shared": similarity.shared,
            })
            .to_string()
        } else {
            format!(
                "{:<12} {} {}",
                candidate.to_string(),
                similarity.shared.len(),
                spelled(&similarity.shared)
            )
        };
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// The scales of `patterns` that hold every one of `tones`.
pub fn scales(tones: &[Tone], patterns: &[String], as_json: bool) -> Result<String> {
    let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();
    let found = scales_containing(tones, &patterns).context("Scale search failed")?;

    let lines: Vec<String> = found
        .iter()
        .map(|scale| {
            if as_json {
                json!({
                    "scale": scale.to_string(),
                    "tones": scale.tones(),
                })
                .to_string()
            } else {
                format!("{:<12} {}", scale.to_string(), spelled(scale.tones()))
            }
        })
        .collect();
    Ok(lines.join("\n"))
}
