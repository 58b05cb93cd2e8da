//! The `hotelquiz score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use hotelquiz_core::config::load_config_from;
use hotelquiz_core::pronunciation::{assess, RecognitionCandidate};

use crate::render;

pub fn execute(
    target: String,
    transcript: String,
    confidence: f64,
    alternatives: Vec<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut candidates = vec![RecognitionCandidate::new(transcript, confidence)];
    for alt in &alternatives {
        candidates.push(parse_alternative(alt)?);
    }

    let result = assess(&target, candidates)?
        .context("no recognition candidates to score")?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "text" => {
            render::print_pronunciation(config.locale, &result);
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

/// Parse `TRANSCRIPT:CONFIDENCE`. The last colon separates the two.
fn parse_alternative(s: &str) -> Result<RecognitionCandidate> {
    let (transcript, confidence) = s
        .rsplit_once(':')
        .with_context(|| format!("alternative must look like TRANSCRIPT:CONFIDENCE, got {s:?}"))?;
    let confidence: f64 = confidence
        .trim()
        .parse()
        .with_context(|| format!("invalid confidence in alternative {s:?}"))?;
    Ok(RecognitionCandidate::new(transcript.trim(), confidence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternative_syntax() {
        let c = parse_alternative("good mourning:0.4").unwrap();
        assert_eq!(c.transcript, "good mourning");
        assert_eq!(c.confidence, 0.4);

        let c = parse_alternative("note: this:0.2").unwrap();
        assert_eq!(c.transcript, "note: this");

        assert!(parse_alternative("no confidence").is_err());
        assert!(parse_alternative("x:high").is_err());
    }
}
