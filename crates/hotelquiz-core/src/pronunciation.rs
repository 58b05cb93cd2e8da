//! Pronunciation scoring.
//!
//! Compares a recognized transcript with the target phrase and folds the
//! recognizer's confidence into a single 0–100 rating. Everything here is a
//! pure function of its inputs.

use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::error::QuizError;

/// Number of runner-up transcripts kept for display.
pub const MAX_ALTERNATIVES: usize = 2;

/// Normalized edit similarity in `0.0..=1.0`, case-insensitive.
///
/// `(maxLen - distance) / maxLen`, where lengths count Unicode scalar
/// values. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = levenshtein(&a, &b);
    (max_len - distance) as f64 / max_len as f64
}

/// Composite score `round((similarity + confidence) * 50)`.
pub fn score(target: &str, transcript: &str, confidence: f64) -> Result<u8, QuizError> {
    check_confidence(confidence)?;
    Ok(composite(similarity(target, transcript), confidence))
}

fn composite(similarity: f64, confidence: f64) -> u8 {
    ((similarity + confidence) * 50.0).round() as u8
}

fn check_confidence(confidence: f64) -> Result<(), QuizError> {
    if !confidence.is_finite() {
        return Err(QuizError::InvalidInput(format!(
            "confidence must be finite, got {confidence}"
        )));
    }
    if !(0.0..=1.0).contains(&confidence) {
        return Err(QuizError::InvalidInput(format!(
            "confidence must be within 0..=1, got {confidence}"
        )));
    }
    Ok(())
}

/// One hypothesis from a speech recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionCandidate {
    pub transcript: String,
    pub confidence: f64,
}

impl RecognitionCandidate {
    pub fn new(transcript: impl Into<String>, confidence: f64) -> Self {
        Self {
            transcript: transcript.into(),
            confidence,
        }
    }
}

/// Sort candidates by confidence, highest first.
pub fn rank_candidates(mut candidates: Vec<RecognitionCandidate>) -> Vec<RecognitionCandidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    candidates
}

/// Rating band used by the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PronunciationBand {
    /// 80 and above.
    Great,
    /// 60–79.
    Fair,
    NeedsPractice,
}

impl PronunciationBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => PronunciationBand::Great,
            60..=79 => PronunciationBand::Fair,
            _ => PronunciationBand::NeedsPractice,
        }
    }
}

/// Graded pronunciation attempt. Not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PronunciationResult {
    pub target: String,
    pub transcript: String,
    pub similarity: f64,
    pub confidence: f64,
    /// Composite 0–100 score.
    pub score: u8,
    /// Up to two runner-up transcripts.
    pub alternatives: Vec<RecognitionCandidate>,
}

impl PronunciationResult {
    pub fn band(&self) -> PronunciationBand {
        PronunciationBand::from_score(self.score)
    }
}

/// Grade an explicitly chosen candidate.
pub fn assess_candidate(
    target: &str,
    candidate: &RecognitionCandidate,
    alternatives: Vec<RecognitionCandidate>,
) -> Result<PronunciationResult, QuizError> {
    check_confidence(candidate.confidence)?;
    let similarity = similarity(target, &candidate.transcript);

    Ok(PronunciationResult {
        target: target.to_string(),
        transcript: candidate.transcript.clone(),
        similarity,
        confidence: candidate.confidence,
        score: composite(similarity, candidate.confidence),
        alternatives: alternatives.into_iter().take(MAX_ALTERNATIVES).collect(),
    })
}

/// Grade the most confident candidate, keeping the next two as alternatives.
///
/// Returns `Ok(None)` when the recognizer produced nothing.
pub fn assess(
    target: &str,
    candidates: Vec<RecognitionCandidate>,
) -> Result<Option<PronunciationResult>, QuizError> {
    for c in &candidates {
        check_confidence(c.confidence)?;
    }

    let mut ranked = rank_candidates(candidates).into_iter();
    let Some(best) = ranked.next() else {
        return Ok(None);
    };
    assess_candidate(target, &best, ranked.collect()).map(Some)
}
