//! Quiz error types.
//!
//! These errors are returned synchronously by the engine and the scorer.
//! The presentation layer decides how each one is worded for the learner;
//! nothing here is meant to be shown verbatim.

use thiserror::Error;

/// Errors produced by the quiz engine, the question bank, and the scorer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The category filter matched no questions, so no session was created.
    #[error("no questions match filter '{filter}'")]
    EmptyBank { filter: String },

    /// A summary was requested before every question was answered.
    #[error("session not complete: {answered}/{total} questions answered")]
    SessionNotComplete { answered: usize, total: usize },

    /// An answer was submitted to a session that is already finished.
    #[error("session is not active")]
    SessionNotActive,

    /// Malformed input to the scorer (non-finite or out-of-domain values).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A question record violates its own invariants.
    #[error("invalid question {id}: {reason}")]
    InvalidQuestion { id: u32, reason: String },
}

impl QuizError {
    /// Returns `true` if the error comes from calling the engine out of order
    /// rather than from bad data.
    pub fn is_programmer_error(&self) -> bool {
        matches!(
            self,
            QuizError::SessionNotComplete { .. } | QuizError::SessionNotActive
        )
    }
}
