//! Quiz engine and session state machine.
//!
//! `QuizEngine` owns the question bank and the shuffling RNG and hands out
//! one caller-owned `QuizSession` per attempt. A session moves from
//! `Running` to `Finished` once every question has an answer record. The
//! engine never reads a clock: the presentation layer drives the countdown
//! by calling [`QuizSession::tick`] once per time unit.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::error::QuizError;
use crate::model::{AnswerRecord, AnswerValue, CategoryFilter, Question};
use crate::statistics::QuizSummary;

/// Default per-question countdown, in time units (seconds in the CLI).
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;

/// Configuration for the quiz engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Countdown length for every question.
    pub time_limit_secs: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
        }
    }
}

/// Creates quiz sessions from a question bank.
pub struct QuizEngine {
    bank: QuestionBank,
    config: EngineConfig,
    rng: StdRng,
}

impl QuizEngine {
    /// Create an engine that shuffles with OS entropy.
    pub fn new(bank: QuestionBank, config: EngineConfig) -> Self {
        Self {
            bank,
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose shuffles are reproducible for a given seed.
    pub fn with_seed(bank: QuestionBank, config: EngineConfig, seed: u64) -> Self {
        Self {
            bank,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Start a new session over the questions matching `filter`.
    ///
    /// The filtered questions are shuffled with Fisher–Yates. Any session
    /// the caller still holds is unaffected; replacing it is the caller's
    /// reset.
    pub fn start(&mut self, filter: &CategoryFilter) -> Result<QuizSession, QuizError> {
        if self.config.time_limit_secs == 0 {
            return Err(QuizError::InvalidInput(
                "time limit must be at least 1".into(),
            ));
        }

        let mut questions = self.bank.filter(filter);
        if questions.is_empty() {
            return Err(QuizError::EmptyBank {
                filter: filter.to_string(),
            });
        }
        questions.shuffle(&mut self.rng);

        let session = QuizSession {
            id: Uuid::new_v4(),
            filter: *filter,
            started_at: Utc::now(),
            completed_at: None,
            questions,
            index: 0,
            score: 0,
            answers: Vec::new(),
            time_limit: self.config.time_limit_secs,
            remaining: self.config.time_limit_secs,
        };

        tracing::debug!(
            session = %session.id,
            %filter,
            questions = session.questions.len(),
            "quiz session started"
        );

        Ok(session)
    }
}

/// Lifecycle phase of a session. Idle is represented by holding no session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Running,
    Finished,
}

/// Feedback data for one graded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    /// The record that was appended to the history.
    pub record: AnswerRecord,
    /// Whether this answer completed the session.
    pub finished: bool,
    /// Authored text of the right answer.
    pub correct_answer: String,
    /// Authored explanation for the question.
    pub explanation: String,
}

/// One run-through of a shuffled question sequence.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    filter: CategoryFilter,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    questions: Vec<Question>,
    index: usize,
    score: usize,
    answers: Vec<AnswerRecord>,
    time_limit: u32,
    remaining: u32,
}

impl QuizSession {
    pub fn session_id(&self) -> Uuid {
        self.id
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    /// The shuffled question sequence.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question awaiting an answer, or `None` once finished.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// `(index, len)` of the current question.
    pub fn position(&self) -> (usize, usize) {
        (self.index, self.questions.len())
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    /// Time units left on the current question's countdown.
    pub fn time_remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.index < self.questions.len()
    }

    pub fn is_finished(&self) -> bool {
        !self.is_active()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_active() {
            SessionPhase::Running
        } else {
            SessionPhase::Finished
        }
    }

    /// Grade `value` against the current question and advance.
    pub fn submit_answer(&mut self, value: AnswerValue) -> Result<AnswerOutcome, QuizError> {
        if !self.is_active() {
            return Err(QuizError::SessionNotActive);
        }
        let time_used = self.time_limit - self.remaining;
        Ok(self.record(value, time_used))
    }

    /// Consume one time unit of the countdown.
    ///
    /// When the countdown reaches zero the question is answered with
    /// `NoAnswer` and the resulting outcome is returned.
    pub fn tick(&mut self) -> Result<Option<AnswerOutcome>, QuizError> {
        if !self.is_active() {
            return Err(QuizError::SessionNotActive);
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            return Ok(Some(self.time_out()?));
        }
        Ok(None)
    }

    /// Record a timeout for the current question immediately.
    pub fn time_out(&mut self) -> Result<AnswerOutcome, QuizError> {
        if !self.is_active() {
            return Err(QuizError::SessionNotActive);
        }
        tracing::debug!(session = %self.id, index = self.index, "question timed out");
        Ok(self.record(AnswerValue::NoAnswer, self.time_limit))
    }

    /// Summarize a finished session.
    pub fn summarize(&self) -> Result<QuizSummary, QuizError> {
        let completed_at = match self.completed_at {
            Some(at) if self.is_finished() => at,
            _ => {
                return Err(QuizError::SessionNotComplete {
                    answered: self.answers.len(),
                    total: self.questions.len(),
                })
            }
        };

        Ok(QuizSummary::new(
            self.id,
            self.filter,
            self.started_at,
            completed_at,
            self.questions.len(),
            self.answers.clone(),
        ))
    }

    fn record(&mut self, value: AnswerValue, time_used_secs: u32) -> AnswerOutcome {
        let question = &self.questions[self.index];
        let is_correct = question.grade(&value);
        let record = AnswerRecord {
            question_id: question.id,
            category: question.category,
            submitted: value,
            is_correct,
            time_used_secs,
        };
        let correct_answer = question.correct_answer().to_string();
        let explanation = question.explanation.clone();

        self.answers.push(record.clone());
        if is_correct {
            self.score += 1;
        }
        self.index += 1;
        self.remaining = self.time_limit;

        let finished = self.is_finished();
        if finished {
            self.completed_at = Some(Utc::now());
            tracing::info!(
                session = %self.id,
                score = self.score,
                total = self.questions.len(),
                "quiz session finished"
            );
        }

        tracing::debug!(
            session = %self.id,
            question = record.question_id,
            correct = is_correct,
            time_used = time_used_secs,
            "answer recorded"
        );

        AnswerOutcome {
            record,
            finished,
            correct_answer,
            explanation,
        }
    }
}
