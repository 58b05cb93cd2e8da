//! Session summary statistics.
//!
//! Overall percentage, per-category breakdown, and the aggregate handed to
//! the progress store after a quiz.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{AnswerRecord, Category, CategoryFilter};

/// `round(correct / total * 100)`, or 0 when `total` is 0.
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// Correct/total counts for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
}

/// Per-category results in first-seen order of the answer history.
pub fn category_breakdown(answers: &[AnswerRecord]) -> Vec<CategoryBreakdown> {
    let mut breakdown: Vec<CategoryBreakdown> = Vec::new();

    for answer in answers {
        let i = match breakdown
            .iter()
            .position(|b| b.category == answer.category)
        {
            Some(i) => i,
            None => {
                breakdown.push(CategoryBreakdown {
                    category: answer.category,
                    correct: 0,
                    total: 0,
                    percentage: 0,
                });
                breakdown.len() - 1
            }
        };
        let entry = &mut breakdown[i];
        entry.total += 1;
        if answer.is_correct {
            entry.correct += 1;
        }
    }

    for b in &mut breakdown {
        b.percentage = percentage(b.correct, b.total);
    }

    breakdown
}

/// Coarse rating of a quiz result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    /// 90% and above.
    Excellent,
    /// 70–89%.
    Good,
    /// 50–69%.
    Fair,
    NeedsReview,
}

impl PerformanceBand {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => PerformanceBand::Excellent,
            70..=89 => PerformanceBand::Good,
            50..=69 => PerformanceBand::Fair,
            _ => PerformanceBand::NeedsReview,
        }
    }
}

/// Aggregate merged into long-lived user progress after a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    /// Quizzes completed by this update (always 1 for a single session).
    pub quizzes_taken: u32,
    pub last_quiz_score: u32,
}

/// Scored result of a finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub session_id: Uuid,
    pub filter: CategoryFilter,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub categories: Vec<CategoryBreakdown>,
    pub answers: Vec<AnswerRecord>,
}

impl QuizSummary {
    pub fn new(
        session_id: Uuid,
        filter: CategoryFilter,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        total: usize,
        answers: Vec<AnswerRecord>,
    ) -> Self {
        let score = answers.iter().filter(|a| a.is_correct).count();
        Self {
            session_id,
            filter,
            started_at,
            completed_at,
            score,
            total,
            percentage: percentage(score, total),
            categories: category_breakdown(&answers),
            answers,
        }
    }

    pub fn band(&self) -> PerformanceBand {
        PerformanceBand::from_percentage(self.percentage)
    }

    pub fn progress_update(&self) -> ProgressUpdate {
        ProgressUpdate {
            quizzes_taken: 1,
            last_quiz_score: self.percentage,
        }
    }

    /// Number of questions that ran out of time.
    pub fn timeouts(&self, time_limit: u32) -> usize {
        self.answers
            .iter()
            .filter(|a| a.is_timeout(time_limit))
            .count()
    }

    /// Mean time spent per answer, in time units.
    pub fn average_time_used(&self) -> f64 {
        if self.answers.is_empty() {
            return 0.0;
        }
        let total: u64 = self.answers.iter().map(|a| a.time_used_secs as u64).sum();
        total as f64 / self.answers.len() as f64
    }
}
