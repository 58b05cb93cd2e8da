//! Summary persistence and answer review.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::model::{AnswerValue, Category};
use crate::statistics::QuizSummary;

impl QuizSummary {
    /// Save the summary as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize summary")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
        Ok(())
    }

    /// Load a summary from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read summary from {}", path.display()))?;
        let summary: QuizSummary =
            serde_json::from_str(&content).context("failed to parse summary JSON")?;
        Ok(summary)
    }

    /// Pair each answer with its question for review.
    ///
    /// Answers whose question is no longer in `bank` are skipped.
    pub fn review(&self, bank: &QuestionBank) -> Vec<ReviewItem> {
        self.answers
            .iter()
            .enumerate()
            .filter_map(|(i, answer)| {
                let question = bank.get(answer.question_id)?;
                Some(ReviewItem {
                    number: i + 1,
                    question_id: question.id,
                    category: question.category,
                    prompt: question.prompt.clone(),
                    submitted: question.answer_text(&answer.submitted).map(str::to_string),
                    timed_out: answer.submitted == AnswerValue::NoAnswer,
                    correct_answer: question.correct_answer().to_string(),
                    explanation: question.explanation.clone(),
                    is_correct: answer.is_correct,
                })
            })
            .collect()
    }
}

/// One reviewed answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    /// 1-based position in the session.
    pub number: usize,
    pub question_id: u32,
    pub category: Category,
    pub prompt: String,
    /// Text of what was submitted, `None` if nothing usable was.
    pub submitted: Option<String>,
    pub timed_out: bool,
    pub correct_answer: String,
    pub explanation: String,
    pub is_correct: bool,
}

/// Format review items as a markdown table.
pub fn review_to_markdown(items: &[ReviewItem], unanswered: &str) -> String {
    let mut md = String::new();

    let correct = items.iter().filter(|i| i.is_correct).count();
    md.push_str(&format!("**Review:** {correct}/{} correct\n\n", items.len()));

    md.push_str("| # | Category | Question | Your answer | Correct answer |\n");
    md.push_str("|---|----------|----------|-------------|----------------|\n");
    for item in items {
        md.push_str(&format!(
            "| {}{} | {} | {} | {} | {} |\n",
            item.number,
            if item.is_correct { "" } else { " ✗" },
            item.category,
            escape_cell(&item.prompt),
            escape_cell(item.submitted.as_deref().unwrap_or(unanswered)),
            escape_cell(&item.correct_answer),
        ));
    }

    md
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}
