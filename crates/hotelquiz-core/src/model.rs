//! Core data model types for hotelquiz.
//!
//! Questions, categories, submitted answers, and the per-answer history
//! record that a session appends to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuizError;

/// Lesson area a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Checkin,
    Checkout,
    RoomService,
    Pronunciation,
    Situation,
}

impl Category {
    /// All categories, in lesson order.
    pub const ALL: [Category; 5] = [
        Category::Checkin,
        Category::Checkout,
        Category::RoomService,
        Category::Pronunciation,
        Category::Situation,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Checkin => write!(f, "checkin"),
            Category::Checkout => write!(f, "checkout"),
            Category::RoomService => write!(f, "roomservice"),
            Category::Pronunciation => write!(f, "pronunciation"),
            Category::Situation => write!(f, "situation"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checkin" | "check-in" => Ok(Category::Checkin),
            "checkout" | "check-out" => Ok(Category::Checkout),
            "roomservice" | "room-service" => Ok(Category::RoomService),
            "pronunciation" => Ok(Category::Pronunciation),
            "situation" => Ok(Category::Situation),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

/// Which questions a session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => *c == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "all"),
            CategoryFilter::Only(c) => write!(f, "{c}"),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            s.parse().map(CategoryFilter::Only)
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.to_string()
    }
}

/// The shape of a question and the data needed to grade it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum QuestionKind {
    /// Pick one of several phrases.
    MultipleChoice {
        options: Vec<String>,
        correct_index: usize,
    },
    /// Type the missing word. `options` are hint words shown to the learner.
    FillInBlank {
        correct_text: String,
        #[serde(default)]
        options: Vec<String>,
    },
    /// Pick the right pronunciation of `word`, which may be spoken aloud.
    PronunciationChoice {
        word: String,
        options: Vec<String>,
        correct_index: usize,
    },
}

impl QuestionKind {
    /// Kebab-case name as used in bank files.
    pub fn name(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple-choice",
            QuestionKind::FillInBlank { .. } => "fill-in-blank",
            QuestionKind::PronunciationChoice { .. } => "pronunciation-choice",
        }
    }

    pub fn is_choice(&self) -> bool {
        !matches!(self, QuestionKind::FillInBlank { .. })
    }
}

/// A single quiz question. Immutable once loaded into a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the bank.
    pub id: u32,
    pub category: Category,
    /// Question text shown to the learner.
    pub prompt: String,
    pub kind: QuestionKind,
    /// Author's explanation, shown after answering. Opaque to the engine.
    #[serde(default)]
    pub explanation: String,
}

impl Question {
    /// Check the invariants of this question's kind.
    pub fn validate(&self) -> Result<(), QuizError> {
        let invalid = |reason: String| QuizError::InvalidQuestion {
            id: self.id,
            reason,
        };

        match &self.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_index,
            }
            | QuestionKind::PronunciationChoice {
                options,
                correct_index,
                ..
            } => {
                if options.len() < 2 {
                    return Err(invalid(format!(
                        "{} needs at least 2 options, found {}",
                        self.kind.name(),
                        options.len()
                    )));
                }
                if *correct_index >= options.len() {
                    return Err(invalid(format!(
                        "correct_index {} out of range for {} options",
                        correct_index,
                        options.len()
                    )));
                }
            }
            QuestionKind::FillInBlank { correct_text, .. } => {
                if correct_text.trim().is_empty() {
                    return Err(invalid("fill-in-blank answer is empty".into()));
                }
            }
        }

        Ok(())
    }

    /// Grade a submitted answer.
    ///
    /// `NoAnswer` is always wrong, and so is an answer whose shape does not
    /// fit the question (an index for a fill-in-blank, text for a choice).
    pub fn grade(&self, answer: &AnswerValue) -> bool {
        match (&self.kind, answer) {
            (_, AnswerValue::NoAnswer) => false,
            (
                QuestionKind::MultipleChoice { correct_index, .. }
                | QuestionKind::PronunciationChoice { correct_index, .. },
                AnswerValue::Choice(index),
            ) => index == correct_index,
            (QuestionKind::FillInBlank { correct_text, .. }, AnswerValue::Text(text)) => {
                normalize(text) == normalize(correct_text)
            }
            (QuestionKind::FillInBlank { .. }, AnswerValue::Choice(_)) => false,
            (
                QuestionKind::MultipleChoice { .. } | QuestionKind::PronunciationChoice { .. },
                AnswerValue::Text(_),
            ) => false,
        }
    }

    /// Authored text of the right answer.
    pub fn correct_answer(&self) -> &str {
        match &self.kind {
            QuestionKind::MultipleChoice {
                options,
                correct_index,
            }
            | QuestionKind::PronunciationChoice {
                options,
                correct_index,
                ..
            } => options
                .get(*correct_index)
                .map(String::as_str)
                .unwrap_or_default(),
            QuestionKind::FillInBlank { correct_text, .. } => correct_text,
        }
    }

    pub fn options(&self) -> &[String] {
        match &self.kind {
            QuestionKind::MultipleChoice { options, .. }
            | QuestionKind::FillInBlank { options, .. }
            | QuestionKind::PronunciationChoice { options, .. } => options,
        }
    }

    /// Display text for a submitted answer, or `None` when nothing usable
    /// was submitted.
    pub fn answer_text<'a>(&'a self, answer: &'a AnswerValue) -> Option<&'a str> {
        match answer {
            AnswerValue::Choice(i) if self.kind.is_choice() => {
                self.options().get(*i).map(String::as_str)
            }
            AnswerValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// What the learner submitted for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    /// Index of the chosen option.
    Choice(usize),
    /// Typed text for a fill-in-blank question.
    Text(String),
    /// Nothing was submitted before the countdown ran out.
    NoAnswer,
}

/// One entry in a session's answer history. Appended once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: u32,
    pub category: Category,
    pub submitted: AnswerValue,
    pub is_correct: bool,
    /// Time units spent on the question, `0..=time_limit`.
    pub time_used_secs: u32,
}

impl AnswerRecord {
    /// A timeout is recorded as `NoAnswer` with the full time limit used.
    pub fn is_timeout(&self, time_limit: u32) -> bool {
        self.submitted == AnswerValue::NoAnswer && self.time_used_secs == time_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice_question() -> Question {
        Question {
            id: 1,
            category: Category::Checkin,
            prompt: "Greeting in the morning?".into(),
            kind: QuestionKind::MultipleChoice {
                options: vec!["Good morning!".into(), "Good evening!".into()],
                correct_index: 0,
            },
            explanation: "It is morning.".into(),
        }
    }

    fn blank_question() -> Question {
        Question {
            id: 5,
            category: Category::Checkout,
            prompt: "Here is your _____ bill.".into(),
            kind: QuestionKind::FillInBlank {
                correct_text: "final".into(),
                options: vec!["final".into(), "last".into()],
            },
            explanation: String::new(),
        }
    }

    #[test]
    fn category_display_and_parse() {
        assert_eq!(Category::RoomService.to_string(), "roomservice");
        assert_eq!(
            "room-service".parse::<Category>().unwrap(),
            Category::RoomService
        );
        assert_eq!("Check-In".parse::<Category>().unwrap(), Category::Checkin);
        assert!("lobby".parse::<Category>().is_err());
    }

    #[test]
    fn filter_parse_and_match() {
        assert_eq!("ALL".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        let f: CategoryFilter = "situation".parse().unwrap();
        assert!(f.matches(Category::Situation));
        assert!(!f.matches(Category::Checkin));
        assert!(CategoryFilter::All.matches(Category::Checkout));
    }

    #[test]
    fn grade_choice() {
        let q = choice_question();
        assert!(q.grade(&AnswerValue::Choice(0)));
        assert!(!q.grade(&AnswerValue::Choice(1)));
        assert!(!q.grade(&AnswerValue::Text("Good morning!".into())));
        assert!(!q.grade(&AnswerValue::NoAnswer));
    }

    #[test]
    fn grade_fill_in_blank_ignores_case_and_whitespace() {
        let q = blank_question();
        assert!(q.grade(&AnswerValue::Text("  Final ".into())));
        assert!(q.grade(&AnswerValue::Text("FINAL".into())));
        assert!(!q.grade(&AnswerValue::Text("last".into())));
        assert!(!q.grade(&AnswerValue::Choice(0)));
        assert!(!q.grade(&AnswerValue::NoAnswer));
    }

    #[test]
    fn validate_rejects_out_of_range_index() {
        let mut q = choice_question();
        q.kind = QuestionKind::MultipleChoice {
            options: vec!["a".into(), "b".into()],
            correct_index: 2,
        };
        let err = q.validate().unwrap_err();
        assert!(matches!(err, QuizError::InvalidQuestion { id: 1, .. }));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn validate_rejects_empty_blank_answer() {
        let mut q = blank_question();
        q.kind = QuestionKind::FillInBlank {
            correct_text: "   ".into(),
            options: vec![],
        };
        assert!(q.validate().is_err());
        assert!(blank_question().validate().is_ok());
    }

    #[test]
    fn correct_answer_and_answer_text() {
        let q = choice_question();
        assert_eq!(q.correct_answer(), "Good morning!");
        assert_eq!(q.answer_text(&AnswerValue::Choice(1)), Some("Good evening!"));
        assert_eq!(q.answer_text(&AnswerValue::Choice(9)), None);
        assert_eq!(q.answer_text(&AnswerValue::NoAnswer), None);
        assert_eq!(blank_question().correct_answer(), "final");
    }

    #[test]
    fn question_serde_roundtrip() {
        let q = blank_question();
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"kind\":\"fill-in-blank\""));
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn timeout_record() {
        let record = AnswerRecord {
            question_id: 1,
            category: Category::Checkin,
            submitted: AnswerValue::NoAnswer,
            is_correct: false,
            time_used_secs: 30,
        };
        assert!(record.is_timeout(30));
        assert!(!record.is_timeout(20));
    }
}
