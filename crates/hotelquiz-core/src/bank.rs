//! The question bank a session draws from.

use std::collections::HashSet;
use std::path::Path;

use crate::error::QuizError;
use crate::model::{Category, CategoryFilter, Question};
use crate::parser::{parse_bank_str, BankFile};

/// Source of the built-in hotel-English bank.
pub const BUILTIN_BANK_TOML: &str = include_str!("../banks/hotel.toml");

/// A validated, ordered set of questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, validating every question and rejecting duplicate ids.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        let mut seen = HashSet::new();
        for q in &questions {
            q.validate()?;
            if !seen.insert(q.id) {
                return Err(QuizError::InvalidQuestion {
                    id: q.id,
                    reason: "duplicate question id".into(),
                });
            }
        }
        Ok(Self { questions })
    }

    /// Merge the questions of several parsed bank files into one bank.
    pub fn from_files(files: Vec<BankFile>) -> Result<Self, QuizError> {
        Self::new(files.into_iter().flat_map(|f| f.questions).collect())
    }

    /// The ten hotel-English questions shipped with the crate.
    pub fn builtin() -> anyhow::Result<Self> {
        let file = parse_bank_str(BUILTIN_BANK_TOML, Path::new("banks/hotel.toml"))?;
        Ok(Self::from_files(vec![file])?)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Categories present in the bank, in first-seen order.
    pub fn categories(&self) -> Vec<Category> {
        let mut out = Vec::new();
        for q in &self.questions {
            if !out.contains(&q.category) {
                out.push(q.category);
            }
        }
        out
    }

    pub fn count_by_category(&self, category: Category) -> usize {
        self.questions
            .iter()
            .filter(|q| q.category == category)
            .count()
    }

    /// Questions matching `filter`, in bank order.
    pub fn filter(&self, filter: &CategoryFilter) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| filter.matches(q.category))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionKind;

    fn question(id: u32, category: Category) -> Question {
        Question {
            id,
            category,
            prompt: format!("question {id}"),
            kind: QuestionKind::MultipleChoice {
                options: vec!["a".into(), "b".into()],
                correct_index: 0,
            },
            explanation: String::new(),
        }
    }

    #[test]
    fn builtin_bank_covers_every_category() {
        let bank = QuestionBank::builtin().unwrap();
        assert_eq!(bank.len(), 10);
        assert_eq!(bank.categories(), Category::ALL.to_vec());
        assert_eq!(bank.count_by_category(Category::Checkin), 3);
        assert_eq!(bank.count_by_category(Category::Situation), 1);
        assert_eq!(bank.get(5).unwrap().correct_answer(), "final");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = QuestionBank::new(vec![
            question(1, Category::Checkin),
            question(1, Category::Checkout),
        ])
        .unwrap_err();
        assert!(matches!(err, QuizError::InvalidQuestion { id: 1, .. }));
    }

    #[test]
    fn rejects_invalid_question() {
        let mut q = question(3, Category::Checkin);
        q.kind = QuestionKind::MultipleChoice {
            options: vec!["a".into(), "b".into()],
            correct_index: 7,
        };
        assert!(QuestionBank::new(vec![q]).is_err());
    }

    #[test]
    fn filter_keeps_bank_order() {
        let bank = QuestionBank::new(vec![
            question(1, Category::Checkin),
            question(2, Category::Checkout),
            question(3, Category::Checkin),
        ])
        .unwrap();
        let ids: Vec<u32> = bank
            .filter(&CategoryFilter::Only(Category::Checkin))
            .iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(bank.filter(&CategoryFilter::All).len(), 3);
        assert!(bank
            .filter(&CategoryFilter::Only(Category::Situation))
            .is_empty());
    }
}
