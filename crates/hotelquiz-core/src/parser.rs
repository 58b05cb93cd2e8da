//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Category, Question, QuestionKind};

/// A parsed bank file: header metadata plus its questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankFile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<Question>,
}

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u32,
    category: String,
    kind: String,
    prompt: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct_index: Option<usize>,
    #[serde(default)]
    correct_text: Option<String>,
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    explanation: String,
}

impl TomlQuestion {
    fn into_question(self) -> Result<Question> {
        let id = self.id;
        let category: Category = self
            .category
            .parse()
            .map_err(|e: String| anyhow::anyhow!("question {id}: {e}"))?;

        let choice_index = |index: Option<usize>| {
            index.ok_or_else(|| anyhow::anyhow!("question {id}: {} requires correct_index", self.kind))
        };

        let kind = match self.kind.as_str() {
            "multiple-choice" => QuestionKind::MultipleChoice {
                correct_index: choice_index(self.correct_index)?,
                options: self.options,
            },
            "pronunciation-choice" | "pronunciation" => QuestionKind::PronunciationChoice {
                correct_index: choice_index(self.correct_index)?,
                word: self.word.unwrap_or_default(),
                options: self.options,
            },
            "fill-in-blank" => QuestionKind::FillInBlank {
                correct_text: self.correct_text.ok_or_else(|| {
                    anyhow::anyhow!("question {id}: fill-in-blank requires correct_text")
                })?,
                options: self.options,
            },
            other => anyhow::bail!("question {id}: unknown question kind: {other}"),
        };

        let question = Question {
            id,
            category,
            prompt: self.prompt,
            kind,
            explanation: self.explanation,
        };
        question.validate()?;
        Ok(question)
    }
}

/// Parse a single TOML file into a `BankFile`.
pub fn parse_bank(path: &Path) -> Result<BankFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a `BankFile` (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<BankFile> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(TomlQuestion::into_question)
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("invalid question in {}", source_path.display()))?;

    let mut seen_ids = HashSet::new();
    for q in &questions {
        if !seen_ids.insert(q.id) {
            anyhow::bail!(
                "duplicate question id {} in {}",
                q.id,
                source_path.display()
            );
        }
    }

    Ok(BankFile {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<BankFile>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// A non-fatal issue found while validating a bank.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<u32>,
    pub message: String,
}

/// Validate a bank for content issues that do not prevent it from loading.
pub fn validate_bank(bank: &BankFile) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for q in &bank.questions {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_id: Some(q.id),
                message,
            })
        };

        if q.prompt.trim().is_empty() {
            warn("prompt is empty".into());
        }
        if q.explanation.trim().is_empty() {
            warn("explanation is empty".into());
        }

        let mut seen = HashSet::new();
        for option in q.options() {
            if !seen.insert(option.trim().to_lowercase()) {
                warn(format!("duplicate option: {option}"));
            }
        }

        if let QuestionKind::FillInBlank {
            correct_text,
            options,
        } = &q.kind
        {
            let answer = correct_text.trim().to_lowercase();
            if !options.is_empty() && !options.iter().any(|o| o.trim().to_lowercase() == answer) {
                warn(format!("answer '{correct_text}' is not among the hint options"));
            }
        }

        if let QuestionKind::PronunciationChoice { word, .. } = &q.kind {
            if word.trim().is_empty() {
                warn("pronunciation question has no word to speak".into());
            }
        }
    }

    for category in Category::ALL {
        if !bank.questions.iter().any(|q| q.category == category) {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("no questions in category {category}"),
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "test-bank"
name = "Test Bank"
description = "A test bank"

[[questions]]
id = 1
category = "checkin"
kind = "multiple-choice"
prompt = "Morning greeting?"
options = ["Good morning!", "Good night!"]
correct_index = 0
explanation = "It is morning."

[[questions]]
id = 2
category = "checkout"
kind = "fill-in-blank"
prompt = "Here is your _____ bill."
correct_text = "final"
options = ["final", "last"]
explanation = "final bill"
"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.id, "test-bank");
        assert_eq!(bank.name, "Test Bank");
        assert_eq!(bank.questions.len(), 2);
        assert_eq!(bank.questions[0].category, Category::Checkin);
        assert!(matches!(
            bank.questions[1].kind,
            QuestionKind::FillInBlank { ref correct_text, .. } if correct_text == "final"
        ));
    }

    #[test]
    fn parse_pronunciation_question() {
        let toml = r#"
[bank]
id = "p"
name = "P"

[[questions]]
id = 9
category = "pronunciation"
kind = "pronunciation-choice"
prompt = "TH sound?"
word = "Thank"
options = ["sank", "tank"]
correct_index = 0
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("p.toml")).unwrap();
        match &bank.questions[0].kind {
            QuestionKind::PronunciationChoice { word, .. } => assert_eq!(word, "Thank"),
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_index() {
        let toml = r#"
[bank]
id = "bad"
name = "Bad"

[[questions]]
id = 1
category = "checkin"
kind = "multiple-choice"
prompt = "?"
options = ["a", "b"]
correct_index = 5
"#;
        let err = parse_bank_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("out of range"));
    }

    #[test]
    fn rejects_missing_correct_index() {
        let toml = r#"
[bank]
id = "bad"
name = "Bad"

[[questions]]
id = 1
category = "checkin"
kind = "multiple-choice"
prompt = "?"
options = ["a", "b"]
"#;
        let err = parse_bank_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("requires correct_index"));
    }

    #[test]
    fn rejects_unknown_kind_and_category() {
        let toml = r#"
[bank]
id = "bad"
name = "Bad"

[[questions]]
id = 1
category = "checkin"
kind = "essay"
prompt = "?"
"#;
        assert!(parse_bank_str(toml, &PathBuf::from("bad.toml")).is_err());

        let toml = toml.replace("\"essay\"", "\"fill-in-blank\"").replace("checkin", "spa");
        let err = parse_bank_str(&toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("unknown category"));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let toml = VALID_TOML.replace("id = 2", "id = 1");
        let err = parse_bank_str(&toml, &PathBuf::from("dupes.toml")).unwrap_err();
        assert!(err.to_string().contains("duplicate question id 1"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse_bank_str(bad, &PathBuf::from("bad.toml")).is_err());
    }

    #[test]
    fn validate_reports_content_issues() {
        let toml = r#"
[bank]
id = "w"
name = "W"

[[questions]]
id = 1
category = "checkout"
kind = "fill-in-blank"
prompt = "Here is your _____ bill."
correct_text = "final"
options = ["last", "Last"]
"#;
        let bank = parse_bank_str(toml, &PathBuf::from("w.toml")).unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings.iter().any(|w| w.message == "explanation is empty"));
        assert!(warnings.iter().any(|w| w.message.contains("duplicate option")));
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("not among the hint options")));
        assert!(warnings
            .iter()
            .any(|w| w.question_id.is_none() && w.message.contains("checkin")));
    }

    #[test]
    fn builtin_bank_has_no_warnings() {
        let bank = parse_bank_str(crate::bank::BUILTIN_BANK_TOML, &PathBuf::from("hotel.toml"))
            .unwrap();
        assert_eq!(bank.questions.len(), 10);
        let warnings = validate_bank(&bank);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("test.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("broken.toml"), "not toml [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].id, "test-bank");
    }
}
