//! Long-lived learner progress and its key-value persistence.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::statistics::{percentage, ProgressUpdate};

/// Key under which progress is saved.
pub const PROGRESS_KEY: &str = "hotelEnglishProgress";

/// Everything remembered about a learner between runs.
///
/// Every field is defaulted so that partial or older saves still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProgress {
    pub modules_visited: Vec<String>,
    pub phrases_studied: u32,
    pub correct_answers: u32,
    pub incorrect_answers: u32,
    #[serde(alias = "totalStudyTime")]
    pub total_study_minutes: u32,
    pub streak_days: u32,
    pub last_study_date: Option<NaiveDate>,
    pub quizzes_taken: u32,
    pub last_quiz_score: Option<u32>,
}

impl UserProgress {
    /// Merge the result of a finished quiz.
    pub fn apply(&mut self, update: &ProgressUpdate) {
        self.quizzes_taken += update.quizzes_taken;
        self.last_quiz_score = Some(update.last_quiz_score);
    }

    /// Returns `true` the first time a module is seen.
    pub fn record_module_visit(&mut self, module: &str) -> bool {
        if self.modules_visited.iter().any(|m| m == module) {
            return false;
        }
        self.modules_visited.push(module.to_string());
        true
    }

    pub fn record_practice_answer(&mut self, correct: bool) {
        if correct {
            self.correct_answers += 1;
        } else {
            self.incorrect_answers += 1;
        }
    }

    pub fn record_phrase_studied(&mut self) {
        self.phrases_studied += 1;
    }

    pub fn add_study_minutes(&mut self, minutes: u32) {
        self.total_study_minutes = self.total_study_minutes.saturating_add(minutes);
    }

    /// Update the daily streak for a study session on `today`.
    ///
    /// Consecutive days extend the streak, a gap restarts it at 1, and a
    /// second session on the same day changes nothing.
    pub fn record_study_day(&mut self, today: NaiveDate) {
        self.streak_days = match self.last_study_date {
            Some(last) if last == today => return,
            Some(last) if last.succ_opt() == Some(today) => self.streak_days + 1,
            _ => 1,
        };
        self.last_study_date = Some(today);
    }

    /// Share of practice answers that were correct, 0 with none recorded.
    pub fn practice_accuracy(&self) -> u32 {
        let total = (self.correct_answers + self.incorrect_answers) as usize;
        percentage(self.correct_answers as usize, total)
    }

    /// Share of the app's modules visited so far.
    pub fn module_progress(&self, total_modules: usize) -> u32 {
        percentage(self.modules_visited.len().min(total_modules), total_modules)
    }
}

/// Flat string key-value persistence.
pub trait ProgressStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// Values are kept as strings, so the file looks like browser local storage.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        Ok(Some(content))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let Some(content) = self.read_raw()? else {
            return Ok(BTreeMap::new());
        };
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", self.path.display()))
    }
}

impl ProgressStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Unparseable content is replaced; read errors are not.
        let mut entries = match self.read_raw()? {
            Some(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "replacing damaged progress file");
                BTreeMap::new()
            }),
            None => BTreeMap::new(),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

/// Load progress, falling back to a fresh record on missing or corrupt data.
pub fn load_progress(store: &dyn ProgressStore) -> UserProgress {
    let raw = match store.get(PROGRESS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return UserProgress::default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read saved progress, starting fresh");
            return UserProgress::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(progress) => progress,
        Err(e) => {
            tracing::warn!(error = %e, "saved progress is corrupt, starting fresh");
            UserProgress::default()
        }
    }
}

pub fn save_progress(store: &mut dyn ProgressStore, progress: &UserProgress) -> Result<()> {
    let json = serde_json::to_string(progress).context("failed to serialize progress")?;
    store.set(PROGRESS_KEY, &json)
}
