pub mod init;
pub mod progress;
pub mod quiz;
pub mod review;
pub mod score;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};

use hotelquiz_core::bank::QuestionBank;
use hotelquiz_core::parser::{load_bank_directory, parse_bank};

/// Load a bank file or directory, or the built-in bank when `path` is `None`.
pub fn load_bank(path: Option<&Path>) -> Result<QuestionBank> {
    let Some(path) = path else {
        return QuestionBank::builtin();
    };

    let files = if path.is_dir() {
        load_bank_directory(path)?
    } else {
        vec![parse_bank(path)?]
    };
    QuestionBank::from_files(files)
        .with_context(|| format!("invalid question bank: {}", path.display()))
}
