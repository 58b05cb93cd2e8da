//! The `hotelquiz review` command.

use std::path::PathBuf;

use anyhow::Result;

use hotelquiz_core::config::load_config_from;
use hotelquiz_core::report::review_to_markdown;
use hotelquiz_core::statistics::QuizSummary;

use crate::i18n::messages;

pub fn execute(
    summary_path: PathBuf,
    bank: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let msgs = messages(config.locale);

    let summary = QuizSummary::load_json(&summary_path)?;
    let bank = super::load_bank(bank.or(config.question_bank).as_deref())?;

    let items = summary.review(&bank);
    if items.len() < summary.answers.len() {
        tracing::warn!(
            missing = summary.answers.len() - items.len(),
            "some answered questions are not in the bank"
        );
    }

    println!("{}", review_to_markdown(&items, msgs.no_answer));

    for item in items.iter().filter(|i| !i.is_correct) {
        println!("{}. {}", item.number, item.prompt);
        println!("   {}: {}", msgs.correct_answer, item.correct_answer);
        if !item.explanation.is_empty() {
            println!("   {}: {}", msgs.explanation, item.explanation);
        }
    }

    Ok(())
}
