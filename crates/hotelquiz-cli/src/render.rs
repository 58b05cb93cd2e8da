//! Terminal rendering of questions, feedback, and results.

use comfy_table::{Cell, Table};

use hotelquiz_core::config::Locale;
use hotelquiz_core::engine::AnswerOutcome;
use hotelquiz_core::model::{AnswerValue, Question, QuestionKind};
use hotelquiz_core::progress::UserProgress;
use hotelquiz_core::pronunciation::PronunciationResult;
use hotelquiz_core::statistics::QuizSummary;

use crate::i18n::{category_label, messages, performance_message, pronunciation_message};

/// Letter shown next to the option at `index`.
pub fn option_letter(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

pub fn print_question(locale: Locale, question: &Question, index: usize, total: usize) {
    let msgs = messages(locale);
    println!();
    println!(
        "{} {}/{} [{}]",
        msgs.question,
        index + 1,
        total,
        category_label(locale, question.category)
    );
    println!("{}", question.prompt);

    if let QuestionKind::PronunciationChoice { word, .. } = &question.kind {
        println!("  \"{word}\"");
    }
    // Fill-in-blank hint words are never shown.
    let prompt = if question.kind.is_choice() {
        for (i, option) in question.options().iter().enumerate() {
            println!("  {}. {option}", option_letter(i));
        }
        msgs.choice_prompt
    } else {
        msgs.text_prompt
    };
    println!("{prompt}:");
}

pub fn print_outcome(locale: Locale, outcome: &AnswerOutcome) {
    let msgs = messages(locale);
    let verdict = match (&outcome.record.submitted, outcome.record.is_correct) {
        (AnswerValue::NoAnswer, _) => msgs.timed_out,
        (_, true) => msgs.correct,
        (_, false) => msgs.incorrect,
    };
    println!("{verdict}");
    if !outcome.record.is_correct {
        println!("{}: {}", msgs.correct_answer, outcome.correct_answer);
    }
    if !outcome.explanation.is_empty() {
        println!("{}: {}", msgs.explanation, outcome.explanation);
    }
}

pub fn summary_table(locale: Locale, summary: &QuizSummary) -> Table {
    let msgs = messages(locale);
    let mut table = Table::new();
    table.set_header(vec![msgs.category, "✓", "#", "%"]);

    for b in &summary.categories {
        table.add_row(vec![
            Cell::new(category_label(locale, b.category)),
            Cell::new(b.correct),
            Cell::new(b.total),
            Cell::new(format!("{}%", b.percentage)),
        ]);
    }

    table
}

pub fn print_summary(locale: Locale, summary: &QuizSummary, time_limit: u32) {
    let msgs = messages(locale);
    println!();
    println!("== {} ==", msgs.results);
    println!(
        "{}: {}/{} ({}%)",
        msgs.score, summary.score, summary.total, summary.percentage
    );
    println!("{}", performance_message(locale, summary.band()));
    println!("{}: {}", msgs.timeouts, summary.timeouts(time_limit));
    println!("{}: {:.1}", msgs.average_time, summary.average_time_used());
    println!("\n{}", summary_table(locale, summary));
}

pub fn print_pronunciation(locale: Locale, result: &PronunciationResult) {
    let msgs = messages(locale);
    println!("{}: {}", msgs.pronunciation_score, result.score);
    println!("{}", pronunciation_message(locale, result.band()));
    println!("{}: \"{}\"", msgs.heard, result.transcript);
    println!("{}: {:.0}%", msgs.similarity, result.similarity * 100.0);
    println!("{}: {:.0}%", msgs.confidence, result.confidence * 100.0);
    if !result.alternatives.is_empty() {
        let alts: Vec<String> = result
            .alternatives
            .iter()
            .map(|c| format!("\"{}\" ({:.0}%)", c.transcript, c.confidence * 100.0))
            .collect();
        println!("{}: {}", msgs.alternatives, alts.join(", "));
    }
}

pub fn progress_table(progress: &UserProgress) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);

    let last_score = progress
        .last_quiz_score
        .map(|s| format!("{s}%"))
        .unwrap_or_else(|| "-".into());
    let last_study = progress
        .last_study_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".into());

    let rows: Vec<(&str, String)> = vec![
        ("Quizzes taken", progress.quizzes_taken.to_string()),
        ("Last quiz score", last_score),
        ("Practice accuracy", format!("{}%", progress.practice_accuracy())),
        ("Phrases studied", progress.phrases_studied.to_string()),
        ("Study minutes", progress.total_study_minutes.to_string()),
        ("Streak (days)", progress.streak_days.to_string()),
        ("Last study date", last_study),
        ("Modules visited", progress.modules_visited.join(", ")),
    ];
    for (metric, value) in rows {
        table.add_row(vec![Cell::new(metric), Cell::new(value)]);
    }

    table
}
