//! The `hotelquiz quiz` command.
//!
//! Runs one interactive session. The countdown and the input lines are raced
//! on the tokio runtime; the session itself never sees a clock.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};

use hotelquiz_core::config::{load_config_from, Locale};
use hotelquiz_core::engine::{QuizEngine, QuizSession};
use hotelquiz_core::model::{AnswerValue, CategoryFilter, Question};
use hotelquiz_core::progress::{load_progress, save_progress, JsonFileStore};
use hotelquiz_core::statistics::QuizSummary;

use crate::i18n::messages;
use crate::render;

/// Countdown values at which the remaining time is announced.
const ANNOUNCE_AT: [u32; 3] = [10, 5, 3];

pub struct QuizArgs {
    pub category: CategoryFilter,
    pub bank: Option<PathBuf>,
    pub seed: Option<u64>,
    pub time_limit: Option<u32>,
    pub save_summary: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(args: QuizArgs) -> Result<()> {
    let mut config = load_config_from(args.config.as_deref())?;
    if let Some(limit) = args.time_limit {
        config.time_limit_secs = limit;
    }
    config.validate()?;
    let locale = config.locale;

    let bank_path = args.bank.or_else(|| config.question_bank.clone());
    let bank = super::load_bank(bank_path.as_deref())?;

    let mut engine = match args.seed.or(config.seed) {
        Some(seed) => QuizEngine::with_seed(bank, config.engine_config(), seed),
        None => QuizEngine::new(bank, config.engine_config()),
    };
    let mut session = engine.start(&args.category)?;

    let input = BufReader::new(tokio::io::stdin());
    let Some(summary) = run_session(&mut session, locale, input).await? else {
        println!("{}", messages(locale).abandoned);
        return Ok(());
    };

    render::print_summary(locale, &summary, session.time_limit());

    if let Some(path) = &args.save_summary {
        summary.save_json(path)?;
        eprintln!("Summary saved to: {}", path.display());
    }

    record_progress(&summary, JsonFileStore::new(&config.progress_path))?;
    eprintln!(
        "{}: {}",
        messages(locale).progress_saved,
        config.progress_path.display()
    );

    Ok(())
}

/// Drive `session` to completion. `Ok(None)` when `input` closes first.
async fn run_session<R>(
    session: &mut QuizSession,
    locale: Locale,
    input: R,
) -> Result<Option<QuizSummary>>
where
    R: AsyncBufRead + Unpin,
{
    let msgs = messages(locale);
    let mut lines = input.lines();

    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    show_current(session, locale);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match session.tick()? {
                    Some(outcome) => {
                        render::print_outcome(locale, &outcome);
                        if outcome.finished {
                            break;
                        }
                        show_current(session, locale);
                        ticker.reset();
                    }
                    None => {
                        let left = session.time_remaining();
                        if ANNOUNCE_AT.contains(&left) {
                            println!("  {}: {left}", msgs.seconds_left);
                        }
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    tracing::debug!(session = %session.session_id(), "input closed, abandoning session");
                    return Ok(None);
                };
                let Some(question) = session.current_question() else {
                    break;
                };
                let Some(answer) = parse_answer(question, &line) else {
                    println!("{}", msgs.invalid_choice);
                    continue;
                };

                let outcome = session.submit_answer(answer)?;
                render::print_outcome(locale, &outcome);
                if outcome.finished {
                    break;
                }
                show_current(session, locale);
                ticker.reset();
            }
        }
    }

    Ok(Some(session.summarize()?))
}

fn show_current(session: &QuizSession, locale: Locale) {
    if let Some(question) = session.current_question() {
        let (index, total) = session.position();
        render::print_question(locale, question, index, total);
    }
}

/// Interpret a line of input for `question`.
///
/// Choice questions take a letter (`A`, `b`, ...) or a 1-based number.
/// Fill-in-blank questions take the answer text exactly as typed. Blank
/// input is `None`.
pub fn parse_answer(question: &Question, line: &str) -> Option<AnswerValue> {
    let input = line.trim();
    if input.is_empty() {
        return None;
    }

    if question.kind.is_choice() {
        return parse_option_index(input, question.options().len()).map(AnswerValue::Choice);
    }
    Some(AnswerValue::Text(input.to_string()))
}

fn parse_option_index(input: &str, option_count: usize) -> Option<usize> {
    let index = match input.parse::<usize>() {
        Ok(n) => n.checked_sub(1)?,
        Err(_) => {
            let mut chars = input.chars();
            let c = chars.next()?.to_ascii_uppercase();
            if chars.next().is_some() || !c.is_ascii_uppercase() {
                return None;
            }
            (c as u8 - b'A') as usize
        }
    };
    (index < option_count).then_some(index)
}

fn record_progress(summary: &QuizSummary, mut store: JsonFileStore) -> Result<()> {
    let mut progress = load_progress(&store);
    progress.apply(&summary.progress_update());
    progress.record_module_visit("quiz");
    progress.record_study_day(chrono::Local::now().date_naive());

    let minutes = (summary.completed_at - summary.started_at).num_minutes();
    progress.add_study_minutes(u32::try_from(minutes).unwrap_or(0));

    save_progress(&mut store, &progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotelquiz_core::bank::QuestionBank;
    use hotelquiz_core::engine::EngineConfig;
    use hotelquiz_core::model::{Category, QuestionKind};
    use tokio::io::AsyncWriteExt;

    fn choice_question() -> Question {
        Question {
            id: 1,
            category: Category::Checkin,
            prompt: "Greeting?".into(),
            kind: QuestionKind::MultipleChoice {
                options: vec!["a".into(), "b".into(), "c".into()],
                correct_index: 0,
            },
            explanation: String::new(),
        }
    }

    fn blank_question() -> Question {
        Question {
            id: 5,
            category: Category::Checkout,
            prompt: "Here is your ___ bill.".into(),
            kind: QuestionKind::FillInBlank {
                correct_text: "final".into(),
                options: vec!["final".into(), "last".into()],
            },
            explanation: String::new(),
        }
    }

    fn session(time_limit_secs: u32) -> QuizSession {
        let bank = QuestionBank::new(vec![choice_question(), blank_question()]).unwrap();
        let mut engine = QuizEngine::with_seed(bank, EngineConfig { time_limit_secs }, 3);
        engine.start(&CategoryFilter::All).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn countdown_times_out_every_question() {
        let mut session = session(3);
        // Held open so input never arrives and never closes.
        let (_tx, rx) = tokio::io::duplex(64);

        let started = tokio::time::Instant::now();
        let summary = run_session(&mut session, Locale::En, BufReader::new(rx))
            .await
            .unwrap()
            .unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(6) && elapsed < Duration::from_secs(7));
        assert_eq!(summary.score, 0);
        assert_eq!(summary.answers.len(), 2);
        for record in &summary.answers {
            assert_eq!(record.submitted, AnswerValue::NoAnswer);
            assert_eq!(record.time_used_secs, 3);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn answer_mid_countdown_records_time_used() {
        let mut session = session(5);
        let first_is_choice = session.current_question().unwrap().kind.is_choice();
        let answer = if first_is_choice { "A\n" } else { "final\n" };

        let (mut tx, rx) = tokio::io::duplex(64);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(2500)).await;
            tx.write_all(answer.as_bytes()).await.unwrap();
            // Keep input open so the second question can only time out.
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let summary = run_session(&mut session, Locale::En, BufReader::new(rx))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(summary.score, 1);
        assert!(summary.answers[0].is_correct);
        assert_eq!(summary.answers[0].time_used_secs, 2);
        assert_eq!(summary.answers[1].submitted, AnswerValue::NoAnswer);
        assert_eq!(summary.answers[1].time_used_secs, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_input_abandons_session() {
        let mut session = session(30);
        let (tx, rx) = tokio::io::duplex(64);
        drop(tx);

        let result = run_session(&mut session, Locale::En, BufReader::new(rx))
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(session.answers().is_empty());
    }

    #[test]
    fn choice_by_letter_or_number() {
        let q = choice_question();
        assert_eq!(parse_answer(&q, "a"), Some(AnswerValue::Choice(0)));
        assert_eq!(parse_answer(&q, " C \n"), Some(AnswerValue::Choice(2)));
        assert_eq!(parse_answer(&q, "2"), Some(AnswerValue::Choice(1)));
    }

    #[test]
    fn choice_out_of_range_or_garbage() {
        let q = choice_question();
        assert_eq!(parse_answer(&q, "D"), None);
        assert_eq!(parse_answer(&q, "0"), None);
        assert_eq!(parse_answer(&q, "4"), None);
        assert_eq!(parse_answer(&q, "hello"), None);
        assert_eq!(parse_answer(&q, "   "), None);
    }

    #[test]
    fn fill_in_blank_takes_text_as_typed() {
        let q = blank_question();
        assert_eq!(
            parse_answer(&q, " Final \n"),
            Some(AnswerValue::Text("Final".into()))
        );
        assert_eq!(parse_answer(&q, "b"), Some(AnswerValue::Text("b".into())));
        assert_eq!(parse_answer(&q, "2"), Some(AnswerValue::Text("2".into())));
        assert_eq!(parse_answer(&q, ""), None);
    }

    #[test]
    fn single_letter_blank_answer_is_not_a_hint_index() {
        let q = Question {
            id: 9,
            category: Category::Situation,
            prompt: "Would you like ___ wake-up call?".into(),
            kind: QuestionKind::FillInBlank {
                correct_text: "a".into(),
                options: vec!["the".into(), "a".into()],
            },
            explanation: String::new(),
        };

        let answer = parse_answer(&q, "a").unwrap();
        assert_eq!(answer, AnswerValue::Text("a".into()));
        assert!(q.grade(&answer));
        assert!(q.grade(&parse_answer(&q, " A ").unwrap()));
        assert!(!q.grade(&parse_answer(&q, "the").unwrap()));
    }
}
