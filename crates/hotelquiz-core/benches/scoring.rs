use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hotelquiz_core::bank::QuestionBank;
use hotelquiz_core::engine::{EngineConfig, QuizEngine};
use hotelquiz_core::model::{AnswerValue, CategoryFilter};
use hotelquiz_core::pronunciation::{assess, score, similarity, RecognitionCandidate};

fn bench_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");

    group.bench_function("word", |b| {
        b.iter(|| similarity(black_box("Welcome"), black_box("well come")))
    });

    group.bench_function("sentence", |b| {
        b.iter(|| {
            similarity(
                black_box("Could you spell your last name for me, please?"),
                black_box("could you spell you last name for me please"),
            )
        })
    });

    let long_target = "How was your stay with us? ".repeat(20);
    let long_transcript = "how was you stay with as ".repeat(20);
    group.bench_function("paragraph", |b| {
        b.iter(|| similarity(black_box(&long_target), black_box(&long_transcript)))
    });

    group.finish();
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("pronunciation_score");

    group.bench_function("score", |b| {
        b.iter(|| score(black_box("Thank you"), black_box("thank you"), black_box(0.87)))
    });

    let candidates = vec![
        RecognitionCandidate::new("good mourning", 0.41),
        RecognitionCandidate::new("good morning", 0.92),
        RecognitionCandidate::new("could morning", 0.33),
    ];
    group.bench_function("assess_3_candidates", |b| {
        b.iter(|| assess(black_box("Good morning"), black_box(candidates.clone())))
    });

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let bank = match QuestionBank::builtin() {
        Ok(bank) => bank,
        Err(e) => panic!("built-in bank failed to load: {e:#}"),
    };
    let mut engine = QuizEngine::with_seed(bank, EngineConfig::default(), 7);

    c.bench_function("full_session_10_questions", |b| {
        b.iter(|| {
            let mut session = engine.start(black_box(&CategoryFilter::All)).ok()?;
            while session.is_active() {
                session.submit_answer(AnswerValue::Choice(0)).ok()?;
            }
            session.summarize().ok()
        })
    });
}

criterion_group!(benches, bench_similarity, bench_score, bench_session);
criterion_main!(benches);
