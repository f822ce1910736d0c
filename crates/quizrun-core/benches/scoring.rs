use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizrun_core::input::parse_answer;
use quizrun_core::model::{GroupKey, Question};
use quizrun_core::scoring::{compute_possible, ScoringEngine};
use quizrun_core::shuffle::Shuffler;

fn make_bank(size: usize) -> Vec<Question> {
    (0..size)
        .map(|i| Question {
            question: Some(format!("Question {i}")),
            choices: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            answer: Some("c".into()),
            section: Some("reading".into()),
            // Every third question joins a three-member group.
            special_list: (i % 3 == 0).then(|| GroupKey::Integer((i / 9) as i64)),
            ..Default::default()
        })
        .collect()
}

fn bench_compute_possible(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_possible");
    for size in [100, 1_000, 10_000] {
        let bank = make_bank(size);
        group.bench_function(format!("n={size}"), |b| {
            b.iter(|| compute_possible(black_box(&bank)))
        });
    }
    group.finish();
}

fn bench_full_session_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_scoring");
    let bank = make_bank(1_000);

    group.bench_function("answer_all_then_finalize", |b| {
        b.iter(|| {
            let mut shuffler = Shuffler::new(Some(42));
            let mut engine = ScoringEngine::new(&bank);
            for q in &bank {
                let presented = shuffler.present(q);
                engine.record_answer(q, 0, &presented).unwrap();
            }
            black_box(engine.finalize())
        })
    });

    group.finish();
}

fn bench_parse_answer(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_answer");
    for raw in ["b", "3", "quit", "", "nonsense"] {
        group.bench_function(format!("{raw:?}"), |b| {
            b.iter(|| parse_answer(black_box(raw), black_box(4)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_compute_possible,
    bench_full_session_scoring,
    bench_parse_answer
);
criterion_main!(benches);
