//! End-to-end session tests against the library API with shuffled,
//! multi-choice questions.

use std::collections::{HashMap, VecDeque};

use quizrun_core::model::{GroupKey, Question, Section};
use quizrun_core::parser::parse_question_bank_str;
use quizrun_core::session::{QuestionView, QuizSession, SessionEvent, SessionOptions};
use quizrun_core::shuffle::Shuffler;
use quizrun_core::traits::{Console, MemoryReviewSink};

#[derive(Clone, Copy, Debug)]
enum Plan {
    Right,
    Wrong,
    Skip,
    Quit,
}

/// Console that looks at the presented choices and answers according to a
/// per-question plan.
struct OracleConsole {
    answers: HashMap<String, String>,
    plans: VecDeque<Plan>,
    pending: Option<String>,
    headers: Vec<String>,
    shown_choices: Vec<Vec<String>>,
    events: Vec<SessionEvent>,
}

impl OracleConsole {
    fn new(bank: &[Question], plans: &[Plan]) -> Self {
        Self {
            answers: bank
                .iter()
                .filter_map(|q| Some((q.text().to_string(), q.answer.clone()?)))
                .collect(),
            plans: plans.iter().copied().collect(),
            pending: None,
            headers: Vec::new(),
            shown_choices: Vec::new(),
            events: Vec::new(),
        }
    }
}

impl Console for OracleConsole {
    fn show_question(&mut self, view: &QuestionView<'_>) -> anyhow::Result<()> {
        let answer = self.answers.get(view.text).cloned().unwrap_or_default();
        let correct = view.choices.iter().position(|c| *c == answer);
        let wrong = view.choices.iter().position(|c| *c != answer);
        let line = match self.plans.pop_front().unwrap_or(Plan::Quit) {
            Plan::Right => format!("{}", correct.unwrap() + 1),
            Plan::Wrong => format!("{}", wrong.unwrap() + 1),
            Plan::Skip => String::new(),
            Plan::Quit => "q".to_string(),
        };
        self.pending = Some(line);
        self.headers.push(view.header.clone());
        self.shown_choices
            .push(view.choices.iter().map(|c| c.to_string()).collect());
        Ok(())
    }

    fn read_line(&mut self, _prompt: &str) -> anyhow::Result<Option<String>> {
        Ok(self.pending.take())
    }

    fn notify(&mut self, event: &SessionEvent) -> anyhow::Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}

const BANK: &str = r#"[
  {"question": "R1", "choice": ["a", "b", "c", "d"], "answer": "c", "section": "reading",
   "special_list": 1, "score": 3, "page": 4},
  {"question": "R2", "choice": ["a", "b", "c", "d"], "answer": "a", "section": "reading",
   "special_list": 1, "score": 3, "page": 4},
  {"question": "R3", "choice": ["a", "b", "c"], "answer": "b", "section": "Reading",
   "special_list": 2, "score": "2"},
  {"question": "R4", "choice": ["a", "b", "c"], "answer": "c", "section": "reading",
   "special_list": 2, "score": 2},
  {"question": "G1", "choice": ["is", "are", "be"], "answer": "is", "section": "grammar"},
  {"question": "G2", "choice": ["on", "in", "at"], "answer": "at", "section": "grammar", "score": 2},
  {"question": "V1", "choice": ["fast", "slow"], "answer": "fast", "section": "vocabulary"},
  {"question": "V2", "choice": ["big", "small"], "answer": "small", "section": "vocabulary",
   "score": -4}
]"#;

fn bank() -> Vec<Question> {
    parse_question_bank_str(BANK, std::path::Path::new("bank.json")).unwrap()
}

fn run(seed: u64, plans: &[Plan]) -> (quizrun_core::session::SessionReport, OracleConsole) {
    let questions = bank();
    let mut shuffler = Shuffler::new(Some(seed));
    let ordered = shuffler.shuffle_within_sections(questions.clone(), &Section::ORDER);
    let mut console = OracleConsole::new(&questions, plans);
    let mut sink = MemoryReviewSink::default();
    let session = QuizSession::new(ordered, SessionOptions::default()).unwrap();
    let report = session.run(&mut shuffler, &mut console, &mut sink).unwrap();
    assert_eq!(sink.saved.len(), 1);
    (report, console)
}

#[test]
fn sections_are_presented_in_order() {
    let (_, console) = run(3, &[Plan::Skip; 8]);
    let sections: Vec<&str> = console
        .headers
        .iter()
        .map(|h| h.split_whitespace().nth(1).unwrap())
        .collect();
    assert_eq!(
        sections,
        [
            "Vocabulary", "Vocabulary", "Grammar", "Grammar", "Reading", "Reading", "Reading",
            "Reading"
        ]
    );
}

#[test]
fn all_correct_scores_everything() {
    let (report, _) = run(11, &[Plan::Right; 8]);
    let s = report.summary;
    assert_eq!(s.answered, 8);
    assert_eq!(s.correct, 8);
    assert_eq!(s.independent_correct, 4);
    assert_eq!(s.groups_correct, 2);
    // V1 1 + V2 (non-positive -> 1) + G1 1 + G2 2 + group 1 (3) + group 2 (2)
    assert_eq!(s.total_possible, 10);
    assert_eq!(s.total_score, 10);
    assert!(report.wrong.is_empty());
    assert!(!report.ended_early);
}

#[test]
fn one_wrong_member_voids_its_group() {
    // Order: V1 V2 G1 G2, then reading in shuffled order.
    let plans = [
        Plan::Right,
        Plan::Right,
        Plan::Right,
        Plan::Right,
        Plan::Wrong,
        Plan::Right,
        Plan::Right,
        Plan::Right,
    ];
    let (report, console) = run(5, &plans);
    let s = report.summary;
    assert_eq!(s.correct, 7);
    assert_eq!(s.groups_correct, 1);
    assert_eq!(report.wrong.len(), 1);

    let wrong = &report.wrong[0];
    let key = wrong.question.special_list.clone().unwrap();
    let lost = if key == GroupKey::Integer(1) { 3 } else { 2 };
    assert_eq!(s.total_score, 10 - lost);

    // The saved presentation matches what the console showed.
    assert_eq!(wrong.presented_choices, console.shown_choices[4]);
    assert_ne!(serde_json::Value::from(wrong.user_choice.as_str()), wrong.correct_answer);
}

#[test]
fn quitting_before_group_completes_voids_it() {
    let plans = [
        Plan::Right,
        Plan::Right,
        Plan::Right,
        Plan::Right,
        Plan::Right,
        Plan::Quit,
    ];
    let (report, console) = run(8, &plans);
    let s = report.summary;
    assert!(report.ended_early);
    assert_eq!(s.answered, 5);
    assert_eq!(s.groups_correct, 0);
    assert_eq!(s.total_score, 5);
    assert_eq!(s.total_possible, 10);
    assert!(console.events.contains(&SessionEvent::EndedEarly));
}

#[test]
fn same_seed_same_presentation() {
    let (_, a) = run(42, &[Plan::Skip; 8]);
    let (_, b) = run(42, &[Plan::Skip; 8]);
    assert_eq!(a.headers, b.headers);
    assert_eq!(a.shown_choices, b.shown_choices);
}

#[test]
fn presented_choices_are_a_permutation() {
    let questions = bank();
    let (_, console) = run(17, &[Plan::Skip; 8]);
    for shown in &console.shown_choices {
        let original = questions
            .iter()
            .find(|q| {
                let mut a = q.choices.clone();
                let mut b = shown.clone();
                a.sort();
                b.sort();
                a == b
            })
            .map(|q| q.choices.len());
        assert_eq!(original, Some(shown.len()));
    }
}

#[test]
fn quitting_and_skipping_the_rest_finalize_the_same() {
    let answered = [Plan::Right, Plan::Wrong, Plan::Right, Plan::Right, Plan::Right];
    let mut quit = answered.to_vec();
    quit.push(Plan::Quit);
    let mut finish = answered.to_vec();
    finish.extend([Plan::Skip; 3]);

    let (quit_report, _) = run(21, &quit);
    let (finish_report, _) = run(21, &finish);
    assert!(quit_report.ended_early);
    assert!(!finish_report.ended_early);
    assert_eq!(quit_report.summary, finish_report.summary);
    assert_eq!(quit_report.wrong.len(), finish_report.wrong.len());
}
