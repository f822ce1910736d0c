//! Seedable randomization of question order and answer-choice order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::model::{Question, Section};

/// One shuffled choice with its correctness tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedChoice {
    pub text: String,
    pub is_correct: bool,
}

/// The shuffled choice list shown for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedChoices {
    pub entries: Vec<PresentedChoice>,
}

impl PresentedChoices {
    /// Tag each choice by string equality with `answer`.
    ///
    /// Every choice equal to the answer is marked correct; duplicates are
    /// not collapsed.
    pub fn tag(choices: &[String], answer: Option<&str>) -> Self {
        let entries = choices
            .iter()
            .map(|c| PresentedChoice {
                text: c.clone(),
                is_correct: answer.is_some_and(|a| a == c.as_str()),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PresentedChoice> {
        self.entries.get(index)
    }

    /// `false` when no entry is marked correct (missing or unmatched answer).
    pub fn has_answer(&self) -> bool {
        self.entries.iter().any(|e| e.is_correct)
    }

    /// Choice texts in presented order.
    pub fn texts(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text.clone()).collect()
    }

    /// Texts of every entry marked correct.
    pub fn correct_texts(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.is_correct)
            .map(|e| e.text.as_str())
            .collect()
    }
}

/// Random source shared by question and choice shuffling.
///
/// A single generator is used for both so a fixed seed reproduces the
/// whole session: question order first, then one choice shuffle per
/// presented question in presentation order.
pub struct Shuffler {
    rng: StdRng,
}

impl Shuffler {
    /// Seeded when `seed` is given, otherwise seeded from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    /// Shuffle questions within each section, never across sections.
    ///
    /// Questions whose section is not in `order` are dropped.
    pub fn shuffle_within_sections(
        &mut self,
        questions: Vec<Question>,
        order: &[Section],
    ) -> Vec<Question> {
        let mut by_section: Vec<Vec<Question>> = vec![Vec::new(); order.len()];
        for q in questions {
            if let Some(i) = q
                .section_kind()
                .and_then(|sec| order.iter().position(|s| *s == sec))
            {
                by_section[i].push(q);
            }
        }

        let mut shuffled = Vec::new();
        for mut items in by_section {
            items.shuffle(&mut self.rng);
            shuffled.extend(items);
        }
        shuffled
    }

    /// Shuffle the choices of `question` for presentation.
    pub fn present(&mut self, question: &Question) -> PresentedChoices {
        let mut presented = PresentedChoices::tag(&question.choices, question.answer.as_deref());
        presented.entries.shuffle(&mut self.rng);
        presented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str, section: &str, choices: &[&str], answer: Option<&str>) -> Question {
        Question {
            question: Some(text.into()),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            answer: answer.map(String::from),
            section: Some(section.into()),
            ..Default::default()
        }
    }

    fn bank() -> Vec<Question> {
        let mut out = Vec::new();
        for i in 0..6 {
            out.push(q(&format!("v{i}"), "vocabulary", &["a", "b", "c", "d"], Some("c")));
        }
        for i in 0..6 {
            out.push(q(&format!("g{i}"), "grammar", &["a", "b", "c", "d"], Some("a")));
        }
        out
    }

    #[test]
    fn same_seed_reproduces_order_and_choices() {
        let run = |seed| {
            let mut s = Shuffler::new(Some(seed));
            let qs = s.shuffle_within_sections(bank(), &Section::ORDER);
            let choices: Vec<_> = qs.iter().map(|q| s.present(q)).collect();
            (qs, choices)
        };
        let (qa, ca) = run(42);
        let (qb, cb) = run(42);
        assert_eq!(qa, qb);
        assert_eq!(ca, cb);
    }

    #[test]
    fn shuffle_never_crosses_sections() {
        let mut s = Shuffler::new(Some(7));
        let qs = s.shuffle_within_sections(bank(), &Section::ORDER);
        assert!(qs[..6].iter().all(|q| q.text().starts_with('v')));
        assert!(qs[6..].iter().all(|q| q.text().starts_with('g')));
    }

    #[test]
    fn presented_set_tracks_correct_position() {
        let mut s = Shuffler::new(Some(3));
        let question = q("x", "grammar", &["a", "b", "c", "d"], Some("c"));
        let presented = s.present(&question);
        assert_eq!(presented.len(), 4);
        assert_eq!(presented.correct_texts(), ["c"]);
        let pos = presented.entries.iter().position(|e| e.is_correct).unwrap();
        assert_eq!(presented.entries[pos].text, "c");
    }

    #[test]
    fn unmatched_answer_marks_nothing_correct() {
        let mut s = Shuffler::new(Some(1));
        let missing = s.present(&q("x", "grammar", &["a", "b"], None));
        let unmatched = s.present(&q("y", "grammar", &["a", "b"], Some("z")));
        assert!(!missing.has_answer());
        assert!(!unmatched.has_answer());
    }

    #[test]
    fn duplicate_answer_text_marks_every_copy() {
        let tagged = PresentedChoices::tag(&["a".into(), "b".into(), "a".into()], Some("a"));
        assert_eq!(tagged.correct_texts(), ["a", "a"]);
    }
}
