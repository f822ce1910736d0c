//! Scoring engine.
//!
//! Two scoring regimes share one session:
//!
//! - **Independent** questions earn their own point value the moment they
//!   are answered correctly.
//! - **Grouped** questions (same `special_list`) earn nothing at answer time.
//!   The group's point value is awarded once, at finalize, and only if every
//!   member was answered and every answer was correct.

use std::collections::HashMap;

use crate::error::ScoringError;
use crate::model::{GroupKey, Question, WrongQuestion};
use crate::shuffle::PresentedChoices;
use crate::statistics::Summary;

/// How a question is scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    Independent,
    Grouped(GroupKey),
}

/// Classify a question by its group identifier.
pub fn classify(question: &Question) -> QuestionKind {
    match &question.special_list {
        Some(key) => QuestionKind::Grouped(key.clone()),
        None => QuestionKind::Independent,
    }
}

/// Running state of one scoring group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupState {
    /// Cleared by any incorrect, skipped, or unscorable member.
    pub all_correct: bool,
    /// Members answered so far, correct or not.
    pub answered: u32,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            all_correct: true,
            answered: 0,
        }
    }
}

/// Member counts and point values per group, fixed for the session.
#[derive(Debug, Clone, Default)]
pub struct GroupTable {
    /// Number of members per group.
    pub totals: HashMap<GroupKey, u32>,
    /// Point value per group; the first-seen member's value wins.
    pub points: HashMap<GroupKey, u32>,
}

impl GroupTable {
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut table = Self::default();
        for q in questions {
            let Some(key) = &q.special_list else {
                continue;
            };
            *table.totals.entry(key.clone()).or_insert(0) += 1;
            let points = q.points();
            match table.points.get(key) {
                Some(&first) if first != points => {
                    tracing::warn!(
                        group = %key,
                        first,
                        ignored = points,
                        "group members carry different point values; keeping the first"
                    );
                }
                Some(_) => {}
                None => {
                    table.points.insert(key.clone(), points);
                }
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Resolved group results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupOutcome {
    /// Points awarded across all fully-correct groups.
    pub points: u64,
    /// Number of fully-correct groups.
    pub groups_correct: usize,
}

/// Resolve group outcomes.
///
/// A group is awarded iff its `all_correct` flag survived and every member
/// was answered. Pure: calling it again on the same inputs gives the same
/// outcome.
pub fn finalize_groups(
    group_state: &HashMap<GroupKey, GroupState>,
    group_totals: &HashMap<GroupKey, u32>,
    group_points: &HashMap<GroupKey, u32>,
) -> GroupOutcome {
    let mut outcome = GroupOutcome::default();
    for (key, &total) in group_totals {
        let state = group_state.get(key).copied().unwrap_or(GroupState {
            all_correct: false,
            answered: 0,
        });
        if state.all_correct && state.answered == total {
            outcome.points += u64::from(group_points.get(key).copied().unwrap_or(0));
            outcome.groups_correct += 1;
        }
    }
    outcome
}

/// Total points available: every independent question's value plus each
/// distinct group's value once.
pub fn compute_possible(questions: &[Question]) -> u64 {
    let independent: u64 = questions
        .iter()
        .filter(|q| q.special_list.is_none())
        .map(|q| u64::from(q.points()))
        .sum();
    let groups: u64 = GroupTable::from_questions(questions)
        .points
        .values()
        .map(|&p| u64::from(p))
        .sum();
    independent + groups
}

/// Why a question was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The user entered an empty line.
    User,
    /// Empty text or no choices; never presented.
    Malformed,
}

/// Result of recording one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    /// Text of the chosen entry.
    pub chosen: String,
}

/// Session-wide score accumulator.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    groups: GroupTable,
    group_state: HashMap<GroupKey, GroupState>,
    answered: usize,
    correct: usize,
    independent_correct: usize,
    independent_total: usize,
    independent_score: u64,
    total_possible: u64,
    missing_answers: usize,
    wrong: Vec<WrongQuestion>,
    outcome: Option<GroupOutcome>,
}

impl ScoringEngine {
    /// Prepare scoring for the questions of one session.
    pub fn new(questions: &[Question]) -> Self {
        let groups = GroupTable::from_questions(questions);
        let group_state = groups
            .totals
            .keys()
            .map(|k| (k.clone(), GroupState::default()))
            .collect();
        Self {
            group_state,
            groups,
            answered: 0,
            correct: 0,
            independent_correct: 0,
            independent_total: questions.iter().filter(|q| q.special_list.is_none()).count(),
            independent_score: 0,
            total_possible: compute_possible(questions),
            missing_answers: 0,
            wrong: Vec::new(),
            outcome: None,
        }
    }

    /// Score the user's pick from the presented set.
    pub fn record_answer(
        &mut self,
        question: &Question,
        chosen_index: usize,
        presented: &PresentedChoices,
    ) -> Result<AnswerOutcome, ScoringError> {
        self.ensure_open()?;
        let chosen = presented
            .get(chosen_index)
            .ok_or(ScoringError::ChoiceOutOfRange {
                index: chosen_index,
                len: presented.len(),
            })?;

        self.answered += 1;
        let kind = classify(question);
        if chosen.is_correct {
            self.correct += 1;
            if kind == QuestionKind::Independent {
                self.independent_score += u64::from(question.points());
                self.independent_correct += 1;
            }
        } else {
            self.wrong
                .push(WrongQuestion::new(question, chosen.text.clone(), presented.texts()));
        }

        if let QuestionKind::Grouped(key) = kind {
            let state = self.group_state.entry(key).or_default();
            state.answered += 1;
            if !chosen.is_correct {
                state.all_correct = false;
            }
        }

        Ok(AnswerOutcome {
            is_correct: chosen.is_correct,
            chosen: chosen.text.clone(),
        })
    }

    /// Record a question that was not answered.
    pub fn record_skip(&mut self, question: &Question, reason: SkipReason) -> Result<(), ScoringError> {
        self.ensure_open()?;
        tracing::debug!(?reason, "question skipped");
        self.clear_group(question);
        Ok(())
    }

    /// Record that `question` has no choice matching its stored answer.
    ///
    /// Call once per presented question; it can still be answered, but
    /// never correctly.
    pub fn record_missing_answer(&mut self, question: &Question) -> Result<(), ScoringError> {
        self.ensure_open()?;
        self.missing_answers += 1;
        tracing::warn!(question = question.text(), "no choice matches the stored answer");
        self.clear_group(question);
        Ok(())
    }

    /// Resolve group outcomes and freeze the session.
    ///
    /// The first call resolves the groups; later calls return the same
    /// summary without changing anything.
    pub fn finalize(&mut self) -> Summary {
        let outcome = match self.outcome {
            Some(outcome) => outcome,
            None => {
                let outcome =
                    finalize_groups(&self.group_state, &self.groups.totals, &self.groups.points);
                tracing::debug!(
                    points = outcome.points,
                    groups_correct = outcome.groups_correct,
                    "groups finalized"
                );
                self.outcome = Some(outcome);
                outcome
            }
        };
        self.summary_with(outcome)
    }

    pub fn is_finalized(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn total_possible(&self) -> u64 {
        self.total_possible
    }

    pub fn missing_answers(&self) -> usize {
        self.missing_answers
    }

    pub fn group_state(&self, key: &GroupKey) -> Option<GroupState> {
        self.group_state.get(key).copied()
    }

    pub fn wrong_questions(&self) -> &[WrongQuestion] {
        &self.wrong
    }

    pub fn into_wrong_questions(self) -> Vec<WrongQuestion> {
        self.wrong
    }

    fn summary_with(&self, outcome: GroupOutcome) -> Summary {
        Summary {
            answered: self.answered,
            correct: self.correct,
            independent_correct: self.independent_correct,
            independent_total: self.independent_total,
            groups_correct: outcome.groups_correct,
            groups_total: self.groups.len(),
            total_score: self.independent_score + outcome.points,
            total_possible: self.total_possible,
            missing_answers: self.missing_answers,
        }
    }

    fn clear_group(&mut self, question: &Question) {
        if let QuestionKind::Grouped(key) = classify(question) {
            self.group_state.entry(key).or_default().all_correct = false;
        }
    }

    fn ensure_open(&self) -> Result<(), ScoringError> {
        if self.outcome.is_some() {
            return Err(ScoringError::AlreadyFinalized);
        }
        Ok(())
    }
}
