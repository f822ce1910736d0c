//! Session controller.
//!
//! Drives the present → answer → score loop one question at a time:
//!
//! ```text
//! Presenting(i) ──malformed──────────────────────────▶ Presenting(i+1)
//!      │
//!      ▼
//! AwaitingInput(i) ──invalid──▶ AwaitingInput(i)
//!      ├──choice / skip──────────────────────────────▶ Presenting(i+1)
//!      └──quit / end of input──▶ Quitting ──▶ Finalizing
//! Presenting(len) ──────────────────────────────────▶ Finalizing ──▶ Finalized
//! ```
//!
//! `Finalizing` resolves group scores and hands wrong questions to the
//! review sink. It is reached exactly once, whether the user quit or the
//! questions ran out. A sink failure is carried in the report next to the
//! summary; it never discards the session result.

use std::fmt;

use crate::error::SessionError;
use crate::input::{choice_label, parse_answer, prompt, UserInput};
use crate::model::{Question, Section, WrongQuestion};
use crate::scoring::{ScoringEngine, SkipReason};
use crate::shuffle::{PresentedChoices, Shuffler};
use crate::statistics::Summary;
use crate::traits::{Console, ReviewReceipt, ReviewSink};

/// Per-session presentation toggles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Show the correct answer text after each answered question.
    pub show_answer: bool,
    /// Show the explanation (`answer_ko`) after each answered question.
    pub show_explanation: bool,
}

/// Controller state. See the module docs for transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Presenting(usize),
    AwaitingInput(usize),
    Quitting,
    Finalizing,
    Finalized,
}

/// Feedback reported to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A question with empty text or no choices was skipped unpresented.
    MalformedSkipped { index: usize, total: usize },
    Correct,
    Incorrect,
    Skipped,
    InvalidInput,
    EndedEarly,
    /// Correct choice texts; empty when the data has no matching answer.
    Answer(Vec<String>),
    Explanation(String),
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEvent::MalformedSkipped { index, total } => {
                write!(f, "[{index}/{total}] Skipping empty question.")
            }
            SessionEvent::Correct => write!(f, "Correct!"),
            SessionEvent::Incorrect => write!(f, "Incorrect."),
            SessionEvent::Skipped => write!(f, "Skipped."),
            SessionEvent::InvalidInput => write!(f, "Invalid input. Try again."),
            SessionEvent::EndedEarly => write!(f, "Quiz ended early."),
            SessionEvent::Answer(texts) if texts.is_empty() => {
                write!(f, "Answer: (missing in data)")
            }
            SessionEvent::Answer(texts) => write!(f, "Answer: {}", texts.join(", ")),
            SessionEvent::Explanation(text) => write!(f, "Explanation: {text}"),
        }
    }
}

/// What the console shows for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView<'a> {
    pub header: String,
    pub text: &'a str,
    /// Choice texts in presented order.
    pub choices: Vec<&'a str>,
}

impl fmt::Display for QuestionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        write!(f, "{}", self.text)?;
        for (i, choice) in self.choices.iter().enumerate() {
            write!(f, "\n  {}. {choice}", choice_label(i))?;
        }
        Ok(())
    }
}

/// Header line: position, section label, and optional unit/question/page tags.
///
/// Reading questions also show the page.
pub fn format_header(question: &Question, index: usize, total: usize) -> String {
    let section = question.section_kind();
    let mut parts = vec![format!("[{index}/{total}]")];
    match section {
        Some(sec) => parts.push(sec.label().to_string()),
        None => {
            let label = capitalize(question.section.as_deref().unwrap_or("").trim());
            if !label.is_empty() {
                parts.push(label);
            }
        }
    }
    if let Some(unit) = &question.unit {
        parts.push(format!("Unit:{unit}"));
    }
    if let Some(qnum) = &question.question_num {
        parts.push(format!("Q:{qnum}"));
    }
    let mut header = parts.join(" ");
    if section == Some(Section::Reading) {
        if let Some(page) = &question.page {
            header.push_str(&format!(" (p.{page})"));
        }
    }
    header
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Outcome of a finished session.
#[derive(Debug)]
pub struct SessionReport {
    pub summary: Summary,
    /// `true` when the user quit before the last question.
    pub ended_early: bool,
    /// Where the wrong questions went, or why they could not be saved.
    pub review: Result<ReviewReceipt, SessionError>,
    pub wrong: Vec<WrongQuestion>,
}

/// One quiz session over an ordered list of questions.
pub struct QuizSession {
    questions: Vec<Question>,
    options: SessionOptions,
    scoring: ScoringEngine,
    state: SessionState,
    presented: Option<PresentedChoices>,
    ended_early: bool,
    summary: Option<Summary>,
    review: Option<Result<ReviewReceipt, SessionError>>,
}

impl QuizSession {
    /// Create a session. Fails when there is nothing to present.
    pub fn new(questions: Vec<Question>, options: SessionOptions) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        let scoring = ScoringEngine::new(&questions);
        Ok(Self {
            questions,
            options,
            scoring,
            state: SessionState::Presenting(0),
            presented: None,
            ended_early: false,
            summary: None,
            review: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Run until `Finalized`.
    pub fn run(
        mut self,
        shuffler: &mut Shuffler,
        console: &mut dyn Console,
        sink: &mut dyn ReviewSink,
    ) -> Result<SessionReport, SessionError> {
        tracing::info!(questions = self.questions.len(), "session started");
        while self.state != SessionState::Finalized {
            self.step(shuffler, console, sink)?;
        }

        let summary = self.summary.unwrap_or_else(|| self.scoring.finalize());
        let review = self.review.take().unwrap_or_else(|| {
            Err(SessionError::Review(anyhow::anyhow!(
                "session finalized without saving review"
            )))
        });
        tracing::info!(
            answered = summary.answered,
            correct = summary.correct,
            score = summary.total_score,
            possible = summary.total_possible,
            ended_early = self.ended_early,
            "session finished"
        );
        Ok(SessionReport {
            summary,
            ended_early: self.ended_early,
            review,
            wrong: self.scoring.into_wrong_questions(),
        })
    }

    /// Apply one transition.
    pub fn step(
        &mut self,
        shuffler: &mut Shuffler,
        console: &mut dyn Console,
        sink: &mut dyn ReviewSink,
    ) -> Result<SessionState, SessionError> {
        let next = match self.state {
            SessionState::Presenting(i) => self.present(i, shuffler, console)?,
            SessionState::AwaitingInput(i) => self.await_input(i, console)?,
            SessionState::Quitting => {
                self.ended_early = true;
                SessionState::Finalizing
            }
            SessionState::Finalizing => {
                let summary = self.scoring.finalize();
                self.summary = Some(summary);
                let review = sink
                    .save(self.scoring.wrong_questions())
                    .map_err(SessionError::Review);
                match &review {
                    Ok(receipt) => {
                        tracing::info!(count = receipt.count, location = %receipt.location, "review saved")
                    }
                    Err(e) => tracing::warn!(error = %e, "review not saved"),
                }
                self.review = Some(review);
                SessionState::Finalized
            }
            SessionState::Finalized => SessionState::Finalized,
        };
        tracing::debug!(from = ?self.state, to = ?next, "session transition");
        self.state = next;
        Ok(next)
    }

    fn present(
        &mut self,
        i: usize,
        shuffler: &mut Shuffler,
        console: &mut dyn Console,
    ) -> Result<SessionState, SessionError> {
        let total = self.questions.len();
        let Some(question) = self.questions.get(i) else {
            return Ok(SessionState::Finalizing);
        };

        if question.is_malformed() {
            tracing::warn!(index = i + 1, "skipping question with empty text or no choices");
            self.scoring.record_skip(question, SkipReason::Malformed)?;
            notify(console, &SessionEvent::MalformedSkipped { index: i + 1, total })?;
            return Ok(SessionState::Presenting(i + 1));
        }

        let presented = shuffler.present(question);
        if !presented.has_answer() {
            self.scoring.record_missing_answer(question)?;
        }

        let view = QuestionView {
            header: format_header(question, i + 1, total),
            text: question.text(),
            choices: presented.entries.iter().map(|e| e.text.as_str()).collect(),
        };
        console.show_question(&view).map_err(SessionError::Console)?;
        self.presented = Some(presented);
        Ok(SessionState::AwaitingInput(i))
    }

    fn await_input(&mut self, i: usize, console: &mut dyn Console) -> Result<SessionState, SessionError> {
        let Some(presented) = self.presented.as_ref() else {
            // Nothing on screen; present it again.
            return Ok(SessionState::Presenting(i));
        };
        let question = &self.questions[i];

        let line = console
            .read_line(&prompt(presented.len()))
            .map_err(SessionError::Console)?;
        let input = match line {
            Some(line) => parse_answer(&line, presented.len()),
            None => {
                tracing::debug!("end of input, quitting");
                UserInput::Quit
            }
        };

        let next = match input {
            UserInput::Invalid => {
                notify(console, &SessionEvent::InvalidInput)?;
                return Ok(SessionState::AwaitingInput(i));
            }
            UserInput::Quit => {
                notify(console, &SessionEvent::EndedEarly)?;
                SessionState::Quitting
            }
            UserInput::Skip => {
                notify(console, &SessionEvent::Skipped)?;
                self.scoring.record_skip(question, SkipReason::User)?;
                SessionState::Presenting(i + 1)
            }
            UserInput::Choice(idx) => {
                let outcome = self.scoring.record_answer(question, idx, presented)?;
                let event = if outcome.is_correct {
                    SessionEvent::Correct
                } else {
                    SessionEvent::Incorrect
                };
                notify(console, &event)?;
                if self.options.show_answer {
                    let texts = presented.correct_texts().into_iter().map(String::from).collect();
                    notify(console, &SessionEvent::Answer(texts))?;
                }
                if self.options.show_explanation {
                    if let Some(text) = question.answer_ko.as_deref().filter(|t| !t.is_empty()) {
                        notify(console, &SessionEvent::Explanation(text.to_string()))?;
                    }
                }
                SessionState::Presenting(i + 1)
            }
        };
        self.presented = None;
        Ok(next)
    }
}

fn notify(console: &mut dyn Console, event: &SessionEvent) -> Result<(), SessionError> {
    console.notify(event).map_err(SessionError::Console)
}
