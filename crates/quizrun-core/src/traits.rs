//! Collaborator traits for the session controller.
//!
//! The controller owns no I/O. A [`Console`] presents questions and reads
//! answers; a [`ReviewSink`] persists wrong questions once the session is
//! finalized. The CLI implements both for the terminal and the filesystem;
//! tests use in-memory versions.

use std::fmt;

use crate::model::WrongQuestion;
use crate::session::{QuestionView, SessionEvent};

// ---------------------------------------------------------------------------
// Console trait
// ---------------------------------------------------------------------------

/// Terminal-like request/response channel.
pub trait Console {
    /// Show a question header, its text, and lettered choices.
    fn show_question(&mut self, view: &QuestionView<'_>) -> anyhow::Result<()>;

    /// Block until a line of input arrives. `Ok(None)` means end of input.
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;

    /// Report feedback such as "Correct!" or "Skipped.".
    fn notify(&mut self, event: &SessionEvent) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Review sink trait
// ---------------------------------------------------------------------------

/// Durable storage for incorrectly answered questions.
pub trait ReviewSink {
    /// Persist the wrong questions of a finalized session. Called exactly
    /// once per session, even when the list is empty.
    fn save(&mut self, wrong: &[WrongQuestion]) -> anyhow::Result<ReviewReceipt>;
}

/// Where a review artifact was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewReceipt {
    /// Number of records written.
    pub count: usize,
    /// Human-readable location (usually a file path).
    pub location: String,
}

impl fmt::Display for ReviewReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Saved wrong questions: {} -> {}", self.count, self.location)
    }
}

/// Sink that keeps wrong questions in memory.
#[derive(Debug, Default)]
pub struct MemoryReviewSink {
    /// Every batch passed to `save`, in call order.
    pub saved: Vec<Vec<WrongQuestion>>,
}

impl ReviewSink for MemoryReviewSink {
    fn save(&mut self, wrong: &[WrongQuestion]) -> anyhow::Result<ReviewReceipt> {
        self.saved.push(wrong.to_vec());
        Ok(ReviewReceipt {
            count: wrong.len(),
            location: "memory".into(),
        })
    }
}
