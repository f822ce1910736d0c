//! Error types for loading question banks, scoring, and running sessions.
//!
//! Recoverable per-question conditions (malformed questions, missing
//! answers, invalid user input) are not errors: the session handles them
//! locally and counts them. Only the conditions below escape.

use std::path::PathBuf;

use thiserror::Error;

/// Failures that prevent a question bank from being used at all.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read question file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is neither UTF-8 nor CP949.
    #[error("question file {} is not valid UTF-8 or CP949", path.display())]
    Encoding { path: PathBuf },

    /// The file is not valid JSON.
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The top-level JSON value is not an array.
    #[error("Invalid JSON: expected a list of questions ({})", path.display())]
    NotAList { path: PathBuf },

    /// An element of the top-level array is not an object.
    #[error("Invalid JSON: question #{index} is not an object ({})", path.display())]
    NotAnObject { path: PathBuf, index: usize },
}

/// Misuse of the scoring engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoringError {
    /// The chosen index does not exist in the presented choice set.
    #[error("choice {index} is out of range for {len} presented choices")]
    ChoiceOutOfRange { index: usize, len: usize },

    /// The session was already finalized; its state is frozen.
    #[error("session is already finalized")]
    AlreadyFinalized,
}

/// Failures that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Nothing to present.
    #[error("No questions found.")]
    NoQuestions,

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    /// The console collaborator failed.
    #[error("console error: {0:#}")]
    Console(anyhow::Error),

    /// The review sink could not persist wrong questions.
    #[error("failed to save wrong questions: {0:#}")]
    Review(anyhow::Error),
}

impl SessionError {
    /// Returns `true` if the session never started.
    pub fn is_empty_session(&self) -> bool {
        matches!(self, SessionError::NoQuestions)
    }
}
