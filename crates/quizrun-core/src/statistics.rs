//! Session summary statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Final tallies of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Questions answered (skips excluded).
    pub answered: usize,
    /// Correct answers, independent and grouped.
    pub correct: usize,
    /// Correct independent questions.
    pub independent_correct: usize,
    /// Independent questions in the session.
    pub independent_total: usize,
    /// Groups awarded at finalize.
    pub groups_correct: usize,
    /// Distinct groups in the session.
    pub groups_total: usize,
    pub total_score: u64,
    pub total_possible: u64,
    /// Presented questions with no choice matching the stored answer.
    pub missing_answers: usize,
}

impl Summary {
    /// Percentage of answered questions that were correct; 0 when nothing
    /// was answered.
    pub fn accuracy(&self) -> f64 {
        percentage(self.correct as f64, self.answered as f64)
    }

    /// Percentage of possible points earned; 0 when nothing is possible.
    pub fn score_pct(&self) -> f64 {
        percentage(self.total_score as f64, self.total_possible as f64)
    }

    /// The trailing warning line, if any question lacked a matching answer.
    pub fn warning(&self) -> Option<String> {
        (self.missing_answers > 0).then(|| {
            format!(
                "Warning: {} question(s) had no matching answer.",
                self.missing_answers
            )
        })
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Answered: {}", self.answered)?;
        writeln!(f, "Correct: {}", self.correct)?;
        writeln!(f, "Accuracy: {:.1}%", self.accuracy())?;
        writeln!(
            f,
            "Independent correct: {}/{}",
            self.independent_correct, self.independent_total
        )?;
        writeln!(
            f,
            "Groups correct: {}/{}",
            self.groups_correct, self.groups_total
        )?;
        write!(
            f,
            "Score: {}/{} ({:.1}%)",
            self.total_score,
            self.total_possible,
            self.score_pct()
        )?;
        if let Some(warning) = self.warning() {
            write!(f, "\n{warning}")?;
        }
        Ok(())
    }
}
