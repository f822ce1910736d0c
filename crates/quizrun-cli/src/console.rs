//! Line-oriented terminal console.

use std::io::{BufRead, Write};

use anyhow::Result;

use quizrun_core::session::{QuestionView, SessionEvent};
use quizrun_core::traits::Console;

/// Reads answers from `input` and writes the quiz to `output`.
pub struct TerminalConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Console for TerminalConsole<R, W> {
    fn show_question(&mut self, view: &QuestionView<'_>) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{view}")?;
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // Keep the next message off the prompt line.
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn notify(&mut self, event: &SessionEvent) -> Result<()> {
        writeln!(self.output, "{event}")?;
        Ok(())
    }
}
