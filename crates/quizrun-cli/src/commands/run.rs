//! The `quizrun run` command.

use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};

use quizrun_core::classifier::{classify_sections, count_question_types, limit_per_section};
use quizrun_core::config::{load_config_from, QuizConfig};
use quizrun_core::parser::load_question_bank;
use quizrun_core::session::{QuizSession, SessionOptions};
use quizrun_core::shuffle::Shuffler;
use quizrun_report::JsonReviewSink;

use crate::console::TerminalConsole;

/// Flags accepted by `quizrun run`.
pub struct RunArgs {
    pub file: Option<PathBuf>,
    pub seed: Option<u64>,
    pub show_answer: bool,
    pub show_explanation: bool,
    pub limit: Option<usize>,
    pub wrong_out: Option<PathBuf>,
    pub no_shuffle: bool,
    pub review_file: Option<PathBuf>,
    pub review_latest: bool,
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// Command-line flags take precedence over the config file.
    fn apply_to(&self, config: &mut QuizConfig) {
        if let Some(file) = &self.file {
            config.question_file = file.clone();
        }
        if let Some(out) = &self.wrong_out {
            config.wrong_out = out.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
        config.shuffle &= !self.no_shuffle;
        config.show_answer |= self.show_answer;
        config.show_explanation |= self.show_explanation;
    }
}

pub fn execute(args: RunArgs) -> Result<ExitCode> {
    let mut config = load_config_from(args.config.as_deref())?;
    args.apply_to(&mut config);

    let source = if let Some(path) = &args.review_file {
        path.clone()
    } else if args.review_latest {
        match quizrun_report::find_latest_review_file(&config.review_dir, &config.review_prefix())? {
            Some(path) => {
                println!("Using review file: {}", path.display());
                path
            }
            None => {
                eprintln!("No review_note JSON files found.");
                return Ok(ExitCode::FAILURE);
            }
        }
    } else {
        config.question_file.clone()
    };

    if !source.exists() {
        anyhow::bail!("File not found: {}", source.display());
    }

    let bank = load_question_bank(&source)?;
    tracing::debug!(path = %source.display(), questions = bank.len(), "loaded question bank");

    let order = config.section_order.clone();
    let classified = classify_sections(bank, &order);
    if !classified.unrecognized.is_empty() {
        println!(
            "Note: {} question(s) had unknown sections and were skipped.",
            classified.unrecognized.len()
        );
    }

    let mut selected = classified.recognized;
    if let Some(limit) = config.limit {
        selected = limit_per_section(selected, &order, limit);
    }

    let mut shuffler = Shuffler::new(config.seed);
    if config.shuffle {
        selected = shuffler.shuffle_within_sections(selected, &order);
    }

    let (independent, groups) = count_question_types(&selected);
    println!("Independent questions: {independent}");
    println!("Groups (special_list): {groups}");

    let options = SessionOptions {
        show_answer: config.show_answer,
        show_explanation: config.show_explanation,
    };
    let session = match QuizSession::new(selected, options) {
        Ok(session) => session,
        Err(e) if e.is_empty_session() => {
            println!("{e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let stdin = io::stdin();
    let mut console = TerminalConsole::new(stdin.lock(), BufWriter::new(io::stdout()));
    let mut sink = JsonReviewSink::new(&config.wrong_out);
    let report = session
        .run(&mut shuffler, &mut console, &mut sink)
        .context("quiz session failed")?;
    drop(console);

    println!();
    println!("{}", report.summary);
    match report.review {
        Ok(receipt) => {
            println!("{receipt}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> RunArgs {
        RunArgs {
            file: None,
            seed: None,
            show_answer: false,
            show_explanation: false,
            limit: None,
            wrong_out: None,
            no_shuffle: false,
            review_file: None,
            review_latest: false,
            config: None,
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config = QuizConfig {
            seed: Some(1),
            limit: Some(3),
            ..QuizConfig::default()
        };
        let run = RunArgs {
            file: Some("bank.json".into()),
            seed: Some(9),
            no_shuffle: true,
            show_answer: true,
            ..args()
        };
        run.apply_to(&mut config);

        assert_eq!(config.question_file, PathBuf::from("bank.json"));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.limit, Some(3));
        assert!(!config.shuffle);
        assert!(config.show_answer);
        assert!(!config.show_explanation);
    }

    #[test]
    fn absent_flags_keep_config_values() {
        let mut config = QuizConfig {
            shuffle: false,
            show_explanation: true,
            ..QuizConfig::default()
        };
        let before = config.clone();
        args().apply_to(&mut config);
        assert_eq!(config, before);
    }
}
