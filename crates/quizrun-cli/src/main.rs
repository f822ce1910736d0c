//! quizrun CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;
mod console;

#[derive(Parser)]
#[command(
    name = "quizrun",
    version,
    about = "Interactive multiple-choice quiz runner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a quiz
    Run {
        /// Question JSON file path
        #[arg(long)]
        file: Option<PathBuf>,

        /// Random seed for shuffling questions and choices
        #[arg(long)]
        seed: Option<u64>,

        /// Show the correct answer after each question
        #[arg(long)]
        show_answer: bool,

        /// Show the explanation (answer_ko) after each question
        #[arg(long)]
        show_explanation: bool,

        /// Limit questions per section (applied in section order)
        #[arg(long)]
        limit: Option<usize>,

        /// Output JSON path for wrong questions (a timestamp is appended)
        #[arg(long)]
        wrong_out: Option<PathBuf>,

        /// Keep bank order instead of shuffling within each section
        #[arg(long)]
        no_shuffle: bool,

        /// Quiz on a review file instead of the question bank
        #[arg(long, conflicts_with = "review_latest")]
        review_file: Option<PathBuf>,

        /// Quiz on the most recent review file
        #[arg(long)]
        review_latest: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a question bank for data problems
    Validate {
        /// Question JSON file path
        #[arg(long)]
        file: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and sample question bank
    Init,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizrun=warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            file,
            seed,
            show_answer,
            show_explanation,
            limit,
            wrong_out,
            no_shuffle,
            review_file,
            review_latest,
            config,
        } => commands::run::execute(commands::run::RunArgs {
            file,
            seed,
            show_answer,
            show_explanation,
            limit,
            wrong_out,
            no_shuffle,
            review_file,
            review_latest,
            config,
        }),
        Commands::Validate { file, config } => commands::validate::execute(file, config),
        Commands::Init => commands::init::execute(),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
