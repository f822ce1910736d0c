//! The `quizrun init` command.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

pub fn execute() -> Result<ExitCode> {
    write_if_missing(Path::new("quizrun.toml"), SAMPLE_CONFIG)?;

    let bank_path = Path::new("question/select_test.json");
    std::fs::create_dir_all("question").context("failed to create question/")?;
    write_if_missing(bank_path, SAMPLE_BANK)?;

    println!("\nNext steps:");
    println!("  1. Add your questions to question/select_test.json");
    println!("  2. Run: quizrun validate");
    println!("  3. Run: quizrun run --seed 42");

    Ok(ExitCode::SUCCESS)
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrun configuration

question_file = "question/select_test.json"
wrong_out = "review_note/wrong_questions.json"
review_dir = "review_note"
section_order = ["vocabulary", "grammar", "reading"]

# seed = 42
# limit = 10
shuffle = true
show_answer = false
show_explanation = false
"#;

const SAMPLE_BANK: &str = r#"[
  {
    "question": "Choose the word closest in meaning to 'rapid'.",
    "choice": ["quick", "heavy", "quiet", "late"],
    "answer": "quick",
    "section": "vocabulary",
    "answer_ko": "rapid = quick"
  },
  {
    "question": "She ___ to the office every day.",
    "choice": ["go", "goes", "going", "gone"],
    "answer": "goes",
    "section": "grammar",
    "answer_ko": "Third person singular takes -s."
  },
  {
    "question": "According to the notice, when does the store open?",
    "choice": ["8 a.m.", "9 a.m.", "10 a.m.", "Noon"],
    "answer": "9 a.m.",
    "section": "reading",
    "page": 12,
    "special_list": 1,
    "score": 2
  },
  {
    "question": "What is offered to the first 50 customers?",
    "choice": ["A free bag", "A discount", "A coupon", "A gift card"],
    "answer": "A coupon",
    "section": "reading",
    "page": 12,
    "special_list": 1,
    "score": 2
  }
]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use quizrun_core::config::parse_config_str;
    use quizrun_core::parser::{parse_question_bank_str, validate_question_bank};

    #[test]
    fn sample_files_are_valid() {
        let config = parse_config_str(SAMPLE_CONFIG).unwrap();
        let bank = parse_question_bank_str(SAMPLE_BANK, Path::new("select_test.json")).unwrap();
        assert_eq!(bank.len(), 4);
        assert!(validate_question_bank(&bank, &config.section_order).is_empty());
    }
}
