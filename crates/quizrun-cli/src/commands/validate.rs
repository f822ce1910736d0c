//! The `quizrun validate` command.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;

use quizrun_core::classifier::{classify_sections, count_question_types};
use quizrun_core::config::load_config_from;
use quizrun_core::parser::{load_question_bank, section_counts, validate_question_bank};
use quizrun_core::scoring::compute_possible;

pub fn execute(file: Option<PathBuf>, config: Option<PathBuf>) -> Result<ExitCode> {
    let config = load_config_from(config.as_deref())?;
    let path = file.unwrap_or(config.question_file);
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }

    let bank = load_question_bank(&path)?;
    println!("Question bank: {} ({} questions)", path.display(), bank.len());

    let order = &config.section_order;
    let (counts, unknown) = section_counts(&bank, order);
    print_section_table(&counts, unknown);

    let warnings = validate_question_bank(&bank, order);

    let recognized = classify_sections(bank, order).recognized;
    let (independent, groups) = count_question_types(&recognized);
    println!("Independent questions: {independent}");
    println!("Groups (special_list): {groups}");
    println!("Total possible score: {}", compute_possible(&recognized));

    for w in &warnings {
        let prefix = w
            .index
            .map(|i| format!("  [#{i}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(ExitCode::SUCCESS)
}

fn print_section_table(counts: &[(quizrun_core::model::Section, usize)], unknown: usize) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Section", "Questions"]);
    for (section, n) in counts {
        table.add_row(vec![Cell::new(section.label()), Cell::new(n)]);
    }
    if unknown > 0 {
        table.add_row(vec![Cell::new("(skipped)"), Cell::new(unknown)]);
    }
    println!("{table}");
}
