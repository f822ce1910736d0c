//! quizrun configuration.
//!
//! Paths and toggles the session is run with. Defaults live here, at the
//! boundary; the engine only sees the resolved values.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Section;

/// Top-level quizrun configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    /// Question bank to load.
    #[serde(default = "default_question_file")]
    pub question_file: PathBuf,
    /// Base path for wrong-question review files; a timestamp is appended.
    #[serde(default = "default_wrong_out")]
    pub wrong_out: PathBuf,
    /// Directory searched by `--review-latest`.
    #[serde(default = "default_review_dir")]
    pub review_dir: PathBuf,
    /// Section priority order. Sections not listed are skipped.
    #[serde(default = "default_section_order")]
    pub section_order: Vec<Section>,
    /// Seed for reproducible shuffles.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Max questions per section.
    #[serde(default)]
    pub limit: Option<usize>,
    /// Shuffle questions within each section.
    #[serde(default = "default_true")]
    pub shuffle: bool,
    /// Show the correct answer after each question.
    #[serde(default)]
    pub show_answer: bool,
    /// Show the explanation after each question.
    #[serde(default)]
    pub show_explanation: bool,
}

fn default_question_file() -> PathBuf {
    PathBuf::from("question").join("select_test.json")
}
fn default_wrong_out() -> PathBuf {
    PathBuf::from("review_note").join("wrong_questions.json")
}
fn default_review_dir() -> PathBuf {
    PathBuf::from("review_note")
}
fn default_section_order() -> Vec<Section> {
    Section::ORDER.to_vec()
}
fn default_true() -> bool {
    true
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_file: default_question_file(),
            wrong_out: default_wrong_out(),
            review_dir: default_review_dir(),
            section_order: default_section_order(),
            seed: None,
            limit: None,
            shuffle: true,
            show_answer: false,
            show_explanation: false,
        }
    }
}

impl QuizConfig {
    /// File-name prefix shared by review files (stem of `wrong_out`).
    pub fn review_prefix(&self) -> String {
        self.wrong_out
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "wrong_questions".to_string())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizrun.toml` in the current directory
/// 2. `~/.config/quizrun/config.toml`
pub fn load_config() -> Result<QuizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizrun.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    config.question_file = resolve_path(&config.question_file);
    config.wrong_out = resolve_path(&config.wrong_out);
    config.review_dir = resolve_path(&config.review_dir);

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<QuizConfig> {
    let config: QuizConfig = toml::from_str(content)?;
    anyhow::ensure!(
        !config.section_order.is_empty(),
        "section_order must list at least one section"
    );
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizrun"))
}
