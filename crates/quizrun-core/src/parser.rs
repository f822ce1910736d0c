//! JSON question bank loader.
//!
//! Loads question banks from JSON files and validates them.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;
use crate::model::{GroupKey, Question, Section};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Load a question bank from a JSON file.
pub fn load_question_bank(path: &Path) -> Result<Vec<Question>, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_question_bank_bytes(&bytes, path)
}

/// Decode raw file bytes into questions.
///
/// Tries UTF-8 (with or without a BOM), then CP949, the Windows superset
/// of EUC-KR that older Korean banks are saved in.
pub fn parse_question_bank_bytes(bytes: &[u8], source_path: &Path) -> Result<Vec<Question>, LoadError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Ok(content) = std::str::from_utf8(bytes) {
        return parse_question_bank_str(content, source_path);
    }

    let content = encoding_rs::EUC_KR
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| LoadError::Encoding {
            path: source_path.to_path_buf(),
        })?;
    tracing::debug!(path = %source_path.display(), "decoded question bank as CP949");
    parse_question_bank_str(&content, source_path)
}

/// Parse a JSON string into questions (useful for testing).
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<Vec<Question>, LoadError> {
    let json_err = |source| LoadError::Json {
        path: source_path.to_path_buf(),
        source,
    };

    let value: Value = serde_json::from_str(content).map_err(json_err)?;
    let Value::Array(items) = value else {
        return Err(LoadError::NotAList {
            path: source_path.to_path_buf(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(LoadError::NotAnObject {
                    path: source_path.to_path_buf(),
                    index: index + 1,
                });
            }
            serde_json::from_value(item).map_err(json_err)
        })
        .collect()
}

/// A warning from question bank validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// 1-based position in the bank (if applicable).
    pub index: Option<usize>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn at(index: usize, message: impl Into<String>) -> Self {
        Self {
            index: Some(index + 1),
            message: message.into(),
        }
    }
}

/// Number of questions per recognized section, in `order`, plus the count
/// of unrecognized ones.
pub fn section_counts(questions: &[Question], order: &[Section]) -> (Vec<(Section, usize)>, usize) {
    let mut counts: Vec<(Section, usize)> = order.iter().map(|s| (*s, 0)).collect();
    let mut unknown = 0;
    for q in questions {
        match q
            .section_kind()
            .and_then(|sec| counts.iter_mut().find(|(s, _)| *s == sec))
        {
            Some((_, n)) => *n += 1,
            None => unknown += 1,
        }
    }
    (counts, unknown)
}

/// Validate a question bank for common data problems.
pub fn validate_question_bank(questions: &[Question], order: &[Section]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (i, q) in questions.iter().enumerate() {
        let in_order = q.section_kind().is_some_and(|sec| order.contains(&sec));
        if !in_order {
            let raw = q.section.as_deref().unwrap_or("");
            warnings.push(ValidationWarning::at(
                i,
                format!("unknown section '{raw}'; question will be skipped"),
            ));
        }

        if q.text().is_empty() {
            warnings.push(ValidationWarning::at(i, "question text is empty"));
        }
        if q.choices.is_empty() {
            warnings.push(ValidationWarning::at(i, "choice list is empty"));
        }

        match &q.answer {
            None => warnings.push(ValidationWarning::at(i, "answer is missing")),
            Some(answer) => {
                let matches = q.choices.iter().filter(|c| *c == answer).count();
                if matches == 0 && !q.choices.is_empty() {
                    warnings.push(ValidationWarning::at(
                        i,
                        format!("answer '{answer}' does not match any choice"),
                    ));
                } else if matches > 1 {
                    warnings.push(ValidationWarning::at(
                        i,
                        format!("answer '{answer}' appears {matches} times; every copy counts as correct"),
                    ));
                }
            }
        }
    }

    // Diverging point values inside a group
    let mut first_points: HashMap<&GroupKey, (usize, u32)> = HashMap::new();
    for (i, q) in questions.iter().enumerate() {
        let Some(key) = &q.special_list else {
            continue;
        };
        let points = q.points();
        match first_points.get(key) {
            Some(&(first_index, first)) if first != points => {
                warnings.push(ValidationWarning::at(
                    i,
                    format!(
                        "group '{key}' is worth {first} (question #{}); this member's value {points} is ignored",
                        first_index + 1
                    ),
                ));
            }
            Some(_) => {}
            None => {
                first_points.insert(key, (i, points));
            }
        }
    }

    warnings
}
