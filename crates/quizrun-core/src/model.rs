//! Core data model types for quizrun.
//!
//! Question records come from hand-edited JSON banks, so every optional
//! field is decoded leniently: a wrong type degrades to `None` (or an empty
//! list) instead of rejecting the whole bank. Fields the model does not
//! know about are kept in [`Question::extra`] and written back verbatim.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A single multiple-choice question as stored in a question bank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    /// The question text.
    pub question: Option<String>,
    /// Answer choices in their stored order (the `choice` field).
    pub choices: Vec<String>,
    /// The correct answer, by value. Must equal one of `choices`.
    pub answer: Option<String>,
    /// Raw section tag (see [`Section::parse_tag`]).
    pub section: Option<String>,
    pub unit: Option<Tag>,
    pub question_num: Option<Tag>,
    pub page: Option<Tag>,
    /// Scoring group. Questions sharing a key are scored all-or-nothing.
    pub special_list: Option<GroupKey>,
    /// Raw point value; see [`Question::points`].
    pub score: Option<Value>,
    /// Explanation shown after answering.
    pub answer_ko: Option<String>,
    /// Fields not modelled above, preserved for review output.
    pub extra: Map<String, Value>,
    /// Stored values of modelled fields whose decoded form lost
    /// information (e.g. a numeric `answer`). Written back in place of
    /// the decoded value.
    pub originals: Map<String, Value>,
}

/// On-disk shape of a question record.
#[derive(Serialize, Deserialize)]
struct QuestionRecord {
    #[serde(default)]
    question: Value,
    #[serde(default)]
    choice: Value,
    #[serde(default)]
    answer: Value,
    #[serde(default)]
    section: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    question_num: Option<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    page: Option<Tag>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    special_list: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<Value>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    answer_ko: Value,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        let mut originals = Map::new();
        let mut decode = |key: &str, raw: Value, decoded: Value| {
            if !raw.is_null() && raw != decoded {
                originals.insert(key.to_string(), raw);
            }
        };

        let question = lenient_text(&record.question);
        decode("question", record.question, opt_text(&question));
        let choices = lenient_choices(&record.choice);
        decode("choice", record.choice, text_list(&choices));
        let answer = strict_text(&record.answer);
        decode("answer", record.answer, opt_text(&answer));
        let section = lenient_text(&record.section);
        decode("section", record.section, opt_text(&section));
        let special_list = GroupKey::from_value(&record.special_list);
        let encoded_key = special_list.as_ref().map_or(Value::Null, GroupKey::to_value);
        decode("special_list", record.special_list, encoded_key);
        let answer_ko = lenient_text(&record.answer_ko);
        decode("answer_ko", record.answer_ko, opt_text(&answer_ko));

        Self {
            question,
            choices,
            answer,
            section,
            unit: record.unit,
            question_num: record.question_num,
            page: record.page,
            special_list,
            score: record.score,
            answer_ko,
            extra: record.extra,
            originals,
        }
    }
}

impl From<Question> for QuestionRecord {
    fn from(q: Question) -> Self {
        let mut originals = q.originals;
        let mut field = |key: &str, decoded: Value| originals.remove(key).unwrap_or(decoded);
        Self {
            question: field("question", opt_text(&q.question)),
            choice: field("choice", text_list(&q.choices)),
            answer: field("answer", opt_text(&q.answer)),
            section: field("section", opt_text(&q.section)),
            unit: q.unit,
            question_num: q.question_num,
            page: q.page,
            special_list: field(
                "special_list",
                q.special_list.as_ref().map_or(Value::Null, GroupKey::to_value),
            ),
            score: q.score,
            answer_ko: field("answer_ko", opt_text(&q.answer_ko)),
            extra: q.extra,
        }
    }
}

impl Question {
    /// Trimmed question text, empty when absent.
    pub fn text(&self) -> &str {
        self.question.as_deref().map(str::trim).unwrap_or("")
    }

    /// Malformed questions are never presented.
    pub fn is_malformed(&self) -> bool {
        self.text().is_empty() || self.choices.is_empty()
    }

    /// Normalized section tag: trimmed and lowercased, empty when absent.
    pub fn normalized_section(&self) -> String {
        normalize_section(self.section.as_deref())
    }

    /// The recognized section of this question, if any.
    pub fn section_kind(&self) -> Option<Section> {
        self.normalized_section().parse().ok()
    }

    /// Point value of this question (or of its group, when it is the
    /// first-seen member).
    ///
    /// Positive integers, floats truncated toward zero, and strings holding
    /// a positive integer are honored. Everything else, including zero and
    /// negative values, falls back to 1.
    pub fn points(&self) -> u32 {
        let parsed = match &self.score {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        match parsed {
            Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
            _ => 1,
        }
    }

    /// The stored `answer` value exactly as it appeared in the record.
    pub fn answer_value(&self) -> Value {
        self.originals
            .get("answer")
            .cloned()
            .unwrap_or_else(|| opt_text(&self.answer))
    }

    /// Whether any stored choice equals the stored answer.
    pub fn has_matching_answer(&self) -> bool {
        self.answer
            .as_ref()
            .is_some_and(|a| self.choices.iter().any(|c| c == a))
    }
}

/// Normalize a raw section tag for matching.
pub fn normalize_section(section: Option<&str>) -> String {
    section.map(|s| s.trim().to_lowercase()).unwrap_or_default()
}

/// The recognized top-level sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Vocabulary,
    Grammar,
    Reading,
}

impl Section {
    /// Default processing order.
    pub const ORDER: [Section; 3] = [Section::Vocabulary, Section::Grammar, Section::Reading];

    /// Parse a raw, un-normalized tag.
    pub fn parse_tag(raw: Option<&str>) -> Option<Section> {
        normalize_section(raw).parse().ok()
    }

    /// Capitalized label used in question headers.
    pub fn label(&self) -> &'static str {
        match self {
            Section::Vocabulary => "Vocabulary",
            Section::Grammar => "Grammar",
            Section::Reading => "Reading",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Vocabulary => write!(f, "vocabulary"),
            Section::Grammar => write!(f, "grammar"),
            Section::Reading => write!(f, "reading"),
        }
    }
}

impl FromStr for Section {
    type Err = String;

    /// Exact match on an already-normalized tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vocabulary" => Ok(Section::Vocabulary),
            "grammar" => Ok(Section::Grammar),
            "reading" => Ok(Section::Reading),
            other => Err(format!("unknown section: {other}")),
        }
    }
}

/// Identifier linking questions into one all-or-nothing scoring group.
///
/// Only equality matters. Whole numbers and booleans share the integer
/// key space (`1`, `1.0` and `true` are one group); strings never equal
/// numbers, so `"1"` and `1` are distinct groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Integer(i64),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Integer(n) => write!(f, "{n}"),
            GroupKey::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            GroupKey::Integer(n) => serializer.serialize_i64(*n),
            GroupKey::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for GroupKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        GroupKey::from_value(&value).ok_or_else(|| D::Error::custom("group key is null"))
    }
}

impl GroupKey {
    /// Decode a raw `special_list` value; `null` means no group.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Null => return None,
            Value::String(s) => GroupKey::Text(s.clone()),
            Value::Bool(b) => GroupKey::Integer(i64::from(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => GroupKey::Integer(i),
                None => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => GroupKey::Integer(f as i64),
                    _ => GroupKey::Text(n.to_string()),
                },
            },
            other => GroupKey::Text(other.to_string()),
        })
    }

    fn to_value(&self) -> Value {
        match self {
            GroupKey::Integer(n) => Value::from(*n),
            GroupKey::Text(s) => Value::String(s.clone()),
        }
    }
}

/// Display-only metadata value (unit, question number, page).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tag {
    Integer(i64),
    Text(String),
    Other(Value),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Integer(n) => write!(f, "{n}"),
            Tag::Text(s) => write!(f, "{s}"),
            Tag::Other(v) => write!(f, "{v}"),
        }
    }
}

/// An incorrectly answered question, as written to the review file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrongQuestion {
    #[serde(flatten)]
    pub question: Question,
    /// Text of the choice the user picked.
    pub user_choice: String,
    /// The stored `answer` value as it appeared in the record (`null` when
    /// absent).
    pub correct_answer: Value,
    /// Choice texts in the order they were shown.
    pub presented_choices: Vec<String>,
}

impl WrongQuestion {
    /// Names of the fields added on top of the original record.
    pub const REVIEW_FIELDS: [&'static str; 3] =
        ["user_choice", "correct_answer", "presented_choices"];

    pub fn new(
        question: &Question,
        user_choice: impl Into<String>,
        presented_choices: Vec<String>,
    ) -> Self {
        let mut question = question.clone();
        // A replayed review record already carries these; drop the stale copies
        // so the flattened output has no duplicate keys.
        for field in Self::REVIEW_FIELDS {
            question.extra.remove(field);
        }
        let correct_answer = question.answer_value();
        Self {
            question,
            user_choice: user_choice.into(),
            correct_answer,
            presented_choices,
        }
    }
}

/// Strings pass through, null is `None`, other scalars are rendered to text.
fn lenient_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Array(_) | Value::Object(_) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Only strings are accepted; anything else counts as absent.
fn strict_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn lenient_choices(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn opt_text(text: &Option<String>) -> Value {
    text.clone().map_or(Value::Null, Value::String)
}

fn text_list(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}
