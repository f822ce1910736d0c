//! Section classification.
//!
//! Splits a raw question sequence into recognized questions, stably grouped
//! by section priority, and the questions whose section matched nothing.

use crate::model::{Question, Section};

/// Output of [`classify_sections`].
#[derive(Debug, Clone, Default)]
pub struct Classified {
    /// Recognized questions, all of the first section before the second, etc.
    pub recognized: Vec<Question>,
    /// Questions with an unknown or missing section. Never presented.
    pub unrecognized: Vec<Question>,
}

/// Group questions by section in `order`, preserving relative order within
/// each section.
///
/// A section that is recognized but absent from `order` is treated as
/// unrecognized.
pub fn classify_sections(questions: Vec<Question>, order: &[Section]) -> Classified {
    let mut buckets: Vec<Vec<Question>> = vec![Vec::new(); order.len()];
    let mut unrecognized = Vec::new();

    for q in questions {
        let slot = q
            .section_kind()
            .and_then(|sec| order.iter().position(|s| *s == sec));
        match slot {
            Some(i) => buckets[i].push(q),
            None => unrecognized.push(q),
        }
    }

    if !unrecognized.is_empty() {
        tracing::warn!(
            count = unrecognized.len(),
            "questions with unknown sections will be skipped"
        );
    }

    Classified {
        recognized: buckets.into_iter().flatten().collect(),
        unrecognized,
    }
}

/// Keep at most `limit` questions of each section, in `order`.
///
/// Applied after grouping and before shuffling, so the kept questions are
/// the first ones of each section in bank order.
pub fn limit_per_section(questions: Vec<Question>, order: &[Section], limit: usize) -> Vec<Question> {
    let mut kept = vec![0usize; order.len()];
    let mut by_section: Vec<Vec<Question>> = vec![Vec::new(); order.len()];

    for q in questions {
        let Some(i) = q
            .section_kind()
            .and_then(|sec| order.iter().position(|s| *s == sec))
        else {
            continue;
        };
        if kept[i] < limit {
            kept[i] += 1;
            by_section[i].push(q);
        }
    }

    by_section.into_iter().flatten().collect()
}

/// Count independent questions and distinct groups.
pub fn count_question_types(questions: &[Question]) -> (usize, usize) {
    let mut independent = 0;
    let mut groups = std::collections::HashSet::new();
    for q in questions {
        match &q.special_list {
            Some(key) => {
                groups.insert(key);
            }
            None => independent += 1,
        }
    }
    (independent, groups.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GroupKey;

    fn q(text: &str, section: Option<&str>) -> Question {
        Question {
            question: Some(text.into()),
            choices: vec!["a".into()],
            section: section.map(String::from),
            ..Default::default()
        }
    }

    fn texts(qs: &[Question]) -> Vec<&str> {
        qs.iter().map(Question::text).collect()
    }

    #[test]
    fn groups_by_priority_and_keeps_relative_order() {
        let input = vec![
            q("r1", Some("reading")),
            q("g1", Some("Grammar")),
            q("v1", Some(" VOCABULARY ")),
            q("g2", Some("grammar")),
            q("r2", Some("Reading")),
            q("v2", Some("vocabulary")),
        ];
        let out = classify_sections(input, &Section::ORDER);
        assert_eq!(texts(&out.recognized), ["v1", "v2", "g1", "g2", "r1", "r2"]);
        assert!(out.unrecognized.is_empty());
    }

    #[test]
    fn unknown_and_missing_sections_are_diverted() {
        let input = vec![
            q("a", Some("listening")),
            q("b", None),
            q("c", Some("")),
            q("d", Some("grammar")),
        ];
        let out = classify_sections(input, &Section::ORDER);
        assert_eq!(texts(&out.recognized), ["d"]);
        assert_eq!(texts(&out.unrecognized), ["a", "b", "c"]);
    }

    #[test]
    fn sections_outside_custom_order_are_unrecognized() {
        let input = vec![q("v", Some("vocabulary")), q("r", Some("reading"))];
        let out = classify_sections(input, &[Section::Reading]);
        assert_eq!(texts(&out.recognized), ["r"]);
        assert_eq!(texts(&out.unrecognized), ["v"]);
    }

    #[test]
    fn limit_keeps_first_n_per_section() {
        let input = vec![
            q("v1", Some("vocabulary")),
            q("v2", Some("vocabulary")),
            q("v3", Some("vocabulary")),
            q("g1", Some("grammar")),
            q("r1", Some("reading")),
            q("r2", Some("reading")),
        ];
        let grouped = classify_sections(input, &Section::ORDER).recognized;
        let limited = limit_per_section(grouped.clone(), &Section::ORDER, 2);
        assert_eq!(texts(&limited), ["v1", "v2", "g1", "r1", "r2"]);
        assert!(limit_per_section(grouped, &Section::ORDER, 0).is_empty());
    }

    #[test]
    fn counts_independent_questions_and_distinct_groups() {
        let mut a = q("a", Some("reading"));
        a.special_list = Some(GroupKey::Text("g1".into()));
        let mut b = a.clone();
        b.question = Some("b".into());
        let mut c = q("c", Some("reading"));
        c.special_list = Some(GroupKey::Integer(2));
        let d = q("d", Some("grammar"));
        assert_eq!(count_question_types(&[a, b, c, d]), (1, 2));
    }
}
