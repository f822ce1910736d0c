//! Parsing of a single line of user input at the answer prompt.

/// What a line of input means for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInput {
    /// Zero-based index into the presented choices.
    Choice(usize),
    /// Empty (or blank) line.
    Skip,
    /// `q`, `quit`, or `exit`.
    Quit,
    /// Anything else; the prompt is repeated.
    Invalid,
}

/// Parse `raw` against a presented set of `option_count` choices.
///
/// Accepts, case-insensitively, a 1-based number or a single letter
/// (`a` = first choice) within range.
pub fn parse_answer(raw: &str, option_count: usize) -> UserInput {
    let raw = raw.trim().to_lowercase();
    if raw.is_empty() {
        return UserInput::Skip;
    }
    if matches!(raw.as_str(), "q" | "quit" | "exit") {
        return UserInput::Quit;
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return match raw.parse::<usize>() {
            Ok(n) if (1..=option_count).contains(&n) => UserInput::Choice(n - 1),
            _ => UserInput::Invalid,
        };
    }

    let mut chars = raw.chars();
    if let (Some(c @ 'a'..='z'), None) = (chars.next(), chars.next()) {
        let idx = (c as u8 - b'a') as usize;
        if idx < option_count {
            return UserInput::Choice(idx);
        }
    }

    UserInput::Invalid
}

/// The letter shown next to the choice at `index` (A, B, ...).
pub fn choice_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| (b'A' + i) as char)
        .unwrap_or('?')
}

/// Prompt text for a question with `option_count` choices.
pub fn prompt(option_count: usize) -> String {
    let last = choice_label(option_count.saturating_sub(1));
    format!("Your answer (A-{last} / 1-{option_count}, Enter=skip, Q=quit): ")
}
