//! Note form model.

use serde_json::json;

use super::text_rules::{check_text, TextRules};
use super::{pair_value, Form, FormState, Validator};
use crate::domain::messages::{Message, MessageKey};

const TITLE_RULES: TextRules = TextRules {
    letters_allowed: true,
    digits_allowed: true,
    max_consecutive_spaces: Some(1),
};

/// Bound fields for the note create/update form.
#[derive(Debug, Clone, Default)]
pub struct NoteForm {
    /// Shared validation state.
    pub state: FormState,
    /// Note title.
    pub title: String,
    /// Note body; free text.
    pub content: String,
}

impl NoteForm {
    /// Empty form for the first GET render; validation suppressed.
    pub fn pristine() -> Self {
        Self {
            state: FormState::pristine(),
            ..Self::default()
        }
    }

    /// Bind from urlencoded pairs; the form counts as submitted.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            state: FormState::submitted(),
            title: pair_value(pairs, "title").unwrap_or_default().to_owned(),
            content: pair_value(pairs, "content").unwrap_or_default().to_owned(),
        }
    }

    fn validate_title(&self) -> Vec<Message> {
        if self.title.is_empty() {
            return vec![Message::new(MessageKey::NameEmpty)];
        }

        let violations = check_text(&self.title, TITLE_RULES);
        let mut msgs = Vec::new();
        if violations.has_charset_violation() {
            msgs.push(Message::new(MessageKey::OnlyLettersAndDigits));
        }
        if violations.spaces {
            msgs.push(Message::new(MessageKey::NoMultipleSpaces));
        }
        msgs
    }

    fn validate_content(&self) -> Vec<Message> {
        if self.content.is_empty() {
            vec![Message::new(MessageKey::ContentEmpty)]
        } else {
            Vec::new()
        }
    }

    /// Client-renderable view of the form.
    pub fn view(&self) -> serde_json::Value {
        json!({
            "title": self.title,
            "content": self.content,
        })
    }
}

impl Form for NoteForm {
    fn validators(&self) -> Vec<Validator<'_>> {
        vec![
            Box::new(|| self.validate_title()),
            Box::new(|| self.validate_content()),
        ]
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn submitted(title: &str, content: &str) -> NoteForm {
        NoteForm {
            state: FormState::submitted(),
            title: title.to_owned(),
            content: content.to_owned(),
        }
    }

    #[rstest]
    #[case("", &[MessageKey::NameEmpty])]
    #[case("Groceries week 32", &[])]
    #[case("Rent!", &[MessageKey::OnlyLettersAndDigits])]
    #[case("Rent  due", &[MessageKey::NoMultipleSpaces])]
    #[case("Rent!  now", &[MessageKey::OnlyLettersAndDigits, MessageKey::NoMultipleSpaces])]
    fn title_rules(#[case] title: &str, #[case] expected: &[MessageKey]) {
        let keys: Vec<MessageKey> = submitted(title, "body")
            .validate_title()
            .iter()
            .map(|m| m.key)
            .collect();
        assert_eq!(keys, expected, "title: {title:?}");
    }

    #[test]
    fn empty_content_fails_even_with_a_valid_title() {
        let mut form = submitted("Groceries", "");
        let (valid, msgs) = form.is_valid();
        assert!(!valid);
        assert_eq!(msgs, vec![Message::new(MessageKey::ContentEmpty)]);
    }

    #[test]
    fn content_accepts_arbitrary_text() {
        let mut form = submitted("Groceries", "milk!\n2x eggs — paid?");
        let (valid, msgs) = form.is_valid();
        assert!(valid, "unexpected messages: {msgs:?}");
    }
}
