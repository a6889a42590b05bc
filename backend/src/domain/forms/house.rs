//! House form model.
//!
//! Carries the house name plus two index-aligned arrays: candidate roommate
//! identifiers (`roommates[]`) and their display labels
//! (`roommates_labels[]`). Identifiers that do not parse as UUIDs are dropped
//! from both arrays at the same index rather than failing the whole
//! submission.

use serde_json::json;
use uuid::Uuid;

use super::text_rules::{check_text, TextRules};
use super::{pair_value, pair_values, Form, FormState, Validator};
use crate::domain::messages::{Message, MessageKey};

const NAME_RULES: TextRules = TextRules {
    letters_allowed: true,
    digits_allowed: true,
    max_consecutive_spaces: None,
};

/// Bound fields for the house create/replace form.
#[derive(Debug, Clone, Default)]
pub struct HouseForm {
    /// Shared validation state.
    pub state: FormState,
    /// Target house for a replace; absent on create.
    pub house_id: Option<String>,
    /// House display name.
    pub name: String,
    /// Candidate roommate identifiers, index-aligned with the labels.
    pub roommate_keys: Vec<String>,
    /// Display labels (usernames) for the candidate roommates.
    pub roommate_labels: Vec<String>,
    /// Free-text roommate search input; never persisted.
    pub searched_user: String,
}

impl HouseForm {
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
            house_id: pair_value(pairs, "house_id").map(str::to_owned),
            name: pair_value(pairs, "name").unwrap_or_default().to_owned(),
            roommate_keys: pair_values(pairs, "roommates[]"),
            roommate_labels: pair_values(pairs, "roommates_labels[]"),
            searched_user: pair_value(pairs, "searched_user")
                .unwrap_or_default()
                .to_owned(),
        }
    }

    fn validate_name(&self) -> Vec<Message> {
        if self.name.is_empty() {
            return vec![Message::new(MessageKey::NameEmpty)];
        }

        let violations = check_text(&self.name, NAME_RULES);
        let mut msgs = Vec::new();
        if violations.has_charset_violation() {
            msgs.push(Message::new(MessageKey::OnlyLettersAndDigits));
        }
        if violations.spaces {
            msgs.push(Message::new(MessageKey::NoMultipleSpaces));
        }
        msgs
    }

    /// Parse the roommate identifiers, dropping invalid entries from both
    /// arrays at the same index.
    ///
    /// Returns whether anything was dropped plus the surviving UUIDs in
    /// submission order. When entries were dropped the form-level error is
    /// set so a re-render warns the user instead of losing data silently.
    pub fn filter_roommate_ids(&mut self) -> RoommateFilter {
        let mut dropped = false;
        let mut ids = Vec::with_capacity(self.roommate_keys.len());

        let mut i = 0;
        while i < self.roommate_keys.len() {
            match Uuid::parse_str(&self.roommate_keys[i]) {
                Ok(id) => {
                    ids.push(id);
                    i += 1;
                }
                Err(_) => {
                    dropped = true;
                    self.roommate_keys.remove(i);
                    if i < self.roommate_labels.len() {
                        self.roommate_labels.remove(i);
                    }
                }
            }
        }

        if dropped {
            self.state.error = Some(MessageKey::SomeRoommatesInvalid.as_str().to_owned());
        }

        RoommateFilter { dropped, ids }
    }

    /// Client-renderable view of the form.
    pub fn view(&self) -> serde_json::Value {
        json!({
            "house_id": self.house_id,
            "name": self.name,
            "roommates": self.roommate_keys,
            "roommates_labels": self.roommate_labels,
        })
    }
}

/// Outcome of [`HouseForm::filter_roommate_ids`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoommateFilter {
    /// True when at least one identifier failed to parse and was removed.
    pub dropped: bool,
    /// Surviving roommate UUIDs, in submission order.
    pub ids: Vec<Uuid>,
}

impl Form for HouseForm {
    fn validators(&self) -> Vec<Validator<'_>> {
        vec![Box::new(|| self.validate_name())]
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}
