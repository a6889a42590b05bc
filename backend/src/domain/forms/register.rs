//! Registration form model.
//!
//! Extends the login rules with a username and a password confirmation.

use serde_json::json;

use super::{pair_value, Form, FormState, LoginForm, Validator};
use crate::domain::messages::{Message, MessageKey};

/// Minimum accepted username length, in characters.
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Bound fields for the account-registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    /// Embedded login fields (state, email, password).
    pub login: LoginForm,
    /// Desired account username.
    pub username: String,
    /// Password typed a second time; must byte-equal the password.
    pub password_confirmation: String,
}

impl RegisterForm {
    /// Empty form for the first GET render; validation suppressed.
    pub fn pristine() -> Self {
        Self {
            login: LoginForm::pristine(),
            ..Self::default()
        }
    }

    /// Bind from urlencoded pairs; the form counts as submitted.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            login: LoginForm::from_pairs(pairs),
            username: pair_value(pairs, "username").unwrap_or_default().to_owned(),
            password_confirmation: pair_value(pairs, "password_2")
                .unwrap_or_default()
                .to_owned(),
        }
    }

    fn validate_username(&self) -> Vec<Message> {
        let mut msgs = Vec::new();

        if self.username != self.username.trim() {
            msgs.push(Message::new(MessageKey::UsernameSurroundingSpaces));
        }

        if self.username.chars().count() < MIN_USERNAME_LENGTH {
            msgs.push(Message::with_args(
                MessageKey::UsernameTooShort,
                vec![json!(MIN_USERNAME_LENGTH)],
            ));
        }

        msgs
    }

    fn validate_password_match(&self) -> Vec<Message> {
        if self.login.password == self.password_confirmation {
            Vec::new()
        } else {
            vec![Message::new(MessageKey::PasswordsMustMatch)]
        }
    }

    /// Client-renderable view of the form; omits both password fields.
    pub fn view(&self) -> serde_json::Value {
        json!({
            "email": self.login.email,
            "username": self.username,
        })
    }
}

impl Form for RegisterForm {
    fn validators(&self) -> Vec<Validator<'_>> {
        vec![
            Box::new(|| self.login.validate_email()),
            Box::new(|| self.login.validate_password()),
            Box::new(|| self.validate_username()),
            Box::new(|| self.validate_password_match()),
        ]
    }

    fn state(&self) -> &FormState {
        &self.login.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.login.state
    }
}
