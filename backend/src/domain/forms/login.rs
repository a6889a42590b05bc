//! Login form model.

use serde_json::json;

use super::{pair_value, Form, FormState, Validator};
use crate::domain::messages::{Message, MessageKey};

/// Minimum accepted password length, in bytes.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Symbols of which a password must contain at least one.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:',.<>?/`~";

/// Bound fields for the sign-in form.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    /// Shared validation state.
    pub state: FormState,
    /// Raw email field.
    pub email: String,
    /// Raw password field. Never serialised back to the client.
    pub password: String,
}

impl LoginForm {
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
            email: pair_value(pairs, "email").unwrap_or_default().to_owned(),
            password: pair_value(pairs, "password").unwrap_or_default().to_owned(),
        }
    }

    pub(super) fn validate_email(&self) -> Vec<Message> {
        if is_mail_address(&self.email) {
            Vec::new()
        } else {
            vec![Message::new(MessageKey::EmailInvalid)]
        }
    }

    pub(super) fn validate_password(&self) -> Vec<Message> {
        let mut msgs = Vec::new();

        if self.password.len() < MIN_PASSWORD_LENGTH {
            msgs.push(Message::with_args(
                MessageKey::PasswordTooShort,
                vec![json!(MIN_PASSWORD_LENGTH)],
            ));
        }

        if self.password.to_uppercase() == self.password
            || self.password.to_lowercase() == self.password
        {
            msgs.push(Message::new(MessageKey::PasswordSingleCase));
        }

        if !self.password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)) {
            msgs.push(Message::new(MessageKey::PasswordMissingSymbol));
        }

        msgs
    }

    /// Client-renderable view of the form; omits the password.
    pub fn view(&self) -> serde_json::Value {
        json!({ "email": self.email })
    }
}

impl Form for LoginForm {
    fn validators(&self) -> Vec<Validator<'_>> {
        vec![
            Box::new(|| self.validate_email()),
            Box::new(|| self.validate_password()),
        ]
    }

    fn state(&self) -> &FormState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }
}

/// Syntactic mail-address check: one `@` separating a non-empty local part
/// from a non-empty, dot-joined domain. Deliverability is out of scope.
pub(crate) fn is_mail_address(raw: &str) -> bool {
    let Some((local, domain)) = raw.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    !(domain.starts_with('.') || domain.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn submitted(email: &str, password: &str) -> LoginForm {
        LoginForm {
            state: FormState::submitted(),
            email: email.to_owned(),
            password: password.to_owned(),
        }
    }

    #[rstest]
    #[case("ryan@example.com", true)]
    #[case("a@b", true)]
    #[case("a.b+c@mail.example.org", true)]
    #[case("", false)]
    #[case("plainaddress", false)]
    #[case("@example.com", false)]
    #[case("ryan@", false)]
    #[case("ryan @example.com", false)]
    #[case("ryan@.example.com", false)]
    fn email_rule(#[case] email: &str, #[case] ok: bool) {
        let form = submitted(email, "Valid-pass1");
        assert_eq!(form.validate_email().is_empty(), ok, "email: {email}");
    }

    // The three password checks are independent: any subset can fire.
    #[rstest]
    #[case("Ab!x", &[MessageKey::PasswordTooShort])]
    #[case("alllower!pass", &[MessageKey::PasswordSingleCase])]
    #[case("ALLUPPER!PASS", &[MessageKey::PasswordSingleCase])]
    #[case("Nosymbolhere1", &[MessageKey::PasswordMissingSymbol])]
    #[case("short", &[
        MessageKey::PasswordTooShort,
        MessageKey::PasswordSingleCase,
        MessageKey::PasswordMissingSymbol,
    ])]
    #[case("Proper-pass", &[])]
    fn password_rules(#[case] password: &str, #[case] expected: &[MessageKey]) {
        let form = submitted("ok@example.com", password);
        let keys: Vec<MessageKey> = form.validate_password().iter().map(|m| m.key).collect();
        assert_eq!(keys, expected, "password: {password}");
    }

    #[test]
    fn length_violation_reports_the_minimum() {
        let form = submitted("ok@example.com", "Ab!");
        let msgs = form.validate_password();
        let short = msgs
            .iter()
            .find(|m| m.key == MessageKey::PasswordTooShort)
            .expect("length message");
        assert_eq!(short.args, vec![json!(MIN_PASSWORD_LENGTH)]);
    }

    #[test]
    fn view_never_contains_the_password() {
        let form = submitted("ok@example.com", "Proper-pass");
        let view = form.view();
        assert!(view.get("password").is_none());
        assert_eq!(
            view.get("email").and_then(serde_json::Value::as_str),
            Some("ok@example.com")
        );
    }
}
