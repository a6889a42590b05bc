//! Localised-message records emitted by form validation.
//!
//! Validation never produces display text directly. It produces a
//! [`MessageKey`] plus optional arguments; the rendering layer resolves the
//! key against a locale catalogue. Keys serialise as the dotted catalogue
//! identifiers the front end already uses.

use serde::Serialize;

/// Catalogue key for a user-facing validation or form-level message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "&'static str")]
#[non_exhaustive]
pub enum MessageKey {
    /// Email field does not parse as a mail address.
    EmailInvalid,
    /// Password is shorter than the minimum length (arg: minimum).
    PasswordTooShort,
    /// Password is entirely one case.
    PasswordSingleCase,
    /// Password contains no symbol from the allow-list.
    PasswordMissingSymbol,
    /// Password confirmation differs from the password.
    PasswordsMustMatch,
    /// Username is shorter than the minimum length (arg: minimum).
    UsernameTooShort,
    /// Username has leading or trailing whitespace.
    UsernameSurroundingSpaces,
    /// Required name/title field is empty.
    NameEmpty,
    /// Required content field is empty.
    ContentEmpty,
    /// Field may contain only letters and digits.
    OnlyLettersAndDigits,
    /// Field contains a run of spaces longer than allowed.
    NoMultipleSpaces,
    /// Credentials did not match a known account.
    InvalidCredentials,
    /// An account with this email or username already exists.
    AccountAlreadyExists,
    /// Some submitted roommate identifiers were invalid and were dropped.
    SomeRoommatesInvalid,
}

impl MessageKey {
    /// Dotted catalogue identifier for this key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmailInvalid => "forms.email.invalid",
            Self::PasswordTooShort => "forms.password.too_short",
            Self::PasswordSingleCase => "forms.password.single_case",
            Self::PasswordMissingSymbol => "forms.password.missing_symbol",
            Self::PasswordsMustMatch => "forms.password.must_match",
            Self::UsernameTooShort => "forms.username.too_short",
            Self::UsernameSurroundingSpaces => "forms.username.surrounding_spaces",
            Self::NameEmpty => "forms.name.empty",
            Self::ContentEmpty => "forms.content.empty",
            Self::OnlyLettersAndDigits => "forms.errors.only_letters_and_digits",
            Self::NoMultipleSpaces => "forms.errors.no_multiple_spaces",
            Self::InvalidCredentials => "forms.errors.invalid_credentials",
            Self::AccountAlreadyExists => "forms.errors.account_already_exists",
            Self::SomeRoommatesInvalid => "forms.house.some_roommates_invalid",
        }
    }
}

impl From<MessageKey> for &'static str {
    fn from(key: MessageKey) -> Self {
        key.as_str()
    }
}

impl std::fmt::Display for MessageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One localised message: a key plus substitution arguments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Catalogue key.
    pub key: MessageKey,
    /// Positional substitution arguments, empty for most messages.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<serde_json::Value>,
}

impl Message {
    /// Message with no arguments.
    pub fn new(key: MessageKey) -> Self {
        Self {
            key,
            args: Vec::new(),
        }
    }

    /// Message with positional arguments.
    pub fn with_args(key: MessageKey, args: Vec<serde_json::Value>) -> Self {
        Self { key, args }
    }
}
