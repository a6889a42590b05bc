//! Form models and the validation engine.
//!
//! Every form embeds a [`FormState`] by value and implements [`Form`]. The
//! engine is deliberately small: a form exposes an ordered list of validator
//! closures, each inspecting the model and returning zero or more localised
//! messages. Validators never short-circuit each other; all of them run and
//! their messages concatenate in list order.
//!
//! A pristine form (`initial == true`, the first GET render of an empty form)
//! suppresses validation entirely so the page renders without errors before
//! the user has typed anything.

mod house;
mod login;
mod note;
mod register;
pub mod text_rules;

pub use house::{HouseForm, RoommateFilter};
pub use login::LoginForm;
pub use note::NoteForm;
pub use register::RegisterForm;

use crate::domain::messages::Message;

/// Shared validation state embedded by value in every form model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    /// While true the form has not been submitted and validation is
    /// suppressed.
    pub initial: bool,
    /// One public-safe, form-level error message (already localised).
    pub error: Option<String>,
}

impl FormState {
    /// State for a form the user has not touched yet.
    pub fn pristine() -> Self {
        Self {
            initial: true,
            error: None,
        }
    }

    /// State for a form bound from a submission.
    pub fn submitted() -> Self {
        Self {
            initial: false,
            error: None,
        }
    }
}

/// One field validator: a closure borrowing the form.
pub type Validator<'a> = Box<dyn Fn() -> Vec<Message> + 'a>;

/// Contract implemented by every form model.
///
/// Call sites always know the concrete form type; the trait exists so the
/// engine's `validate`/`is_valid` logic is written once.
pub trait Form {
    /// Ordered list of field validators borrowing this form.
    fn validators(&self) -> Vec<Validator<'_>>;

    /// Shared validation state.
    fn state(&self) -> &FormState;

    /// Mutable shared validation state.
    fn state_mut(&mut self) -> &mut FormState;

    /// Run every validator and collect messages in validator-list order.
    ///
    /// Returns no messages while the form is pristine.
    fn validate(&self) -> Vec<Message> {
        if self.state().initial {
            return Vec::new();
        }
        self.validators().iter().flat_map(|v| v()).collect()
    }

    /// Validate and mark the form as submitted.
    ///
    /// Flips `initial` to false first so re-renders after this call show
    /// errors. Returns `true` when the form produced no messages.
    fn is_valid(&mut self) -> (bool, Vec<Message>) {
        self.state_mut().initial = false;
        let msgs = self.validate();
        (msgs.is_empty(), msgs)
    }
}

/// Look up the last value bound for `key` in an ordered pair list.
pub(crate) fn pair_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Collect every value bound for a repeated `key[]` field, in order.
pub(crate) fn pair_values(pairs: &[(String, String)], key: &str) -> Vec<String> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .collect()
}
