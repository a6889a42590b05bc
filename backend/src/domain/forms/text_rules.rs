//! Character-class and whitespace rules for short text fields.
//!
//! [`check_text`] scans a string once and reports which rule categories were
//! violated. Output is set-like: a category is either present or absent, with
//! no counts or positions. Callers map categories to localised messages,
//! collapsing the letter and digit categories into one combined message.

/// Rule set selecting what a text field may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRules {
    /// Whether alphabetic characters are allowed.
    pub letters_allowed: bool,
    /// Whether decimal digits are allowed.
    pub digits_allowed: bool,
    /// Longest permitted run of consecutive spaces; `None` allows runs of
    /// any length.
    pub max_consecutive_spaces: Option<u32>,
}

/// Violation categories found by [`check_text`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextViolations {
    /// A character failed the letter rule.
    pub letter: bool,
    /// A character failed the digit rule.
    pub digit: bool,
    /// A space run exceeded the configured maximum.
    pub spaces: bool,
}

impl TextViolations {
    /// True when no category was violated.
    pub fn is_empty(self) -> bool {
        !(self.letter || self.digit || self.spaces)
    }

    /// True when either character-class category was violated.
    pub fn has_charset_violation(self) -> bool {
        self.letter || self.digit
    }
}

/// Scan `text` against `rules`, collecting violation categories.
pub fn check_text(text: &str, rules: TextRules) -> TextViolations {
    let mut violations = TextViolations::default();
    let mut space_run: u32 = 0;

    for ch in text.chars() {
        if ch == ' ' {
            space_run += 1;
            if rules
                .max_consecutive_spaces
                .is_some_and(|max| space_run > max)
            {
                violations.spaces = true;
            }
            continue;
        }
        space_run = 0;

        let is_letter = ch.is_alphabetic();
        let is_digit = ch.is_numeric();

        if rules.letters_allowed && is_letter {
            continue;
        }
        if rules.digits_allowed && is_digit {
            continue;
        }

        if rules.letters_allowed && !is_letter {
            violations.letter = true;
            continue;
        }
        if rules.digits_allowed && !is_digit {
            violations.digit = true;
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const LETTERS_AND_DIGITS: TextRules = TextRules {
        letters_allowed: true,
        digits_allowed: true,
        max_consecutive_spaces: Some(1),
    };

    #[rstest]
    #[case("Groceries", false, false)]
    #[case("Flat 42", false, false)]
    #[case("Rent!", true, false)]
    #[case("a  b", false, true)]
    #[case("tabs\there", true, false)]
    fn categorises_letters_digits_and_space_runs(
        #[case] text: &str,
        #[case] charset: bool,
        #[case] spaces: bool,
    ) {
        let violations = check_text(text, LETTERS_AND_DIGITS);
        assert_eq!(violations.has_charset_violation(), charset, "text: {text}");
        assert_eq!(violations.spaces, spaces, "text: {text}");
    }

    #[test]
    fn disabled_space_run_check_allows_runs_of_any_length() {
        let rules = TextRules {
            letters_allowed: true,
            digits_allowed: true,
            max_consecutive_spaces: None,
        };
        let violations = check_text("a     b", rules);
        assert!(violations.is_empty());
    }

    #[test]
    fn space_run_counter_resets_between_runs() {
        let violations = check_text("a b c d", LETTERS_AND_DIGITS);
        assert!(violations.is_empty());
    }

    #[test]
    fn category_presence_is_not_a_count() {
        let first = check_text("!!", LETTERS_AND_DIGITS);
        let second = check_text("!", LETTERS_AND_DIGITS);
        assert_eq!(first, second);
    }

    #[test]
    fn unicode_letters_are_letters() {
        let violations = check_text("Köök", LETTERS_AND_DIGITS);
        assert!(violations.is_empty());
    }
}
