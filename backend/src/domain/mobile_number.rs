//! Normalised mobile number, the lookup key for student rows.
//!
//! Normalisation strips every character that is not an ASCII digit, so
//! `"+91 98765-43210"` and `"919876543210"` address the same student.

use std::fmt;

/// Validation errors returned by [`MobileNumber::normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MobileNumberError {
    Empty,
}

impl fmt::Display for MobileNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "mobile number must contain at least one digit"),
        }
    }
}

impl std::error::Error for MobileNumberError {}

/// Digits-only mobile number.
///
/// # Examples
/// ```
/// use invigilation::domain::MobileNumber;
///
/// let number = MobileNumber::normalize("98765 43210").expect("digits present");
/// assert_eq!(number.as_ref(), "9876543210");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Strip non-digits from `raw`, rejecting inputs with no digits at all.
    pub fn normalize(raw: impl AsRef<str>) -> Result<Self, MobileNumberError> {
        let digits = digits_only(raw.as_ref());
        if digits.is_empty() {
            return Err(MobileNumberError::Empty);
        }
        Ok(Self(digits))
    }

    /// Whether a raw stored cell normalises to this number.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        digits_only(raw) == self.0
    }
}

/// Strip every non-digit character. Empty input yields an empty string.
#[must_use]
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

impl AsRef<str> for MobileNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("98765 43210", "9876543210")]
    #[case("+91-98765-43210", "919876543210")]
    #[case("(022) 2345 6789", "02223456789")]
    #[case("9876543210", "9876543210")]
    #[case(" 0 ", "0")]
    fn strips_non_digits(#[case] raw: &str, #[case] expected: &str) {
        let number = MobileNumber::normalize(raw).expect("digits present");
        assert_eq!(number.as_ref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("n/a")]
    #[case("+-()")]
    fn rejects_inputs_without_digits(#[case] raw: &str) {
        assert_eq!(MobileNumber::normalize(raw), Err(MobileNumberError::Empty));
    }

    #[rstest]
    #[case("98765 43210")]
    #[case("+44 (0) 20 7946 0958")]
    #[case("१२३ 456")]
    fn normalisation_is_idempotent(#[case] raw: &str) {
        let once = MobileNumber::normalize(raw).expect("digits present");
        let twice = MobileNumber::normalize(once.as_ref()).expect("still digits");
        assert_eq!(once, twice);
    }

    #[rstest]
    fn matches_formatted_stored_cells() {
        let number = MobileNumber::normalize("9876543210").expect("digits");
        assert!(number.matches("98765-43210"));
        assert!(!number.matches("98765-43211"));
        assert!(!number.matches(""));
    }
}
