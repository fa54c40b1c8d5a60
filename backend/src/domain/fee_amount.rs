//! Fee amount kept as the decimal text the operator entered.

use std::fmt;

/// Validation errors returned by [`FeeAmount::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeAmountValidationError {
    Empty,
    NotDecimal,
}

impl fmt::Display for FeeAmountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "fee amount must not be empty"),
            Self::NotDecimal => write!(f, "fee amount must be a non-negative decimal number"),
        }
    }
}

impl std::error::Error for FeeAmountValidationError {}

/// Non-negative decimal amount, stored trimmed but otherwise verbatim.
///
/// # Examples
/// ```
/// use invigilation::domain::FeeAmount;
///
/// assert_eq!(FeeAmount::new(" 500.50 ").expect("valid").as_ref(), "500.50");
/// assert!(FeeAmount::new("five hundred").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeAmount(String);

impl FeeAmount {
    /// Validate and construct a fee amount.
    pub fn new(value: impl AsRef<str>) -> Result<Self, FeeAmountValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FeeAmountValidationError::Empty);
        }
        if !is_decimal(trimmed) {
            return Err(FeeAmountValidationError::NotDecimal);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

fn is_decimal(value: &str) -> bool {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let all_digits = |part: &str| part.chars().all(|ch| ch.is_ascii_digit());
    !(whole.is_empty() && fraction.is_empty()) && all_digits(whole) && all_digits(fraction)
}

impl AsRef<str> for FeeAmount {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FeeAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("500", "500")]
    #[case(" 1200.50 ", "1200.50")]
    #[case("0", "0")]
    #[case(".5", ".5")]
    #[case("10.", "10.")]
    fn accepts_decimal_text(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(FeeAmount::new(raw).expect("valid").as_ref(), expected);
    }

    #[rstest]
    #[case("", FeeAmountValidationError::Empty)]
    #[case("  ", FeeAmountValidationError::Empty)]
    #[case(".", FeeAmountValidationError::NotDecimal)]
    #[case("-5", FeeAmountValidationError::NotDecimal)]
    #[case("1.2.3", FeeAmountValidationError::NotDecimal)]
    #[case("₹500", FeeAmountValidationError::NotDecimal)]
    #[case("1e3", FeeAmountValidationError::NotDecimal)]
    fn rejects_other_text(#[case] raw: &str, #[case] expected: FeeAmountValidationError) {
        assert_eq!(FeeAmount::new(raw), Err(expected));
    }
}
