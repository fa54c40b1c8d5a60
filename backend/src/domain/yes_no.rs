//! Yes/No flag stored in the Paid, Attempted and RetakeAllowed columns.

use std::fmt;
use std::str::FromStr;

/// Parse failure for a Yes/No value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YesNoParseError {
    value: String,
}

impl YesNoParseError {
    /// The rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for YesNoParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected Yes or No, got '{}'", self.value)
    }
}

impl std::error::Error for YesNoParseError {}

/// Boolean flag with the sheet's `"Yes"` / `"No"` spelling.
///
/// Parsing accepts `yes`, `y`, `true`, `1`, `no`, `n`, `false` and `0` in
/// any case.
///
/// # Examples
/// ```
/// use invigilation::domain::YesNo;
///
/// assert_eq!("TRUE".parse::<YesNo>(), Ok(YesNo::Yes));
/// assert_eq!(YesNo::No.as_str(), "No");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    /// Sheet spelling of the flag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    /// Whether the flag is set.
    #[must_use]
    pub const fn is_yes(self) -> bool {
        matches!(self, Self::Yes)
    }

    /// Read a stored cell. Anything not recognised as yes counts as no.
    #[must_use]
    pub fn from_cell(cell: &str) -> Self {
        match cell.parse() {
            Ok(Self::Yes) => Self::Yes,
            _ => Self::No,
        }
    }
}

impl FromStr for YesNo {
    type Err = YesNoParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "1" => Ok(Self::Yes),
            "no" | "n" | "false" | "0" => Ok(Self::No),
            _ => Err(YesNoParseError {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Yes", YesNo::Yes)]
    #[case(" y ", YesNo::Yes)]
    #[case("TRUE", YesNo::Yes)]
    #[case("1", YesNo::Yes)]
    #[case("no", YesNo::No)]
    #[case("N", YesNo::No)]
    #[case("false", YesNo::No)]
    #[case("0", YesNo::No)]
    fn parses_accepted_spellings(#[case] raw: &str, #[case] expected: YesNo) {
        assert_eq!(raw.parse::<YesNo>(), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("maybe")]
    #[case("yess")]
    fn rejects_other_strings(#[case] raw: &str) {
        let err = raw.parse::<YesNo>().expect_err("should reject");
        assert_eq!(err.value(), raw);
    }

    #[rstest]
    #[case("", YesNo::No)]
    #[case("pending", YesNo::No)]
    #[case("yes", YesNo::Yes)]
    fn stored_cells_default_to_no(#[case] cell: &str, #[case] expected: YesNo) {
        assert_eq!(YesNo::from_cell(cell), expected);
    }
}
