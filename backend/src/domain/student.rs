//! Student record and its fixed-width sheet row contract.
//!
//! One spreadsheet row holds one student. The row layout is positional and
//! always exactly [`ROW_WIDTH`] cells wide:
//!
//! | # | Column          |
//! |---|-----------------|
//! | A | Name            |
//! | B | MobileNo        |
//! | C | District        |
//! | D | State           |
//! | E | Paid            |
//! | F | FeeAmount       |
//! | G | Attempted       |
//! | H | RetakeAllowed   |
//! | I | LastApprovedAt  |
//! | J | reserved        |
//! | K | reserved        |
//! | L | CreatedAt       |
//!
//! Reserved cells carry no meaning here but belong to other sheet users, so
//! they are read and written back verbatim.

use std::fmt;

use super::{FeeAmount, MobileNumber, YesNo, digits_only};

/// Number of cells in every student row.
pub const ROW_WIDTH: usize = 12;

/// Zero-based position of the MobileNo cell.
pub const MOBILE_NO_COLUMN: usize = 1;

/// A row about to be written has the wrong number of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowWidthError {
    /// Required width.
    pub expected: usize,
    /// Width that was produced.
    pub actual: usize,
}

impl fmt::Display for RowWidthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "student row must have {} cells, found {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for RowWidthError {}

/// Check the write invariant: a row is exactly [`ROW_WIDTH`] cells.
///
/// # Errors
/// Returns [`RowWidthError`] when the width differs.
pub fn ensure_row_width(cells: &[String]) -> Result<(), RowWidthError> {
    if cells.len() == ROW_WIDTH {
        Ok(())
    } else {
        Err(RowWidthError {
            expected: ROW_WIDTH,
            actual: cells.len(),
        })
    }
}

/// Validated input for creating or refreshing a student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDetails {
    pub name: String,
    pub mobile: MobileNumber,
    pub district: String,
    pub state: String,
    pub paid: YesNo,
    pub fee_amount: FeeAmount,
}

/// Partial field changes for an existing student.
///
/// `CreatedAt`, `MobileNo`, `LastApprovedAt` and the reserved columns are
/// deliberately absent: they cannot be set by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentFieldUpdates {
    pub name: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub paid: Option<YesNo>,
    pub fee_amount: Option<FeeAmount>,
    pub attempted: Option<YesNo>,
    pub retake_allowed: Option<YesNo>,
}

impl StudentFieldUpdates {
    /// Whether the update requests a retake grant.
    #[must_use]
    pub fn grants_retake(&self) -> bool {
        self.retake_allowed.is_some_and(YesNo::is_yes)
    }
}

/// One student as stored in the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentRecord {
    pub name: String,
    /// Digits-only mobile number; empty only for malformed stored rows.
    pub mobile_no: String,
    pub district: String,
    pub state: String,
    pub paid: YesNo,
    pub fee_amount: String,
    pub attempted: YesNo,
    pub retake_allowed: YesNo,
    pub last_approved_at: String,
    pub reserved: [String; 2],
    pub created_at: String,
}

impl StudentRecord {
    /// Build the record for a first admission.
    ///
    /// `CreatedAt` and `LastApprovedAt` share `now`; the student counts as
    /// having attempted, and no retake is granted yet.
    #[must_use]
    pub fn admit(details: &StudentDetails, now: &str) -> Self {
        let mut record = Self {
            attempted: YesNo::Yes,
            retake_allowed: YesNo::No,
            last_approved_at: now.to_owned(),
            created_at: now.to_owned(),
            ..Self::default()
        };
        record.apply_details(details);
        record
    }

    /// Overwrite the identity and payment columns from `details`.
    pub fn apply_details(&mut self, details: &StudentDetails) {
        self.name = details.name.clone();
        self.mobile_no = details.mobile.to_string();
        self.district = details.district.clone();
        self.state = details.state.clone();
        self.paid = details.paid;
        self.fee_amount = details.fee_amount.to_string();
    }

    /// Merge `updates` over this record. Timestamps are left untouched.
    pub fn apply_updates(&mut self, updates: &StudentFieldUpdates) {
        if let Some(name) = &updates.name {
            self.name.clone_from(name);
        }
        if let Some(district) = &updates.district {
            self.district.clone_from(district);
        }
        if let Some(state) = &updates.state {
            self.state.clone_from(state);
        }
        if let Some(paid) = updates.paid {
            self.paid = paid;
        }
        if let Some(fee_amount) = &updates.fee_amount {
            self.fee_amount = fee_amount.to_string();
        }
        if let Some(attempted) = updates.attempted {
            self.attempted = attempted;
        }
        if let Some(retake_allowed) = updates.retake_allowed {
            self.retake_allowed = retake_allowed;
        }
    }

    /// Read a stored row. Short rows are padded with blanks and cells past
    /// column L are ignored.
    #[must_use]
    pub fn from_row(cells: &[String]) -> Self {
        let mut cells = cells
            .iter()
            .map(String::as_str)
            .chain(std::iter::repeat(""));
        let mut next = || cells.next().unwrap_or_default().to_owned();

        let name = next();
        let mobile_no = digits_only(&next());
        let district = next();
        let state = next();
        let paid = YesNo::from_cell(&next());
        let fee_amount = next();
        let attempted = YesNo::from_cell(&next());
        let retake_allowed = YesNo::from_cell(&next());
        let last_approved_at = next();
        let reserved = [next(), next()];
        let created_at = next();

        Self {
            name,
            mobile_no,
            district,
            state,
            paid,
            fee_amount,
            attempted,
            retake_allowed,
            last_approved_at,
            reserved,
            created_at,
        }
    }

    /// Render the record as a full row, in column order.
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        let [reserved_j, reserved_k] = self.reserved.clone();
        vec![
            self.name.clone(),
            self.mobile_no.clone(),
            self.district.clone(),
            self.state.clone(),
            self.paid.as_str().to_owned(),
            self.fee_amount.clone(),
            self.attempted.as_str().to_owned(),
            self.retake_allowed.as_str().to_owned(),
            self.last_approved_at.clone(),
            reserved_j,
            reserved_k,
            self.created_at.clone(),
        ]
    }
}

/// A student together with its 1-indexed sheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredStudent {
    pub record: StudentRecord,
    pub row_number: u32,
}
