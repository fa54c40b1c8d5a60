//! A1-notation ranges for the student sheet.
//!
//! The configured range names a sheet and a 12-column span such as `A:L`
//! (header in row 1) or `A2:L` (data starts at row 2). From it the adapter
//! derives the full read range, one-row write ranges and the append target.

use std::fmt;

use thiserror::Error;

use crate::domain::ROW_WIDTH;

/// The configured sheet name or column span is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetRangeError {
    #[error("sheet name must not be empty")]
    EmptySheetName,
    #[error("column range `{0}` must look like A:L or A2:L")]
    Malformed(String),
    #[error("column range `{range}` spans {actual} columns but student rows need {expected}")]
    Width {
        range: String,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CellRef {
    column: String,
    row: Option<u32>,
}

fn parse_cell_ref(raw: &str) -> Option<CellRef> {
    let split = raw
        .find(|c: char| c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (column, row) = raw.split_at(split);
    if column.is_empty() || !column.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let row = if row.is_empty() {
        None
    } else {
        Some(row.parse::<u32>().ok().filter(|row| *row > 0)?)
    };
    Some(CellRef {
        column: column.to_ascii_uppercase(),
        row,
    })
}

/// 1-based column index for letters such as `A`, `L` or `AB`. `None` when
/// the letters overflow `usize`.
fn column_index(column: &str) -> Option<usize> {
    column.bytes().try_fold(0_usize, |acc, b| {
        acc.checked_mul(26)?.checked_add(usize::from(b - b'A' + 1))
    })
}

/// Parsed sheet name plus column span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRange {
    sheet_name: String,
    start_column: String,
    end_column: String,
    start_row: u32,
}

impl SheetRange {
    /// Parse `columns` (e.g. `A:L`, `A2:L`) for `sheet_name`.
    ///
    /// # Errors
    /// Rejects empty sheet names, malformed spans and spans that are not
    /// exactly one student row wide.
    ///
    /// # Examples
    /// ```
    /// use invigilation::outbound::sheets::SheetRange;
    ///
    /// let range = SheetRange::parse("Sheet1", "A:L").expect("valid range");
    /// assert_eq!(range.read_range(), "'Sheet1'!A1:L");
    /// assert_eq!(range.row_range(7), "'Sheet1'!A7:L7");
    /// assert_eq!(range.first_data_row(), 2);
    /// ```
    pub fn parse(sheet_name: &str, columns: &str) -> Result<Self, SheetRangeError> {
        let sheet_name = sheet_name.trim();
        if sheet_name.is_empty() {
            return Err(SheetRangeError::EmptySheetName);
        }
        let columns = columns.trim();
        let malformed = || SheetRangeError::Malformed(columns.to_owned());
        let (start, end) = columns.split_once(':').ok_or_else(malformed)?;
        let start = parse_cell_ref(start.trim()).ok_or_else(malformed)?;
        let end = parse_cell_ref(end.trim()).ok_or_else(malformed)?;

        let first = column_index(&start.column).ok_or_else(malformed)?;
        let last = column_index(&end.column).ok_or_else(malformed)?;
        let actual = (last + 1).saturating_sub(first);
        if last < first || actual != ROW_WIDTH {
            return Err(SheetRangeError::Width {
                range: columns.to_owned(),
                expected: ROW_WIDTH,
                actual,
            });
        }

        Ok(Self {
            sheet_name: sheet_name.to_owned(),
            start_column: start.column,
            end_column: end.column,
            start_row: start.row.unwrap_or(1),
        })
    }

    /// Sheet name wrapped in single quotes, embedded quotes doubled.
    fn quoted_sheet(&self) -> String {
        format!("'{}'", self.sheet_name.replace('\'', "''"))
    }

    /// Whether the first returned row is the header and must be skipped.
    pub fn has_header(&self) -> bool {
        self.start_row == 1
    }

    /// Row number of the first data row.
    pub fn first_data_row(&self) -> u32 {
        if self.has_header() {
            2
        } else {
            self.start_row
        }
    }

    /// Open-ended range covering every row from the configured start.
    pub fn read_range(&self) -> String {
        format!(
            "{}!{}{}:{}",
            self.quoted_sheet(),
            self.start_column,
            self.start_row,
            self.end_column
        )
    }

    /// Range addressing exactly one full row.
    pub fn row_range(&self, row_number: u32) -> String {
        format!(
            "{sheet}!{start}{row_number}:{end}{row_number}",
            sheet = self.quoted_sheet(),
            start = self.start_column,
            end = self.end_column,
        )
    }

    /// Range handed to the append call; the API finds the table end itself.
    pub fn append_range(&self) -> String {
        self.read_range()
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.read_range())
    }
}

/// Extract the first row number from an A1 range such as `'Sheet1'!A5:L5`.
pub(super) fn first_row_of(range: &str) -> Option<u32> {
    let cells = range.rsplit_once('!').map_or(range, |(_, cells)| cells);
    let first = cells.split(':').next()?;
    parse_cell_ref(first)?.row
}
