//! Driven port for the spreadsheet that stores student rows.
//!
//! The sheet offers no transactions or conditional writes: callers read the
//! whole range, decide, then overwrite one row or append one row.

use async_trait::async_trait;

use super::define_port_error;

/// Every data row of the configured range as it was read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SheetSnapshot {
    /// Sheet row number of `rows[0]` (header rows already skipped).
    pub first_row: u32,
    /// Raw cell text per row, in sheet order. Rows may be ragged.
    pub rows: Vec<Vec<String>>,
}

impl SheetSnapshot {
    /// Iterate rows paired with their 1-indexed sheet row number.
    pub fn numbered_rows(&self) -> impl Iterator<Item = (u32, &[String])> {
        (self.first_row..).zip(self.rows.iter().map(Vec::as_slice))
    }
}

define_port_error! {
    /// Errors surfaced by spreadsheet adapters.
    pub enum StudentSheetError {
        /// The service-account credential is missing or unusable.
        Credentials { message: String } =>
            "sheet credentials unavailable: {message}",
        /// The credential was rejected when requesting access.
        Unauthenticated { message: String } =>
            "sheet authentication failed: {message}",
        /// The credential may not read or write this spreadsheet.
        PermissionDenied { message: String } =>
            "sheet access denied: {message}",
        /// The spreadsheet or the named sheet does not exist.
        NotFound { message: String } =>
            "sheet not found: {message}",
        /// The request failed in transit or with an unexpected status.
        Transport { message: String } =>
            "sheet request failed: {message}",
        /// The response could not be decoded.
        Decode { message: String } =>
            "sheet response decode failed: {message}",
        /// A row handed to the adapter was not the fixed width.
        RowWidth { expected: usize, actual: usize } =>
            "row has {actual} cells but the sheet layout requires {expected}",
    }
}

/// Port for reading and writing student rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentSheet: Send + Sync {
    /// Read every data row in the configured range.
    async fn fetch_rows(&self) -> Result<SheetSnapshot, StudentSheetError>;

    /// Overwrite one full row in place.
    async fn update_row(&self, row_number: u32, cells: &[String])
    -> Result<(), StudentSheetError>;

    /// Append one full row after the last data row, returning its row number.
    async fn append_row(&self, cells: &[String]) -> Result<u32, StudentSheetError>;
}

/// Fixture sheet that is always empty and accepts writes without storing them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStudentSheet;

#[async_trait]
impl StudentSheet for FixtureStudentSheet {
    async fn fetch_rows(&self) -> Result<SheetSnapshot, StudentSheetError> {
        Ok(SheetSnapshot {
            first_row: 2,
            rows: Vec::new(),
        })
    }

    async fn update_row(
        &self,
        _row_number: u32,
        _cells: &[String],
    ) -> Result<(), StudentSheetError> {
        Ok(())
    }

    async fn append_row(&self, _cells: &[String]) -> Result<u32, StudentSheetError> {
        Ok(2)
    }
}
