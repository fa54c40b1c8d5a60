//! Stand-in sheet used when the Google Sheets store cannot be built.
//!
//! The server still starts so health probes answer and every student request
//! carries the remediation hint instead of the process exiting.

use async_trait::async_trait;

use crate::domain::ports::{SheetSnapshot, StudentSheet, StudentSheetError};

/// Sheet that fails every call with the startup error.
#[derive(Debug, Clone)]
pub struct UnavailableStudentSheet {
    error: StudentSheetError,
}

impl UnavailableStudentSheet {
    /// Wrap the error that prevented the real store from starting.
    #[must_use]
    pub fn new(error: StudentSheetError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl StudentSheet for UnavailableStudentSheet {
    async fn fetch_rows(&self) -> Result<SheetSnapshot, StudentSheetError> {
        Err(self.error.clone())
    }

    async fn update_row(
        &self,
        _row_number: u32,
        _cells: &[String],
    ) -> Result<(), StudentSheetError> {
        Err(self.error.clone())
    }

    async fn append_row(&self, _cells: &[String]) -> Result<u32, StudentSheetError> {
        Err(self.error.clone())
    }
}
