//! In-memory [`StudentSheet`] with a header row at row 1.
//!
//! Besides plain storage it can simulate a second writer appending a row
//! right after a given read, and fail the next call with a chosen error.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{SheetSnapshot, StudentSheet, StudentSheetError};

const FIRST_DATA_ROW: u32 = 2;

#[derive(Default)]
struct SheetState {
    rows: Vec<Vec<String>>,
    reads: usize,
    appends: usize,
    updated_rows: Vec<u32>,
    append_after_read: Option<(usize, Vec<String>)>,
    next_failure: Option<StudentSheetError>,
}

#[derive(Default)]
pub struct InMemoryStudentSheet {
    state: Mutex<SheetState>,
}

impl InMemoryStudentSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        let sheet = Self::default();
        sheet.lock().rows = rows;
        sheet
    }

    /// Once the `read`-th fetch has been answered, append `row` as if another
    /// client had written it.
    pub fn append_after_read(&self, read: usize, row: Vec<String>) {
        self.lock().append_after_read = Some((read, row));
    }

    /// Fail the next port call with `error`.
    pub fn fail_next(&self, error: StudentSheetError) {
        self.lock().next_failure = Some(error);
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.lock().rows.clone()
    }

    pub fn row(&self, row_number: u32) -> Option<Vec<String>> {
        let index = row_number.checked_sub(FIRST_DATA_ROW)?;
        self.lock().rows.get(usize::try_from(index).ok()?).cloned()
    }

    pub fn read_count(&self) -> usize {
        self.lock().reads
    }

    pub fn append_count(&self) -> usize {
        self.lock().appends
    }

    pub fn updated_rows(&self) -> Vec<u32> {
        self.lock().updated_rows.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SheetState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("sheet mutex"),
        }
    }
}

fn row_number_for(index: usize) -> u32 {
    match u32::try_from(index) {
        Ok(index) => FIRST_DATA_ROW + index,
        Err(_) => panic!("in-memory sheet row index overflow"),
    }
}

#[async_trait]
impl StudentSheet for InMemoryStudentSheet {
    async fn fetch_rows(&self) -> Result<SheetSnapshot, StudentSheetError> {
        let mut state = self.lock();
        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }
        state.reads += 1;
        let snapshot = SheetSnapshot {
            first_row: FIRST_DATA_ROW,
            rows: state.rows.clone(),
        };
        let reads = state.reads;
        let triggered = matches!(&state.append_after_read, Some((read, _)) if *read == reads);
        if triggered {
            if let Some((_, row)) = state.append_after_read.take() {
                state.rows.push(row);
            }
        }
        Ok(snapshot)
    }

    async fn update_row(
        &self,
        row_number: u32,
        cells: &[String],
    ) -> Result<(), StudentSheetError> {
        let mut state = self.lock();
        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }
        let index = row_number
            .checked_sub(FIRST_DATA_ROW)
            .and_then(|index| usize::try_from(index).ok())
            .ok_or_else(|| StudentSheetError::not_found(format!("row {row_number}")))?;
        if state.rows.len() <= index {
            state.rows.resize_with(index + 1, Vec::new);
        }
        state.rows[index] = cells.to_vec();
        state.updated_rows.push(row_number);
        Ok(())
    }

    async fn append_row(&self, cells: &[String]) -> Result<u32, StudentSheetError> {
        let mut state = self.lock();
        if let Some(error) = state.next_failure.take() {
            return Err(error);
        }
        state.rows.push(cells.to_vec());
        state.appends += 1;
        Ok(row_number_for(state.rows.len() - 1))
    }
}
