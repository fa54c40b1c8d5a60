//! Student lookup, upsert and field-update service.
//!
//! The backing sheet has no uniqueness constraint and no conditional write,
//! so duplicate avoidance is best-effort: the service re-reads the sheet
//! before every append and switches to an in-place update if the mobile
//! number shows up in the meantime. Two requests creating the same new
//! number at the same moment can still both append.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    SheetSnapshot, StudentCommand, StudentQuery, StudentSheet, StudentSheetError,
    UpdateStudentRequest, UpsertOutcome, UpsertStudentResponse,
};
use crate::domain::{
    Error, MOBILE_NO_COLUMN, MobileNumber, RETAKE_COOLDOWN_HOURS, RetakeDecision, RowWidthError,
    StoredStudent, StudentDetails, StudentRecord, YesNo, ensure_row_width, evaluate_retake,
    format_ist, parse_sheet_timestamp,
};

/// Extra sheet reads performed before appending a new student.
pub const DUPLICATE_RECHECKS: usize = 2;

const CREDENTIALS_HINT: &str = "provide a service-account key via GOOGLE_APPLICATION_CREDENTIALS, \
     /etc/secrets/credentials.json or ./credentials.json, then restart the service";
const TROUBLESHOOTING_HINT: &str = "Google Sheets request failed; check network access, the \
     spreadsheet ID and the sheet name, then retry";

/// Student service implementing [`StudentQuery`] and [`StudentCommand`].
pub struct StudentService<S: ?Sized> {
    sheet: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized> StudentService<S> {
    /// Create a service over `sheet`, reading the current time from `clock`.
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use invigilation::domain::StudentService;
    /// # use invigilation::domain::ports::FixtureStudentSheet;
    /// # use mockable::DefaultClock;
    /// let service = StudentService::new(Arc::new(FixtureStudentSheet), Arc::new(DefaultClock));
    /// # let _ = service;
    /// ```
    pub fn new(sheet: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { sheet, clock }
    }
}

fn map_sheet_error(err: StudentSheetError) -> Error {
    error!(error = %err, "student sheet operation failed");
    match err {
        StudentSheetError::Credentials { message } => Error::store_unavailable(format!(
            "Google Sheets credentials unavailable ({message}); {CREDENTIALS_HINT}"
        )),
        StudentSheetError::Unauthenticated { message } => Error::store_unavailable(format!(
            "Google Sheets rejected the service-account credential ({message}); check the key \
             is current and the Sheets API is enabled for its project"
        )),
        StudentSheetError::PermissionDenied { message } => Error::forbidden(format!(
            "Google Sheets denied access: {message}. Share the spreadsheet with the \
             service-account email"
        )),
        StudentSheetError::NotFound { message } => {
            Error::not_found(format!("spreadsheet or sheet not found: {message}"))
        }
        StudentSheetError::Transport { .. } | StudentSheetError::Decode { .. } => {
            Error::store_unavailable(TROUBLESHOOTING_HINT)
        }
        StudentSheetError::RowWidth { expected, actual } => Error::internal(format!(
            "refusing to write a {actual}-cell row into a {expected}-column layout"
        )),
    }
}

fn row_width_error(err: RowWidthError) -> Error {
    error!(expected = err.expected, actual = err.actual, "student row width invariant violated");
    Error::internal(err.to_string())
}

fn find_in_snapshot(snapshot: &SheetSnapshot, mobile: &MobileNumber) -> Option<StoredStudent> {
    snapshot
        .numbered_rows()
        .find_map(|(row_number, cells)| {
            cells
                .get(MOBILE_NO_COLUMN)
                .is_some_and(|stored| mobile.matches(stored))
                .then(|| StoredStudent {
                    record: StudentRecord::from_row(cells),
                    row_number,
                })
        })
}

fn is_blank_row(cells: &[String]) -> bool {
    cells.iter().all(|cell| cell.trim().is_empty())
}

fn not_found(mobile: &MobileNumber) -> Error {
    Error::not_found(format!("no student with mobile number {mobile}"))
}

impl<S> StudentService<S>
where
    S: StudentSheet + ?Sized,
{
    async fn lookup(&self, mobile: &MobileNumber) -> Result<Option<StoredStudent>, Error> {
        let snapshot = self.sheet.fetch_rows().await.map_err(map_sheet_error)?;
        Ok(find_in_snapshot(&snapshot, mobile))
    }

    /// Look up again until the number appears or the re-check budget runs out.
    async fn recheck_before_append(
        &self,
        mobile: &MobileNumber,
    ) -> Result<Option<StoredStudent>, Error> {
        for attempt in 1..=DUPLICATE_RECHECKS {
            if let Some(found) = self.lookup(mobile).await? {
                warn!(
                    attempt,
                    row_number = found.row_number,
                    "student appeared during re-check; updating instead of appending"
                );
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    async fn rewrite_row(&self, row_number: u32, record: &StudentRecord) -> Result<(), Error> {
        let cells = record.to_row();
        ensure_row_width(&cells).map_err(row_width_error)?;
        self.sheet
            .update_row(row_number, &cells)
            .await
            .map_err(map_sheet_error)
    }

    async fn append_record(&self, record: &StudentRecord) -> Result<u32, Error> {
        let cells = record.to_row();
        ensure_row_width(&cells).map_err(row_width_error)?;
        self.sheet.append_row(&cells).await.map_err(map_sheet_error)
    }

    async fn refresh_existing(
        &self,
        existing: StoredStudent,
        details: &StudentDetails,
    ) -> Result<UpsertStudentResponse, Error> {
        let StoredStudent {
            mut record,
            row_number,
        } = existing;
        record.apply_details(details);
        self.rewrite_row(row_number, &record).await?;
        info!(row_number, "student details refreshed");
        Ok(UpsertStudentResponse {
            student: StoredStudent { record, row_number },
            outcome: UpsertOutcome::Updated,
        })
    }
}

#[async_trait]
impl<S> StudentQuery for StudentService<S>
where
    S: StudentSheet + ?Sized,
{
    async fn find_by_mobile(&self, mobile: &MobileNumber) -> Result<Option<StoredStudent>, Error> {
        self.lookup(mobile).await
    }

    async fn list_students(&self) -> Result<Vec<StoredStudent>, Error> {
        let snapshot = self.sheet.fetch_rows().await.map_err(map_sheet_error)?;
        Ok(snapshot
            .numbered_rows()
            .filter(|(_, cells)| !is_blank_row(cells))
            .map(|(row_number, cells)| StoredStudent {
                record: StudentRecord::from_row(cells),
                row_number,
            })
            .collect())
    }
}

#[async_trait]
impl<S> StudentCommand for StudentService<S>
where
    S: StudentSheet + ?Sized,
{
    async fn upsert_student(
        &self,
        details: StudentDetails,
    ) -> Result<UpsertStudentResponse, Error> {
        if let Some(existing) = self.lookup(&details.mobile).await? {
            return self.refresh_existing(existing, &details).await;
        }
        if let Some(existing) = self.recheck_before_append(&details.mobile).await? {
            return self.refresh_existing(existing, &details).await;
        }

        let now = format_ist(self.clock.utc());
        let record = StudentRecord::admit(&details, &now);
        let row_number = self.append_record(&record).await?;
        info!(row_number, "student created");
        Ok(UpsertStudentResponse {
            student: StoredStudent { record, row_number },
            outcome: UpsertOutcome::Created,
        })
    }

    async fn update_student(&self, request: UpdateStudentRequest) -> Result<StoredStudent, Error> {
        let UpdateStudentRequest { mobile, updates } = request;
        let Some(existing) = self.lookup(&mobile).await? else {
            return Err(not_found(&mobile));
        };

        let now = self.clock.utc();
        let mut refresh_approval = false;
        if updates.grants_retake() {
            let last_approved_at = parse_sheet_timestamp(&existing.record.last_approved_at);
            match evaluate_retake(last_approved_at, now) {
                RetakeDecision::Granted => refresh_approval = true,
                RetakeDecision::CoolingDown { remaining_hours } => {
                    info!(
                        row_number = existing.row_number,
                        remaining_hours, "retake rejected during cooldown"
                    );
                    return Err(Error::conflict(format!(
                        "retake can only be granted {RETAKE_COOLDOWN_HOURS} hours after the last \
                         approval; try again in {remaining_hours} hour(s)"
                    ))
                    .with_details(json!({ "remainingHours": remaining_hours })));
                }
            }
        }
        let first_attempt =
            updates.attempted.is_some_and(YesNo::is_yes) && !existing.record.attempted.is_yes();
        refresh_approval |= first_attempt;

        let StoredStudent {
            mut record,
            row_number,
        } = existing;
        record.apply_updates(&updates);
        if refresh_approval {
            record.last_approved_at = format_ist(now);
        }
        self.rewrite_row(row_number, &record).await?;
        info!(row_number, refresh_approval, "student fields updated");
        Ok(StoredStudent { record, row_number })
    }
}

#[cfg(test)]
#[path = "student_service_tests.rs"]
mod tests;
