//! Driving port for student mutations.
//!
//! Inbound adapters hand over validated input; implementations own the
//! duplicate-avoidance re-reads and the retake cooldown.

use async_trait::async_trait;

use crate::domain::{
    Error, MobileNumber, StoredStudent, StudentDetails, StudentFieldUpdates, StudentRecord,
};

/// How an upsert was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new row was appended.
    Created,
    /// An existing row for the same mobile number was refreshed.
    Updated,
}

/// Result of [`StudentCommand::upsert_student`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertStudentResponse {
    pub student: StoredStudent,
    pub outcome: UpsertOutcome,
}

/// Partial update addressed by mobile number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStudentRequest {
    pub mobile: MobileNumber,
    pub updates: StudentFieldUpdates,
}

/// Write-side use cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentCommand: Send + Sync {
    /// Create the student if absent, otherwise refresh the existing row.
    ///
    /// # Errors
    ///
    /// Returns an error when the sheet is unreachable or misconfigured, or
    /// when a row would be written with the wrong width.
    async fn upsert_student(&self, details: StudentDetails)
    -> Result<UpsertStudentResponse, Error>;

    /// Apply partial field changes to an existing student.
    ///
    /// # Errors
    ///
    /// Returns `not_found` when no row matches (this never creates), and
    /// `conflict` when a retake is requested inside the cooldown window.
    async fn update_student(&self, request: UpdateStudentRequest) -> Result<StoredStudent, Error>;
}

/// Fixture command that pretends every upsert creates row 2 and every update
/// misses.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStudentCommand;

#[async_trait]
impl StudentCommand for FixtureStudentCommand {
    async fn upsert_student(
        &self,
        details: StudentDetails,
    ) -> Result<UpsertStudentResponse, Error> {
        Ok(UpsertStudentResponse {
            student: StoredStudent {
                record: StudentRecord::admit(&details, ""),
                row_number: 2,
            },
            outcome: UpsertOutcome::Created,
        })
    }

    async fn update_student(&self, request: UpdateStudentRequest) -> Result<StoredStudent, Error> {
        Err(Error::not_found(format!(
            "no student with mobile number {}",
            request.mobile
        )))
    }
}
