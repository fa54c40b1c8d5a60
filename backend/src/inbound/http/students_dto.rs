//! Request and response bodies for the student endpoints.
//!
//! Student fields use the sheet header names (`Name`, `MobileNo`, ...) so
//! the JSON mirrors the spreadsheet columns; envelope fields are camelCase.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, ErrorCode, StoredStudent};
use crate::inbound::http::schemas::ErrorCodeSchema;

/// A JSON scalar accepted where the sheet stores text.
///
/// Forms send numbers for `MobileNo`/`FeeAmount` and booleans for the
/// Yes/No columns as often as strings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CellInput {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl CellInput {
    /// The value as sheet text.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Flag(flag) => flag.to_string(),
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text,
        }
    }
}

impl From<&str> for CellInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// One student as returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct StudentBody {
    #[schema(example = "Asha Kulkarni")]
    pub name: String,
    #[schema(example = "9876543210")]
    pub mobile_no: String,
    pub district: String,
    pub state: String,
    #[schema(example = "Yes")]
    pub paid: String,
    #[schema(example = "500")]
    pub fee_amount: String,
    #[schema(example = "Yes")]
    pub attempted: String,
    #[schema(example = "No")]
    pub retake_allowed: String,
    #[schema(example = "2025-02-10T12:00:00.000+05:30")]
    pub last_approved_at: String,
    #[schema(example = "2025-02-10T12:00:00.000+05:30")]
    pub created_at: String,
    /// 1-indexed spreadsheet row holding the student.
    #[serde(rename = "rowNumber")]
    pub row_number: u32,
}

impl From<StoredStudent> for StudentBody {
    fn from(value: StoredStudent) -> Self {
        let StoredStudent { record, row_number } = value;
        Self {
            name: record.name,
            mobile_no: record.mobile_no,
            district: record.district,
            state: record.state,
            paid: record.paid.to_string(),
            fee_amount: record.fee_amount,
            attempted: record.attempted.to_string(),
            retake_allowed: record.retake_allowed.to_string(),
            last_approved_at: record.last_approved_at,
            created_at: record.created_at,
            row_number,
        }
    }
}

/// Query string for `GET /student`.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StudentLookupQuery {
    /// Phone number in any formatting; non-digits are ignored.
    #[param(example = "98765 43210")]
    pub mobile_no: Option<String>,
}

/// `200` body of `GET /student`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentFoundResponse {
    pub found: bool,
    pub student: StudentBody,
}

impl StudentFoundResponse {
    pub fn new(student: StudentBody) -> Self {
        Self {
            found: true,
            student,
        }
    }
}

/// `404` body of `GET /student`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentMissingResponse {
    pub found: bool,
    /// The normalized number that was searched for.
    #[schema(example = "9876543210")]
    pub mobile_no: String,
}

/// Body of `GET /students`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentListResponse {
    pub students: Vec<StudentBody>,
    pub count: usize,
}

/// Body of `POST /student`: exactly one of `created` / `updated` is set.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentUpsertResponse {
    pub student: StudentBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<bool>,
}

impl StudentUpsertResponse {
    pub fn created(student: StudentBody) -> Self {
        Self {
            student,
            created: Some(true),
            updated: None,
        }
    }

    pub fn updated(student: StudentBody) -> Self {
        Self {
            student,
            created: None,
            updated: Some(true),
        }
    }
}

/// Body of `POST /student/update`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub student: StudentBody,
}

/// `409` body of `POST /student/update`.
///
/// The usual error envelope with the cooldown wait also lifted to the top
/// level as `remainingHours`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RetakeCooldownResponse {
    #[schema(value_type = ErrorCodeSchema, example = "conflict")]
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    pub details: serde_json::Value,
    /// Whole hours, rounded up, before a retake can be granted.
    #[schema(example = 5)]
    pub remaining_hours: u64,
}

impl RetakeCooldownResponse {
    /// Build the body from a conflict whose details carry `remainingHours`.
    pub fn from_error(error: &Error) -> Option<Self> {
        if error.code() != ErrorCode::Conflict {
            return None;
        }
        let details = error.details()?;
        let remaining_hours = details.get("remainingHours")?.as_u64()?;
        Some(Self {
            code: error.code(),
            message: error.message().to_owned(),
            trace_id: error.trace_id().map(str::to_owned),
            details: details.clone(),
            remaining_hours,
        })
    }
}

/// Request body for `POST /student`. Every field is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpsertStudentBody {
    #[schema(value_type = Option<String>, example = "Asha Kulkarni")]
    pub name: Option<CellInput>,
    #[schema(value_type = Option<String>, example = "98765 43210")]
    pub mobile_no: Option<CellInput>,
    #[schema(value_type = Option<String>, example = "Pune")]
    pub district: Option<CellInput>,
    #[schema(value_type = Option<String>, example = "Maharashtra")]
    pub state: Option<CellInput>,
    /// `Yes`/`No` or a boolean.
    #[schema(value_type = Option<String>, example = "Yes")]
    pub paid: Option<CellInput>,
    #[schema(value_type = Option<String>, example = "500")]
    pub fee_amount: Option<CellInput>,
}

/// Partial field changes inside [`UpdateStudentBody`].
///
/// `MobileNo`, `LastApprovedAt` and `CreatedAt` are accepted but ignored.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct StudentUpdatesBody {
    #[schema(value_type = Option<String>)]
    pub name: Option<CellInput>,
    #[schema(value_type = Option<String>)]
    pub district: Option<CellInput>,
    #[schema(value_type = Option<String>)]
    pub state: Option<CellInput>,
    #[schema(value_type = Option<String>, example = "Yes")]
    pub paid: Option<CellInput>,
    #[schema(value_type = Option<String>, example = "750")]
    pub fee_amount: Option<CellInput>,
    #[schema(value_type = Option<String>, example = "Yes")]
    pub attempted: Option<CellInput>,
    #[schema(value_type = Option<String>, example = "Yes")]
    pub retake_allowed: Option<CellInput>,
    #[schema(value_type = Option<String>)]
    pub mobile_no: Option<CellInput>,
    #[schema(value_type = Option<String>)]
    pub last_approved_at: Option<CellInput>,
    #[schema(value_type = Option<String>)]
    pub created_at: Option<CellInput>,
}

/// Request body for `POST /student/update`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentBody {
    #[schema(value_type = Option<String>, example = "9876543210")]
    pub mobile_no: Option<CellInput>,
    pub updates: Option<StudentUpdatesBody>,
}
