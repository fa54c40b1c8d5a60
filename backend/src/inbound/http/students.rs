//! Student HTTP handlers.
//!
//! ```text
//! GET  /student?mobileNo=98765%2043210
//! GET  /students
//! POST /student {"Name":"Asha","MobileNo":"98765 43210","District":"Pune",
//!                "State":"Maharashtra","Paid":"Yes","FeeAmount":"500"}
//! POST /student/update {"mobileNo":"9876543210","updates":{"RetakeAllowed":"Yes"}}
//! ```

use actix_web::{HttpResponse, get, post, web};
use tracing::debug;

use crate::domain::ports::{UpdateStudentRequest, UpsertOutcome};
use crate::domain::{MobileNumber, StudentDetails, StudentFieldUpdates};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::students_dto::{
    CellInput, RetakeCooldownResponse, StudentBody, StudentFoundResponse, StudentListResponse,
    StudentLookupQuery, StudentMissingResponse, StudentResponse, StudentUpdatesBody,
    StudentUpsertResponse, UpdateStudentBody, UpsertStudentBody,
};
use crate::inbound::http::validation::{
    FieldName, inexact_mobile_no_error, missing_field_error, parse_fee_amount, parse_mobile_no,
    parse_yes_no, require_text,
};

const MOBILE_NO_PARAM: FieldName = FieldName::new("mobileNo");
const UPDATES: FieldName = FieldName::new("updates");
const NAME: FieldName = FieldName::new("Name");
const MOBILE_NO: FieldName = FieldName::new("MobileNo");
const DISTRICT: FieldName = FieldName::new("District");
const STATE: FieldName = FieldName::new("State");
const PAID: FieldName = FieldName::new("Paid");
const FEE_AMOUNT: FieldName = FieldName::new("FeeAmount");
const ATTEMPTED: FieldName = FieldName::new("Attempted");
const RETAKE_ALLOWED: FieldName = FieldName::new("RetakeAllowed");

fn text(value: Option<CellInput>) -> Option<String> {
    value.map(CellInput::into_text)
}

/// Mobile numbers sent as JSON numbers must survive decoding unchanged.
fn mobile_text(value: Option<CellInput>, field: FieldName) -> ApiResult<Option<String>> {
    match value {
        Some(CellInput::Number(number)) if number.as_u64().is_none() => {
            Err(inexact_mobile_no_error(&number.to_string(), field))
        }
        other => Ok(text(other)),
    }
}

fn required_mobile(value: Option<CellInput>, field: FieldName) -> ApiResult<MobileNumber> {
    let raw = require_text(mobile_text(value, field)?, field)?;
    parse_mobile_no(&raw, field)
}

fn parse_upsert_body(payload: UpsertStudentBody) -> ApiResult<StudentDetails> {
    let name = require_text(text(payload.name), NAME)?;
    let mobile = required_mobile(payload.mobile_no, MOBILE_NO)?;
    let district = require_text(text(payload.district), DISTRICT)?;
    let state = require_text(text(payload.state), STATE)?;
    let paid = parse_yes_no(&require_text(text(payload.paid), PAID)?, PAID)?;
    let fee_amount = text(payload.fee_amount).ok_or_else(|| missing_field_error(FEE_AMOUNT))?;
    let fee_amount = parse_fee_amount(&fee_amount, FEE_AMOUNT)?;

    Ok(StudentDetails {
        name,
        mobile,
        district,
        state,
        paid,
        fee_amount,
    })
}

fn optional_text(value: Option<CellInput>, field: FieldName) -> ApiResult<Option<String>> {
    text(value).map(|raw| require_text(Some(raw), field)).transpose()
}

fn parse_updates(body: StudentUpdatesBody) -> ApiResult<StudentFieldUpdates> {
    let StudentUpdatesBody {
        name,
        district,
        state,
        paid,
        fee_amount,
        attempted,
        retake_allowed,
        mobile_no,
        last_approved_at,
        created_at,
    } = body;

    for (field, present) in [
        ("MobileNo", mobile_no.is_some()),
        ("LastApprovedAt", last_approved_at.is_some()),
        ("CreatedAt", created_at.is_some()),
    ] {
        if present {
            debug!(field, "ignoring read-only field in student update");
        }
    }

    let yes_no = |value: Option<CellInput>, field: FieldName| {
        text(value)
            .map(|raw| parse_yes_no(&raw, field))
            .transpose()
    };

    Ok(StudentFieldUpdates {
        name: optional_text(name, NAME)?,
        district: optional_text(district, DISTRICT)?,
        state: optional_text(state, STATE)?,
        paid: yes_no(paid, PAID)?,
        fee_amount: text(fee_amount)
            .map(|raw| parse_fee_amount(&raw, FEE_AMOUNT))
            .transpose()?,
        attempted: yes_no(attempted, ATTEMPTED)?,
        retake_allowed: yes_no(retake_allowed, RETAKE_ALLOWED)?,
    })
}

fn parse_update_body(payload: UpdateStudentBody) -> ApiResult<UpdateStudentRequest> {
    let mobile = required_mobile(payload.mobile_no, MOBILE_NO_PARAM)?;
    let updates = payload.updates.ok_or_else(|| missing_field_error(UPDATES))?;
    Ok(UpdateStudentRequest {
        mobile,
        updates: parse_updates(updates)?,
    })
}

/// Look up one student by mobile number.
#[utoipa::path(
    get,
    path = "/student",
    params(StudentLookupQuery),
    responses(
        (status = 200, description = "Student found", body = StudentFoundResponse),
        (status = 400, description = "Missing or digit-free mobileNo", body = ErrorSchema),
        (status = 403, description = "Spreadsheet access denied", body = ErrorSchema),
        (status = 404, description = "No student with that number", body = StudentMissingResponse),
        (status = 500, description = "Spreadsheet unavailable", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "lookupStudent"
)]
#[get("/student")]
pub async fn lookup_student(
    state: web::Data<HttpState>,
    query: web::Query<StudentLookupQuery>,
) -> ApiResult<HttpResponse> {
    let raw = require_text(query.into_inner().mobile_no, MOBILE_NO_PARAM)?;
    let mobile = parse_mobile_no(&raw, MOBILE_NO_PARAM)?;
    match state.students.find_by_mobile(&mobile).await? {
        Some(student) => Ok(HttpResponse::Ok().json(StudentFoundResponse::new(student.into()))),
        None => Ok(HttpResponse::NotFound().json(StudentMissingResponse {
            found: false,
            mobile_no: mobile.to_string(),
        })),
    }
}

/// List every student row in sheet order.
#[utoipa::path(
    get,
    path = "/students",
    responses(
        (status = 200, description = "All students", body = StudentListResponse),
        (status = 403, description = "Spreadsheet access denied", body = ErrorSchema),
        (status = 500, description = "Spreadsheet unavailable", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/students")]
pub async fn list_students(state: web::Data<HttpState>) -> ApiResult<web::Json<StudentListResponse>> {
    let students: Vec<StudentBody> = state
        .students
        .list_students()
        .await?
        .into_iter()
        .map(StudentBody::from)
        .collect();
    Ok(web::Json(StudentListResponse {
        count: students.len(),
        students,
    }))
}

/// Create a student, or refresh the existing row with the same number.
#[utoipa::path(
    post,
    path = "/student",
    request_body = UpsertStudentBody,
    responses(
        (status = 201, description = "Student created", body = StudentUpsertResponse),
        (status = 200, description = "Existing student updated", body = StudentUpsertResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorSchema),
        (status = 403, description = "Spreadsheet access denied", body = ErrorSchema),
        (status = 500, description = "Spreadsheet unavailable", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "upsertStudent"
)]
#[post("/student")]
pub async fn upsert_student(
    state: web::Data<HttpState>,
    payload: web::Json<UpsertStudentBody>,
) -> ApiResult<HttpResponse> {
    let details = parse_upsert_body(payload.into_inner())?;
    let response = state.student_commands.upsert_student(details).await?;
    let student = StudentBody::from(response.student);
    Ok(match response.outcome {
        UpsertOutcome::Created => {
            HttpResponse::Created().json(StudentUpsertResponse::created(student))
        }
        UpsertOutcome::Updated => HttpResponse::Ok().json(StudentUpsertResponse::updated(student)),
    })
}

/// Apply partial changes to an existing student (approval and retake).
#[utoipa::path(
    post,
    path = "/student/update",
    request_body = UpdateStudentBody,
    responses(
        (status = 200, description = "Student updated", body = StudentResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorSchema),
        (status = 404, description = "No student with that number", body = ErrorSchema),
        (
            status = 409,
            description = "Retake cooldown not elapsed; remainingHours holds the wait",
            body = RetakeCooldownResponse
        ),
        (status = 500, description = "Spreadsheet unavailable", body = ErrorSchema)
    ),
    tags = ["students"],
    operation_id = "updateStudent"
)]
#[post("/student/update")]
pub async fn update_student(
    state: web::Data<HttpState>,
    payload: web::Json<UpdateStudentBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_update_body(payload.into_inner())?;
    match state.student_commands.update_student(request).await {
        Ok(student) => Ok(HttpResponse::Ok().json(StudentResponse {
            student: student.into(),
        })),
        Err(error) => match RetakeCooldownResponse::from_error(&error) {
            Some(body) => Ok(HttpResponse::Conflict().json(body)),
            None => Err(error),
        },
    }
}

#[cfg(test)]
#[path = "students_tests.rs"]
mod tests;
