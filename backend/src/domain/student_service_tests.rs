//! Unit tests for the student service.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockStudentSheet;
use crate::domain::{ErrorCode, FeeAmount, StudentFieldUpdates};
use crate::test_support::{InMemoryStudentSheet, MutableClock};

const APPROVED_AT: &str = "2025-02-10T12:00:00.000+05:30";
const CREATED_AT: &str = "2025-01-05T09:15:00.000+05:30";

fn approved_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 10, 6, 30, 0)
        .single()
        .expect("valid instant")
}

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn stored_row(mobile: &str, attempted: &str, last_approved_at: &str) -> Vec<String> {
    row(&[
        "Asha",
        mobile,
        "Pune",
        "Maharashtra",
        "Yes",
        "500",
        attempted,
        "No",
        last_approved_at,
        "seat 14",
        "",
        CREATED_AT,
    ])
}

fn details(mobile: &str) -> StudentDetails {
    StudentDetails {
        name: "Asha Kulkarni".to_owned(),
        mobile: MobileNumber::normalize(mobile).expect("mobile"),
        district: "Pune".to_owned(),
        state: "Maharashtra".to_owned(),
        paid: YesNo::Yes,
        fee_amount: FeeAmount::new("750").expect("fee"),
    }
}

fn retake(mobile: &str) -> UpdateStudentRequest {
    UpdateStudentRequest {
        mobile: MobileNumber::normalize(mobile).expect("mobile"),
        updates: StudentFieldUpdates {
            retake_allowed: Some(YesNo::Yes),
            ..StudentFieldUpdates::default()
        },
    }
}

struct Harness {
    sheet: Arc<InMemoryStudentSheet>,
    clock: Arc<MutableClock>,
    service: StudentService<InMemoryStudentSheet>,
}

fn harness(rows: Vec<Vec<String>>) -> Harness {
    let sheet = Arc::new(InMemoryStudentSheet::with_rows(rows));
    let clock = Arc::new(MutableClock::new(approved_instant()));
    let service = StudentService::new(sheet.clone(), clock.clone());
    Harness {
        sheet,
        clock,
        service,
    }
}

#[fixture]
fn empty() -> Harness {
    harness(Vec::new())
}

#[rstest]
#[tokio::test]
async fn upsert_creates_new_student(empty: Harness) {
    let response = empty
        .service
        .upsert_student(details("98765 43210"))
        .await
        .expect("upsert");

    assert_eq!(response.outcome, UpsertOutcome::Created);
    assert_eq!(response.student.row_number, 2);
    let record = &response.student.record;
    assert_eq!(record.mobile_no, "9876543210");
    assert_eq!(record.attempted, YesNo::Yes);
    assert_eq!(record.retake_allowed, YesNo::No);
    assert_eq!(record.created_at, APPROVED_AT);
    assert_eq!(record.last_approved_at, APPROVED_AT);

    let stored = empty.sheet.row(2).expect("row appended");
    assert_eq!(stored.len(), 12);
    assert_eq!(stored[1], "9876543210");
    assert_eq!(empty.sheet.append_count(), 1);
    assert_eq!(empty.sheet.read_count(), 1 + DUPLICATE_RECHECKS);
}

#[rstest]
#[tokio::test]
async fn upsert_refreshes_existing_row_and_keeps_created_at() {
    let h = harness(vec![
        stored_row("9000000001", "Yes", APPROVED_AT),
        stored_row("9876543210", "No", ""),
    ]);

    let response = h
        .service
        .upsert_student(details("98765-43210"))
        .await
        .expect("upsert");

    assert_eq!(response.outcome, UpsertOutcome::Updated);
    assert_eq!(response.student.row_number, 3);
    assert_eq!(h.sheet.append_count(), 0);
    assert_eq!(h.sheet.updated_rows(), vec![3]);

    let stored = h.sheet.row(3).expect("row");
    assert_eq!(stored[0], "Asha Kulkarni");
    assert_eq!(stored[5], "750");
    assert_eq!(stored[6], "No", "upsert must not touch Attempted");
    assert_eq!(stored[9], "seat 14", "reserved cells are preserved");
    assert_eq!(stored[11], CREATED_AT);
}

#[rstest]
#[case(1)]
#[case(2)]
#[tokio::test]
async fn upsert_updates_when_student_appears_during_recheck(#[case] after_read: usize) {
    let h = harness(Vec::new());
    h.sheet
        .append_after_read(after_read, stored_row("9876543210", "Yes", APPROVED_AT));

    let response = h
        .service
        .upsert_student(details("9876543210"))
        .await
        .expect("upsert");

    assert_eq!(response.outcome, UpsertOutcome::Updated);
    assert_eq!(response.student.row_number, 2);
    assert_eq!(h.sheet.append_count(), 0);
    assert_eq!(h.sheet.rows().len(), 1);
}

#[rstest]
#[tokio::test]
async fn update_rejects_unknown_student(empty: Harness) {
    let err = empty
        .service
        .update_student(retake("9876543210"))
        .await
        .expect_err("missing student");
    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(empty.sheet.append_count(), 0);
}

#[rstest]
#[case(TimeDelta::minutes(30), 12)]
#[case(TimeDelta::hours(3), 9)]
#[case(TimeDelta::minutes(11 * 60 + 59), 1)]
#[tokio::test]
async fn retake_inside_cooldown_is_rejected(#[case] elapsed: TimeDelta, #[case] remaining: u32) {
    let h = harness(vec![stored_row("9876543210", "Yes", APPROVED_AT)]);
    h.clock.advance(elapsed);

    let err = h
        .service
        .update_student(retake("9876543210"))
        .await
        .expect_err("cooldown");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(
        err.details().and_then(|d| d.get("remainingHours")),
        Some(&serde_json::json!(remaining))
    );
    assert!(h.sheet.updated_rows().is_empty(), "rejected retake writes nothing");
}

#[rstest]
#[tokio::test]
async fn retake_after_cooldown_refreshes_approval() {
    let h = harness(vec![stored_row("9876543210", "Yes", APPROVED_AT)]);
    h.clock.advance(TimeDelta::hours(13));

    let student = h
        .service
        .update_student(retake("9876543210"))
        .await
        .expect("retake granted");

    assert_eq!(student.record.retake_allowed, YesNo::Yes);
    assert_eq!(student.record.last_approved_at, "2025-02-11T01:00:00.000+05:30");
    assert_eq!(student.record.created_at, CREATED_AT);
    assert_eq!(h.sheet.row(2).expect("row")[8], "2025-02-11T01:00:00.000+05:30");
}

#[rstest]
#[case("")]
#[case("not a timestamp")]
#[tokio::test]
async fn retake_without_readable_approval_is_granted(#[case] last_approved_at: &str) {
    let h = harness(vec![stored_row("9876543210", "Yes", last_approved_at)]);

    let student = h
        .service
        .update_student(retake("9876543210"))
        .await
        .expect("retake granted");

    assert_eq!(student.record.last_approved_at, APPROVED_AT);
}

#[rstest]
#[case("No", APPROVED_AT)]
#[case("Yes", CREATED_AT)]
#[tokio::test]
async fn attempted_refreshes_approval_only_on_first_attempt(
    #[case] attempted_before: &str,
    #[case] expected_approval: &str,
) {
    let h = harness(vec![stored_row("9876543210", attempted_before, CREATED_AT)]);

    let student = h
        .service
        .update_student(UpdateStudentRequest {
            mobile: MobileNumber::normalize("9876543210").expect("mobile"),
            updates: StudentFieldUpdates {
                attempted: Some(YesNo::Yes),
                ..StudentFieldUpdates::default()
            },
        })
        .await
        .expect("update");

    assert_eq!(student.record.attempted, YesNo::Yes);
    assert_eq!(student.record.last_approved_at, expected_approval);
}

#[rstest]
#[tokio::test]
async fn plain_field_update_keeps_timestamps() {
    let h = harness(vec![stored_row("9876543210", "Yes", APPROVED_AT)]);

    let student = h
        .service
        .update_student(UpdateStudentRequest {
            mobile: MobileNumber::normalize("98765-43210").expect("mobile"),
            updates: StudentFieldUpdates {
                district: Some("Nashik".to_owned()),
                paid: Some(YesNo::No),
                ..StudentFieldUpdates::default()
            },
        })
        .await
        .expect("update");

    let stored = h.sheet.row(2).expect("row");
    assert_eq!(stored[2], "Nashik");
    assert_eq!(stored[4], "No");
    assert_eq!(stored[8], APPROVED_AT);
    assert_eq!(stored[11], CREATED_AT);
    assert_eq!(student.row_number, 2);
}

#[rstest]
#[tokio::test]
async fn listing_skips_blank_rows_and_keeps_row_numbers() {
    let h = harness(vec![
        stored_row("9000000001", "Yes", APPROVED_AT),
        row(&["", "  ", ""]),
        stored_row("9000000003", "No", ""),
    ]);

    let students = h.service.list_students().await.expect("list");

    let numbers: Vec<u32> = students.iter().map(|s| s.row_number).collect();
    assert_eq!(numbers, vec![2, 4]);
}

#[rstest]
#[tokio::test]
async fn lookup_matches_formatted_stored_numbers() {
    let h = harness(vec![stored_row("98765 43210", "Yes", APPROVED_AT)]);

    let found = h
        .service
        .find_by_mobile(&MobileNumber::normalize("9876543210").expect("mobile"))
        .await
        .expect("lookup")
        .expect("present");

    assert_eq!(found.row_number, 2);
    assert_eq!(found.record.mobile_no, "9876543210");
}

#[rstest]
#[case(StudentSheetError::credentials("no key file"), ErrorCode::StoreUnavailable)]
#[case(StudentSheetError::unauthenticated("invalid_grant"), ErrorCode::StoreUnavailable)]
#[case(StudentSheetError::permission_denied("caller lacks access"), ErrorCode::Forbidden)]
#[case(StudentSheetError::not_found("Sheet9"), ErrorCode::NotFound)]
#[case(StudentSheetError::transport("connection reset"), ErrorCode::StoreUnavailable)]
#[case(StudentSheetError::decode("bad json"), ErrorCode::StoreUnavailable)]
#[case(StudentSheetError::row_width(12_usize, 11_usize), ErrorCode::InternalError)]
#[tokio::test]
async fn sheet_errors_map_to_domain_codes(
    #[case] failure: StudentSheetError,
    #[case] expected: ErrorCode,
) {
    let mut sheet = MockStudentSheet::new();
    sheet
        .expect_fetch_rows()
        .times(1)
        .return_once(move || Err(failure));
    let service = StudentService::new(
        Arc::new(sheet),
        Arc::new(MutableClock::new(approved_instant())),
    );

    let err = service.list_students().await.expect_err("sheet failure");
    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn credential_errors_carry_a_remediation_hint(empty: Harness) {
    empty
        .sheet
        .fail_next(StudentSheetError::credentials("no key file"));

    let err = empty
        .service
        .find_by_mobile(&MobileNumber::normalize("9876543210").expect("mobile"))
        .await
        .expect_err("credentials");

    assert!(err.message().contains("GOOGLE_APPLICATION_CREDENTIALS"));
}

#[rstest]
#[tokio::test]
async fn failed_append_surfaces_error(empty: Harness) {
    let mut sheet = MockStudentSheet::new();
    sheet.expect_fetch_rows().returning(|| {
        Ok(SheetSnapshot {
            first_row: 2,
            rows: Vec::new(),
        })
    });
    sheet
        .expect_append_row()
        .times(1)
        .withf(|cells| cells.len() == 12)
        .return_once(|_| Err(StudentSheetError::transport("timeout")));
    let service = StudentService::new(Arc::new(sheet), empty.clock.clone());

    let err = service
        .upsert_student(details("9876543210"))
        .await
        .expect_err("append failure");
    assert_eq!(err.code(), ErrorCode::StoreUnavailable);
}
