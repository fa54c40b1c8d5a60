//! Domain primitives, services and ports.
//!
//! Purpose: keep the student bookkeeping rules (mobile number normalisation,
//! the fixed 12-cell row layout, duplicate avoidance and the retake
//! cooldown) independent of HTTP and of the Google Sheets transport.
//!
//! Public surface:
//! - [`StudentService`]: implements the [`ports::StudentQuery`] and
//!   [`ports::StudentCommand`] driving ports over a [`ports::StudentSheet`].
//! - [`StudentRecord`] / [`StoredStudent`]: one sheet row and its position.
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure payload.

pub mod error;
mod fee_amount;
mod mobile_number;
pub mod ports;
mod retake_policy;
mod student;
mod student_service;
mod timestamp;
mod trace_id;
mod yes_no;

pub use self::error::{Error, ErrorCode};
pub use self::fee_amount::{FeeAmount, FeeAmountValidationError};
pub use self::mobile_number::{MobileNumber, MobileNumberError, digits_only};
pub use self::retake_policy::{RETAKE_COOLDOWN_HOURS, RetakeDecision, evaluate_retake};
pub use self::student::{
    MOBILE_NO_COLUMN, ROW_WIDTH, RowWidthError, StoredStudent, StudentDetails, StudentFieldUpdates,
    StudentRecord, ensure_row_width,
};
pub use self::student_service::{DUPLICATE_RECHECKS, StudentService};
pub use self::timestamp::{format_ist, parse_sheet_timestamp};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::yes_no::{YesNo, YesNoParseError};
