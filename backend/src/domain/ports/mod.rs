//! Domain ports for the hexagonal boundary.
//!
//! Driving ports ([`StudentQuery`], [`StudentCommand`]) are called by inbound
//! adapters. The driven port ([`StudentSheet`]) is implemented by the
//! spreadsheet adapter.

mod macros;
pub(crate) use macros::define_port_error;

mod student_command;
mod student_query;
mod student_sheet;

#[cfg(test)]
pub use student_command::MockStudentCommand;
pub use student_command::{
    FixtureStudentCommand, StudentCommand, UpdateStudentRequest, UpsertOutcome,
    UpsertStudentResponse,
};
#[cfg(test)]
pub use student_query::MockStudentQuery;
pub use student_query::{FixtureStudentQuery, StudentQuery};
#[cfg(test)]
pub use student_sheet::MockStudentSheet;
pub use student_sheet::{FixtureStudentSheet, SheetSnapshot, StudentSheet, StudentSheetError};
