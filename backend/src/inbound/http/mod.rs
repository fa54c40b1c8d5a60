//! HTTP inbound adapter exposing the student REST endpoints.

use actix_web::web;

pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod students;
mod students_dto;
pub mod validation;

pub use error::ApiResult;
pub use students_dto::{
    CellInput, RetakeCooldownResponse, StudentBody, StudentFoundResponse, StudentListResponse,
    StudentLookupQuery, StudentMissingResponse, StudentResponse, StudentUpdatesBody,
    StudentUpsertResponse, UpdateStudentBody, UpsertStudentBody,
};

/// Register the student endpoints and the JSON/query extractor error
/// handlers on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use invigilation::inbound::http::configure;
///
/// let app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::query_config())
        .service(students::lookup_student)
        .service(students::list_students)
        .service(students::update_student)
        .service(students::upsert_student);
}
