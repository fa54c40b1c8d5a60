//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the student endpoints, the health probes and the
//! schema wrappers that keep domain types free of utoipa derives. The
//! document backs Swagger UI in debug builds and is exported with
//! `cargo run --bin openapi-dump`.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::{
    RetakeCooldownResponse, StudentBody, StudentFoundResponse, StudentListResponse,
    StudentMissingResponse, StudentResponse, StudentUpdatesBody, StudentUpsertResponse,
    UpdateStudentBody, UpsertStudentBody,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Invigilation console API",
        description = "Student lookup, registration and approval backed by a Google Sheet."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::students::lookup_student,
        crate::inbound::http::students::list_students,
        crate::inbound::http::students::upsert_student,
        crate::inbound::http::students::update_student,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        StudentBody,
        StudentFoundResponse,
        StudentMissingResponse,
        StudentListResponse,
        StudentUpsertResponse,
        StudentResponse,
        RetakeCooldownResponse,
        UpsertStudentBody,
        StudentUpdatesBody,
        UpdateStudentBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "students", description = "Student lookup and bookkeeping"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
