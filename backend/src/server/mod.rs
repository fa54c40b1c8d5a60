//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use invigilation::Trace;
#[cfg(debug_assertions)]
use invigilation::doc::ApiDoc;
use invigilation::domain::StudentService;
use invigilation::domain::ports::StudentSheet;
use invigilation::inbound::http::configure;
use invigilation::inbound::http::health::{HealthState, live, ready};
use invigilation::inbound::http::state::HttpState;

/// Wire the student service over the configured sheet into handler state.
fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let service: Arc<StudentService<dyn StudentSheet>> = Arc::new(StudentService::new(
        config.sheet.clone(),
        config.clock.clone(),
    ));
    web::Data::new(HttpState::from_service(service))
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(configure);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    //! Tests for server bootstrap and route wiring.

    use super::*;
    use std::net::SocketAddr;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use invigilation::test_support::{InMemoryStudentSheet, MutableClock};

    #[fixture]
    fn health_state() -> web::Data<HealthState> {
        web::Data::new(HealthState::new())
    }

    fn config(sheet: Arc<dyn StudentSheet>) -> ServerConfig {
        let clock = MutableClock::new(
            Utc.with_ymd_and_hms(2025, 2, 10, 6, 30, 0)
                .single()
                .expect("valid instant"),
        );
        let bind_addr: SocketAddr = "127.0.0.1:0".parse().expect("socket address");
        ServerConfig::new(bind_addr, sheet).with_clock(Arc::new(clock))
    }

    #[rstest]
    #[actix_web::test]
    async fn create_server_marks_ready(health_state: web::Data<HealthState>) {
        assert!(!health_state.is_ready(), "state should start unready");

        let _server = create_server(
            health_state.clone(),
            config(Arc::new(InMemoryStudentSheet::new())),
        )
        .expect("server should bind an ephemeral port");

        assert!(
            health_state.is_ready(),
            "server creation should mark readiness"
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn app_serves_students_and_probes(health_state: web::Data<HealthState>) {
        health_state.mark_ready();
        let config = config(Arc::new(InMemoryStudentSheet::new()));
        let app =
            actix_test::init_service(build_app(health_state, build_http_state(&config))).await;

        let probe = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/ready").to_request(),
        )
        .await;
        assert_eq!(probe.status(), StatusCode::OK);

        let created = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/student")
                .set_json(json!({
                    "Name": "Asha",
                    "MobileNo": "98765-43210",
                    "District": "Pune",
                    "State": "Maharashtra",
                    "Paid": "Yes",
                    "FeeAmount": "500"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);
        assert!(created.headers().contains_key("trace-id"));
        let body: Value = actix_test::read_body_json(created).await;
        assert_eq!(body["student"]["CreatedAt"], "2025-02-10T12:00:00.000+05:30");
    }
}
