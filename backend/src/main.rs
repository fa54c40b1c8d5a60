//! Invigilation server entry-point: loads settings, connects the student
//! sheet and serves the HTTP API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::{DefaultClock, DefaultEnv};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use invigilation::inbound::http::health::HealthState;
use invigilation::outbound::sheets::connect_student_sheet;
use invigilation::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|e| {
        std::io::Error::other(format!("failed to load configuration: {e}"))
    })?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let sheets_config = settings.to_sheets_config().map_err(std::io::Error::other)?;
    info!(
        %bind_addr,
        spreadsheet_id = %sheets_config.spreadsheet_id,
        range = %sheets_config.range,
        "starting invigilation server"
    );

    let sheet = connect_student_sheet(sheets_config, &DefaultEnv::new(), Arc::new(DefaultClock));
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, sheet))?;
    server.await
}
