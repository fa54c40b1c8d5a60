//! Process settings loaded via OrthoConfig.
//!
//! Every value can come from the command line, an `INVIGILATION_*`
//! environment variable or a configuration file. Settings are resolved once
//! at startup and turned into explicit adapter configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::outbound::sheets::{DEFAULT_SHEETS_BASE_URL, SheetRange, SheetRangeError, SheetsConfig};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SHEET_NAME: &str = "Sheet1";
const DEFAULT_COLUMNS: &str = "A:L";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while turning settings into runtime configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No spreadsheet was configured.
    #[error("missing spreadsheet id; set INVIGILATION_SPREADSHEET_ID")]
    MissingSpreadsheetId,
    /// The bind address is not a socket address.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// The sheet name or column span is unusable.
    #[error(transparent)]
    InvalidRange(#[from] SheetRangeError),
    /// The Sheets API base URL does not parse.
    #[error("invalid sheets base URL '{value}': {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    /// A zero timeout would fail every request.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Settings for the invigilation server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "INVIGILATION")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// ID of the spreadsheet holding student rows.
    pub spreadsheet_id: Option<String>,
    /// Name of the sheet (tab) inside the spreadsheet.
    pub sheet_name: Option<String>,
    /// Column span, `A:L` or `A2:L`.
    pub columns: Option<String>,
    /// Explicit service-account key path.
    pub credentials_path: Option<PathBuf>,
    /// Timeout in seconds for each Sheets API request.
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
    /// Override for the Sheets API host.
    pub sheets_base_url: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_addr: None,
            spreadsheet_id: None,
            sheet_name: None,
            columns: None,
            credentials_path: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            sheets_base_url: None,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl AppSettings {
    /// Parse the configured bind address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidBindAddr`] for unparseable values.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = non_blank(self.bind_addr.as_deref()).unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Return the sheet name, falling back to `Sheet1`.
    pub fn sheet_name(&self) -> &str {
        non_blank(self.sheet_name.as_deref()).unwrap_or(DEFAULT_SHEET_NAME)
    }

    /// Return the column span, falling back to `A:L`.
    pub fn columns(&self) -> &str {
        non_blank(self.columns.as_deref()).unwrap_or(DEFAULT_COLUMNS)
    }

    /// Return the per-request timeout (30 seconds unless configured).
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolve the adapter configuration.
    ///
    /// # Errors
    /// Returns a [`SettingsError`] naming the first unusable value.
    pub fn to_sheets_config(&self) -> Result<SheetsConfig, SettingsError> {
        let spreadsheet_id = non_blank(self.spreadsheet_id.as_deref())
            .ok_or(SettingsError::MissingSpreadsheetId)?
            .to_owned();
        let range = SheetRange::parse(self.sheet_name(), self.columns())?;
        let base_url_text =
            non_blank(self.sheets_base_url.as_deref()).unwrap_or(DEFAULT_SHEETS_BASE_URL);
        let base_url =
            Url::parse(base_url_text).map_err(|source| SettingsError::InvalidBaseUrl {
                value: base_url_text.to_owned(),
                source,
            })?;
        let request_timeout = self.request_timeout();
        if request_timeout.is_zero() {
            return Err(SettingsError::ZeroTimeout);
        }

        Ok(SheetsConfig {
            spreadsheet_id,
            range,
            credentials_path: self.credentials_path.clone(),
            request_timeout,
            base_url,
        })
    }
}
