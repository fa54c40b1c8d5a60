//! Reqwest-backed Google Sheets adapter for the student sheet.
//!
//! This adapter owns transport details only: range addressing, bearer
//! authentication, HTTP error mapping and JSON decoding into raw rows.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::{Clock, Env};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::{debug, info};

use super::auth::ServiceAccountTokenSource;
use super::credentials::{load_service_account_key, resolve_credentials};
use super::dto::{ApiErrorDto, AppendResponseDto, ValueRangeBody, ValueRangeDto};
use super::range::{SheetRange, first_row_of};
use crate::domain::ensure_row_width;
use crate::domain::ports::{SheetSnapshot, StudentSheet, StudentSheetError};

/// Public Sheets API host.
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/";
const USER_AGENT: &str = concat!("invigilation/", env!("CARGO_PKG_VERSION"));

/// Spreadsheet coordinates and transport settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub range: SheetRange,
    /// Explicit key path; `None` falls back to environment discovery.
    pub credentials_path: Option<PathBuf>,
    pub request_timeout: Duration,
    pub base_url: Url,
}

/// Student sheet backed by the Sheets v4 `values` API.
pub struct SheetsHttpStore {
    client: Client,
    tokens: ServiceAccountTokenSource,
    values_url: Url,
    range: SheetRange,
}

impl SheetsHttpStore {
    /// Resolve and load the service-account key, then build the store.
    ///
    /// # Errors
    /// Returns `Credentials` when no usable key is found and `Transport`
    /// when the HTTP client or base URL is unusable.
    pub fn connect<E>(
        config: SheetsConfig,
        env: &E,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StudentSheetError>
    where
        E: Env + ?Sized,
    {
        let source = resolve_credentials(config.credentials_path.as_deref(), env, |path| {
            path.is_file()
        })?;
        let key = load_service_account_key(&source)?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(map_transport_error)?;
        let tokens = ServiceAccountTokenSource::new(key, client.clone(), clock)?;
        Self::with_token_source(config, client, tokens)
    }

    /// Build the store around an existing client and token source.
    ///
    /// # Errors
    /// Returns `Transport` when the base URL cannot carry path segments.
    pub fn with_token_source(
        config: SheetsConfig,
        client: Client,
        tokens: ServiceAccountTokenSource,
    ) -> Result<Self, StudentSheetError> {
        let values_url = values_url(&config.base_url, &config.spreadsheet_id)?;
        info!(
            spreadsheet_id = %config.spreadsheet_id,
            range = %config.range,
            client_email = %tokens.client_email(),
            "Sheets student store ready"
        );
        Ok(Self {
            client,
            tokens,
            values_url,
            range: config.range,
        })
    }

    fn range_url(&self, range: &str, suffix: &str) -> Result<Url, StudentSheetError> {
        let mut url = self.values_url.clone();
        url.path_segments_mut()
            .map_err(|()| StudentSheetError::transport("Sheets base URL cannot be a base"))?
            .push(&format!("{range}{suffix}"));
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, StudentSheetError> {
        let token = self.tokens.access_token().await?;
        let response = request
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        Ok(body.to_vec())
    }
}

fn values_url(base_url: &Url, spreadsheet_id: &str) -> Result<Url, StudentSheetError> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|()| StudentSheetError::transport("Sheets base URL cannot be a base"))?
        .pop_if_empty()
        .extend(["v4", "spreadsheets", spreadsheet_id, "values"]);
    Ok(url)
}

fn decode_error(what: &str, error: &serde_json::Error) -> StudentSheetError {
    StudentSheetError::decode(format!("invalid {what} payload: {error}"))
}

/// Drop the header row when the range starts at row 1.
fn snapshot_from(range: &SheetRange, mut rows: Vec<Vec<String>>) -> SheetSnapshot {
    if range.has_header() && !rows.is_empty() {
        rows.remove(0);
    }
    SheetSnapshot {
        first_row: range.first_data_row(),
        rows,
    }
}

fn appended_row(body: &[u8]) -> Result<u32, StudentSheetError> {
    let decoded: AppendResponseDto =
        serde_json::from_slice(body).map_err(|err| decode_error("append response", &err))?;
    decoded
        .updates
        .and_then(|updates| updates.updated_range)
        .as_deref()
        .and_then(first_row_of)
        .ok_or_else(|| StudentSheetError::decode("append response lacks updates.updatedRange"))
}

#[async_trait]
impl StudentSheet for SheetsHttpStore {
    async fn fetch_rows(&self) -> Result<SheetSnapshot, StudentSheetError> {
        let mut url = self.range_url(&self.range.read_range(), "")?;
        url.query_pairs_mut()
            .append_pair("majorDimension", "ROWS")
            .append_pair("valueRenderOption", "FORMATTED_VALUE");
        let body = self.send(self.client.get(url)).await?;
        let decoded: ValueRangeDto =
            serde_json::from_slice(&body).map_err(|err| decode_error("values", &err))?;
        let snapshot = snapshot_from(&self.range, decoded.into_rows());
        debug!(rows = snapshot.rows.len(), "fetched student rows");
        Ok(snapshot)
    }

    async fn update_row(
        &self,
        row_number: u32,
        cells: &[String],
    ) -> Result<(), StudentSheetError> {
        ensure_row_width(cells)
            .map_err(|err| StudentSheetError::row_width(err.expected, err.actual))?;
        let range = self.range.row_range(row_number);
        let mut url = self.range_url(&range, "")?;
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");
        self.send(
            self.client
                .put(url)
                .json(&ValueRangeBody::single_row(&range, cells)),
        )
        .await?;
        debug!(row_number, "rewrote student row");
        Ok(())
    }

    async fn append_row(&self, cells: &[String]) -> Result<u32, StudentSheetError> {
        ensure_row_width(cells)
            .map_err(|err| StudentSheetError::row_width(err.expected, err.actual))?;
        let range = self.range.append_range();
        let mut url = self.range_url(&range, ":append")?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "RAW")
            .append_pair("insertDataOption", "INSERT_ROWS");
        let body = self
            .send(
                self.client
                    .post(url)
                    .json(&ValueRangeBody::single_row(&range, cells)),
            )
            .await?;
        let row_number = appended_row(&body)?;
        debug!(row_number, "appended student row");
        Ok(row_number)
    }
}

pub(super) fn map_transport_error(error: reqwest::Error) -> StudentSheetError {
    if error.is_timeout() {
        StudentSheetError::transport(format!("request timed out: {error}"))
    } else {
        StudentSheetError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> StudentSheetError {
    let detail = serde_json::from_slice::<ApiErrorDto>(body)
        .ok()
        .map(|dto| {
            if dto.error.status.is_empty() {
                dto.error.message
            } else {
                format!("{} ({})", dto.error.message, dto.error.status)
            }
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| body_preview(body));
    let message = if detail.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), detail)
    };

    match status {
        StatusCode::UNAUTHORIZED => StudentSheetError::unauthenticated(message),
        StatusCode::FORBIDDEN => StudentSheetError::permission_denied(message),
        StatusCode::NOT_FOUND => StudentSheetError::not_found(message),
        _ => StudentSheetError::transport(message),
    }
}

pub(super) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
