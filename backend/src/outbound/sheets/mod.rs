//! Google Sheets adapter for the [`StudentSheet`] port.
//!
//! - [`range`]: A1 addressing for the configured 12-column span.
//! - [`credentials`] / [`auth`]: service-account discovery and the OAuth
//!   JWT-bearer token exchange.
//! - [`http_store`]: the `values` API client.
//! - [`unavailable`]: fallback used when the store cannot start.

mod auth;
mod credentials;
mod dto;
mod http_store;
mod range;
mod unavailable;

use std::sync::Arc;

use mockable::{Clock, Env};
use tracing::error;

use crate::domain::ports::StudentSheet;

pub use auth::{SPREADSHEETS_SCOPE, ServiceAccountKey, ServiceAccountTokenSource};
pub use credentials::{
    CREDENTIALS_ENV, CredentialOrigin, CredentialSource, LOCAL_FALLBACKS, PLATFORM_SECRET_FILE,
    load_service_account_key, resolve_credentials,
};
pub use http_store::{DEFAULT_SHEETS_BASE_URL, SheetsConfig, SheetsHttpStore};
pub use range::{SheetRange, SheetRangeError};
pub use unavailable::UnavailableStudentSheet;

/// Build the student sheet for `config`.
///
/// A store that cannot start (missing or unusable credentials, a bad base
/// URL) is logged and replaced by an [`UnavailableStudentSheet`] so the
/// failure reaches callers as a remediation hint.
pub fn connect_student_sheet<E>(
    config: SheetsConfig,
    env: &E,
    clock: Arc<dyn Clock>,
) -> Arc<dyn StudentSheet>
where
    E: Env + ?Sized,
{
    match SheetsHttpStore::connect(config, env, clock) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            error!(error = %err, "Google Sheets store unavailable; serving errors until restart");
            Arc::new(UnavailableStudentSheet::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use mockable::{DefaultClock, MockEnv};
    use reqwest::Url;
    use rstest::rstest;

    use crate::domain::ports::StudentSheetError;

    #[rstest]
    #[tokio::test]
    async fn missing_key_file_falls_back_to_unavailable_sheet() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = SheetsConfig {
            spreadsheet_id: "sheet-id".to_owned(),
            range: SheetRange::parse("Sheet1", "A:L").expect("range"),
            credentials_path: Some(dir.path().join("absent.json")),
            request_timeout: Duration::from_secs(5),
            base_url: Url::parse(DEFAULT_SHEETS_BASE_URL).expect("base url"),
        };
        let mut env = MockEnv::new();
        env.expect_string().returning(|_| None);

        let sheet = connect_student_sheet(config, &env, Arc::new(DefaultClock));
        let err = sheet.fetch_rows().await.expect_err("no credentials");
        assert!(matches!(err, StudentSheetError::Credentials { .. }));
    }
}
