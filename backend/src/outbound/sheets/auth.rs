//! Service-account OAuth for the Sheets API.
//!
//! A signed RS256 assertion is exchanged at the key's `token_uri` for a
//! bearer token, which is cached until shortly before it expires.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use mockable::Clock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};
use zeroize::Zeroize;

use super::dto::TokenResponseDto;
use super::http_store::{body_preview, map_transport_error};
use crate::domain::ports::StudentSheetError;

/// OAuth scope granting read and write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_owned()
}

/// The fields of a Google service-account key file this adapter uses.
///
/// The private key is wiped from memory when the value is dropped.
#[derive(Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl ServiceAccountKey {
    /// Parse a key file's JSON text.
    ///
    /// # Errors
    /// Returns [`StudentSheetError::Credentials`] for malformed JSON or a
    /// key without a client email or private key.
    pub fn from_json(text: &str) -> Result<Self, StudentSheetError> {
        let key: Self = serde_json::from_str(text).map_err(|err| {
            StudentSheetError::credentials(format!("service-account key is not valid JSON: {err}"))
        })?;
        if key.client_email.trim().is_empty() || key.private_key.trim().is_empty() {
            return Err(StudentSheetError::credentials(
                "service-account key lacks client_email or private_key",
            ));
        }
        Ok(key)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl Drop for ServiceAccountKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Issues bearer tokens for a service account, caching between calls.
pub struct ServiceAccountTokenSource {
    client: Client,
    client_email: String,
    key_id: Option<String>,
    token_uri: String,
    signing_key: EncodingKey,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// Prepare a token source from a parsed key.
    ///
    /// # Errors
    /// Returns [`StudentSheetError::Credentials`] when the private key is not
    /// a usable RSA PEM.
    pub fn new(
        key: ServiceAccountKey,
        client: Client,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, StudentSheetError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|err| {
            StudentSheetError::credentials(format!("service-account private key rejected: {err}"))
        })?;
        Ok(Self {
            client,
            client_email: key.client_email.clone(),
            key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            signing_key,
            clock,
            cached: Mutex::new(None),
        })
    }

    /// Service-account email the spreadsheet must be shared with.
    pub fn client_email(&self) -> &str {
        &self.client_email
    }

    fn assertion(&self, now: DateTime<Utc>) -> Result<String, StudentSheetError> {
        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: SPREADSHEETS_SCOPE.to_owned(),
            aud: self.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key_id);
        jsonwebtoken::encode(&header, &claims, &self.signing_key).map_err(|err| {
            StudentSheetError::credentials(format!("could not sign token assertion: {err}"))
        })
    }

    /// Current bearer token, exchanging a fresh assertion when the cached
    /// token is missing or about to expire.
    ///
    /// # Errors
    /// `Unauthenticated` when the token endpoint rejects the assertion,
    /// `Transport`/`Decode` for network and payload failures.
    pub async fn access_token(&self) -> Result<String, StudentSheetError> {
        let mut cached = self.cached.lock().await;
        let now = self.clock.utc();
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        let assertion = self.assertion(now)?;
        let response = self
            .client
            .post(self.token_uri.as_str())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let message = format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body_preview(&body)
            );
            return Err(if status.is_client_error() {
                StudentSheetError::unauthenticated(message)
            } else {
                StudentSheetError::transport(message)
            });
        }

        let decoded: TokenResponseDto = serde_json::from_slice(&body).map_err(|err| {
            StudentSheetError::decode(format!("invalid token response: {err}"))
        })?;
        let token = CachedToken {
            value: decoded.access_token,
            expires_at: now + TimeDelta::seconds(decoded.expires_in),
        };
        info!(client_email = %self.client_email, "obtained Sheets access token");
        debug!(expires_at = %token.expires_at, "caching access token");
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }
}
