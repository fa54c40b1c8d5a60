//! Locating and loading the service-account key file.
//!
//! Lookup order: the configured path, then `GOOGLE_APPLICATION_CREDENTIALS`,
//! then the platform secret file, then local fallbacks in the working
//! directory. The first two are taken as given; the rest only count when
//! the file exists.

use std::path::{Path, PathBuf};

use mockable::Env;
use tracing::info;

use super::auth::ServiceAccountKey;
use crate::domain::ports::StudentSheetError;

/// Environment variable naming the key file.
pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";
/// Secret-file mount used by hosting platforms.
pub const PLATFORM_SECRET_FILE: &str = "/etc/secrets/credentials.json";
/// Working-directory fallbacks, tried in order.
pub const LOCAL_FALLBACKS: [&str; 2] = ["credentials.json", "service-account.json"];

/// Where a key path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOrigin {
    Configured,
    Environment,
    PlatformSecret,
    LocalFallback,
}

/// A resolved key path and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSource {
    pub path: PathBuf,
    pub origin: CredentialOrigin,
}

/// Pick the key file to load.
///
/// # Errors
/// Returns [`StudentSheetError::Credentials`] listing every location tried
/// when none applies.
///
/// # Examples
/// ```
/// use std::path::Path;
///
/// use invigilation::outbound::sheets::{CredentialOrigin, resolve_credentials};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string()
///     .returning(|_| Some("/run/keys/sa.json".to_owned()));
/// let source = resolve_credentials(None, &env, |_| false).expect("from env");
/// assert_eq!(source.path, Path::new("/run/keys/sa.json"));
/// assert_eq!(source.origin, CredentialOrigin::Environment);
/// ```
pub fn resolve_credentials<E, F>(
    configured: Option<&Path>,
    env: &E,
    exists: F,
) -> Result<CredentialSource, StudentSheetError>
where
    E: Env + ?Sized,
    F: Fn(&Path) -> bool,
{
    if let Some(path) = configured {
        return Ok(CredentialSource {
            path: path.to_path_buf(),
            origin: CredentialOrigin::Configured,
        });
    }
    if let Some(path) = env
        .string(CREDENTIALS_ENV)
        .filter(|value| !value.trim().is_empty())
    {
        return Ok(CredentialSource {
            path: PathBuf::from(path.trim()),
            origin: CredentialOrigin::Environment,
        });
    }

    let platform = Path::new(PLATFORM_SECRET_FILE);
    if exists(platform) {
        return Ok(CredentialSource {
            path: platform.to_path_buf(),
            origin: CredentialOrigin::PlatformSecret,
        });
    }
    LOCAL_FALLBACKS
        .iter()
        .map(Path::new)
        .find(|path| exists(path))
        .map(|path| CredentialSource {
            path: path.to_path_buf(),
            origin: CredentialOrigin::LocalFallback,
        })
        .ok_or_else(|| {
            StudentSheetError::credentials(format!(
                "no service-account key found; set {CREDENTIALS_ENV} or provide \
                 {PLATFORM_SECRET_FILE}, ./{} or ./{}",
                LOCAL_FALLBACKS[0], LOCAL_FALLBACKS[1]
            ))
        })
}

/// Read and parse the key at `source`.
///
/// # Errors
/// Returns [`StudentSheetError::Credentials`] naming the path when the file
/// cannot be read or parsed.
pub fn load_service_account_key(
    source: &CredentialSource,
) -> Result<ServiceAccountKey, StudentSheetError> {
    let path = source.path.display();
    let text = std::fs::read_to_string(&source.path).map_err(|err| {
        StudentSheetError::credentials(format!("cannot read service-account key {path}: {err}"))
    })?;
    let key = ServiceAccountKey::from_json(&text).map_err(|err| {
        StudentSheetError::credentials(format!("{path}: {err}"))
    })?;
    info!(
        path = %path,
        origin = ?source.origin,
        client_email = %key.client_email,
        "loaded service-account key"
    );
    Ok(key)
}
