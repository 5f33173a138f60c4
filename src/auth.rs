//! Credential providers.
//!
//! Two on-disk credential formats are understood:
//!
//! - `~/.hs_auth` holds an OAuth2 token and client id, encoded with `bincode`
//!   as the tuple `(OAuthToken, String)`;
//! - `~/.hs_auth_basic` holds a JSON document `{"usr": "...", "pwd": "..."}`.
//!
//! Each provider builds an authenticated [`HydroShareClient`] and verifies it
//! with one identity request before handing it out.

use crate::configuration::Configuration;
use crate::hydroshare::{ApiError, HydroShareAuth, HydroShareClient, OAuthToken};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const OAUTH_CREDENTIALS_FILE_NAME: &str = ".hs_auth";
pub const BASIC_CREDENTIALS_FILE_NAME: &str = ".hs_auth_basic";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no credentials found at {0}")]
    NotFound(PathBuf),
    #[error("failed to read credentials from {path}: {cause}")]
    Io {
        path: PathBuf,
        cause: std::io::Error,
    },
    #[error("malformed credentials in {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("failed to create HydroShare client: {0}")]
    Client(#[source] ApiError),
    #[error("credentials were rejected by HydroShare: {0}")]
    Verification(#[source] ApiError),
    #[error("failed to resolve the home directory")]
    NoHomeDirectory,
}

impl AuthError {
    /// True when the file simply isn't there, as opposed to being unusable
    pub fn is_missing(&self) -> bool {
        matches!(self, AuthError::NotFound(_))
    }
}

/// A source of HydroShare credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Short label used in log messages
    fn name(&self) -> &'static str;

    /// Location of the credential file
    fn path(&self) -> &Path;

    /// Load the credentials, build a client for `api_url` and verify it
    async fn authenticate(&self, api_url: &Url) -> Result<HydroShareClient, AuthError>;
}

fn read_credentials_file(path: &Path) -> Result<Vec<u8>, AuthError> {
    match fs::read(path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AuthError::NotFound(path.to_path_buf()))
        }
        Err(cause) => Err(AuthError::Io {
            path: path.to_path_buf(),
            cause,
        }),
    }
}

fn write_credentials_file(path: &Path, bytes: &[u8]) -> Result<(), AuthError> {
    let io_error = |cause| AuthError::Io {
        path: path.to_path_buf(),
        cause,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, bytes).map_err(io_error)
}

fn home_file(name: &str) -> Result<PathBuf, AuthError> {
    dirs::home_dir()
        .map(|home| home.join(name))
        .ok_or(AuthError::NoHomeDirectory)
}

async fn verify(api_url: &Url, auth: HydroShareAuth) -> Result<HydroShareClient, AuthError> {
    let client = HydroShareClient::new(api_url, auth).map_err(AuthError::Client)?;
    let user = client
        .get_user_info()
        .await
        .map_err(AuthError::Verification)?;
    debug!("Authenticated as {}", user.username);
    Ok(client)
}

/// Username and password in the basic credential file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicCredentialRecord {
    pub usr: String,
    pub pwd: String,
}

/// Basic authentication credentials stored as JSON
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    path: PathBuf,
}

impl BasicCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf, AuthError> {
        home_file(BASIC_CREDENTIALS_FILE_NAME)
    }

    pub fn load(&self) -> Result<BasicCredentialRecord, AuthError> {
        let bytes = read_credentials_file(&self.path)?;
        serde_json::from_slice(&bytes).map_err(|e| AuthError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    pub fn store(&self, record: &BasicCredentialRecord) -> Result<(), AuthError> {
        let json = serde_json::to_vec_pretty(record).map_err(|e| AuthError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        write_credentials_file(&self.path, &json)
    }
}

#[async_trait]
impl CredentialProvider for BasicCredentials {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn authenticate(&self, api_url: &Url) -> Result<HydroShareClient, AuthError> {
        let record = self.load()?;
        let auth = HydroShareAuth::Basic {
            username: record.usr,
            password: record.pwd,
        };
        verify(api_url, auth).await
    }
}

/// OAuth2 token and client id stored with `bincode`
#[derive(Debug, Clone)]
pub struct OAuth2Credentials {
    path: PathBuf,
}

impl OAuth2Credentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf, AuthError> {
        home_file(OAUTH_CREDENTIALS_FILE_NAME)
    }

    pub fn load(&self) -> Result<(OAuthToken, String), AuthError> {
        let bytes = read_credentials_file(&self.path)?;
        bincode::deserialize(&bytes).map_err(|e| AuthError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    pub fn store(&self, token: &OAuthToken, client_id: &str) -> Result<(), AuthError> {
        let bytes = bincode::serialize(&(token, client_id)).map_err(|e| AuthError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        write_credentials_file(&self.path, &bytes)
    }
}

#[async_trait]
impl CredentialProvider for OAuth2Credentials {
    fn name(&self) -> &'static str {
        "oauth2"
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn authenticate(&self, api_url: &Url) -> Result<HydroShareClient, AuthError> {
        let (token, client_id) = self.load()?;
        let auth = HydroShareAuth::OAuth2 {
            client_id,
            client_secret: String::new(),
            token,
        };
        verify(api_url, auth).await
    }
}

/// The providers tried when connecting, in order: OAuth2 first, then basic.
pub fn default_providers(
    configuration: &Configuration,
) -> Result<Vec<Box<dyn CredentialProvider>>, AuthError> {
    let oauth_path = match configuration.oauth_credentials() {
        Some(path) => path.to_path_buf(),
        None => OAuth2Credentials::default_path()?,
    };
    let basic_path = match configuration.basic_credentials() {
        Some(path) => path.to_path_buf(),
        None => BasicCredentials::default_path()?,
    };

    Ok(vec![
        Box::new(OAuth2Credentials::new(oauth_path)),
        Box::new(BasicCredentials::new(basic_path)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> OAuthToken {
        OAuthToken {
            access_token: "abc".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: Some(36000),
            refresh_token: None,
            scope: Some("read write".to_string()),
        }
    }

    #[test]
    fn test_basic_credentials_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = BasicCredentials::new(dir.path().join("nothing"));
        assert!(provider.load().unwrap_err().is_missing());
    }

    #[test]
    fn test_basic_credentials_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let provider = BasicCredentials::new(dir.path().join(BASIC_CREDENTIALS_FILE_NAME));
        let record = BasicCredentialRecord {
            usr: "alice".to_string(),
            pwd: "secret".to_string(),
        };
        provider.store(&record).unwrap();
        assert_eq!(provider.load().unwrap(), record);
    }

    #[test]
    fn test_basic_credentials_require_both_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BASIC_CREDENTIALS_FILE_NAME);
        fs::write(&path, r#"{"usr": "alice"}"#).unwrap();
        let error = BasicCredentials::new(&path).load().unwrap_err();
        assert!(matches!(error, AuthError::Malformed { .. }));
    }

    #[test]
    fn test_oauth_credentials_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let provider = OAuth2Credentials::new(dir.path().join(OAUTH_CREDENTIALS_FILE_NAME));
        provider.store(&token(), "client-1").unwrap();
        let (loaded, client_id) = provider.load().unwrap();
        assert_eq!(loaded, token());
        assert_eq!(client_id, "client-1");
    }

    #[test]
    fn test_oauth_credentials_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(OAUTH_CREDENTIALS_FILE_NAME);
        fs::write(&path, [0xffu8, 0x01]).unwrap();
        let error = OAuth2Credentials::new(&path).load().unwrap_err();
        assert!(matches!(error, AuthError::Malformed { .. }));
    }
}
