//! Async client for the HydroShare REST API (`hsapi`).
//!
//! Only the endpoints used by the command line tools are covered: identity,
//! resource listing, system and science metadata, resource creation, file
//! upload and listing, bag download and deletion.

use crate::metadata::{ScienceMetadata, SystemMetadata};
use crate::model::{
    CreatedResourceResponse, Page, ResourceFile, ResourceQuery, ResourceSummary,
    ResourceTypeEntry, UserInfo,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, trace, warn};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://www.hydroshare.org/hsapi/";

/// Number of resources requested per page when listing
pub const PAGE_SIZE: usize = 25;

const USER_AGENT: &str = "hstools";
const REQUEST_TIMEOUT_SECONDS: u64 = 1800;
const BAG_RETRY_ATTEMPTS: u32 = 10;
const BAG_RETRY_DELAY: Duration = Duration::from_secs(3);

/// How often, and how far apart, a bag download is retried while the server
/// is still building the bag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BagRetry {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for BagRetry {
    fn default() -> Self {
        Self {
            attempts: BAG_RETRY_ATTEMPTS,
            delay: BAG_RETRY_DELAY,
        }
    }
}

/// Error emitted by the HydroShare API client
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("HydroShare responded with {status} for {url}: {body}")]
    Status {
        status: StatusCode,
        url: String,
        body: String,
    },
    #[error("invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("the bag for resource {0} is still being prepared, try again later")]
    BagNotReady(String),
    #[error("failed to unpack resource bag: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::HttpError(e) => e.status(),
            _ => None,
        }
    }
}

/// OAuth2 bearer token as issued by HydroShare
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// How requests are authenticated
#[derive(Clone)]
pub enum HydroShareAuth {
    Basic {
        username: String,
        password: String,
    },
    OAuth2 {
        client_id: String,
        client_secret: String,
        token: OAuthToken,
    },
}

impl std::fmt::Debug for HydroShareAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HydroShareAuth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            HydroShareAuth::OAuth2 { client_id, .. } => f
                .debug_struct("OAuth2")
                .field("client_id", client_id)
                .finish_non_exhaustive(),
        }
    }
}

impl HydroShareAuth {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            HydroShareAuth::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            HydroShareAuth::OAuth2 { token, .. } => request.bearer_auth(&token.access_token),
        }
    }
}

/// Authenticated handle to a HydroShare server.
///
/// Cloning is cheap: clones share the underlying connection pool, which lets a
/// request run on a worker task while the caller keeps the handle.
#[derive(Clone, Debug)]
pub struct HydroShareClient {
    client: Arc<Client>,
    base_url: Url,
    auth: HydroShareAuth,
    bag_retry: BagRetry,
}

impl HydroShareClient {
    pub fn new(base_url: &Url, auth: HydroShareAuth) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()?;

        // endpoint paths are joined relative to the base, which needs a trailing slash
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: Arc::new(client),
            base_url,
            auth,
            bag_retry: BagRetry::default(),
        })
    }

    pub fn with_bag_retry(mut self, bag_retry: BagRetry) -> Self {
        self.bag_retry = bag_retry;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    /// `resource/<id>/<tail...>/` with the id pushed as one percent-encoded
    /// segment, so it can never address another endpoint
    fn resource_endpoint(&self, resource_id: &str, tail: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.endpoint("resource/")?;
        url.path_segments_mut()
            .map_err(|_| ApiError::UrlError(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(resource_id)
            .extend(tail)
            .push("");
        Ok(url)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to read error response body: {}", e);
                String::new()
            }
        };
        error!("Request to {} failed with status {}: {}", url, status, body);
        Err(ApiError::Status { status, url, body })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        debug!("GET {}", url);
        let request = self.auth.apply(self.client.get(url).query(query));
        let response = Self::check(request.send().await?).await?;

        let text = response.text().await?;
        trace!("Raw response text for deserialization: {}", text);
        match serde_json::from_str::<T>(&text) {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("Failed to deserialize response: {}. Raw response: {}", e, text);
                Err(ApiError::JsonError(e))
            }
        }
    }

    /// Identity of the authenticated user. Also serves as the credential check.
    pub async fn get_user_info(&self) -> Result<UserInfo, ApiError> {
        self.get_json(self.endpoint("userInfo/")?, &[]).await
    }

    /// Names of the resource types the server accepts
    pub async fn get_resource_types(&self) -> Result<Vec<String>, ApiError> {
        let entries: Vec<ResourceTypeEntry> =
            self.get_json(self.endpoint("resource/types/")?, &[]).await?;
        Ok(entries.into_iter().map(|e| e.resource_type).collect())
    }

    /// Fetch one page of the resource listing
    pub async fn list_resources_page(
        &self,
        query: &ResourceQuery,
        page: usize,
    ) -> Result<Page<ResourceSummary>, ApiError> {
        let mut params = query.query_pairs();
        params.push(("count", PAGE_SIZE.to_string()));
        params.push(("page", page.to_string()));
        self.get_json(self.endpoint("resource/")?, &params).await
    }

    /// Walk the resource listing page by page until exhausted or the limit is hit
    pub async fn list_resources(
        &self,
        query: &ResourceQuery,
    ) -> Result<Vec<ResourceSummary>, ApiError> {
        let mut resources = Vec::new();
        let mut page = 1;
        loop {
            let current = self.list_resources_page(query, page).await?;
            let has_next = current.next.is_some();
            resources.extend(current.results);

            if let Some(limit) = query.limit {
                if resources.len() >= limit {
                    resources.truncate(limit);
                    break;
                }
            }
            if !has_next {
                break;
            }
            page += 1;
        }
        Ok(resources)
    }

    pub async fn get_system_metadata(&self, resource_id: &str) -> Result<SystemMetadata, ApiError> {
        let url = self.resource_endpoint(resource_id, &["sysmeta"])?;
        self.get_json(url, &[]).await
    }

    pub async fn get_science_metadata(
        &self,
        resource_id: &str,
    ) -> Result<ScienceMetadata, ApiError> {
        let url = self.resource_endpoint(resource_id, &["scimeta", "elements"])?;
        self.get_json(url, &[]).await
    }

    /// All files attached to a resource, following pagination
    pub async fn get_resource_files(&self, resource_id: &str) -> Result<Vec<ResourceFile>, ApiError> {
        let mut files = Vec::new();
        let mut page = 1;
        loop {
            let url = self.resource_endpoint(resource_id, &["files"])?;
            let current: Page<ResourceFile> =
                self.get_json(url, &[("page", page.to_string())]).await?;
            files.extend(current.results);
            if current.next.is_none() {
                break;
            }
            page += 1;
        }
        Ok(files)
    }

    async fn file_part(path: &Path) -> Result<Part, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        let mime_type = mime::APPLICATION_OCTET_STREAM;
        Ok(Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_type.as_ref())?)
    }

    /// Create a resource, optionally with one content file, and return its id
    pub async fn create_resource(
        &self,
        resource_type: &str,
        title: &str,
        abstract_text: &str,
        keywords: &[String],
        resource_file: Option<&Path>,
    ) -> Result<String, ApiError> {
        let mut form = Form::new()
            .text("resource_type", resource_type.to_string())
            .text("title", title.to_string())
            .text("abstract", abstract_text.to_string());
        for keyword in keywords {
            form = form.text("keywords", keyword.clone());
        }
        if let Some(path) = resource_file {
            form = form.part("file", Self::file_part(path).await?);
        }

        let url = self.endpoint("resource/")?;
        debug!("POST {} (title: {})", url, title);
        let request = self.auth.apply(self.client.post(url).multipart(form));
        let response = Self::check(request.send().await?).await?;
        let created: CreatedResourceResponse = response.json().await?;
        Ok(created.resource_id)
    }

    /// Upload one local file to an existing resource
    pub async fn add_resource_file(&self, resource_id: &str, path: &Path) -> Result<(), ApiError> {
        let form = Form::new().part("file", Self::file_part(path).await?);
        let url = self.resource_endpoint(resource_id, &["files"])?;
        debug!("POST {} ({})", url, path.display());
        let request = self.auth.apply(self.client.post(url).multipart(form));
        Self::check(request.send().await?).await?;
        Ok(())
    }

    /// Download the zipped bag of a resource to `destination`.
    ///
    /// HydroShare answers `202 Accepted` while the bag is being generated; the
    /// request is retried a bounded number of times in that case.
    pub async fn download_bag(&self, resource_id: &str, destination: &Path) -> Result<(), ApiError> {
        let url = self.resource_endpoint(resource_id, &[])?;

        for attempt in 1..=self.bag_retry.attempts {
            debug!("GET {} (attempt {})", url, attempt);
            let request = self.auth.apply(self.client.get(url.clone()));
            let response = Self::check(request.send().await?).await?;

            if response.status() == StatusCode::ACCEPTED {
                warn!(
                    "Bag for resource {} is not ready yet, retrying in {:?}",
                    resource_id, self.bag_retry.delay
                );
                tokio::time::sleep(self.bag_retry.delay).await;
                continue;
            }

            let mut file = tokio::fs::File::create(destination).await?;
            let mut response = response;
            while let Some(chunk) = response.chunk().await? {
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            return Ok(());
        }

        Err(ApiError::BagNotReady(resource_id.to_string()))
    }

    pub async fn delete_resource(&self, resource_id: &str) -> Result<(), ApiError> {
        let url = self.resource_endpoint(resource_id, &[])?;
        debug!("DELETE {}", url);
        let request = self.auth.apply(self.client.delete(url));
        Self::check(request.send().await?).await?;
        Ok(())
    }
}
