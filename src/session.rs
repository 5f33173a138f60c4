//! The HydroShare session façade.
//!
//! A [`Session`] owns one authenticated [`HydroShareClient`], the directory
//! resources are downloaded into, and the map of content files resolved for
//! the most recently downloaded or loaded resource.
//!
//! Long running remote calls (create, download, add content) run on a worker
//! task with a spinner; every method still waits for its remote work to finish
//! before returning.

use crate::auth::{default_providers, CredentialProvider};
use crate::configuration::Configuration;
use crate::hydroshare::{ApiError, HydroShareClient};
use crate::metadata::ResourceMetadata;
use crate::model::{ResourceQuery, ResourceSummary, UserInfo};
use crate::progress::{run_with_progress, WorkerError};
use crate::resolver::{self, ContentMap};
use chrono::Local;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

/// Environment variable naming the default download directory
pub const DOWNLOAD_DIR_ENV: &str = "JUPYTER_DOWNLOADS";

pub const DEFAULT_RESOURCE_TYPE: &str = "CompositeResource";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("HydroShare resource download directory {0:?} does not exist. Set it with the save directory argument or the JUPYTER_DOWNLOADS environment variable")]
    Configuration(PathBuf),
    #[error("authentication with HydroShare failed ({})", .attempts.join("; "))]
    Authentication { attempts: Vec<String> },
    #[error("{0}")]
    Input(String),
    #[error("HydroShare request for resource {id} failed: {source}")]
    Remote {
        id: String,
        #[source]
        source: ApiError,
    },
    #[error("HydroShare request failed: {0}")]
    Service(#[source] ApiError),
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Worker(#[from] WorkerError),
    #[error("the HydroShare session has been closed")]
    Closed,
}

fn remote(id: &str) -> impl FnOnce(ApiError) -> SessionError + '_ {
    move |source| SessionError::Remote {
        id: id.to_string(),
        source,
    }
}

/// Reject identifiers that would address anything but `<download_dir>/<id>`
fn check_resource_id(resource_id: &str) -> Result<(), SessionError> {
    if resolver::is_valid_resource_id(resource_id) {
        Ok(())
    } else {
        Err(SessionError::Input(format!(
            "{:?} is not a valid HydroShare resource identifier",
            resource_id
        )))
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> SessionError + '_ {
    move |source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A resource was created but not all of its content could be attached.
/// The resource is left as is on the server.
#[derive(Debug, Error)]
#[error("resource {resource_id} was created, but adding {} more file(s) failed: {cause}", .files.len())]
pub struct PartialFailure {
    pub resource_id: String,
    pub files: Vec<PathBuf>,
    #[source]
    pub cause: Box<SessionError>,
}

/// Description of a resource to create
#[derive(Debug, Clone, PartialEq)]
pub struct NewResource {
    pub title: String,
    pub abstract_text: String,
    pub keywords: Vec<String>,
    pub resource_type: String,
    /// Resource this one is derived from; its abstract and keywords are carried over
    pub derived_from: Option<String>,
    /// Local files to attach, the first one at creation time
    pub content_files: Vec<PathBuf>,
}

impl NewResource {
    pub fn new(title: impl Into<String>, abstract_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            abstract_text: abstract_text.into(),
            keywords: Vec::new(),
            resource_type: DEFAULT_RESOURCE_TYPE.to_string(),
            derived_from: None,
            content_files: Vec::new(),
        }
    }

    pub fn keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = resource_type.into();
        self
    }

    pub fn derived_from(mut self, resource_id: Option<String>) -> Self {
        self.derived_from = resource_id;
        self
    }

    pub fn content_files(mut self, files: Vec<PathBuf>) -> Self {
        self.content_files = files;
        self
    }
}

/// Outcome of [`Session::create_resource`]
#[derive(Debug)]
pub struct CreatedResource {
    pub resource_id: String,
    pub partial_failure: Option<PartialFailure>,
}

/// Pick the download directory: explicit argument, then `JUPYTER_DOWNLOADS`,
/// then the configured default, then the current directory.
pub fn resolve_download_dir(explicit: Option<PathBuf>, configured: Option<&Path>) -> PathBuf {
    explicit
        .or_else(|| std::env::var_os(DOWNLOAD_DIR_ENV).map(PathBuf::from))
        .or_else(|| configured.map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn unpack_archive(archive: &Path, destination: &Path) -> Result<(), zip::result::ZipError> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;
    fs::create_dir_all(destination)?;
    zip.extract(destination)
}

pub struct Session {
    client: Option<HydroShareClient>,
    download_dir: PathBuf,
    content: ContentMap,
}

impl Session {
    /// Connect using the configured API URL and the default credential providers
    pub async fn from_configuration(
        configuration: &Configuration,
        download_dir: Option<PathBuf>,
    ) -> Result<Session, SessionError> {
        let download_dir = resolve_download_dir(download_dir, configuration.download_dir());
        if !download_dir.is_dir() {
            return Err(SessionError::Configuration(download_dir));
        }
        let api_url = configuration
            .api_url()
            .map_err(|e| SessionError::Input(e.to_string()))?;
        let providers = default_providers(configuration).map_err(|e| {
            SessionError::Authentication {
                attempts: vec![e.to_string()],
            }
        })?;
        Session::connect(Some(download_dir), &providers, &api_url).await
    }

    /// Validate the download directory, then try each credential provider in
    /// order and keep the first client that authenticates.
    pub async fn connect(
        download_dir: Option<PathBuf>,
        providers: &[Box<dyn CredentialProvider>],
        api_url: &Url,
    ) -> Result<Session, SessionError> {
        let download_dir = resolve_download_dir(download_dir, None);
        if !download_dir.is_dir() {
            return Err(SessionError::Configuration(download_dir));
        }

        let mut attempts = Vec::new();
        for provider in providers {
            debug!(
                "Trying {} credentials from {}",
                provider.name(),
                provider.path().display()
            );
            match provider.authenticate(api_url).await {
                Ok(client) => {
                    info!("Authenticated with {} credentials", provider.name());
                    return Ok(Session {
                        client: Some(client),
                        download_dir,
                        content: ContentMap::new(),
                    });
                }
                Err(e) if e.is_missing() => {
                    debug!("{}", e);
                    attempts.push(format!("{}: {}", provider.name(), e));
                }
                Err(e) => {
                    warn!("{} authentication failed: {}", provider.name(), e);
                    attempts.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        if attempts.is_empty() {
            attempts.push("no credential providers configured".to_string());
        }
        Err(SessionError::Authentication { attempts })
    }

    /// Release the network session. Later remote calls fail with `Closed`.
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            debug!("HydroShare session closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.client.is_none()
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Content files resolved by the last download or local load
    pub fn content(&self) -> &ContentMap {
        &self.content
    }

    fn client(&self) -> Result<&HydroShareClient, SessionError> {
        self.client.as_ref().ok_or(SessionError::Closed)
    }

    pub async fn user_info(&self) -> Result<UserInfo, SessionError> {
        self.client()?
            .get_user_info()
            .await
            .map_err(SessionError::Service)
    }

    pub async fn get_resource_metadata(
        &self,
        resource_id: &str,
    ) -> Result<ResourceMetadata, SessionError> {
        check_resource_id(resource_id)?;
        let client = self.client()?;
        let science = client
            .get_science_metadata(resource_id)
            .await
            .map_err(remote(resource_id))?;
        let system = client
            .get_system_metadata(resource_id)
            .await
            .map_err(remote(resource_id))?;
        Ok(ResourceMetadata::new(system, science))
    }

    fn check_local_files(files: &[PathBuf]) -> Result<(), SessionError> {
        match files.iter().find(|f| !f.exists()) {
            Some(missing) => Err(SessionError::Input(format!(
                "content file {} does not exist",
                missing.display()
            ))),
            None => Ok(()),
        }
    }

    /// Create a resource and attach its content files.
    ///
    /// All local files are checked before anything is sent. The first file is
    /// attached at creation, the rest are uploaded afterwards; if that second
    /// step fails the resource is kept and the failure is reported in
    /// [`CreatedResource::partial_failure`].
    pub async fn create_resource(
        &self,
        resource: NewResource,
    ) -> Result<CreatedResource, SessionError> {
        Self::check_local_files(&resource.content_files)?;
        let client = self.client()?;

        let available = client
            .get_resource_types()
            .await
            .map_err(SessionError::Service)?;
        let resource_type = available
            .iter()
            .find(|t| t.eq_ignore_ascii_case(&resource.resource_type))
            .cloned()
            .ok_or_else(|| {
                SessionError::Input(format!(
                    "{} is not a valid HydroShare resource type",
                    resource.resource_type
                ))
            })?;

        let mut abstract_text = resource.abstract_text;
        let mut keywords = resource.keywords;
        if let Some(parent_id) = &resource.derived_from {
            let parent = self.get_resource_metadata(parent_id).await?;
            abstract_text = format!(
                "{}\n\n[Modified on {}]\n{}",
                parent.abstract_text,
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                abstract_text
            );
            for keyword in parent.keywords {
                if !keywords.contains(&keyword) {
                    keywords.push(keyword);
                }
            }
        }

        let (first, remaining) = match resource.content_files.split_first() {
            Some((first, rest)) => (Some(first.clone()), rest.to_vec()),
            None => (None, Vec::new()),
        };

        let worker = client.clone();
        let title = resource.title;
        let created = run_with_progress(
            "Creating HydroShare resource",
            "Resource created successfully",
            async move {
                worker
                    .create_resource(
                        &resource_type,
                        &title,
                        &abstract_text,
                        &keywords,
                        first.as_deref(),
                    )
                    .await
            },
        )
        .await?;
        let resource_id = created.map_err(SessionError::Service)?;
        info!("Created resource {}", resource_id);

        let partial_failure = if remaining.is_empty() {
            None
        } else {
            match self
                .add_content_to_existing_resource(&resource_id, &remaining)
                .await
            {
                Ok(()) => None,
                Err(cause) => {
                    let failure = PartialFailure {
                        resource_id: resource_id.clone(),
                        files: remaining,
                        cause: Box::new(cause),
                    };
                    warn!("{}", failure);
                    Some(failure)
                }
            }
        };

        Ok(CreatedResource {
            resource_id,
            partial_failure,
        })
    }

    /// Download the bag of a resource, unpack it into
    /// `<download_dir>/<resource_id>/` and return that directory. An existing
    /// local copy is replaced.
    pub async fn get_resource(&mut self, resource_id: &str) -> Result<PathBuf, SessionError> {
        check_resource_id(resource_id)?;
        let client = self.client()?.clone();
        let archive = self.download_dir.join(format!("{}.zip", resource_id));
        let resource_dir = self.download_dir.join(resource_id);

        let target = archive.clone();
        let id = resource_id.to_string();
        let downloaded = run_with_progress("Downloading resource", "Download finished", async move {
            client.download_bag(&id, &target).await
        })
        .await?;
        if let Err(e) = downloaded {
            if archive.exists() {
                if let Err(cleanup) = fs::remove_file(&archive) {
                    warn!("Failed to remove {}: {}", archive.display(), cleanup);
                }
            }
            return Err(remote(resource_id)(e));
        }

        if resource_dir.exists() {
            debug!("Replacing existing {}", resource_dir.display());
            fs::remove_dir_all(&resource_dir).map_err(io_error(&resource_dir))?;
        }

        let (source, destination) = (archive.clone(), resource_dir.clone());
        tokio::task::spawn_blocking(move || unpack_archive(&source, &destination))
            .await
            .map_err(WorkerError::from)?
            .map_err(|e| remote(resource_id)(ApiError::Archive(e)))?;
        fs::remove_file(&archive).map_err(io_error(&archive))?;

        self.content = resolver::find_content_files(&self.download_dir, resource_id);
        info!(
            "Downloaded resource {} to {} ({} content file(s))",
            resource_id,
            resource_dir.display(),
            self.content.len()
        );
        Ok(resource_dir)
    }

    /// Upload local files to an existing resource one at a time. The first
    /// failure stops the remaining uploads; earlier uploads stay attached.
    pub async fn add_content_to_existing_resource(
        &self,
        resource_id: &str,
        files: &[PathBuf],
    ) -> Result<(), SessionError> {
        check_resource_id(resource_id)?;
        Self::check_local_files(files)?;
        let worker = self.client()?.clone();
        let id = resource_id.to_string();
        let files = files.to_vec();

        run_with_progress(
            "Adding content to resource",
            "Successfully added content files",
            async move {
                for file in &files {
                    worker.add_resource_file(&id, file).await?;
                }
                Ok::<(), ApiError>(())
            },
        )
        .await?
        .map_err(remote(resource_id))
    }

    /// Rebuild the content map from a previously downloaded copy of the
    /// resource. Finding nothing is not an error; the map is simply empty.
    pub fn load_resource_from_local(&mut self, resource_id: &str) -> &ContentMap {
        let content = resolver::find_content_files(&self.download_dir, resource_id);
        match resolver::find_resource_directory(&self.download_dir, resource_id) {
            Some(dir) if !content.is_empty() => {
                info!("Downloaded content is located at: {}", dir.display());
                info!("Found {} content file(s)", content.len());
            }
            _ => warn!(
                "Did not find any content files for resource id: {}",
                resource_id
            ),
        }
        self.content = content;
        &self.content
    }

    pub fn get_content_files(&self, resource_id: &str) -> ContentMap {
        resolver::find_content_files(&self.download_dir, resource_id)
    }

    pub fn get_content_path(&self, resource_id: &str) -> Option<PathBuf> {
        resolver::content_path(&self.download_dir, resource_id)
    }

    pub async fn list_resources(
        &self,
        query: &ResourceQuery,
    ) -> Result<Vec<ResourceSummary>, SessionError> {
        self.client()?
            .list_resources(query)
            .await
            .map_err(SessionError::Service)
    }

    /// Total size in bytes of the files attached to a resource
    pub async fn resource_size(&self, resource_id: &str) -> Result<u64, SessionError> {
        check_resource_id(resource_id)?;
        let files = self
            .client()?
            .get_resource_files(resource_id)
            .await
            .map_err(remote(resource_id))?;
        Ok(files.iter().map(|f| f.size).sum())
    }

    pub async fn delete_resource(&self, resource_id: &str) -> Result<(), SessionError> {
        check_resource_id(resource_id)?;
        self.client()?
            .delete_resource(resource_id)
            .await
            .map_err(remote(resource_id))?;
        info!("Deleted resource {}", resource_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_download_dir_wins() {
        let dir = resolve_download_dir(Some(PathBuf::from("/explicit")), Some(Path::new("/conf")));
        assert_eq!(dir, PathBuf::from("/explicit"));
    }

    #[test]
    fn test_missing_local_file_is_input_error() {
        let error = Session::check_local_files(&[PathBuf::from("missing.txt")]).unwrap_err();
        assert!(matches!(&error, SessionError::Input(message) if message.contains("missing.txt")));
    }

    #[test]
    fn test_escaping_resource_id_is_input_error() {
        assert!(check_resource_id("abc123").is_ok());
        let error = check_resource_id("../userInfo").unwrap_err();
        assert!(matches!(&error, SessionError::Input(message) if message.contains("../userInfo")));
    }

    #[tokio::test]
    async fn test_missing_download_dir_checked_before_configuration() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("missing");
        let configuration: Configuration =
            serde_yaml::from_str("api_url: not a url").unwrap();

        let result = Session::from_configuration(&configuration, Some(missing.clone())).await;

        assert!(matches!(result, Err(SessionError::Configuration(path)) if path == missing));
    }

    #[test]
    fn test_new_resource_defaults() {
        let resource = NewResource::new("title", "abs");
        assert_eq!(resource.resource_type, DEFAULT_RESOURCE_TYPE);
        assert!(resource.content_files.is_empty());
        assert!(resource.derived_from.is_none());
    }

    #[test]
    fn test_unpack_archive_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bad.zip");
        fs::write(&archive, b"not a zip").unwrap();
        assert!(unpack_archive(&archive, &dir.path().join("out")).is_err());
    }
}
