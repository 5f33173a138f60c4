//! Locating previously downloaded resources on the local filesystem.
//!
//! An unpacked bag lands in `<download_dir>/<id>/`. Depending on how the bag
//! was zipped, the content files are either under
//! `<download_dir>/<id>/<id>/data/contents/` or directly under
//! `<download_dir>/<id>/data/contents/`, so both layouts are searched in order.

use glob::glob;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Candidate content directories relative to the resource root, tried in order.
/// `{id}` is replaced by the resource identifier.
pub const CONTENT_SEARCH_PATHS: [&str; 2] = ["{id}/data/contents", "data/contents"];

/// Mapping from content file name to its local path
pub type ContentMap = BTreeMap<String, PathBuf>;

fn candidate_dirs(resource_dir: &Path, resource_id: &str) -> Vec<PathBuf> {
    CONTENT_SEARCH_PATHS
        .iter()
        .map(|template| resource_dir.join(template.replace("{id}", resource_id)))
        .collect()
}

/// A resource id names exactly one directory entry below the download
/// directory: no separators, no dot segments, nothing absolute.
pub fn is_valid_resource_id(resource_id: &str) -> bool {
    if resource_id.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(resource_id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Root folder of a downloaded resource, if it exists
pub fn find_resource_directory(base_dir: &Path, resource_id: &str) -> Option<PathBuf> {
    if !is_valid_resource_id(resource_id) {
        warn!("Ignoring invalid resource id {:?}", resource_id);
        return None;
    }
    let resource_dir = base_dir.join(resource_id);
    if resource_dir.is_dir() {
        Some(resource_dir)
    } else {
        debug!("No local directory for resource {} under {}", resource_id, base_dir.display());
        None
    }
}

fn list_dir(dir: &Path) -> ContentMap {
    let mut content = ContentMap::new();
    let Some(dir_str) = dir.to_str() else {
        warn!("Skipping non UTF-8 path {}", dir.display());
        return content;
    };

    // the directory part may itself contain glob metacharacters
    let pattern = format!("{}/*", glob::Pattern::escape(dir_str));
    let entries = match glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Invalid search pattern {}: {}", pattern, e);
            return content;
        }
    };

    for entry in entries.flatten() {
        if let Some(name) = entry.file_name() {
            content.insert(name.to_string_lossy().to_string(), entry.clone());
        }
    }
    content
}

/// Content files of a downloaded resource. The first candidate layout that
/// holds any file wins; an empty map means nothing was found.
pub fn find_content_files(base_dir: &Path, resource_id: &str) -> ContentMap {
    let Some(resource_dir) = find_resource_directory(base_dir, resource_id) else {
        return ContentMap::new();
    };

    for dir in candidate_dirs(&resource_dir, resource_id) {
        let content = list_dir(&dir);
        if !content.is_empty() {
            debug!("Found {} content file(s) in {}", content.len(), dir.display());
            return content;
        }
    }
    ContentMap::new()
}

/// Directory holding the content files of a downloaded resource
pub fn content_path(base_dir: &Path, resource_id: &str) -> Option<PathBuf> {
    let resource_dir = find_resource_directory(base_dir, resource_id)?;
    candidate_dirs(&resource_dir, resource_id)
        .into_iter()
        .find(|dir| dir.is_dir())
}
