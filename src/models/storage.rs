//! Snippet Store
//!
//! File-per-snippet persistence. Every snippet lives at
//! `<root>/<category segments>/<id>.json`; the location is computed once on
//! create and then carried on the record as its storage handle.

use crate::models::Snippet;
use crate::models::snippet::slugify;
use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snippet exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("snippet not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations the view-model relies on.
///
/// Implementations are shared with background tasks, so they must be usable
/// from another thread.
pub trait SnippetStore: Send + Sync {
    /// Loads every snippet under the store root.
    ///
    /// A missing root yields an empty collection. Unreadable or corrupt
    /// files are skipped individually.
    fn load_all(&self) -> StoreResult<Vec<Snippet>>;

    /// Persists a new snippet, assigning its identifier and location.
    fn create(&self, snippet: Snippet) -> StoreResult<Snippet>;

    /// Overwrites an existing snippet and refreshes `updated_at`.
    fn update(&self, snippet: Snippet) -> StoreResult<Snippet>;

    /// Removes the snippet's backing file.
    fn delete(&self, snippet: &Snippet) -> StoreResult<()>;
}

/// JSON file store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Computes where a snippet with this category and id would live
    pub fn location_for(&self, category: &str, id: &str) -> StoreResult<PathBuf> {
        let mut dir = self.root.clone();
        for segment in category.split('/').map(str::trim) {
            match segment {
                "" => continue,
                "." | ".." => return Err(StoreError::InvalidCategory(category.to_string())),
                s => dir.push(s),
            }
        }
        Ok(dir.join(format!("{}.json", id)))
    }

    fn resolve_path(&self, snippet: &Snippet) -> StoreResult<PathBuf> {
        match &snippet.path {
            Some(path) => Ok(path.clone()),
            None => self.location_for(&snippet.category, &snippet.id),
        }
    }

    fn read_snippet(path: &Path) -> StoreResult<Snippet> {
        let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut snippet: Snippet =
            serde_json::from_str(&content).map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        snippet.path = Some(path.to_path_buf());
        Ok(snippet)
    }

    fn write_snippet(path: &Path, snippet: &Snippet) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(snippet).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        fs::write(path, content).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl SnippetStore for FileStore {
    fn load_all(&self) -> StoreResult<Vec<Snippet>> {
        let _span = tracing::debug_span!("store_load_all", root = %self.root.display()).entered();

        if !self.root.exists() {
            tracing::debug!("store root missing, returning empty collection");
            return Ok(Vec::new());
        }

        let mut snippets = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let path = self.root.clone();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("directory walk failed"));
                    return Err(StoreError::Io { path, source });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_json_file(entry.path()) {
                continue;
            }

            match Self::read_snippet(entry.path()) {
                Ok(snippet) => snippets.push(snippet),
                Err(e) => tracing::warn!(error = %e, "skipping snippet file"),
            }
        }

        tracing::debug!(count = snippets.len(), "snippets loaded");
        Ok(snippets)
    }

    fn create(&self, mut snippet: Snippet) -> StoreResult<Snippet> {
        if snippet.id.trim().is_empty() {
            snippet.id = slugify(&snippet.title);
        }
        snippet.updated_at = Utc::now();

        let path = self.location_for(&snippet.category, &snippet.id)?;
        if path.exists() {
            return Err(StoreError::AlreadyExists(path));
        }

        Self::write_snippet(&path, &snippet)?;
        tracing::info!(id = %snippet.id, path = %path.display(), "snippet created");

        snippet.path = Some(path);
        Ok(snippet)
    }

    fn update(&self, mut snippet: Snippet) -> StoreResult<Snippet> {
        if snippet.id.trim().is_empty() {
            snippet.id = slugify(&snippet.title);
        }
        snippet.updated_at = Utc::now();

        let path = self.resolve_path(&snippet)?;
        Self::write_snippet(&path, &snippet)?;
        tracing::info!(id = %snippet.id, path = %path.display(), "snippet updated");

        snippet.path = Some(path);
        Ok(snippet)
    }

    fn delete(&self, snippet: &Snippet) -> StoreResult<()> {
        let path = self.resolve_path(snippet)?;

        fs::remove_file(&path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(path.clone())
            } else {
                StoreError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        tracing::info!(id = %snippet.id, path = %path.display(), "snippet deleted");
        Ok(())
    }
}
