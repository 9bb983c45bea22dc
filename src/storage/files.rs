//! File-system page store
//!
//! Accepted pages land in two places:
//! - `<content-dir>/<sanitized title>.txt` holding the page's plain text
//! - one `title:url` line appended to the index file

use crate::config::OutputConfig;
use crate::storage::traits::{AcceptedPage, PageStore, StorageError, StorageResult};
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Longest file stem derived from a title
const MAX_FILE_STEM: usize = 120;

/// Page store backed by a content directory and an append-only index file
#[derive(Debug)]
pub struct FileStore {
    content_dir: PathBuf,
    index_path: PathBuf,
    index_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store; nothing touches the disk until `reset` or `save_page`
    pub fn new(content_dir: impl Into<PathBuf>, index_path: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            index_path: index_path.into(),
            index_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.content_dir, &config.index_path)
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    /// Path of the content file a page with this title is written to
    pub fn content_path(&self, title: &str) -> PathBuf {
        self.content_dir
            .join(format!("{}.txt", sanitize_title(title)))
    }

    fn append_index_line(&self, line: &str) -> io::Result<()> {
        let _guard = self
            .index_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.index_path)?;
        writeln!(file, "{}", line)
    }
}

impl PageStore for FileStore {
    fn reset(&self) -> StorageResult<()> {
        ignore_not_found(fs::remove_file(&self.index_path))
            .map_err(reset_err(&self.index_path))?;
        ignore_not_found(fs::remove_dir_all(&self.content_dir))
            .map_err(reset_err(&self.content_dir))?;

        fs::create_dir_all(&self.content_dir).map_err(reset_err(&self.content_dir))?;

        if let Some(parent) = self.index_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(reset_err(parent))?;
            }
        }

        tracing::debug!(
            "Reset output: content dir {}, index {}",
            self.content_dir.display(),
            self.index_path.display()
        );
        Ok(())
    }

    fn save_page(&self, page: &AcceptedPage, text: &str) -> StorageResult<()> {
        let path = self.content_path(&page.title);
        fs::write(&path, text).map_err(|source| StorageError::Content {
            path: path.clone(),
            source,
        })?;

        self.append_index_line(&page.index_line())
            .map_err(|source| StorageError::Index {
                path: self.index_path.clone(),
                source,
            })?;

        tracing::trace!("Saved {} to {}", page.url, path.display());
        Ok(())
    }
}

/// Turns a page title into a safe file stem
///
/// Characters outside `[A-Za-z0-9 _.-]` become `_`, leading dots are dropped
/// and the result is capped at [`MAX_FILE_STEM`] characters. Titles that
/// sanitize to nothing useful fall back to a SHA-256 prefix. Distinct titles
/// can still map to the same stem; the later write wins.
pub fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let stem: String = replaced
        .trim()
        .trim_start_matches('.')
        .trim_start()
        .chars()
        .take(MAX_FILE_STEM)
        .collect();
    let stem = stem.trim_end();

    if stem.chars().all(|c| c == '_' || c == '.') {
        let digest = Sha256::digest(title.as_bytes());
        return format!("page-{}", &hex::encode(digest)[..16]);
    }

    stem.to_string()
}

fn reset_err(path: &Path) -> impl FnOnce(io::Error) -> StorageError {
    let path = path.to_path_buf();
    move |source| StorageError::Reset { path, source }
}

fn ignore_not_found(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
