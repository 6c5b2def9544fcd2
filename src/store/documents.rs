use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::store::StoreError;

pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Supporting documents uploaded with leave requests.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

pub fn is_allowed(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| ALLOWED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Content type for serving a stored document back.
pub fn content_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

fn path_component(raw: &str) -> String {
    raw.replace(['/', '\\'], "_")
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })
    }

    /// Writes `bytes` to `{employee}_{yyyyMMddHHmmss}_{file_name}`.
    ///
    /// An existing file is never replaced: a second upload in the same second
    /// gets a random segment before the original name.
    pub fn store(
        &self,
        employee: &str,
        file_name: &str,
        bytes: &[u8],
        now: NaiveDateTime,
    ) -> Result<PathBuf, StoreError> {
        self.ensure_dir()?;

        let original = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        let prefix = format!(
            "{}_{}",
            path_component(employee),
            now.format("%Y%m%d%H%M%S")
        );

        let mut path = self.dir.join(format!("{prefix}_{original}"));
        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(bytes).map_err(|source| StoreError::Io {
                        path: path.clone(),
                        source,
                    })?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    let suffix = Uuid::new_v4().to_simple().to_string();
                    path = self
                        .dir
                        .join(format!("{prefix}_{}_{original}", &suffix[..8]));
                }
                Err(source) => return Err(StoreError::Io { path, source }),
            }
        }
    }

    /// Deletes a stored document. A file that is already gone is not an error.
    pub fn remove(&self, path: &str) -> Result<(), StoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: PathBuf::from(path),
                source,
            }),
        }
    }

    /// Reads a previously stored document. `Ok(None)` when it is gone.
    pub fn read(&self, path: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: PathBuf::from(path),
                source,
            }),
        }
    }
}
