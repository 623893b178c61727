//! Export-file discovery and processed marking.
//!
//! # Responsibility
//! - List pending export files in the configured folder.
//! - Read export text and rename files once their content is imported.
//!
//! # Invariants
//! - A file is pending iff its name ends with a valid extension and does
//!   not carry the processed suffix.
//! - Listing order is sorted by path so runs are deterministic.

use crate::config::ImporterConfig;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

pub type ExportResult<T> = Result<T, ExportError>;

/// Filesystem failure tagged with the offending path.
#[derive(Debug)]
pub struct ExportError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "export file access failed at `{}`: {}",
            self.path.display(),
            self.source
        )
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// One export file awaiting import.
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub path: PathBuf,
    /// Filesystem mtime when available; drives `DateSource::FileModified`.
    pub modified: Option<SystemTime>,
}

/// Scans the export folder for files awaiting import.
#[derive(Debug, Clone)]
pub struct ExportScanner {
    folder: PathBuf,
    extensions: Vec<String>,
    processed_suffix: String,
}

impl ExportScanner {
    pub fn new(
        folder: impl Into<PathBuf>,
        extensions: Vec<String>,
        processed_suffix: impl Into<String>,
    ) -> Self {
        Self {
            folder: folder.into(),
            extensions,
            processed_suffix: processed_suffix.into(),
        }
    }

    pub fn from_config(config: &ImporterConfig) -> Self {
        Self::new(
            config.export_folder.as_str(),
            config.valid_extensions.clone(),
            config.processed_suffix.as_str(),
        )
    }

    /// Lists pending export files, sorted by path.
    pub fn pending_exports(&self) -> ExportResult<Vec<ExportFile>> {
        let entries = fs::read_dir(&self.folder).map_err(|source| ExportError {
            path: self.folder.clone(),
            source,
        })?;

        let mut pending = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ExportError {
                path: self.folder.clone(),
                source,
            })?;
            let path = entry.path();
            let name = match path.file_name().and_then(|name| name.to_str()) {
                Some(name) => name,
                None => continue,
            };
            if !self.is_pending_name(name) || !path.is_file() {
                continue;
            }

            let modified = entry.metadata().ok().and_then(|meta| meta.modified().ok());
            pending.push(ExportFile { path, modified });
        }

        pending.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(pending)
    }

    fn is_pending_name(&self, name: &str) -> bool {
        if name.ends_with(self.processed_suffix.as_str()) {
            return false;
        }
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    /// Reads the full UTF-8 text of one export file.
    pub fn read_text(&self, file: &ExportFile) -> ExportResult<String> {
        fs::read_to_string(&file.path).map_err(|source| ExportError {
            path: file.path.clone(),
            source,
        })
    }

    /// Renames the file with the processed suffix so later runs skip it.
    /// Returns the new path.
    pub fn mark_processed(&self, file: &ExportFile) -> ExportResult<PathBuf> {
        let mut renamed = file.path.clone().into_os_string();
        renamed.push(self.processed_suffix.as_str());
        let renamed = PathBuf::from(renamed);

        fs::rename(&file.path, &renamed).map_err(|source| ExportError {
            path: file.path.clone(),
            source,
        })?;
        Ok(renamed)
    }
}
