//! JSON status file used as the mirrored secondary surface.
//!
//! Every update rewrites the whole file through a temporary sibling and a
//! rename, so readers never see a partial document. Deleting the file's
//! directory from outside counts as closing the surface.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use flowtimer_core::{Surface, SurfaceError, ViewModel};
use serde::Serialize;

#[derive(Serialize)]
struct StatusDocument<'a> {
    updated_at: DateTime<Utc>,
    #[serde(flatten)]
    view: &'a ViewModel,
}

pub struct StatusFile {
    path: PathBuf,
    open: bool,
}

impl StatusFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open: true,
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "mirror.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Replace the file contents. A missing directory means the surface went
    /// away after the open check.
    fn write_atomically(&self, json: &str) -> Result<(), SurfaceError> {
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json).map_err(write_error)?;
        std::fs::rename(&tmp, &self.path).map_err(write_error)?;
        Ok(())
    }
}

fn write_error(e: std::io::Error) -> SurfaceError {
    if e.kind() == std::io::ErrorKind::NotFound {
        SurfaceError::Closed
    } else {
        SurfaceError::Write(e.to_string())
    }
}

impl Surface for StatusFile {
    fn is_open(&self) -> bool {
        self.open
            && self
                .path
                .parent()
                .map_or(true, |dir| dir.as_os_str().is_empty() || dir.is_dir())
    }

    fn apply(&mut self, view: &ViewModel) -> Result<(), SurfaceError> {
        if !self.is_open() {
            return Err(SurfaceError::Closed);
        }
        let doc = StatusDocument {
            updated_at: Utc::now(),
            view,
        };
        let json =
            serde_json::to_string_pretty(&doc).map_err(|e| SurfaceError::Write(e.to_string()))?;
        self.write_atomically(&json)
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("could not remove status file {}: {e}", self.path.display());
            }
        }
        tracing::debug!(path = %self.path.display(), "status file removed");
    }
}
