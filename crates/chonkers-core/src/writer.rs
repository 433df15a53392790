//! YAML output for the website's `_data/` directory.
//!
//! Writes go through a temp file in the target directory that is renamed over
//! the destination, so readers never see a half-written document.

use crate::models::OutputDocument;
use crate::{ChonkersError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Serialize a document to YAML text.
pub fn render_document(document: &OutputDocument) -> Result<String> {
    Ok(serde_yaml::to_string(document)?)
}

/// Replace `path` with `document`, creating the parent directory if needed.
pub fn write_document(path: &Path, document: &OutputDocument) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent).map_err(|e| ChonkersError::Io {
            message: format!("Failed to create directory {}", parent.display()),
            path: Some(parent.to_path_buf()),
            source: Some(e),
        })?;
    }

    let serialized = render_document(document)?;

    let mut temp = NamedTempFile::new_in(parent)
        .map_err(|e| ChonkersError::io_with_path(e, parent))?;
    temp.write_all(serialized.as_bytes())
        .map_err(|e| ChonkersError::io_with_path(e, temp.path()))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| ChonkersError::io_with_path(e, temp.path()))?;

    temp.persist(path).map_err(|e| ChonkersError::Io {
        message: format!("Failed to replace {}: {}", path.display(), e.error),
        path: Some(path.to_path_buf()),
        source: Some(e.error),
    })?;

    debug!("Wrote {} entries to {}", document.len(), path.display());
    Ok(())
}
