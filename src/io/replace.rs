//! Whole-file replacement for outputs.
//!
//! The bytes go to a temporary file in the target's directory, which is synced
//! and then renamed over the target. An existing file is therefore only
//! replaced once the new contents are fully on disk; a failed write leaves it
//! untouched and reports an error.
//!
//! Targets that exist but are not regular files (devices, FIFOs) cannot be
//! renamed over, so they are written in place and every write error is still
//! propagated.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::AppError;

/// Replace `path` with `bytes`.
pub fn replace_file(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let special = std::fs::metadata(path).map(|m| !m.is_file()).unwrap_or(false);
    if special {
        return write_in_place(path, bytes);
    }

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| AppError::io(format!("Failed to create temporary file in '{}': {e}", dir.display())))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| AppError::io(format!("Failed to write '{}': {e}", path.display())))?;
    tmp.persist(path)
        .map_err(|e| AppError::io(format!("Failed to replace '{}': {}", path.display(), e.error)))?;

    Ok(())
}

fn write_in_place(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|e| AppError::io(format!("Failed to open '{}': {e}", path.display())))?;
    file.write_all(bytes)
        .and_then(|()| file.flush())
        .map_err(|e| AppError::io(format!("Failed to write '{}': {e}", path.display())))
}
