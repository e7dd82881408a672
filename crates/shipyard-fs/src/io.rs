//! Atomic I/O operations with file locking

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::{Error, Result};

/// Path of the advisory lock file guarding writes to `path`.
pub fn lock_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{name}.lock"))
}

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so readers only ever observe the old or
/// the new content. An exclusive advisory lock on a sibling `.lock` file is
/// held for the whole write, so two processes writing the same target are
/// serialized. Readers do not take the lock.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let lock_file_path = lock_path(path);
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_file_path)
        .map_err(|e| Error::io(&lock_file_path, e))?;

    lock_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: path.to_path_buf(),
    })?;

    let result = write_via_temp(path, content);

    // Release regardless of the write outcome; the lock file itself stays.
    if let Err(e) = FileExt::unlock(&lock_file) {
        tracing::warn!(path = %lock_file_path.display(), error = %e, "Failed to release write lock");
    }

    result
}

fn write_via_temp(path: &Path, content: &[u8]) -> Result<()> {
    // Temp file in the same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

    if let Err(e) = temp_file
        .write_all(content)
        .and_then(|_| temp_file.sync_all())
    {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }
    drop(temp_file);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(path, e));
    }

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

/// Remove a file and its lock file. Missing files are not an error.
///
/// Returns whether the target file existed.
pub fn remove_file(path: &Path) -> Result<bool> {
    let existed = match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(Error::io(path, e)),
    };

    let lock = lock_path(path);
    match fs::remove_file(&lock) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io(lock, e)),
    }

    Ok(existed)
}
