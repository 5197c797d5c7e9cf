//! File-level helpers: filename validation and durable writes.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::atomic::{AtomicU64, Ordering},
};

use crate::error::{FileSystemResultExt, PlanError, Result};

/// Extension every plan file carries.
pub const PLAN_EXTENSION: &str = ".md";

/// Reject anything but `[A-Za-z0-9_-]+\.md`, before touching the disk.
pub fn validate_filename(filename: &str) -> Result<()> {
    let stem = filename.strip_suffix(PLAN_EXTENSION).unwrap_or_default();
    let valid = !stem.is_empty()
        && !filename.contains("..")
        && stem
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(PlanError::InvalidFilename {
            filename: filename.to_string(),
        })
    }
}

/// Whether a directory entry name looks like a plan file.
pub fn is_plan_file(name: &str) -> bool {
    name.ends_with(PLAN_EXTENSION) && !name.starts_with('.')
}

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A fully written and synced temp file next to `path`.
///
/// The name starts with a dot, so it is never listed as a plan.
fn write_temp(path: &Path, content: &[u8]) -> std::io::Result<PathBuf> {
    let parent = parent_of(path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_path = parent.join(format!(".{name}.tmp-{}-{seq}", std::process::id()));

    let written = fs::File::create(&tmp_path).and_then(|mut file| {
        file.write_all(content)?;
        file.sync_all()
    });
    match written {
        Ok(()) => Ok(tmp_path),
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            Err(e)
        }
    }
}

fn parent_of(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new("."))
}

fn sync_dir(dir: &Path) {
    // Makes the rename or link durable; best effort.
    if let Ok(dir) = fs::File::open(dir) {
        let _ = dir.sync_all();
    }
}

/// Replace `path` with `content` so readers see either the old or the new
/// bytes, never a torn write.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let tmp_path = write_temp(path, content).fs_context(path)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(PlanError::file_system(path, e));
    }
    sync_dir(parent_of(path));
    Ok(())
}

/// Create `path` with `content` unless it already exists.
///
/// Returns `Ok(false)` when `path` is taken; the existing file is left as is.
/// Readers never see a partial file: the content is linked into place only
/// once fully written.
pub fn write_new(path: &Path, content: &[u8]) -> Result<bool> {
    let tmp_path = write_temp(path, content).fs_context(path)?;
    let linked = fs::hard_link(&tmp_path, path);
    let _ = fs::remove_file(&tmp_path);
    match linked {
        Ok(()) => {
            sync_dir(parent_of(path));
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(PlanError::file_system(path, e)),
    }
}

/// Read a plan file, mapping a missing file to [`PlanError::NotFound`].
pub fn read_plan(path: &Path, filename: &str) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PlanError::NotFound {
            filename: filename.to_string(),
        }),
        Err(e) => Err(PlanError::file_system(path, e)),
    }
}

/// Create `dir` and its parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).fs_context(dir)
}
