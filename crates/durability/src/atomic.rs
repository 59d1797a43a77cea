//! Crash-safe whole-document writes
//!
//! The new content goes to `<path>.tmp`, held under an exclusive advisory
//! lock while it is written and fsync'd, then renamed over `path`. A reader
//! sees either the old document or the new one, never a mix. If writing
//! fails the temp file is removed and `path` is left untouched; a temp file
//! left behind by a crash is simply overwritten by the next write.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use factlog_core::FactlogResult;
use fs2::FileExt;

/// Replace `path` with `bytes` atomically.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> FactlogResult<()> {
    write_atomic_with(path, |w| w.write_all(bytes))
}

/// Replace `path` with whatever `write` produces, atomically.
///
/// `write` receives a buffered writer over the locked temp file. Any error
/// it returns aborts the replacement.
pub fn write_atomic_with<F>(path: &Path, write: F) -> FactlogResult<()>
where
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let tmp_path = temp_path(path);
    let guard = TempFile::create(tmp_path)?;

    let file = guard.file()?;
    file.lock_exclusive()?;
    {
        let mut writer = BufWriter::new(file);
        write(&mut writer)?;
        writer.flush()?;
    }
    file.sync_all()?;
    file.unlock()?;

    guard.persist(path)?;
    sync_parent(path);
    Ok(())
}

/// `<path>.tmp`
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Temp file that deletes itself unless persisted
struct TempFile {
    path: PathBuf,
    file: Option<File>,
    persisted: bool,
}

impl TempFile {
    fn create(path: PathBuf) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            path,
            file: Some(file),
            persisted: false,
        })
    }

    fn file(&self) -> io::Result<&File> {
        self.file
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "temp file already closed"))
    }

    fn persist(mut self, target: &Path) -> io::Result<()> {
        // Close before renaming; some platforms refuse to rename open files
        drop(self.file.take());
        fs::rename(&self.path, target)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        drop(self.file.take());
        if !self.persisted {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::debug!(
                    target: "factlog::log",
                    path = %self.path.display(),
                    error = %e,
                    "could not remove temp file"
                );
            }
        }
    }
}

/// Make the rename itself durable where the platform allows it.
fn sync_parent(path: &Path) {
    #[cfg(unix)]
    {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}
