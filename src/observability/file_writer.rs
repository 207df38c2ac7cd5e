//! Size-rotated trace file writer.
//!
//! Long-running views can emit a trace line for every scroll event, so the
//! trace file is rotated once it passes a size threshold and only a fixed
//! number of numbered backups is kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// When the file would grow past the size limit it is renamed to
/// `<name>.1`, older backups shift up by one, and backups beyond the
/// retention limit are removed. The file is opened lazily on first write.
///
/// `&FileWriter` implements [`Write`], so an `Arc<FileWriter>` can be handed
/// straight to `tracing_subscriber::fmt::Layer::with_writer`.
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    backups: usize,
    state: Mutex<Option<(File, u64)>>,
}

impl FileWriter {
    /// Creates a writer using the default size limit and retention.
    #[must_use]
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Creates a writer with explicit rotation limits.
    #[must_use]
    pub fn with_limits(file_path: impl Into<PathBuf>, max_bytes: u64, backups: usize) -> Self {
        Self {
            file_path: file_path.into(),
            max_bytes,
            backups,
            state: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn write_chunk(&self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        let written = state.as_ref().map_or_else(
            || fs::metadata(&self.file_path).map_or(0, |m| m.len()),
            |(_, len)| *len,
        );
        if written > 0 && written + buf.len() as u64 > self.max_bytes {
            *state = None;
            self.rotate()?;
        }

        if state.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            let len = file.metadata()?.len();
            *state = Some((file, len));
        }

        let Some((file, len)) = state.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "No file available"));
        };

        file.write_all(buf)?;
        *len += buf.len() as u64;
        Ok(buf.len())
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.file_path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    /// Shifts `<name>.N` to `<name>.N+1`, dropping the oldest, then moves the
    /// live file to `<name>.1`.
    fn rotate(&self) -> io::Result<()> {
        if self.backups == 0 {
            return fs::remove_file(&self.file_path).or_else(ignore_missing);
        }

        fs::remove_file(self.backup_path(self.backups)).or_else(ignore_missing)?;
        for index in (1..self.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.file_path, self.backup_path(1)).or_else(ignore_missing)
    }
}

fn ignore_missing(err: io::Error) -> io::Result<()> {
    if err.kind() == io::ErrorKind::NotFound {
        Ok(())
    } else {
        Err(err)
    }
}

impl Write for &FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;
        match state.as_mut() {
            Some((file, _)) => file.flush(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("backups", &self.backups)
            .finish_non_exhaustive()
    }
}
