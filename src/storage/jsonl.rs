use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{LogwardenError, Result};
use crate::filter::LogPredicate;
use crate::record::{NewRequestLog, RequestLogRecord};

use super::{next_id, Page, PageRequest, RequestLogStore};

/// Append-only JSONL storage, one record per line.
pub struct JsonlLogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlLogStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all records. A missing file is an empty store.
    pub fn load_all(&self) -> Result<Vec<RequestLogRecord>> {
        Self::read_jsonl_file(&self.path)
    }

    fn read_jsonl_file(path: &Path) -> Result<Vec<RequestLogRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<RequestLogRecord>(trimmed) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "skipping malformed line {} in {}: {}",
                        line_num + 1,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(records)
    }

    fn append_jsonl_file(path: &Path, record: &RequestLogRecord) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(record)?;
        writeln!(file, "{}", json)?;
        Ok(())
    }
}

/// Advisory lock on `<log>.lock`, shared with other processes writing the same log.
struct FileLock {
    _file: fs::File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let lock_path = path.with_extension("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        flock_exclusive(&file).map_err(|e| LogwardenError::Storage {
            reason: format!("failed to lock {}: {}", lock_path.display(), e),
        })?;
        Ok(Self { _file: file })
    }
}

// Dropping the FileLock closes the file, which releases the lock.

#[cfg(unix)]
fn flock_exclusive(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let ret = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
    if ret != 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(not(unix))]
fn flock_exclusive(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

impl RequestLogStore for JsonlLogStore {
    /// Id assignment and append happen under both the in-process mutex and
    /// the file lock, so ids stay unique across stores and processes.
    fn save_request_log(&self, entry: NewRequestLog) -> Result<RequestLogRecord> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let _file_lock = FileLock::acquire(&self.path)?;
        let existing = self.load_all()?;
        let record = entry.into_record(next_id(&existing));
        Self::append_jsonl_file(&self.path, &record)?;
        tracing::info!(
            id = record.id,
            method = record.method_name.as_deref().unwrap_or("-"),
            "request log saved"
        );
        Ok(record)
    }

    fn find_all(&self, page: &PageRequest) -> Result<Page<RequestLogRecord>> {
        Ok(page.apply(self.load_all()?))
    }

    fn find_matching(
        &self,
        predicate: &LogPredicate,
        page: &PageRequest,
    ) -> Result<Page<RequestLogRecord>> {
        let matching = self
            .load_all()?
            .into_iter()
            .filter(|r| predicate.matches(r))
            .collect();
        Ok(page.apply(matching))
    }
}
