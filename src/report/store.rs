//! Document stores for submitted reports.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use fs2::FileExt;
use parking_lot::Mutex;

use super::error::ReportError;
use super::types::ReportDocument;

/// Destination for validated reports.
///
/// Implementations are called from a blocking thread and may do I/O.
pub trait ReportStore: Send + Sync {
    fn persist(&self, document: &ReportDocument) -> Result<(), ReportError>;
}

/// Appends one JSON document per line to a file.
///
/// Writes take an exclusive file lock so concurrent processes sharing the
/// file never interleave lines.
pub struct JsonlReportStore {
    path: PathBuf,
}

impl JsonlReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored document. A missing file means no reports yet.
    pub fn load_all(&self) -> Result<Vec<ReportDocument>, ReportError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.path).map_err(|e| self.io_error("open", e))?;
        let mut documents = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| self.io_error("read", e))?;
            if line.trim().is_empty() {
                continue;
            }
            let document = serde_json::from_str(&line).map_err(|e| {
                ReportError::Persistence(format!("corrupt line in {}: {}", self.path.display(), e))
            })?;
            documents.push(document);
        }
        Ok(documents)
    }

    fn io_error(&self, action: &str, err: std::io::Error) -> ReportError {
        ReportError::Persistence(format!("failed to {} {}: {}", action, self.path.display(), err))
    }
}

impl ReportStore for JsonlReportStore {
    fn persist(&self, document: &ReportDocument) -> Result<(), ReportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error("create directory for", e))?;
        }

        let mut line = serde_json::to_string(document)
            .map_err(|e| ReportError::Internal(format!("failed to encode report: {}", e)))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error("open", e))?;
        FileExt::lock_exclusive(&file).map_err(|e| self.io_error("lock", e))?;
        let written = file.write_all(line.as_bytes()).and_then(|_| file.flush());
        let unlocked = FileExt::unlock(&file);
        written.map_err(|e| self.io_error("write", e))?;
        unlocked.map_err(|e| self.io_error("unlock", e))?;
        Ok(())
    }
}

/// In-memory store, mainly for tests. Can be switched into a failing mode.
#[derive(Default)]
pub struct MemoryReportStore {
    documents: Mutex<Vec<ReportDocument>>,
    failing: AtomicBool,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> Vec<ReportDocument> {
        self.documents.lock().clone()
    }

    /// Make every subsequent `persist` fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl ReportStore for MemoryReportStore {
    fn persist(&self, document: &ReportDocument) -> Result<(), ReportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ReportError::Persistence("memory store set to fail".to_string()));
        }
        self.documents.lock().push(document.clone());
        Ok(())
    }
}
