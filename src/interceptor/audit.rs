// SPDX-License-Identifier: Apache-2.0

//! Audit Log Store
//!
//! Append-only JSON-lines log of every query execution attempt.
//! Writing never fails the caller; problems are reported through tracing.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use super::types::AuditRecord;

/// Audit log store with file persistence
pub struct AuditStore {
    /// Path to the audit log file
    log_path: PathBuf,
}

impl AuditStore {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        let log_path = log_path.into();

        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    error!("Failed to create audit log directory: {}", e);
                }
            }
        }

        Self { log_path }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Records one execution attempt.
    pub fn log(&self, entry: AuditRecord) {
        if let Err(e) = self.append_to_file(&entry) {
            error!(
                path = %self.log_path.display(),
                "Failed to write audit log entry: {}", e
            );
        }
    }

    /// Append entry to log file as a single write so the line stays whole
    fn append_to_file(&self, entry: &AuditRecord) -> io::Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        file.write_all(line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Most recent entries first. Lines that do not parse are skipped.
    pub fn recent(&self, limit: usize) -> Vec<AuditRecord> {
        let file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Failed to read audit log file: {}", e);
                return Vec::new();
            }
        };

        let mut entries: Vec<AuditRecord> = BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter_map(|line| serde_json::from_str::<AuditRecord>(&line).ok())
            .collect();

        debug!("Loaded {} audit log entries from file", entries.len());

        entries.reverse();
        entries.truncate(limit);
        entries
    }
}
