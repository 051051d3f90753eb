//! Append-only JSONL audit log

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{WizardError, WizardResult};

use super::entry::AuditEntry;

/// Writes one JSON object per line to the audit log
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append `entry` and flush
    pub fn log(&self, entry: &AuditEntry) -> WizardResult<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| WizardError::Io(format!("Failed to create audit directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| WizardError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| WizardError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| WizardError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| WizardError::Io(format!("Failed to flush audit log: {}", e)))
    }

    /// Every entry, oldest first
    pub fn read_all(&self) -> WizardResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| WizardError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                WizardError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                WizardError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> WizardResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn logger() -> (TempDir, AuditLogger) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (temp_dir, logger)
    }

    #[test]
    fn test_missing_log_reads_empty() {
        let (_temp_dir, logger) = logger();
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_log_and_read_back() {
        let (_temp_dir, logger) = logger();

        for i in 0..3 {
            let entry = AuditEntry::create(
                EntityType::Budget,
                format!("bud-{}", i),
                None,
                &json!({"n": i}),
            );
            logger.log(&entry).unwrap();
        }

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.operation == Operation::Create));

        let recent = logger.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].entity_id, "bud-1");
        assert_eq!(recent[1].entity_id, "bud-2");
    }

    #[test]
    fn test_corrupt_line_is_reported() {
        let (_temp_dir, logger) = logger();
        std::fs::write(logger.path(), "not json\n").unwrap();

        let err = logger.read_all().unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
