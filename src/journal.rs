//! Append-only run journal
//!
//! Every decision the pipeline makes is written as one `[YYYY-MM-DD HH:MM:SS] message`
//! line to the journal file and mirrored as a `tracing` event. The journal is passed
//! explicitly to whoever narrates; there is no process-wide logger state here.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, fs};

/// Severity of a journal record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
}

/// Timestamp-prefixed append-only log
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    file: Option<File>,
}

impl Journal {
    /// Open (or create) the journal file for appending
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| fs::write_failed(parent, e))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| fs::write_failed(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Some(file),
        })
    }

    /// A journal that only emits tracing events
    pub fn detached() -> Self {
        Self {
            path: PathBuf::new(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.record(Level::Info, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        self.record(Level::Warn, message.as_ref());
    }

    fn record(&self, level: Level, message: &str) {
        match level {
            Level::Info => tracing::info!("{message}"),
            Level::Warn => tracing::warn!("{message}"),
        }

        let Some(mut file) = self.file.as_ref() else {
            return;
        };

        let line = format_line(&chrono::Local::now(), message);
        if let Err(e) = file.write_all(line.as_bytes()) {
            tracing::warn!("Failed to append to journal {}: {}", self.path.display(), e);
        }
    }
}

fn format_line(at: &chrono::DateTime<chrono::Local>, message: &str) -> String {
    format!("[{}] {}\n", at.format("%Y-%m-%d %H:%M:%S"), message)
}
