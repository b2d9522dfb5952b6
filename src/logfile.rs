//! CSV log files shared between the logger binaries and the monitor.
//!
//! The loggers are the only writers and only ever append; the monitor
//! tails the same files read-only. Every appended row is flushed and
//! fsynced so the next tail on the GUI side sees it, even if the logger
//! is killed mid-run.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::extract::{
    FLOWRATE_COLUMN, FLOW_PERCENT_COLUMN, FLOW_UNITS_COLUMN, GAUGE1_COLUMN, GAUGE2_COLUMN,
    TIMESTAMP_FORMAT, TIME_COLUMN, UNITS_COLUMN,
};

/// Header row written by the pressure logger.
pub const PRESSURE_HEADER: [&str; 4] = [TIME_COLUMN, GAUGE1_COLUMN, GAUGE2_COLUMN, UNITS_COLUMN];

/// Header row written by the gas flow logger.
pub const FLOW_HEADER: [&str; 4] = [
    TIME_COLUMN,
    FLOW_PERCENT_COLUMN,
    FLOWRATE_COLUMN,
    FLOW_UNITS_COLUMN,
];

/// Current wall-clock time in the shared log timestamp format.
pub fn timestamp_now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Create the CSV with its header row unless the file already exists.
/// An existing file is left untouched so restarts keep appending to the
/// same run.
pub fn create_log_csv(path: &Path, header: &[&str]) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)?;
    writeln!(file, "{}", header.join(","))?;
    file.sync_all()?;
    tracing::info!("created log file {}", path.display());
    Ok(())
}

/// Append-only row writer for one log file.
#[derive(Debug)]
pub struct LogWriter {
    path: PathBuf,
    file: File,
}

impl LogWriter {
    /// Open the file for appending. The header must already exist; pair
    /// with [`create_log_csv`].
    pub fn append(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row and push it all the way to disk.
    pub fn write_row(&mut self, cells: &[String]) -> io::Result<()> {
        writeln!(self.file, "{}", cells.join(","))?;
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }
}
