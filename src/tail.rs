//! Append-only CSV tail reading.
//!
//! Live plots never need a whole log file, only the most recent rows. The
//! tail reader memory-maps the file, counts complete lines in one scan, and
//! materializes just the header plus the trailing window. The scan is
//! O(file size) per call, which is acceptable at human-scale poll cadences.
//!
//! The logger processes append concurrently; only fully terminated lines
//! are consumed. Bytes after the final newline are a partially flushed row
//! and are ignored rather than treated as data.

use std::fs::File;
use std::path::Path;

use memmap2::Mmap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TailError {
    #[error("log file not found: {0}")]
    NotFound(String),
    #[error("failed to read log file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("log file {0} has no complete header row yet")]
    NoHeader(String),
}

/// The tailed window of a delimited log file: the header row plus up to
/// `n` trailing data rows, in file order (oldest of the window first).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TailWindow {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TailWindow {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Number of data rows in the window.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Index of a named header column.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Cell at (row, column), if both exist.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

/// Read the last `n` data rows (plus header) of an append-only CSV file.
///
/// Line 0 is always treated as the header. With `data_lines` complete data
/// rows on disk, the first `max(0, data_lines - n)` are skipped, so the
/// result holds exactly `min(n, data_lines)` rows. A file that exists but
/// has no terminated header line yet reports [`TailError::NoHeader`].
pub fn tail(path: &Path, n: usize) -> Result<TailWindow, TailError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => TailError::NotFound(display.clone()),
        _ => TailError::Io {
            path: display.clone(),
            source: e,
        },
    })?;

    let len = file
        .metadata()
        .map_err(|e| TailError::Io {
            path: display.clone(),
            source: e,
        })?
        .len();
    if len == 0 {
        return Err(TailError::NoHeader(display));
    }

    // SAFETY: log files are append-only for their whole lifetime; writers
    // extend past the mapped region and never truncate or rewrite it.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| TailError::Io {
        path: display.clone(),
        source: e,
    })?;

    // First pass: count terminated lines. Anything after the last newline
    // is a torn row still being flushed and is excluded from the count.
    let complete_lines = mmap.iter().filter(|&&b| b == b'\n').count();
    if complete_lines == 0 {
        return Err(TailError::NoHeader(display));
    }

    let data_lines = complete_lines - 1;
    let skip = data_lines.saturating_sub(n);

    // Second pass: slice out the header and the trailing window.
    let mut lines = mmap.split(|&b| b == b'\n').take(complete_lines);
    let header = match lines.next() {
        Some(line) => split_cells(line),
        None => return Err(TailError::NoHeader(display)),
    };
    let rows = lines.skip(skip).map(split_cells).collect();

    Ok(TailWindow { header, rows })
}

fn split_cells(line: &[u8]) -> Vec<String> {
    let line = String::from_utf8_lossy(line);
    line.trim_end_matches('\r')
        .split(',')
        .map(|cell| cell.trim().to_string())
        .collect()
}
