//! Tests for tail window reads over append-only CSV files
//!
//! Tests cover:
//! - Window sizing against short and long files
//! - Torn trailing rows left by an in-flight append
//! - Missing, empty, and header-only files

#[path = "../common/mod.rs"]
mod common;

use std::fs::OpenOptions;
use std::io::Write;

use common::{synthetic, ScratchDir};
use vessellog::tail::{self, TailError};

// ============================================
// Window Sizing Tests
// ============================================

#[test]
fn test_tail_returns_last_n_rows_in_file_order() {
    let scratch = ScratchDir::new("tail_last_n");
    let rows: Vec<String> = (0..5)
        .map(|i| format!("2025-07-23 10:00:0{},{}.0,Off,Torr", i, i))
        .collect();
    let path = scratch.write_file("pressure.csv", &synthetic::pressure_log(&rows));

    let window = tail::tail(&path, 2).unwrap();
    assert_eq!(window.len(), 2);
    assert_eq!(window.header()[0], "Time");
    // Oldest row of the window comes first
    assert_eq!(window.cell(0, 1), Some("3.0"));
    assert_eq!(window.cell(1, 1), Some("4.0"));

    // A second read with no intervening write sees the same window.
    let again = tail::tail(&path, 2).unwrap();
    assert_eq!(again.cell(0, 1), Some("3.0"));
    assert_eq!(again.cell(1, 1), Some("4.0"));
}

#[test]
fn test_tail_shorter_file_returns_every_row() {
    let scratch = ScratchDir::new("tail_short");
    let rows = vec!["2025-07-23 10:00:00,1.0,2.0,Torr".to_string()];
    let path = scratch.write_file("pressure.csv", &synthetic::pressure_log(&rows));

    let window = tail::tail(&path, 10).unwrap();
    assert_eq!(window.len(), 1);
}

#[test]
fn test_tail_header_only_file_has_zero_rows() {
    let scratch = ScratchDir::new("tail_header_only");
    let path = scratch.write_file("pressure.csv", &synthetic::pressure_log(&[]));

    let window = tail::tail(&path, 10).unwrap();
    assert!(window.is_empty());
    assert_eq!(window.column("Units"), Some(3));
}

// ============================================
// Torn Row Tests
// ============================================

#[test]
fn test_torn_trailing_row_is_excluded() {
    let scratch = ScratchDir::new("tail_torn");
    let rows = vec![
        "2025-07-23 10:00:00,1.0,2.0,Torr".to_string(),
        "2025-07-23 10:00:02,3.0,4.0,Torr".to_string(),
    ];
    let path = scratch.write_file("pressure.csv", &synthetic::pressure_log(&rows));

    // Simulate a logger flushed mid-row: bytes with no terminating newline.
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    write!(file, "2025-07-23 10:00:04,5.0").unwrap();
    file.flush().unwrap();

    let window = tail::tail(&path, 10).unwrap();
    assert_eq!(window.len(), 2);
    assert_eq!(window.cell(1, 0), Some("2025-07-23 10:00:02"));
}

#[test]
fn test_torn_row_becomes_visible_once_terminated() {
    let scratch = ScratchDir::new("tail_torn_completed");
    let rows = vec!["2025-07-23 10:00:00,1.0,2.0,Torr".to_string()];
    let path = scratch.write_file("pressure.csv", &synthetic::pressure_log(&rows));

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    write!(file, "2025-07-23 10:00:02,3.0").unwrap();
    file.flush().unwrap();
    assert_eq!(tail::tail(&path, 10).unwrap().len(), 1);

    writeln!(file, ",4.0,Torr").unwrap();
    file.flush().unwrap();
    let window = tail::tail(&path, 10).unwrap();
    assert_eq!(window.len(), 2);
    assert_eq!(window.cell(1, 3), Some("Torr"));
}

// ============================================
// Error Tests
// ============================================

#[test]
fn test_missing_file_reports_not_found() {
    let scratch = ScratchDir::new("tail_missing");
    let err = tail::tail(&scratch.file("nope.csv"), 10).unwrap_err();
    assert!(matches!(err, TailError::NotFound(_)));
}

#[test]
fn test_empty_file_reports_no_header() {
    let scratch = ScratchDir::new("tail_empty");
    let path = scratch.write_file("empty.csv", "");
    let err = tail::tail(&path, 10).unwrap_err();
    assert!(matches!(err, TailError::NoHeader(_)));
}

#[test]
fn test_unterminated_header_reports_no_header() {
    let scratch = ScratchDir::new("tail_torn_header");
    let path = scratch.write_file("torn.csv", "Time,Gauge 1,Gauge 2,Units");
    let err = tail::tail(&path, 10).unwrap_err();
    assert!(matches!(err, TailError::NoHeader(_)));
}

// ============================================
// Cell Handling Tests
// ============================================

#[test]
fn test_crlf_and_padding_are_trimmed() {
    let scratch = ScratchDir::new("tail_crlf");
    let contents = "Time,Gauge 1,Gauge 2,Units\r\n2025-07-23 10:00:00, 1.0 ,2.0,Torr\r\n";
    let path = scratch.write_file("crlf.csv", contents);

    let window = tail::tail(&path, 10).unwrap();
    assert_eq!(window.header()[3], "Units");
    assert_eq!(window.cell(0, 1), Some("1.0"));
    assert_eq!(window.cell(0, 3), Some("Torr"));
}

#[test]
fn test_tail_zero_requests_empty_window() {
    let scratch = ScratchDir::new("tail_zero");
    let rows = vec!["2025-07-23 10:00:00,1.0,2.0,Torr".to_string()];
    let path = scratch.write_file("pressure.csv", &synthetic::pressure_log(&rows));

    let window = tail::tail(&path, 0).unwrap();
    assert!(window.is_empty());
}
