//! Core module tests for the data pipeline
//!
//! Tests for:
//! - Tail window reads over growing CSV files
//! - Datatype extraction and unit normalization
//! - User settings persistence
//! - Helper process control

pub mod process_tests;
pub mod tail_tests;
