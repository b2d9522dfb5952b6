//! Tests for helper process lifecycle control
//!
//! Tests cover:
//! - Command registration and trailing-argument updates
//! - Start/stop/toggle against real child processes
//! - Reaping children that exited on their own

use vessellog::process::{ProcessController, ProcessError};

// ============================================
// Registration Tests
// ============================================

#[test]
fn test_register_rejects_duplicates_and_empty_lines() {
    let mut control = ProcessController::new();
    control
        .register("Log Pressure", "logger /tmp/out.csv 2")
        .unwrap();

    let duplicate = control.register("Log Pressure", "logger");
    assert!(matches!(duplicate, Err(ProcessError::DuplicateLabel(_))));

    let empty = control.register("Other", "   ");
    assert!(matches!(empty, Err(ProcessError::EmptyCommand(_))));
}

#[test]
fn test_labels_preserve_registration_order() {
    let mut control = ProcessController::new();
    control.register("First", "a").unwrap();
    control.register("Second", "b").unwrap();

    let labels: Vec<&str> = control.labels().collect();
    assert_eq!(labels, vec!["First", "Second"]);
}

#[test]
fn test_set_trailing_arg_retargets_last_token() {
    let mut control = ProcessController::new();
    control
        .register("Log Pressure", "logger /tmp/out.csv 2")
        .unwrap();

    control.set_trailing_arg("Log Pressure", "600").unwrap();
    assert_eq!(
        control.command_line("Log Pressure").unwrap(),
        "logger /tmp/out.csv 600"
    );

    let unknown = control.set_trailing_arg("Missing", "600");
    assert!(matches!(unknown, Err(ProcessError::UnknownLabel(_))));
}

#[test]
fn test_unknown_label_errors() {
    let mut control = ProcessController::new();
    assert!(matches!(
        control.start("Ghost"),
        Err(ProcessError::UnknownLabel(_))
    ));
    assert!(matches!(
        control.stop("Ghost"),
        Err(ProcessError::UnknownLabel(_))
    ));
    assert!(!control.is_running("Ghost"));
}

#[test]
fn test_stop_without_start_is_ok() {
    let mut control = ProcessController::new();
    control.register("Idle", "logger arg").unwrap();

    control.stop("Idle").unwrap();
    assert!(!control.is_running("Idle"));
}

// ============================================
// Lifecycle Tests (spawn real children)
// ============================================

#[cfg(unix)]
#[test]
fn test_toggle_starts_and_stops_a_child() {
    let mut control = ProcessController::new();
    control.register("Sleeper", "sleep 30").unwrap();

    assert!(control.toggle("Sleeper").unwrap());
    assert!(control.is_running("Sleeper"));

    assert!(!control.toggle("Sleeper").unwrap());
    assert!(!control.is_running("Sleeper"));
}

#[cfg(unix)]
#[test]
fn test_start_is_idempotent_while_running() {
    let mut control = ProcessController::new();
    control.register("Sleeper", "sleep 30").unwrap();

    control.start("Sleeper").unwrap();
    control.start("Sleeper").unwrap();
    assert!(control.is_running("Sleeper"));

    control.stop("Sleeper").unwrap();
    assert!(!control.is_running("Sleeper"));
}

#[cfg(unix)]
#[test]
fn test_reap_finished_notices_self_exit() {
    let mut control = ProcessController::new();
    control.register("Quick", "sh -c exit").unwrap();
    control.start("Quick").unwrap();

    // The child exits immediately; poll until the reaper notices.
    let mut finished = Vec::new();
    for _ in 0..100 {
        finished = control.reap_finished();
        if !finished.is_empty() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(20));
    }

    assert_eq!(finished, vec!["Quick".to_string()]);
    assert!(!control.is_running("Quick"));
}

#[cfg(unix)]
#[test]
fn test_spawn_failure_reports_label() {
    let mut control = ProcessController::new();
    control
        .register("Ghost", "/nonexistent/vessellog_test_binary arg")
        .unwrap();

    let err = control.start("Ghost").unwrap_err();
    match err {
        ProcessError::Spawn { label, .. } => assert_eq!(label, "Ghost"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!control.is_running("Ghost"));
}

#[cfg(unix)]
#[test]
fn test_shutdown_stops_every_running_child() {
    let mut control = ProcessController::new();
    control.register("A", "sleep 30").unwrap();
    control.register("B", "sleep 30").unwrap();
    control.start("A").unwrap();
    control.start("B").unwrap();

    control.shutdown();

    assert!(!control.is_running("A"));
    assert!(!control.is_running("B"));
}
