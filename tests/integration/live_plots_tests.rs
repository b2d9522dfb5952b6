//! Tests for the live plot registry polling real files
//!
//! Tests cover:
//! - File-backed plots refreshing on their poll schedule
//! - The derived gauge plot tracking its source plots
//! - Failure isolation when a log file disappears
//! - Stopped plots freezing while the file keeps growing

#[path = "../common/mod.rs"]
mod common;

use std::fs::OpenOptions;
use std::io::Write;
use std::time::{Duration, Instant};

use chrono::Local;
use common::float_cmp::*;
use common::{synthetic, ScratchDir};
use vessellog::plots::{Axis, LivePlots};

const TICK: Duration = Duration::from_millis(1000);

const INNER: &str = "Inner Vessel Pressure";
const OUTER: &str = "Outer Vessel Pressure";
const GAUGE: &str = "Gauge Pressure";
const FLOW: &str = "Gas Flowrate";

fn seconds_axis() -> Axis {
    Axis::new("Time since present", "s")
}

fn torr_axis() -> Axis {
    Axis::new("Pressure", "Torr")
}

fn flow_axis() -> Axis {
    Axis::new("Flowrate", "L/min")
}

/// Write one fixture file per plot, stamped just before `Local::now()`,
/// and register the full four-plot layout over them.
fn full_registry(scratch: &ScratchDir) -> LivePlots {
    let now = Local::now().naive_local();
    let inner_rows = vec![
        format!("{},5.0", synthetic::stamp(now, 3)),
        format!("{},0.25", synthetic::stamp(now, 2)),
        format!("{},4.0", synthetic::stamp(now, 1)),
    ];
    let outer_rows = vec![
        format!("{},8.0,7.0,Torr", synthetic::stamp(now, 3)),
        format!("{},100.0,Off,Pascal", synthetic::stamp(now, 2)),
        format!("{},Off,Off,Torr", synthetic::stamp(now, 1)),
    ];
    let flow_rows = vec![
        format!("{},50,0.2,L/min", synthetic::stamp(now, 3)),
        format!("{},Bad,Bad,L/min", synthetic::stamp(now, 2)),
        format!("{},200,200,SCCM", synthetic::stamp(now, 1)),
    ];
    scratch.write_file("inner.csv", &synthetic::inner_log(&inner_rows));
    scratch.write_file("outer.csv", &synthetic::pressure_log(&outer_rows));
    scratch.write_file("flow.csv", &synthetic::flow_log(&flow_rows));

    let mut plots = LivePlots::new();
    plots
        .register(
            INNER,
            seconds_axis(),
            torr_axis(),
            10,
            scratch.file("inner.csv"),
            "inner_vessel_pressure",
            TICK,
        )
        .unwrap();
    plots
        .register(
            OUTER,
            seconds_axis(),
            torr_axis(),
            10,
            scratch.file("outer.csv"),
            "outer_vessel_pressure",
            TICK,
        )
        .unwrap();
    plots
        .register_derived(GAUGE, seconds_axis(), torr_axis(), 10, INNER, OUTER, TICK)
        .unwrap();
    plots
        .register(
            FLOW,
            seconds_axis(),
            flow_axis(),
            10,
            scratch.file("flow.csv"),
            "flowrate",
            TICK,
        )
        .unwrap();
    plots
}

fn start_all(plots: &mut LivePlots, t0: Instant) {
    for title in [INNER, OUTER, GAUGE, FLOW] {
        plots.start(title, t0).unwrap();
    }
}

// ============================================
// Scheduled Refresh Tests
// ============================================

#[test]
fn test_file_backed_plots_refresh_on_schedule() {
    let scratch = ScratchDir::new("live_refresh");
    let mut plots = full_registry(&scratch);
    let t0 = Instant::now();
    start_all(&mut plots, t0);

    // Before the first deadline nothing has refreshed.
    plots.tick(t0 + Duration::from_millis(500));
    assert!(plots.series(INNER).unwrap().is_all_missing());

    plots.tick(t0 + TICK);

    let inner = plots.series(INNER).unwrap().points();
    assert_eq!(inner.len(), 3);
    assert_approx_eq(inner[0].1.unwrap(), 5.0, DEFAULT_TOLERANCE);
    assert_approx_eq(inner[1].1.unwrap(), 0.25, DEFAULT_TOLERANCE);
    assert_approx_eq(inner[2].1.unwrap(), 4.0, DEFAULT_TOLERANCE);
    // Ages run back from the read instant, oldest leftmost.
    assert!(inner[0].0 < inner[1].0 && inner[1].0 < inner[2].0);
    assert!(inner[2].0 <= 0.0);

    let outer = plots.series(OUTER).unwrap().points();
    assert_approx_eq(outer[0].1.unwrap(), 7.0, DEFAULT_TOLERANCE);
    assert_approx_eq(outer[1].1.unwrap(), 0.75006168, DEFAULT_TOLERANCE);
    assert_eq!(outer[2].1, None);

    let flow = plots.series(FLOW).unwrap().points();
    assert_approx_eq(flow[0].1.unwrap(), 0.2, DEFAULT_TOLERANCE);
    assert_eq!(flow[1].1, None);
    assert_approx_eq(flow[2].1.unwrap(), 0.2, DEFAULT_TOLERANCE);
}

#[test]
fn test_derived_gauge_tracks_sources_one_tick_behind() {
    let scratch = ScratchDir::new("live_derived");
    let mut plots = full_registry(&scratch);
    let t0 = Instant::now();
    start_all(&mut plots, t0);

    // First batch: the gauge refreshes from placeholder sources.
    plots.tick(t0 + TICK);
    assert!(plots.series(GAUGE).unwrap().is_all_missing());

    // Second batch: sources hold real data, gauge = outer - inner.
    plots.tick(t0 + TICK * 2);
    let gauge = plots.series(GAUGE).unwrap().points();
    assert_eq!(gauge.len(), 3);
    assert_approx_eq(gauge[0].1.unwrap(), 2.0, DEFAULT_TOLERANCE);
    assert_approx_eq(gauge[1].1.unwrap(), 0.50006168, DEFAULT_TOLERANCE);
    assert_eq!(gauge[2].1, None);
}

#[test]
fn test_buffer_size_change_applies_on_next_refresh() {
    let scratch = ScratchDir::new("live_buffer");
    let mut plots = full_registry(&scratch);
    let t0 = Instant::now();
    plots.set_buffer_size(FLOW, 2).unwrap();
    plots.start(FLOW, t0).unwrap();

    plots.tick(t0 + TICK);
    assert_eq!(plots.series(FLOW).unwrap().len(), 2);

    plots.set_buffer_size(FLOW, 3).unwrap();
    plots.tick(t0 + TICK * 2);
    assert_eq!(plots.series(FLOW).unwrap().len(), 3);
}

// ============================================
// Failure Isolation Tests
// ============================================

#[test]
fn test_missing_file_freezes_series_and_records_error() {
    let scratch = ScratchDir::new("live_missing");
    let mut plots = full_registry(&scratch);
    let t0 = Instant::now();
    start_all(&mut plots, t0);

    plots.tick(t0 + TICK);
    let latest_before = plots.series(FLOW).unwrap().latest();
    assert!(latest_before.is_some());

    std::fs::remove_file(scratch.file("flow.csv")).unwrap();
    plots.tick(t0 + TICK * 2);

    // The flow plot keeps its last-drawn series and reports why.
    let entry = plots.entry(FLOW).unwrap();
    assert_eq!(entry.series.latest(), latest_before);
    assert!(entry.last_error.as_deref().unwrap().contains("not found"));
    assert!(plots.is_running(FLOW));

    // Siblings keep refreshing.
    let inner = plots.entry(INNER).unwrap();
    assert!(inner.last_error.is_none());
    assert!(!inner.series.is_all_missing());
}

#[test]
fn test_error_clears_when_the_file_returns() {
    let scratch = ScratchDir::new("live_recover");
    let mut plots = full_registry(&scratch);
    let t0 = Instant::now();
    plots.start(FLOW, t0).unwrap();

    std::fs::remove_file(scratch.file("flow.csv")).unwrap();
    plots.tick(t0 + TICK);
    assert!(plots.entry(FLOW).unwrap().last_error.is_some());

    let now = Local::now().naive_local();
    let rows = vec![format!("{},50,0.2,L/min", synthetic::stamp(now, 1))];
    scratch.write_file("flow.csv", &synthetic::flow_log(&rows));

    plots.tick(t0 + TICK * 2);
    let entry = plots.entry(FLOW).unwrap();
    assert!(entry.last_error.is_none());
    assert!(entry.series.latest().is_some());
}

// ============================================
// Stop / Restart Tests
// ============================================

#[test]
fn test_stopped_plot_ignores_new_rows_until_restarted() {
    let scratch = ScratchDir::new("live_stop");
    let mut plots = full_registry(&scratch);
    let t0 = Instant::now();
    plots.start(FLOW, t0).unwrap();

    plots.tick(t0 + TICK);
    let frozen = plots.series(FLOW).unwrap().latest();

    plots.stop(FLOW).unwrap();
    let now = Local::now().naive_local();
    let mut file = OpenOptions::new()
        .append(true)
        .open(scratch.file("flow.csv"))
        .unwrap();
    writeln!(file, "{},90,0.36,L/min", synthetic::stamp(now, 0)).unwrap();

    // Ticks while stopped change nothing on screen.
    plots.tick(t0 + TICK * 5);
    assert_eq!(plots.series(FLOW).unwrap().latest(), frozen);

    // Restarting clears the window, then the next refresh picks up the
    // grown file.
    let t1 = t0 + TICK * 6;
    plots.start(FLOW, t1).unwrap();
    assert!(plots.series(FLOW).unwrap().is_all_missing());

    plots.tick(t1 + TICK);
    let (_, latest) = plots.series(FLOW).unwrap().latest().unwrap();
    assert_approx_eq(latest, 0.36, DEFAULT_TOLERANCE);
}
