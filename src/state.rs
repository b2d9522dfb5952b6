//! Core application state types and constants.
//!
//! Rig wiring lives here: plot titles, log file names, command button
//! labels, and the dropdown option tables, plus the small state types
//! shared across the UI.

use std::path::{Path, PathBuf};

// ============================================================================
// Constants
// ============================================================================

/// Application window title
pub const APP_TITLE: &str = "VesselLog";

/// Plots laid out per row in the live grid
pub const PLOTS_PER_ROW: usize = 2;

/// How often command process liveness is re-checked, in milliseconds
pub const PROCESS_POLL_MS: u64 = 500;

/// Full scale flow of the rig's GF100, in L/min
pub const MAX_FLOW_LPM: f64 = 0.4;

/// Units the flow log reports in
pub const FLOW_UNITS: &str = "L/min";

/// Plot titles, in layout order
pub const INNER_PRESSURE_PLOT: &str = "Inner Vessel Pressure";
pub const OUTER_PRESSURE_PLOT: &str = "Outer Vessel Pressure";
pub const GAUGE_PRESSURE_PLOT: &str = "Gauge Pressure";
pub const FLOWRATE_PLOT: &str = "Gas Flowrate";

/// All plot titles, for buffer-size changes that apply across the board
pub const ALL_PLOTS: [&str; 4] = [
    INNER_PRESSURE_PLOT,
    OUTER_PRESSURE_PLOT,
    GAUGE_PRESSURE_PLOT,
    FLOWRATE_PLOT,
];

/// Command button labels (also the process controller keys)
pub const LOG_PRESSURE_CMD: &str = "Log Outer Vessel Pressure";
pub const LOG_FLOW_CMD: &str = "Log Gas Flowrate";
pub const SET_FLOW_CMD: &str = "Change Gas Flowrate";

/// Log file names under the data directory
pub const OUTER_PRESSURE_LOG: &str = "outer_vessel_pressure_log.csv";
pub const INNER_PRESSURE_LOG: &str = "inner_vessel_pressure_log.csv";
pub const GAS_FLOW_LOG: &str = "gas_flow_log.csv";

/// Logging interval choices: display name and seconds between readings
pub const LOG_INCREMENTS: &[(&str, u32)] = &[
    ("2s", 2),
    ("10s", 10),
    ("1m", 60),
    ("10m", 600),
    ("1hr", 3600),
];

/// Flow setpoint choices: display name and percent of full scale
pub const FLOW_SETPOINTS: &[(&str, u8)] = &[
    ("0%", 0),
    ("5%", 5),
    ("25%", 25),
    ("50%", 50),
    ("75%", 75),
    ("100%", 100),
];

/// Buffer size choices for the "# data points shown" dropdown
pub const BUFFER_SIZES: &[usize] = &[10, 50, 100, 1000, 10000];

/// Line colors for the live charts, indexed by plot layout order
pub const CHART_COLORS: &[[u8; 3]] = &[
    [253, 193, 73],  // Amber
    [100, 149, 237], // Cornflower blue
    [159, 166, 119], // Sage green
    [255, 127, 80],  // Coral
];

/// Button fill for start actions
pub const START_COLOR: [u8; 3] = [58, 125, 68];

/// Button fill for stop actions
pub const STOP_COLOR: [u8; 3] = [158, 41, 36];

/// Resolve a log file name against the configured data directory.
pub fn log_path(data_dir: &Path, file_name: &str) -> PathBuf {
    data_dir.join(file_name)
}

// ============================================================================
// Core Types
// ============================================================================

/// Type of toast notification (determines color)
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum ToastType {
    /// Informational message (blue)
    #[default]
    Info,
    /// Success message (green)
    Success,
    /// Warning message (amber)
    Warning,
    /// Error message (red)
    Error,
}

impl ToastType {
    /// Get the background color for this toast type
    pub fn color(&self) -> [u8; 3] {
        match self {
            ToastType::Info => [54, 93, 140],     // Steel blue
            ToastType::Success => [58, 125, 68],  // Green
            ToastType::Warning => [222, 168, 62], // Amber
            ToastType::Error => [158, 41, 36],    // Red
        }
    }

    /// Get the text color for this toast type
    pub fn text_color(&self) -> [u8; 3] {
        match self {
            ToastType::Warning => [30, 30, 30], // Dark text for amber background
            _ => [255, 255, 255],               // White text for other backgrounds
        }
    }
}
