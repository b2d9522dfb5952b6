//! VesselLog - live monitoring for a cryostat test stand
//!
//! This library provides the CSV tailing and extraction pipeline behind
//! the live charts, the serial protocols for the rig's instruments, and
//! the egui user interface that ties them together.
//!
//! ## Module Structure
//!
//! - [`app`] - Main application state and eframe::App implementation
//! - [`extract`] - Datatype rules that turn CSV tail windows into series
//! - [`instruments`] - Serial protocols for the PDR2000 and GF100
//! - [`logfile`] - CSV log creation and appending for the helper binaries
//! - [`plots`] - Live plot registry and refresh logic
//! - [`process`] - Helper process lifecycle behind the command buttons
//! - [`scheduler`] - Per-plot polling deadlines
//! - [`series`] - Missing-aware plot series
//! - [`settings`] - User settings persistence
//! - [`state`] - Core data types and constants
//! - [`tail`] - Tail window reads over growing CSV files
//! - [`ui`] - User interface components
//!   - `controls` - Command buttons, dropdowns, data directory
//!   - `live_tab` - Live chart grid
//!   - `toast` - Toast notification system

pub mod app;
pub mod extract;
pub mod instruments;
pub mod logfile;
pub mod plots;
pub mod process;
pub mod scheduler;
pub mod series;
pub mod settings;
pub mod state;
pub mod tail;
pub mod ui;
