//! UI rendering modules for the VesselLog application.
//!
//! This module organizes the UI into logical submodules:
//!
//! - `live_tab` - Live plot grid with per-plot start/stop toggles
//! - `controls` - Command buttons, dropdown selections, data directory
//! - `toast` - Toast notification system

pub mod controls;
pub mod live_tab;
pub mod toast;
