//! User settings persistence.
//!
//! This module handles loading and saving user preferences across sessions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// User settings that persist across sessions
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Directory the CSV log files live in
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Serial port of the PDR2000 pressure readout
    #[serde(default = "default_gauge_port")]
    pub gauge_port: String,
    /// Serial port of the GF100 flow controller
    #[serde(default = "default_flow_port")]
    pub flow_port: String,
    /// Plot refresh interval in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Rows shown per plot
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Seconds between logged pressure readings
    #[serde(default = "default_log_increment_secs")]
    pub pressure_log_increment_secs: u32,
    /// Seconds between logged flow readings
    #[serde(default = "default_log_increment_secs")]
    pub flow_log_increment_secs: u32,
    /// Last selected flow setpoint, percent of full scale
    #[serde(default = "default_flow_setpoint_percent")]
    pub flow_setpoint_percent: u8,
}

fn default_version() -> u32 {
    1
}

fn default_data_dir() -> PathBuf {
    dirs::document_dir()
        .map(|p| p.join("VesselLog"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_gauge_port() -> String {
    #[cfg(target_os = "windows")]
    {
        "COM4".to_string()
    }
    #[cfg(not(target_os = "windows"))]
    {
        "/dev/ttyUSB0".to_string()
    }
}

fn default_flow_port() -> String {
    #[cfg(target_os = "windows")]
    {
        "COM3".to_string()
    }
    #[cfg(not(target_os = "windows"))]
    {
        "/dev/ttyUSB1".to_string()
    }
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_buffer_size() -> usize {
    10
}

fn default_log_increment_secs() -> u32 {
    2
}

fn default_flow_setpoint_percent() -> u8 {
    0
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            version: 1,
            data_dir: default_data_dir(),
            gauge_port: default_gauge_port(),
            flow_port: default_flow_port(),
            poll_interval_ms: default_poll_interval_ms(),
            buffer_size: default_buffer_size(),
            pressure_log_increment_secs: default_log_increment_secs(),
            flow_log_increment_secs: default_log_increment_secs(),
            flow_setpoint_percent: default_flow_setpoint_percent(),
        }
    }
}

impl UserSettings {
    /// Get the config directory path for VesselLog
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("VesselLog"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("VesselLog"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|p| p.join("vessellog"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            dirs::config_dir().map(|p| p.join("vessellog"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk
    pub fn load() -> Self {
        let path = match Self::get_settings_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::get_settings_path()
            .ok_or_else(|| "Could not determine config directory".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }
}
