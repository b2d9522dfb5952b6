//! Main application state and frame loop.
//!
//! The app owns the plot registry, the helper process controller, and the
//! persisted settings. Everything runs on the UI thread: each frame first
//! runs the poll ticks that came due, then draws, then asks egui to wake
//! it again in time for the next deadline. The helper binaries do the
//! actual instrument I/O; this process only tails their CSV output.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::logfile;
use crate::plots::{Axis, LivePlots};
use crate::process::ProcessController;
use crate::settings::UserSettings;
use crate::state::{self, ToastType};

/// Main application state
pub struct VesselLogApp {
    /// Live plot registry plus its poll scheduler
    pub(crate) plots: LivePlots,
    /// Helper processes launched from the command buttons
    pub(crate) processes: ProcessController,
    /// Persisted preferences
    pub(crate) settings: UserSettings,
    /// Toast message for user feedback
    pub(crate) toast_message: Option<(String, Instant, ToastType)>,
    /// When command liveness was last re-checked
    last_process_poll: Instant,
}

impl VesselLogApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        Self::with_settings(UserSettings::load())
    }

    /// Build the app from explicit settings. Registration failures here
    /// mean the wiring below is wrong and abort startup.
    pub fn with_settings(settings: UserSettings) -> anyhow::Result<Self> {
        let outer_path = state::log_path(&settings.data_dir, state::OUTER_PRESSURE_LOG);
        let inner_path = state::log_path(&settings.data_dir, state::INNER_PRESSURE_LOG);
        let flow_path = state::log_path(&settings.data_dir, state::GAS_FLOW_LOG);

        // The loggers launched from this app own these two files; make
        // sure their headers exist before the first poll. The inner
        // vessel log is written by the slow-control system and may not
        // exist yet, which the refresh path tolerates.
        if let Err(e) = logfile::create_log_csv(&outer_path, &logfile::PRESSURE_HEADER) {
            tracing::warn!("could not create {}: {}", outer_path.display(), e);
        }
        if let Err(e) = logfile::create_log_csv(&flow_path, &logfile::FLOW_HEADER) {
            tracing::warn!("could not create {}: {}", flow_path.display(), e);
        }

        let poll = Duration::from_millis(settings.poll_interval_ms);
        let buffer = settings.buffer_size;
        let seconds = Axis::new("Time since present", "s");
        let torr = Axis::new("Pressure", "Torr");
        let lpm = Axis::new("Flowrate", state::FLOW_UNITS);

        let mut plots = LivePlots::new();
        plots.register(
            state::INNER_PRESSURE_PLOT,
            seconds.clone(),
            torr.clone(),
            buffer,
            &inner_path,
            "inner_vessel_pressure",
            poll,
        )?;
        plots.register(
            state::OUTER_PRESSURE_PLOT,
            seconds.clone(),
            torr.clone(),
            buffer,
            &outer_path,
            "outer_vessel_pressure",
            poll,
        )?;
        plots.register_derived(
            state::GAUGE_PRESSURE_PLOT,
            seconds.clone(),
            torr,
            buffer,
            state::INNER_PRESSURE_PLOT,
            state::OUTER_PRESSURE_PLOT,
            poll,
        )?;
        plots.register(
            state::FLOWRATE_PLOT,
            seconds,
            lpm,
            buffer,
            &flow_path,
            "flowrate",
            poll,
        )?;

        let now = Instant::now();
        for title in state::ALL_PLOTS {
            plots.start(title, now)?;
        }

        let mut processes = ProcessController::new();
        processes.register(
            state::LOG_PRESSURE_CMD,
            &format!(
                "{} {} {} {}",
                sibling_binary("log_pressure").display(),
                outer_path.display(),
                settings.gauge_port,
                settings.pressure_log_increment_secs
            ),
        )?;
        processes.register(
            state::LOG_FLOW_CMD,
            &format!(
                "{} {} {} {}",
                sibling_binary("log_flow").display(),
                flow_path.display(),
                settings.flow_port,
                settings.flow_log_increment_secs
            ),
        )?;
        processes.register(
            state::SET_FLOW_CMD,
            &format!(
                "{} {} {}",
                sibling_binary("set_flow").display(),
                settings.flow_port,
                settings.flow_setpoint_percent
            ),
        )?;

        Ok(Self {
            plots,
            processes,
            settings,
            toast_message: None,
            last_process_poll: Instant::now(),
        })
    }

    /// Queue a toast notification
    pub(crate) fn show_toast(&mut self, message: &str, toast_type: ToastType) {
        self.toast_message = Some((message.to_string(), Instant::now(), toast_type));
    }

    pub(crate) fn show_toast_success(&mut self, message: &str) {
        self.show_toast(message, ToastType::Success);
    }

    pub(crate) fn show_toast_info(&mut self, message: &str) {
        self.show_toast(message, ToastType::Info);
    }

    pub(crate) fn show_toast_warning(&mut self, message: &str) {
        self.show_toast(message, ToastType::Warning);
    }

    pub(crate) fn show_toast_error(&mut self, message: &str) {
        self.show_toast(message, ToastType::Error);
    }

    /// Start or stop the helper process behind a command button.
    pub(crate) fn toggle_command(&mut self, label: &str) {
        match self.processes.toggle(label) {
            Ok(true) => self.show_toast_success(&format!("Started {}", label)),
            Ok(false) => self.show_toast_info(&format!("Stopped {}", label)),
            Err(e) => {
                tracing::error!("command toggle failed: {}", e);
                self.show_toast_error(&format!("{}", e));
            }
        }
    }

    /// Start or stop one plot's polling.
    pub(crate) fn toggle_plot(&mut self, title: &str) {
        let result = if self.plots.is_running(title) {
            self.plots.stop(title)
        } else {
            self.plots.start(title, Instant::now())
        };
        if let Err(e) = result {
            tracing::error!("plot toggle failed: {}", e);
            self.show_toast_error(&format!("{}", e));
        }
    }

    /// Apply a buffer size selection to every plot and remember it.
    pub(crate) fn apply_buffer_size(&mut self, buffer_size: usize) {
        if let Err(e) = self.plots.set_buffer_size_all(&state::ALL_PLOTS, buffer_size) {
            tracing::error!("buffer size change failed: {}", e);
            self.show_toast_error(&format!("{}", e));
            return;
        }
        self.settings.buffer_size = buffer_size;
    }
}

/// Path to one of the helper binaries installed next to this executable.
fn sibling_binary(name: &str) -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
}

impl eframe::App for VesselLogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // Run every poll tick that came due since the last frame.
        self.plots.tick(now);

        // Re-check helper process liveness on its own cadence.
        if now.duration_since(self.last_process_poll)
            >= Duration::from_millis(state::PROCESS_POLL_MS)
        {
            self.last_process_poll = now;
            for label in self.processes.reap_finished() {
                self.show_toast_info(&format!("{} finished", label));
            }
        }

        ctx.set_visuals(egui::Visuals::dark());

        // Controls column on the right
        egui::SidePanel::right("controls_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                self.render_controls(ui);
            });

        // Live plot grid
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_live_grid(ui);
        });

        // Toast notifications
        self.render_toast(ctx);

        // Wake up for the next poll deadline even if the user never
        // touches the window.
        let mut wake = self.last_process_poll + Duration::from_millis(state::PROCESS_POLL_MS);
        if let Some(deadline) = self.plots.next_deadline() {
            wake = wake.min(deadline);
        }
        ctx.request_repaint_after(wake.saturating_duration_since(Instant::now()));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // No logger outlives the monitor.
        self.processes.shutdown();
        if let Err(e) = self.settings.save() {
            tracing::warn!("failed to save settings: {}", e);
        }
    }
}
