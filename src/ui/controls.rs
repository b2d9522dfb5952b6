//! Controls column: helper command buttons with their parameter
//! dropdowns, display options, and data directory plumbing.
//!
//! A dropdown pick rewrites the trailing argument of the matching helper
//! command, so the next launch uses the new value; a process that is
//! already running keeps the arguments it started with.

use eframe::egui;

use crate::app::VesselLogApp;
use crate::state;

impl VesselLogApp {
    /// Render the right-hand controls column.
    pub fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(6.0);
        ui.heading("Run Control");
        ui.add_space(4.0);
        ui.separator();

        self.render_pressure_controls(ui);
        ui.separator();
        self.render_flow_controls(ui);
        ui.separator();
        self.render_display_controls(ui);
        ui.separator();
        self.render_data_controls(ui);
    }

    fn render_pressure_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Pressure logging").strong());
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Log increment");
            let current = self.settings.pressure_log_increment_secs;
            if let Some(secs) =
                table_dropdown(ui, "pressure_increment", state::LOG_INCREMENTS, current)
            {
                self.settings.pressure_log_increment_secs = secs;
                self.update_trailing_arg(state::LOG_PRESSURE_CMD, &secs.to_string());
            }
        });
        self.render_command_button(ui, state::LOG_PRESSURE_CMD);
    }

    fn render_flow_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Gas flow").strong());
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Log increment");
            let current = self.settings.flow_log_increment_secs;
            if let Some(secs) = table_dropdown(ui, "flow_increment", state::LOG_INCREMENTS, current)
            {
                self.settings.flow_log_increment_secs = secs;
                self.update_trailing_arg(state::LOG_FLOW_CMD, &secs.to_string());
            }
        });
        self.render_command_button(ui, state::LOG_FLOW_CMD);

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Setpoint");
            let current = self.settings.flow_setpoint_percent;
            if let Some(percent) =
                table_dropdown(ui, "flow_setpoint", state::FLOW_SETPOINTS, current)
            {
                self.settings.flow_setpoint_percent = percent;
                self.update_trailing_arg(state::SET_FLOW_CMD, &percent.to_string());
            }
        });
        self.render_command_button(ui, state::SET_FLOW_CMD);
    }

    fn render_display_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Display").strong());
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("# data points shown");
            let current = self.settings.buffer_size;
            let mut picked = None;
            egui::ComboBox::from_id_salt("buffer_size")
                .selected_text(current.to_string())
                .width(80.0)
                .show_ui(ui, |ui| {
                    for &size in state::BUFFER_SIZES {
                        if ui
                            .selectable_label(size == current, size.to_string())
                            .clicked()
                        {
                            picked = Some(size);
                        }
                    }
                });
            if let Some(size) = picked {
                self.apply_buffer_size(size);
            }
        });
    }

    fn render_data_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Data").strong());
        ui.add_space(4.0);

        ui.label(
            egui::RichText::new(self.settings.data_dir.display().to_string())
                .size(12.0)
                .weak(),
        );
        ui.horizontal(|ui| {
            if ui.button("Choose folder...").clicked() {
                if let Some(dir) = rfd::FileDialog::new()
                    .set_directory(&self.settings.data_dir)
                    .pick_folder()
                {
                    self.settings.data_dir = dir;
                    match self.settings.save() {
                        Ok(()) => self
                            .show_toast_warning("Data folder saved; log paths update at next launch"),
                        Err(e) => self.show_toast_error(&format!("Failed to save settings: {}", e)),
                    }
                }
            }
            if ui.button("Open folder").clicked() {
                if let Err(e) = open::that(&self.settings.data_dir) {
                    tracing::error!("could not open data folder: {}", e);
                    self.show_toast_error(&format!("Could not open folder: {}", e));
                }
            }
        });

        ui.add_space(6.0);
        egui::Grid::new("port_fields").num_columns(2).show(ui, |ui| {
            ui.label("Gauge port");
            ui.text_edit_singleline(&mut self.settings.gauge_port);
            ui.end_row();
            ui.label("Flow port");
            ui.text_edit_singleline(&mut self.settings.flow_port);
            ui.end_row();
        });
        ui.small("Port and folder changes apply at next launch");
    }

    /// Full-width start/stop toggle for one helper command.
    fn render_command_button(&mut self, ui: &mut egui::Ui, label: &str) {
        let running = self.processes.is_running(label);
        let (text, fill) = if running {
            (format!("Stop {}", label), state::STOP_COLOR)
        } else {
            (format!("Start {}", label), state::START_COLOR)
        };
        let button = egui::Button::new(egui::RichText::new(text).color(egui::Color32::WHITE))
            .fill(egui::Color32::from_rgb(fill[0], fill[1], fill[2]));
        if ui.add_sized([ui.available_width(), 28.0], button).clicked() {
            self.toggle_command(label);
        }
    }

    /// Swap a command's trailing argument for a newly picked value.
    fn update_trailing_arg(&mut self, label: &str, value: &str) {
        if let Err(e) = self.processes.set_trailing_arg(label, value) {
            tracing::error!("command update failed: {}", e);
            self.show_toast_error(&format!("{}", e));
        }
    }
}

/// Dropdown over a (name, value) option table. Returns a newly picked
/// value, or `None` when the selection did not change this frame.
fn table_dropdown<T: Copy + PartialEq>(
    ui: &mut egui::Ui,
    id: &str,
    table: &[(&str, T)],
    current: T,
) -> Option<T> {
    let mut picked = None;
    let current_name = table
        .iter()
        .find(|(_, value)| *value == current)
        .map(|(name, _)| *name)
        .unwrap_or("custom");
    egui::ComboBox::from_id_salt(id)
        .selected_text(current_name)
        .width(80.0)
        .show_ui(ui, |ui| {
            for (name, value) in table {
                if ui.selectable_label(*value == current, *name).clicked() {
                    picked = Some(*value);
                }
            }
        });
    picked
}
