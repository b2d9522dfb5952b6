//! Live chart grid.
//!
//! One chart per registered plot, laid out two across in registration
//! order, each with its own start/stop toggle underneath. Entries are
//! snapshotted into plain structs before drawing so the plot closures
//! never borrow the registry.

use std::time::Instant;

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::app::VesselLogApp;
use crate::state;

/// Chart height inside each grid cell
const PLOT_HEIGHT: f32 = 240.0;

/// Snapshot of one plot entry for this frame's draw pass
struct PlotCell {
    title: String,
    x_label: String,
    y_label: String,
    unit: String,
    color: egui::Color32,
    running: bool,
    elapsed_secs: Option<f64>,
    last_error: Option<String>,
    latest: Option<(f64, f64)>,
    segments: Vec<Vec<[f64; 2]>>,
}

impl VesselLogApp {
    /// Render the grid of live charts in the central panel.
    pub fn render_live_grid(&mut self, ui: &mut egui::Ui) {
        let now = Instant::now();

        // Prepare data for the plot closures (can't borrow self mutably inside)
        let mut cells = Vec::new();
        for (index, entry) in self.plots.entries().iter().enumerate() {
            let color = state::CHART_COLORS[index % state::CHART_COLORS.len()];
            cells.push(PlotCell {
                title: entry.title.clone(),
                x_label: entry.x_axis.text(),
                y_label: entry.y_axis.text(),
                unit: entry.y_axis.unit.clone(),
                color: egui::Color32::from_rgb(color[0], color[1], color[2]),
                running: entry.running,
                elapsed_secs: self
                    .plots
                    .elapsed(&entry.title, now)
                    .map(|d| d.as_secs_f64()),
                last_error: entry.last_error.clone(),
                latest: entry.series.latest(),
                segments: entry.series.segments(),
            });
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let spacing = ui.spacing().item_spacing.x;
                let cell_width = (ui.available_width()
                    - spacing * (state::PLOTS_PER_ROW - 1) as f32)
                    / state::PLOTS_PER_ROW as f32;
                for row in cells.chunks(state::PLOTS_PER_ROW) {
                    ui.horizontal(|ui| {
                        for cell in row {
                            self.render_plot_cell(ui, cell, cell_width);
                        }
                    });
                    ui.add_space(8.0);
                }
            });
    }

    /// One grid cell: header line, chart, start/stop toggle.
    fn render_plot_cell(&mut self, ui: &mut egui::Ui, cell: &PlotCell, width: f32) {
        ui.vertical(|ui| {
            ui.set_width(width);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&cell.title).strong().size(15.0));
                if let Some(secs) = cell.elapsed_secs {
                    ui.weak(format!("running {:.0} s", secs));
                }
                if let Some(error) = &cell.last_error {
                    // Last refresh was skipped; the curve on screen is frozen.
                    ui.label(
                        egui::RichText::new("stale")
                            .size(12.0)
                            .color(egui::Color32::from_rgb(222, 168, 62)),
                    )
                    .on_hover_text(error);
                }
            });

            // Legend name doubles as the numeric readout when a reading exists
            let line_name = match cell.latest {
                Some((_, value)) => format!("{}: {:.4} {}", cell.title, value, cell.unit),
                None => cell.title.clone(),
            };

            Plot::new(cell.title.as_str())
                .height(PLOT_HEIGHT)
                .legend(Legend::default())
                .x_axis_label(cell.x_label.clone())
                .y_axis_label(cell.y_label.clone())
                .show(ui, |plot_ui| {
                    // One line per contiguous run; a gap marks missing readings
                    for segment in &cell.segments {
                        let plot_points: PlotPoints = segment.iter().copied().collect();
                        plot_ui.line(
                            Line::new(line_name.clone(), plot_points)
                                .color(cell.color)
                                .width(1.5),
                        );
                    }
                });

            let (text, fill) = if cell.running {
                (format!("Stop {}", cell.title), state::STOP_COLOR)
            } else {
                (format!("Start {}", cell.title), state::START_COLOR)
            };
            let button = egui::Button::new(egui::RichText::new(text).color(egui::Color32::WHITE))
                .fill(egui::Color32::from_rgb(fill[0], fill[1], fill[2]));
            if ui.add_sized([width, 26.0], button).clicked() {
                self.toggle_plot(&cell.title);
            }
        });
    }
}
