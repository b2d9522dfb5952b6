//! Toast notifications in the bottom right corner.

use eframe::egui;

use crate::app::VesselLogApp;

/// How long a toast stays on screen, in seconds
const TOAST_SECS: u64 = 3;

impl VesselLogApp {
    /// Render the current toast, if one is still fresh enough to show.
    pub fn render_toast(&mut self, ctx: &egui::Context) {
        if let Some((message, shown_at, toast_type)) = &self.toast_message {
            if shown_at.elapsed().as_secs() < TOAST_SECS {
                let bg = toast_type.color();
                let fg = toast_type.text_color();
                let margin = 20.0;

                egui::Area::new(egui::Id::new("toast"))
                    .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-margin, -margin))
                    .order(egui::Order::Foreground)
                    .show(ctx, |ui| {
                        egui::Frame::NONE
                            .fill(egui::Color32::from_rgb(bg[0], bg[1], bg[2]))
                            .corner_radius(8)
                            .inner_margin(egui::Margin::symmetric(16, 12))
                            .shadow(egui::epaint::Shadow {
                                offset: [2, 2],
                                blur: 8,
                                spread: 0,
                                color: egui::Color32::from_black_alpha(60),
                            })
                            .show(ui, |ui| {
                                // Wrap long messages instead of stretching the frame
                                ui.set_min_width(200.0);
                                ui.set_max_width(400.0);
                                ui.label(
                                    egui::RichText::new(message)
                                        .color(egui::Color32::from_rgb(fg[0], fg[1], fg[2]))
                                        .size(14.0),
                                );
                            });
                    });
            } else {
                self.toast_message = None;
            }
        }
    }
}
