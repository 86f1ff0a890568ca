use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ReelMetricsApp {
    pub state: AppState,
}

impl Default for ReelMetricsApp {
    fn default() -> Self {
        Self {
            state: AppState::default(),
        }
    }
}

impl eframe::App for ReelMetricsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and insights ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: record table (toggleable) ----
        if self.state.show_table {
            egui::TopBottomPanel::bottom("record_table")
                .default_height(220.0)
                .resizable(true)
                .show(ctx, |ui| {
                    table::record_table(ui, &self.state);
                });
        }

        // ---- Central panel: histogram ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::duration_histogram(ui, &self.state);
        });
    }
}
