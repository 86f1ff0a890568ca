use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Record table (bottom panel)
// ---------------------------------------------------------------------------

/// Render the visible records as a scrollable, virtualised table.
pub fn record_table(ui: &mut Ui, state: &AppState) {
    let Some(catalog) = &state.catalog else {
        ui.label("No catalog loaded.");
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::remainder().at_least(160.0))
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Title");
            });
            header.col(|ui| {
                ui.strong("Year");
            });
            header.col(|ui| {
                ui.strong("Duration");
            });
            header.col(|ui| {
                ui.strong("Genres");
            });
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let record = &catalog.records[state.visible_indices[row.index()]];
                row.col(|ui| {
                    ui.label(&record.title);
                });
                row.col(|ui| {
                    ui.label(
                        record
                            .release_year
                            .map(|y| y.to_string())
                            .unwrap_or_default(),
                    );
                });
                row.col(|ui| {
                    ui.label(record.duration.to_string());
                });
                row.col(|ui| {
                    ui.label(record.genres.join(", "));
                });
            });
        });
}
