use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::FieldValue;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filters and insight read-outs
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(catalog) = &state.catalog else {
        ui.label("No catalog loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let genre_index = catalog.genre_index.clone();
    let columns = catalog.extra_columns.clone();
    let unique = catalog.unique_values.clone();
    let year_span = catalog.year_span;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            year_section(ui, state, year_span);
            ui.separator();
            genre_section(ui, state, &genre_index);
            column_sections(ui, state, &columns, &unique);
            ui.separator();
            insight_section(ui, state, &genre_index);
        });

    // Recompute visible indices and stats after any widget changes.
    state.refilter();
}

fn year_section(ui: &mut Ui, state: &mut AppState, year_span: Option<(i32, i32)>) {
    ui.strong("Release year");
    let (lo, hi) = year_span.unwrap_or((1900, 2100));
    ui.horizontal(|ui: &mut Ui| {
        ui.add(egui::DragValue::new(&mut state.filters.years.min).range(lo..=hi));
        ui.label("to");
        ui.add(egui::DragValue::new(&mut state.filters.years.max).range(lo..=hi));
        if ui.small_button("1990s").clicked() {
            state.focus_nineties();
        }
    });
    // Keep the window well-formed while the user drags the bounds.
    if state.filters.years.max < state.filters.years.min {
        state.filters.years.max = state.filters.years.min;
    }
}

fn genre_section(ui: &mut Ui, state: &mut AppState, genre_index: &BTreeSet<String>) {
    let n_selected = state.filters.genres.len();
    let n_total = genre_index.len();
    let header_text = format!("Genres  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            // Select all / none buttons
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.filters.genres = genre_index.clone();
                }
                if ui.small_button("None").clicked() {
                    state.filters.genres.clear();
                }
            });

            for tag in genre_index {
                let is_selected = state.filters.genres.contains(tag);

                let mut text = RichText::new(tag);
                if let Some(colors) = &state.genre_colors {
                    text = text.color(colors.color_for(tag));
                }

                let mut checked = is_selected;
                if ui.checkbox(&mut checked, text).changed() {
                    if checked {
                        state.filters.genres.insert(tag.clone());
                    } else {
                        state.filters.genres.remove(tag);
                    }
                }
            }
        });
}

fn column_sections(
    ui: &mut Ui,
    state: &mut AppState,
    columns: &[String],
    unique: &BTreeMap<String, BTreeSet<FieldValue>>,
) {
    for col in columns {
        let Some(all_values) = unique.get(col) else {
            continue;
        };

        let selected = state.filters.columns.entry(col.clone()).or_default();

        // Show count of selected / total in the header
        let n_selected = selected.len();
        let n_total = all_values.len();
        let header_text = format!("{col}  ({n_selected}/{n_total})");

        egui::CollapsingHeader::new(RichText::new(header_text).strong())
            .id_salt(col)
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    if ui.small_button("All").clicked() {
                        state.filters.columns.insert(col.clone(), all_values.clone());
                    }
                    if ui.small_button("None").clicked() {
                        state.filters.columns.insert(col.clone(), BTreeSet::new());
                    }
                });

                // Re-borrow after potential mutation from All/None
                let selected = state.filters.columns.entry(col.clone()).or_default();

                for val in all_values {
                    let is_selected = selected.contains(val);

                    let mut checked = is_selected;
                    if ui.checkbox(&mut checked, val.to_string()).changed() {
                        if checked {
                            selected.insert(val.clone());
                        } else {
                            selected.remove(val);
                        }
                    }
                }
            });
    }
}

fn insight_section(ui: &mut Ui, state: &mut AppState, genre_index: &BTreeSet<String>) {
    ui.strong("Insights");
    ui.add_space(2.0);

    match &state.stats {
        Some(stats) => {
            ui.label(format!(
                "{} titles with usable durations",
                stats.samples.len()
            ));
            ui.label(format!(
                "Most frequent duration: {} min",
                stats.most_frequent
            ));
            ui.label(format!(
                "Short {} titles (<= {} min): {}",
                state.short_genre, state.short_cutoff, stats.short_count
            ));
        }
        None => {
            ui.label("No durations available for the current filters.");
        }
    }

    ui.add_space(4.0);

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Genre");
        let current = state.short_genre.clone();
        egui::ComboBox::from_id_salt("short_genre")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for tag in genre_index {
                    if ui.selectable_label(current == *tag, tag).clicked() {
                        state.short_genre = tag.clone();
                    }
                }
            });
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Cutoff (min)");
        ui.add(egui::DragValue::new(&mut state.short_cutoff).range(1..=600));
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Bin width (min)");
        ui.add(egui::Slider::new(&mut state.bin_width, 1..=50));
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(catalog) = &state.catalog {
            ui.label(format!(
                "{} titles loaded, {} visible",
                catalog.len(),
                state.visible_indices.len()
            ));
        }

        ui.separator();

        if ui.selectable_label(state.show_table, "Table").clicked() {
            state.show_table = !state.show_table;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open catalog data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(catalog) => {
                log::info!(
                    "Loaded {} records with {} genre tags",
                    catalog.len(),
                    catalog.genre_index.len()
                );
                state.set_catalog(catalog);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
