use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, VLine};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Duration histogram (central panel)
// ---------------------------------------------------------------------------

/// Render the duration histogram in the central panel.
pub fn duration_histogram(ui: &mut Ui, state: &AppState) {
    if state.catalog.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a catalog to explore durations  (File → Open…)");
        });
        return;
    }

    let Some(stats) = &state.stats else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No durations available for the current filters");
        });
        return;
    };

    let bin_width = state.bin_width.max(1);
    let chart = BarChart::new(binned_bars(&stats.samples, bin_width))
        .name("Titles per duration bin")
        .color(Color32::LIGHT_BLUE);

    let mode_marker = VLine::new(f64::from(stats.most_frequent))
        .name("Most frequent")
        .color(Color32::GOLD);

    Plot::new("duration_histogram")
        .legend(Legend::default())
        .x_axis_label("Duration (minutes)")
        .y_axis_label("Titles")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
            plot_ui.vline(mode_marker);
        });
}

/// Bucket samples into fixed-width bins, one bar per non-empty bin,
/// centred on its bin.
fn binned_bars(samples: &[u32], bin_width: u32) -> Vec<Bar> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for &sample in samples {
        *counts.entry(sample / bin_width).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(bin, count)| {
            let center = f64::from(bin * bin_width) + f64::from(bin_width) / 2.0;
            Bar::new(center, count as f64).width(f64::from(bin_width) * 0.95)
        })
        .collect()
}
