use eframe::egui::{Color32, RichText, Ui};

use crate::data::pipeline::Metrics;

// ---------------------------------------------------------------------------
// Key metrics row
// ---------------------------------------------------------------------------

pub fn key_metrics(ui: &mut Ui, metrics: &Metrics) {
    ui.heading("📊 Key Metrics");
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Total Penguins", metrics.count.to_string());
        metric(&mut cols[1], "Avg. Bill Length (mm)", format!("{:.1}", metrics.avg_bill_length));
        metric(
            &mut cols[2],
            "Avg. Body Mass (g)",
            format!("{} kg", metrics.body_mass_kg_label()),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.label(RichText::new(label).weak());
    ui.label(RichText::new(value).size(32.0).strong());
}

/// Shown in place of every output when nothing matches.
pub fn empty_selection_warning(ui: &mut Ui) {
    ui.add_space(12.0);
    ui.label(
        RichText::new("⚠ No data available for the selected filters. Please adjust your selection.")
            .color(Color32::from_rgb(0xd9, 0x8e, 0x04))
            .size(16.0),
    );
}
