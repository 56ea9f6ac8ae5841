use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Category;
use crate::state::AppState;

const DATA_HOME: &str = "https://github.com/allisonhorst/palmerpenguins";

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Your Penguins");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for category in Category::ALL {
                let all_values = dataset.distinct(category);
                let n_selected = state.criteria.selected(category).len();
                let header_text = if n_selected == 0 {
                    format!("{}  (any)", category.label())
                } else {
                    format!("{}  ({n_selected}/{})", category.label(), all_values.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(category.column())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(category);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(category);
                            }
                        });

                        for value in all_values {
                            let mut text = RichText::new(value);
                            if category == Category::Species {
                                text = text.color(state.color_map.color_for(value));
                            }

                            let mut checked = state.criteria.selected(category).contains(value);
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(category, value);
                            }
                        }
                    });
            }

            ui.separator();
            mass_range_slider(ui, state, dataset.mass_bounds());
        });
}

/// Two sliders over the observed integer mass bounds.
fn mass_range_slider(ui: &mut Ui, state: &mut AppState, bounds: Option<(f64, f64)>) {
    ui.strong("Select Body Mass (g)");
    let Some((lo, hi)) = bounds else {
        ui.label("No body mass values.");
        return;
    };
    let (lo, hi) = (lo.trunc(), hi.trunc());

    let (mut min, mut max) = state.criteria.mass_range;
    let min_changed = ui
        .add(egui::Slider::new(&mut min, lo..=hi).step_by(1.0).text("min"))
        .changed();
    let max_changed = ui
        .add(egui::Slider::new(&mut max, lo..=hi).step_by(1.0).text("max"))
        .changed();

    if min_changed || max_changed {
        if min_changed && min > max {
            max = min;
        } else if max_changed && max < min {
            min = max;
        }
        state.set_mass_range(min, max);
    }
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
            let can_export = state.selection.summary().is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export selection…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} penguins loaded, {} visible",
                ds.len(),
                state.selection.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

pub fn footer(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Data Source:");
        ui.hyperlink_to("Palmer Penguins Dataset", DATA_HOME);
        if let Some(source) = &state.source {
            ui.label(RichText::new(format!("({source})")).weak());
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open penguin data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} penguins with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                state.set_dataset(Arc::new(dataset), path.display().to_string());
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.set_error(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let (Some(ds), Some(summary)) = (&state.dataset, state.selection.summary()) else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export selection")
        .set_file_name("penguins_selection.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match crate::data::export::export_file(&path, &ds.column_names, &summary.view) {
            Ok(()) => log::info!("Exported {} rows to {}", summary.view.len(), path.display()),
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
