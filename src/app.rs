use eframe::egui::{self, Ui};

use crate::state::AppState;
use crate::ui::{metrics, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyPenguinApp {
    pub state: AppState,
}

impl RustyPenguinApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RustyPenguinApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: attribution ----
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            panels::footer(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, raw data ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| dashboard(ui, &self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    ui.heading("🐧 Palmer Penguins Data Analysis");
    ui.label(
        "Exploratory analysis of the Palmer Penguins dataset. \
         Use the filters in the sidebar to explore the relationships between measurements.",
    );
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Dataset unavailable  (File → Open… to load a local copy)");
        });
        return;
    };

    let Some(summary) = state.selection.summary() else {
        metrics::empty_selection_warning(ui);
        return;
    };

    metrics::key_metrics(ui, &summary.metrics);
    ui.separator();

    ui.heading("📈 Visualizations");
    ui.columns(2, |cols| {
        plot::bill_scatter(&mut cols[0], &summary.points, &state.color_map);
        plot::mass_bar_chart(&mut cols[1], &summary.mass_by_species, &state.color_map);
    });
    ui.separator();

    table::raw_data(ui, &dataset.column_names, &summary.view);
}
