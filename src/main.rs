mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::RustyPenguinApp;
use config::Config;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::from_env();
    let source = config.data_source();
    log::debug!("Using {config:?}");

    let mut state = AppState::default();
    match data::cache::load_once(&source, config.http_timeout) {
        Ok(dataset) => state.set_dataset(dataset, source.to_string()),
        Err(e) => state.set_error(format!("Error: {e}")),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Penguins Data Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(RustyPenguinApp::new(state)))),
    )
}
