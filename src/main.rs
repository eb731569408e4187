use deluge::WidgetConfig;
use eframe::egui;
use log::{error, info};

mod gui;

fn load_config() -> WidgetConfig {
    let Some(path) = std::env::args().nth(1) else {
        return WidgetConfig::default().with_storage_path("deluge-votes.json");
    };

    match std::fs::read_to_string(&path)
        .map_err(anyhow::Error::from)
        .and_then(|json| WidgetConfig::from_json(&json))
    {
        Ok(config) => {
            info!("Loaded widget config from {}", path);
            config
        }
        Err(e) => {
            error!("Failed to load config {}: {}; using defaults", path, e);
            WidgetConfig::default().with_storage_path("deluge-votes.json")
        }
    }
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let builder = egui::ViewportBuilder::default()
        .with_title("Deluge")
        .with_inner_size(egui::vec2(420.0, 480.0));

    let options = eframe::NativeOptions {
        viewport: builder,
        ..Default::default()
    };

    let mut state = gui::state::AppState::new(load_config());

    eframe::run_simple_native("Deluge", options, move |ctx, _frame| {
        gui::ui_main(ctx, &mut state);
    })
}
