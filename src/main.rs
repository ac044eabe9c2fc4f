mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::RustyBazaarApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::from_env();
    log::info!("Using dataset {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Bazaar – E-Commerce Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(RustyBazaarApp::new(config)))),
    )
}
