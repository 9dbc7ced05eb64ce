mod app;
mod state;
mod ui;

use app::RustyQuotaApp;
use eframe::egui;
use rusty_quota::config::AppConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Quota – Quota Model Demo",
        options,
        Box::new(|_cc| Ok(Box::new(RustyQuotaApp::new(config)))),
    )
}
