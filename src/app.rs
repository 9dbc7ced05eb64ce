use eframe::egui;

use rusty_quota::config::AppConfig;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyQuotaApp {
    pub state: AppState,
}

impl RustyQuotaApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for RustyQuotaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: upload slots and previews ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::data_page(ui, &mut self.state);
        });
    }
}
