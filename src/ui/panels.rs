use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use rusty_quota::data::FileFormat;

use crate::state::{AppState, SLOTS, SlotStatus};
use crate::ui::preview;

const SUCCESS: Color32 = Color32::from_rgb(40, 160, 70);

// ---------------------------------------------------------------------------
// Central panel – data upload page
// ---------------------------------------------------------------------------

/// Render the upload page: one slot per dataset, then any extra datasets.
pub fn data_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data upload – Quota model");
    ui.label("Upload the files needed for the analysis.");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for slot in &SLOTS {
                upload_slot(ui, state, slot.key, slot.label);
                ui.add_space(8.0);
            }

            let extra = state.extra_keys();
            if !extra.is_empty() {
                ui.separator();
                ui.strong("Other datasets");
                for key in &extra {
                    upload_slot(ui, state, key, key);
                    ui.add_space(8.0);
                }
            }

            if !state.datasets.is_empty() {
                ui.separator();
                ui.label(format!(
                    "{} dataset(s) loaded and kept in memory.",
                    state.datasets.len()
                ));
            }
        });
}

fn upload_slot(ui: &mut Ui, state: &mut AppState, key: &str, label: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(label);
        if ui.button("Choose file…").clicked() {
            if let Some(path) = file_dialog(label).pick_file() {
                state.load_into(key, path);
            }
        }
    });

    match state.status.get(key) {
        Some(SlotStatus::Loaded { filename }) => {
            if let Some(summary) = state.datasets.summary(key) {
                ui.label(
                    RichText::new(format!(
                        "{label} loaded ({} rows, {} columns).",
                        summary.rows, summary.columns
                    ))
                    .color(SUCCESS),
                )
                .on_hover_text(filename);
            }
        }
        Some(SlotStatus::Failed { message }) => {
            ui.label(RichText::new(format!("Error loading {label}: {message}")).color(Color32::RED));
        }
        None => {}
    }

    if let Some(table) = state.datasets.get(key) {
        egui::CollapsingHeader::new(format!("Preview – {label}"))
            .id_salt(key)
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                preview::table_preview(ui, key, table, state.config.preview_rows);
            });
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
                if let Some(paths) = file_dialog("data files").pick_files() {
                    state.load_many(paths);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        let total_rows: usize = state.datasets.iter().map(|(_, t)| t.num_rows()).sum();
        ui.label(format!(
            "{} datasets, {total_rows} rows",
            state.datasets.len()
        ));
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

fn file_dialog(what: &str) -> rfd::FileDialog {
    rfd::FileDialog::new()
        .set_title(format!("Open {what}"))
        .add_filter("Supported files", &FileFormat::EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("Parquet", &["parquet"])
}
