use eframe::egui::{self, Align, Layout, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use rusty_quota::data::Table;

// ---------------------------------------------------------------------------
// Table preview grid
// ---------------------------------------------------------------------------

/// Render the first `max_rows` rows of `table` as a striped grid.
pub fn table_preview(ui: &mut Ui, id: &str, table: &Table, max_rows: usize) {
    let head = table.head(max_rows);
    if head.num_columns() == 0 {
        ui.label("(no columns)");
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(TableColumn::auto().at_least(60.0), head.num_columns())
                .max_scroll_height(260.0)
                .header(20.0, |mut header| {
                    for col in head.columns() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(&col.name)
                                .on_hover_text(col.data.column_type().to_string());
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, head.num_rows(), |mut row| {
                        let idx = row.index();
                        for col in head.columns() {
                            let text = col.data.get(idx).map(|v| v.to_string()).unwrap_or_default();
                            row.col(|ui: &mut Ui| {
                                ui.label(text);
                            });
                        }
                    });
                });
        });
    });

    if table.num_rows() > head.num_rows() {
        ui.label(
            egui::RichText::new(format!(
                "Showing {} of {} rows",
                head.num_rows(),
                table.num_rows()
            ))
            .weak(),
        );
    }
}
