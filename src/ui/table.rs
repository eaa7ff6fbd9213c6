use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{Field, Value};
use crate::state::AppState;

/// Collapsible table of the first filtered records.
pub fn preview(ui: &mut Ui, state: &AppState) {
    let shown = state.visible_indices.len().min(state.config.preview_rows);
    let header = format!(
        "Filtered campaigns (showing {shown} of {})",
        state.visible_indices.len()
    );

    egui::CollapsingHeader::new(header)
        .id_salt("preview_table")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .columns(Column::auto().at_least(70.0), Field::ALL.len())
                    .header(20.0, |mut header| {
                        for field in Field::ALL {
                            header.col(|ui: &mut Ui| {
                                ui.strong(field.column_name());
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(18.0, shown, |mut row| {
                            let record = &state.dataset.records[state.visible_indices[row.index()]];
                            for field in Field::ALL {
                                row.col(|ui: &mut Ui| {
                                    ui.label(format_cell(&field.value(record)));
                                });
                            }
                        });
                    });
            });
        });
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Float(v) => format!("{v:.4}"),
        other => other.to_string(),
    }
}
