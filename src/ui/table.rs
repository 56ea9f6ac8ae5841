use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Record;

// ---------------------------------------------------------------------------
// Raw data table
// ---------------------------------------------------------------------------

/// Collapsible table of the filtered rows plus their dimensions.
pub fn raw_data(ui: &mut Ui, columns: &[String], rows: &[Record]) {
    egui::CollapsingHeader::new("View Raw Data")
        .id_salt("raw_data")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(320.0)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::auto().at_least(60.0), columns.len())
                .header(20.0, |mut header| {
                    for name in columns {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, rows.len(), |mut row| {
                        let rec = &rows[row.index()];
                        for name in columns {
                            row.col(|ui| {
                                ui.label(rec.cell(name));
                            });
                        }
                    });
                });

            ui.label(
                egui::RichText::new(format!(
                    "Data Dimensions: {} rows, {} columns",
                    rows.len(),
                    columns.len()
                ))
                .strong(),
            );
        });
}
