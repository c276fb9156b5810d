use std::sync::Arc;

use egui_extras::{Column, TableBuilder};
use pv_app::TableKey;
use pv_table::{Axis, LoadedTable, RowFilter, SortFilterProxy, TablePresenter};

/// A floating, read-only view of one table with its own sort and filter.
pub struct TableWindow {
    id: egui::Id,
    title: String,
    proxy: SortFilterProxy,
    filter_text: String,
    open: bool,
}

impl TableWindow {
    pub fn new(key: &TableKey, table: Arc<LoadedTable>, serial: usize) -> Self {
        Self {
            id: egui::Id::new(("table_window", serial)),
            title: key.to_string(),
            proxy: SortFilterProxy::new(TablePresenter::new(table)),
            filter_text: String::new(),
            open: true,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let mut open = self.open;
        egui::Window::new(&self.title)
            .id(self.id)
            .open(&mut open)
            .default_size([640.0, 420.0])
            .resizable(true)
            .show(ctx, |ui| {
                self.show_filter(ui);
                ui.separator();
                ui.push_id(self.id, |ui| {
                    egui::ScrollArea::horizontal().show(ui, |ui| self.show_table(ui));
                });
            });
        self.open = open;
    }

    fn show_filter(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Filter:");
            if ui.text_edit_singleline(&mut self.filter_text).changed() {
                let filter = (!self.filter_text.is_empty())
                    .then(|| RowFilter::any_column(self.filter_text.clone()));
                if let Err(e) = self.proxy.set_filter(filter) {
                    tracing::warn!(error = %e, "filter rejected");
                }
            }
            ui.label(format!(
                "{} / {} rows",
                self.proxy.row_count(),
                self.proxy.source().row_count()
            ));
        });
    }

    fn show_table(&mut self, ui: &mut egui::Ui) {
        let columns = self.proxy.column_count();
        let mut clicked_column = None;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::auto().at_least(40.0))
            .columns(Column::initial(110.0).at_least(50.0), columns)
            .header(22.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                for c in 0..columns {
                    header.col(|ui| {
                        let mut label = self
                            .proxy
                            .header_label(c, Axis::Column)
                            .unwrap_or_default();
                        if self.proxy.sort_column() == Some(c) {
                            label.push(' ');
                            label.push_str(self.proxy.sort_order().indicator());
                        }
                        if ui.button(egui::RichText::new(label).strong()).clicked() {
                            clicked_column = Some(c);
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, self.proxy.row_count(), |mut row| {
                    let r = row.index();
                    row.col(|ui| {
                        ui.label(self.proxy.header_label(r, Axis::Row).unwrap_or_default());
                    });
                    for c in 0..columns {
                        row.col(|ui| {
                            ui.label(self.proxy.cell_value(r, c));
                        });
                    }
                });
            });

        if let Some(c) = clicked_column
            && let Err(e) = self.proxy.toggle_sort(c)
        {
            tracing::warn!(error = %e, "sort rejected");
        }
    }
}
