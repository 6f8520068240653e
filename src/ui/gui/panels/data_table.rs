//! Table panel - dike records with sortable headers.
//!
//! Fills the central area, to the right of the map splitter.

use eframe::egui::{self, Align, Layout, RichText, Sense};
use egui_extras::{Column, TableBuilder};

use crate::data::{SortColumn, COLUMN_HEADERS};
use super::super::state::AppState;

const ROW_HEIGHT: f32 = 20.0;

/// Render the table. Returns the source row the user clicked, if any.
pub fn render(ctx: &egui::Context, state: &mut AppState) -> Option<usize> {
    let mut clicked_row = None;
    let mut sort_clicked = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        let table = &state.session.table;
        if table.visible_len() == 0 {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No records to show").weak());
            });
            return;
        }

        let (sort_column, sort_order) = table.sort_state();
        let selected = state.selected_row;

        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .sense(Sense::click())
            .cell_layout(Layout::left_to_right(Align::Center))
            .column(Column::auto().at_least(36.0))
            .columns(Column::auto().at_least(50.0), COLUMN_HEADERS.len() - 1)
            .column(Column::remainder())
            .min_scrolled_height(0.0);

        if let Some(pos) = state.scroll_to_row.take() {
            builder = builder.scroll_to_row(pos, Some(Align::Center));
        }

        builder
            .header(ROW_HEIGHT + 4.0, |mut header| {
                let columns = std::iter::once(SortColumn::Sequence)
                    .chain((0..COLUMN_HEADERS.len()).map(SortColumn::Data));
                for column in columns {
                    header.col(|ui| {
                        let active = column == sort_column;
                        let text = if active {
                            format!("{} {}", column.header(), sort_order.arrow())
                        } else {
                            column.header().to_string()
                        };
                        if ui.selectable_label(active, RichText::new(text).strong()).clicked() {
                            sort_clicked = Some(column);
                        }
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.visible_len(), |mut row| {
                    let pos = row.index();
                    let source = table.source_row(pos);
                    row.set_selected(source.is_some() && source == selected);

                    for col in 0..=COLUMN_HEADERS.len() {
                        row.col(|ui| {
                            ui.label(table.display_cell(pos, col));
                        });
                    }
                    if row.response().clicked() {
                        clicked_row = source;
                    }
                });
            });
    });

    if let Some(column) = sort_clicked {
        state.session.table.toggle_sort(column);
        let (column, order) = state.session.table.sort_state();
        state.set_status(format!("Sorted by {} {}", column.header(), order.arrow()));
    }
    clicked_row
}
