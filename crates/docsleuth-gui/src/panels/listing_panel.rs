/// Listing panel: every loaded document in relative-path order.
///
/// Honours the tree filter. Clicking a row opens the document and reveals
/// it in the tree.
use crate::state::AppState;
use docsleuth_core::model::date::format_local_date;
use docsleuth_core::model::size::{format_count, format_size};
use docsleuth_core::DocumentRecord;
use egui::Ui;

const ROW_HEIGHT: f32 = 20.0;
const TITLE_COL_PX: f32 = 220.0;
const SIZE_COL_PX: f32 = 80.0;
const DATE_COL_PX: f32 = 110.0;

/// Draw the flat document listing.
pub fn listing_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(catalog) = state.catalog.as_ref() else {
        return;
    };

    let needle = state.filter.trim().to_lowercase();
    let rows: Vec<(usize, &DocumentRecord)> = catalog
        .documents
        .iter()
        .enumerate()
        .filter(|(_, doc)| matches_filter(doc, &needle))
        .collect();
    let selected_index = state.selected_index();

    let accent = ui.visuals().hyperlink_color;
    let muted = ui.visuals().weak_text_color();
    let text_col = ui.visuals().text_color();

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("☰ All documents").strong().color(accent));
        ui.separator();
        let summary = if rows.len() == catalog.len() {
            format!("{} documents", format_count(rows.len() as u64))
        } else {
            format!(
                "{} of {} documents",
                format_count(rows.len() as u64),
                format_count(catalog.len() as u64)
            )
        };
        ui.label(egui::RichText::new(summary).size(11.0).color(muted));
    });
    ui.separator();

    ui.horizontal(|ui| {
        ui.add_sized(
            [TITLE_COL_PX, 16.0],
            egui::Label::new(egui::RichText::new("Title").size(11.0).color(accent)),
        );
        ui.add_sized(
            [SIZE_COL_PX, 16.0],
            egui::Label::new(egui::RichText::new("Size").size(11.0).color(accent)),
        );
        ui.add_sized(
            [DATE_COL_PX, 16.0],
            egui::Label::new(egui::RichText::new("Modified").size(11.0).color(accent)),
        );
        ui.label(egui::RichText::new("Path").size(11.0).color(accent));
    });
    ui.separator();

    let mut clicked: Option<usize> = None;
    egui::ScrollArea::vertical()
        .id_salt("listing_rows")
        .auto_shrink([false, false])
        .show_rows(ui, ROW_HEIGHT, rows.len(), |ui, range| {
            for &(idx, doc) in &rows[range] {
                let selected = selected_index == Some(idx);
                ui.horizontal(|ui| {
                    let title = ui.add_sized(
                        [TITLE_COL_PX, ROW_HEIGHT],
                        egui::SelectableLabel::new(
                            selected,
                            egui::RichText::new(&doc.title).size(12.0).color(text_col),
                        ),
                    );
                    if title.clicked() {
                        clicked = Some(idx);
                    }
                    ui.add_sized(
                        [SIZE_COL_PX, ROW_HEIGHT],
                        egui::Label::new(
                            egui::RichText::new(format_size(doc.size)).size(12.0).color(muted),
                        ),
                    );
                    let date = doc.modified.as_ref().map(format_local_date).unwrap_or_default();
                    ui.add_sized(
                        [DATE_COL_PX, ROW_HEIGHT],
                        egui::Label::new(egui::RichText::new(date).size(12.0).color(muted)),
                    );
                    ui.label(
                        egui::RichText::new(&doc.relative_path)
                            .size(12.0)
                            .monospace()
                            .color(muted),
                    )
                    .on_hover_text(doc.path.display().to_string());
                });
            }
        });

    if let Some(idx) = clicked {
        state.reveal_document(idx);
    }
}

/// Case-insensitive match against title and relative path.
fn matches_filter(doc: &DocumentRecord, needle: &str) -> bool {
    needle.is_empty()
        || doc.title.to_lowercase().contains(needle)
        || doc.relative_path.to_lowercase().contains(needle)
}
