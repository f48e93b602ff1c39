/// Document panel: metadata and body of the selected document.
///
/// The body is rendered as Markdown by default; the Raw toggle (or
/// Ctrl+R) shows the source text instead.
use crate::markdown::show_blocks;
use crate::state::AppState;
use crate::theme::DocSleuthTheme;
use docsleuth_core::model::date::{format_age, format_local_date};
use docsleuth_core::model::document::yaml_display;
use docsleuth_core::model::size::format_size;
use egui::Ui;

/// Draw the document panel for the currently selected document.
pub fn document_panel(ui: &mut Ui, state: &mut AppState) {
    state.prepare_rendered_body();
    let mut show_raw = state.show_raw_body;
    draw_document(ui, state, &mut show_raw);
    state.show_raw_body = show_raw;
}

fn draw_document(ui: &mut Ui, state: &AppState, show_raw: &mut bool) {
    let theme = DocSleuthTheme::for_mode(state.theme_mode);
    let color_muted = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();

    let Some(doc) = state.selected_document() else {
        ui.centered_and_justified(|ui| {
            ui.label(
                egui::RichText::new("Select a document in the tree to view it")
                    .color(color_muted)
                    .italics(),
            );
        });
        return;
    };

    ui.label(
        egui::RichText::new(&doc.title)
            .size(20.0)
            .strong()
            .color(color_normal),
    );
    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(&doc.relative_path)
                .size(11.0)
                .monospace()
                .color(color_muted),
        )
        .on_hover_text(doc.path.display().to_string());
        if ui.small_button("📋").on_hover_text("Copy path").clicked() {
            ui.ctx().copy_text(doc.path.display().to_string());
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.selectable_value(show_raw, true, "Raw")
                .on_hover_text("Show the Markdown source (Ctrl+R)");
            ui.selectable_value(show_raw, false, "Rendered");
        });
    });

    ui.add_space(6.0);
    ui.separator();
    ui.add_space(4.0);

    egui::Grid::new("document_meta_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Size:").color(color_muted));
            ui.label(
                egui::RichText::new(format_size(doc.size))
                    .color(theme.accent)
                    .strong(),
            );
            ui.end_row();

            if let Some(modified) = doc.modified.as_ref() {
                let now = chrono::Utc::now();
                ui.label(egui::RichText::new("Modified:").color(color_muted));
                ui.label(
                    egui::RichText::new(format!(
                        "{} ({})",
                        format_local_date(modified),
                        format_age(modified, &now)
                    ))
                    .color(color_normal),
                );
                ui.end_row();
            }

            for (key, value) in &doc.front_matter {
                if key == "title" {
                    continue;
                }
                ui.label(egui::RichText::new(format!("{key}:")).color(color_muted));
                ui.label(egui::RichText::new(yaml_display(value)).color(color_normal));
                ui.end_row();
            }
        });

    ui.add_space(8.0);
    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("document_body")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            egui::Frame::new()
                .fill(theme.body_bg)
                .inner_margin(egui::Margin::same(10))
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    if doc.content.trim().is_empty() {
                        ui.label(
                            egui::RichText::new("This document has no body text.")
                                .color(color_muted)
                                .italics(),
                        );
                    } else if *show_raw {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(&doc.content)
                                    .monospace()
                                    .color(color_normal),
                            )
                            .wrap(),
                        );
                    } else {
                        show_blocks(ui, state.rendered_body(), &theme);
                    }
                });
        });
}
