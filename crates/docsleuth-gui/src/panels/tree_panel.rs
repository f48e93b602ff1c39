/// Document tree panel (left side).
use crate::state::AppState;
use crate::theme::DocSleuthTheme;
use crate::widgets;
use crate::widgets::tree_view::RIGHT_COLUMNS_PX;
use egui::Ui;

/// Draw the tree panel: column headers, any tree error, then the rows.
pub fn tree_panel(ui: &mut Ui, state: &mut AppState) {
    let theme = DocSleuthTheme::for_mode(state.theme_mode);

    if let Some(err) = state.tree_error.as_deref() {
        ui.label(
            egui::RichText::new(format!("⚠ Tree unavailable: {err}"))
                .size(11.0)
                .color(theme.warning),
        );
        ui.label(
            egui::RichText::new("Showing documents as a flat list.")
                .size(11.0)
                .italics()
                .color(theme.text_muted),
        );
        ui.add_space(4.0);
    }

    ui.horizontal(|ui| {
        let header_height = 20.0;
        let rect = egui::Rect::from_min_size(
            ui.cursor().min,
            egui::vec2(ui.available_width(), header_height),
        );
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, theme.header_bg);

        ui.allocate_exact_size(
            egui::vec2(ui.available_width(), header_height),
            egui::Sense::hover(),
        );

        painter.text(
            egui::pos2(rect.left() + 8.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            "Name",
            egui::FontId::proportional(12.0),
            theme.text_muted,
        );

        let right_start = rect.right() - RIGHT_COLUMNS_PX;
        painter.text(
            egui::pos2(right_start, rect.center().y),
            egui::Align2::LEFT_CENTER,
            "Size",
            egui::FontId::proportional(12.0),
            theme.text_muted,
        );
        painter.text(
            egui::pos2(right_start + 80.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            "Modified",
            egui::FontId::proportional(12.0),
            theme.text_muted,
        );
    });

    ui.separator();

    widgets::tree_view::tree_view(ui, state);
}
