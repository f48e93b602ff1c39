/// Top action bar: branding, view switch, tree filter and theme toggle.
use crate::state::{AppPhase, AppState, CentralView};
use egui::Ui;

/// Widget id of the filter box, so shortcuts can focus it.
pub const FILTER_ID: &str = "tree_filter";

/// Draw the toolbar.
pub fn toolbar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("🔍 DocSleuth")
                .size(18.0)
                .strong()
                .color(ui.visuals().hyperlink_color),
        );

        ui.separator();

        let ready = state.phase == AppPhase::Ready;
        ui.add_enabled_ui(ready, |ui| {
            ui.selectable_value(&mut state.view, CentralView::Document, "📄 Document")
                .on_hover_text("Show the selected document");
            ui.selectable_value(&mut state.view, CentralView::Listing, "☰ Listing")
                .on_hover_text("Show every document in a flat list");
        });

        ui.separator();

        ui.label("Filter:");
        let mut filter = state.filter.clone();
        let response = ui.add_enabled(
            ready,
            egui::TextEdit::singleline(&mut filter)
                .id(egui::Id::new(FILTER_ID))
                .hint_text("title or path")
                .desired_width(200.0),
        );
        if response.changed() {
            state.set_filter(&filter);
        }
        if !state.filter.is_empty() && ui.small_button("✖").on_hover_text("Clear filter").clicked() {
            state.set_filter("");
        }

        ui.separator();

        if ui
            .add_enabled(ready, egui::Button::new("⊞"))
            .on_hover_text("Expand all")
            .clicked()
        {
            state.expand_all();
        }
        if ui
            .add_enabled(ready, egui::Button::new("⊟"))
            .on_hover_text("Collapse all")
            .clicked()
        {
            state.collapse_all();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("ℹ").on_hover_text("About DocSleuth").clicked() {
                state.show_about = true;
            }

            if ui.button("❓").on_hover_text("Help").clicked() {
                state.show_help = !state.show_help;
            }

            let dark = state.theme_mode.is_dark();
            let theme_label = if dark { "☀" } else { "🌙" };
            let theme_tip = if dark {
                "Switch to light mode"
            } else {
                "Switch to dark mode"
            };
            if ui.button(theme_label).on_hover_text(theme_tip).clicked() {
                state.theme_mode.toggle();
            }
        });
    });
}
