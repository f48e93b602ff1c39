/// Bottom status bar: load progress and catalog statistics.
use crate::state::{AppPhase, AppState};
use crate::theme::DocSleuthTheme;
use docsleuth_core::model::size::{format_count, format_size};
use egui::Ui;

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &mut AppState) {
    let theme = DocSleuthTheme::for_mode(state.theme_mode);
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();

    ui.horizontal(|ui| match state.phase {
        AppPhase::Loading => {
            ui.spinner();
            ui.label(
                egui::RichText::new(format!("Loading {}...", truncate_path(&root_label(state), 60)))
                    .size(12.0)
                    .color(color_normal),
            );
            if state.files_discovered > 0 {
                ui.separator();
                ui.label(
                    egui::RichText::new(format!(
                        "{} files",
                        format_count(state.files_discovered as u64)
                    ))
                    .size(12.0)
                    .color(color_normal),
                );
            }
        }
        AppPhase::Failed => {
            let message = state.load_error.as_deref().unwrap_or("load failed");
            ui.label(
                egui::RichText::new(format!("\u{2717} {message}"))
                    .size(12.0)
                    .color(theme.error),
            );
        }
        AppPhase::Ready => {
            let Some(catalog) = state.catalog.as_ref() else {
                return;
            };

            ui.label(
                egui::RichText::new("\u{2713} Loaded")
                    .size(12.0)
                    .color(theme.success),
            );
            ui.separator();
            ui.label(
                egui::RichText::new(truncate_path(&root_label(state), 60))
                    .size(12.0)
                    .color(color_weak),
            );
            ui.separator();

            let noun = if catalog.len() == 1 { "document" } else { "documents" };
            ui.label(
                egui::RichText::new(format!("{} {noun}", format_count(catalog.len() as u64)))
                    .size(12.0)
                    .color(color_normal),
            );
            ui.separator();
            ui.label(
                egui::RichText::new(format_size(catalog.total_size()))
                    .size(12.0)
                    .color(theme.accent),
            );

            if let Some(duration) = state.load_duration {
                ui.separator();
                ui.label(
                    egui::RichText::new(format!("{:.2}s", duration.as_secs_f64()))
                        .size(12.0)
                        .color(color_weak),
                );
            }

            if !catalog.skipped.is_empty() {
                ui.separator();
                let skipped = format!("{} skipped", format_count(catalog.skipped.len() as u64));
                if ui
                    .link(egui::RichText::new(skipped).size(12.0).color(theme.warning))
                    .on_hover_text("Show files that could not be loaded")
                    .clicked()
                {
                    state.show_skipped = true;
                }
            }

            if state.tree_error.is_some() {
                ui.separator();
                ui.label(
                    egui::RichText::new("\u{26a0} flat view")
                        .size(12.0)
                        .color(theme.warning),
                )
                .on_hover_text(state.tree_error.as_deref().unwrap_or_default());
            }
        }
    });
}

fn root_label(state: &AppState) -> String {
    state.config.root.display().to_string()
}

/// Truncate a path string to fit within `max_chars` characters,
/// replacing the middle with "..." if needed.
fn truncate_path(path: &str, max_chars: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= max_chars {
        return path.to_string();
    }
    let half = (max_chars - 3) / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::truncate_path;

    #[test]
    fn test_truncate_path_keeps_short_paths() {
        assert_eq!(truncate_path("/docs", 60), "/docs");
    }

    #[test]
    fn test_truncate_path_is_char_safe() {
        let path = "/home/ünïcødé/".repeat(10);
        let out = truncate_path(&path, 21);
        assert_eq!(out.chars().count(), 21);
        assert!(out.contains("..."));
    }
}
