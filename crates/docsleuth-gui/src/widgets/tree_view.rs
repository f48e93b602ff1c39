/// Virtualised TreeView widget.
///
/// Only renders rows visible in the viewport, giving O(1) rendering
/// cost regardless of tree size. Uses the flat `visible_rows` list
/// maintained by `AppState`.
use crate::state::{AppPhase, AppState};
use crate::theme::DocSleuthTheme;
use docsleuth_core::model::date::format_local_date;
use docsleuth_core::model::size::{format_count, format_size};
use docsleuth_core::model::TreeNode;
use docsleuth_core::tree::count_files;
use egui::{Rect, Response, Sense, Ui, Vec2};

/// Height of each row in pixels.
const ROW_HEIGHT: f32 = 24.0;

/// Indentation per depth level in pixels.
const INDENT_PX: f32 = 20.0;

/// Width reserved on the right for the size and date columns.
pub const RIGHT_COLUMNS_PX: f32 = 190.0;

/// Deferred mutations collected while the rows are borrowed.
#[derive(Default)]
struct RowActions {
    toggle: Option<usize>,
    activate: Option<usize>,
    copy_path: Option<String>,
}

/// Draw the virtualised tree view.
pub fn tree_view(ui: &mut Ui, state: &mut AppState) -> Response {
    if state.phase == AppPhase::Loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(
                egui::RichText::new(format!(
                    " Loading... {} files found",
                    format_count(state.files_discovered as u64)
                ))
                .color(ui.visuals().weak_text_color())
                .size(12.0),
            );
        });
        return ui.interact(ui.max_rect(), ui.id().with("loading_tree"), Sense::hover());
    }

    if state.visible_rows.is_empty() {
        let msg = if state.filter.trim().is_empty() {
            "No documents found."
        } else {
            "No documents match the filter."
        };
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new(msg).color(ui.visuals().weak_text_color()));
        });
        return ui.interact(ui.max_rect(), ui.id().with("empty_tree"), Sense::click());
    }

    let theme = DocSleuthTheme::for_mode(state.theme_mode);
    let actions = render_tree_rows(ui, state, &theme);

    if let Some(text) = actions.copy_path {
        ui.ctx().copy_text(text);
    }
    if let Some(row_idx) = actions.activate {
        state.activate_row(row_idx);
    } else if let Some(row_idx) = actions.toggle {
        state.toggle_expand(row_idx);
    }

    ui.interact(ui.max_rect(), ui.id().with("tree_bg"), Sense::hover())
}

/// Render the visible slice of rows. Returns the actions to apply once
/// the state is no longer borrowed.
fn render_tree_rows(ui: &mut Ui, state: &AppState, theme: &DocSleuthTheme) -> RowActions {
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();

    let total_rows = state.visible_rows.len();
    let total_height = total_rows as f32 * ROW_HEIGHT;
    let selected_row = state.selected_row();

    let mut actions = RowActions::default();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // Reserve the full virtual height so the scrollbar is correct.
            let (response, mut painter) = ui.allocate_painter(
                Vec2::new(ui.available_width(), total_height),
                Sense::click(),
            );

            let viewport = ui.clip_rect();
            let top_y = response.rect.top();

            let first_visible = ((viewport.top() - top_y) / ROW_HEIGHT).floor().max(0.0) as usize;
            let last_visible = ((viewport.bottom() - top_y) / ROW_HEIGHT)
                .ceil()
                .min(total_rows as f32) as usize;

            for row_idx in first_visible..last_visible {
                let Some(row) = state.visible_rows.get(row_idx) else {
                    break;
                };
                let Some(node) = state.node_at(&row.address) else {
                    continue;
                };

                let row_rect = Rect::from_min_size(
                    egui::pos2(response.rect.left(), top_y + row_idx as f32 * ROW_HEIGHT),
                    Vec2::new(response.rect.width(), ROW_HEIGHT),
                );
                if !viewport.intersects(row_rect) {
                    continue;
                }

                let is_selected = selected_row == Some(row_idx);
                if is_selected {
                    painter.rect_filled(row_rect, 0.0, theme.selection);
                }

                let row_response = ui.interact(
                    row_rect,
                    ui.id().with(("tree_row", row_idx)),
                    Sense::click(),
                );
                if row_response.hovered() && !is_selected {
                    painter.rect_filled(row_rect, 0.0, theme.surface_hover);
                }
                if row_response.clicked() {
                    actions.activate = Some(row_idx);
                }

                row_response.context_menu(|ui| {
                    if ui.button("📋 Copy Path").clicked() {
                        actions.copy_path = Some(node.path.clone());
                        ui.close_menu();
                    }
                    if node.is_dir() {
                        ui.separator();
                        let files = count_files(&node.children) as u64;
                        ui.label(format!("Documents: {}", format_count(files)));
                    }
                });

                if row_response.hovered() {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        ui.id().with(("tree_tip", row_idx)),
                        |ui| {
                            ui.label(node.path.as_str());
                        },
                    );
                }

                let indent = INDENT_PX * row.depth as f32 + 14.0;
                let text_x = row_rect.left() + indent + 4.0;
                let text_y = row_rect.center().y;

                if node.is_dir() {
                    let arrow_text = if row.is_expanded { "▼" } else { "▶" };
                    let arrow_rect = Rect::from_min_size(
                        egui::pos2(row_rect.left() + indent - 14.0, row_rect.top()),
                        Vec2::new(16.0, ROW_HEIGHT),
                    );
                    let arrow_response =
                        ui.interact(arrow_rect, ui.id().with(("arrow", row_idx)), Sense::click());
                    if arrow_response.clicked() {
                        actions.toggle = Some(row_idx);
                        actions.activate = None;
                    }
                    painter.text(
                        egui::pos2(row_rect.left() + indent - 12.0, text_y),
                        egui::Align2::LEFT_CENTER,
                        arrow_text,
                        egui::FontId::proportional(11.0),
                        color_weak,
                    );
                }

                let (icon, icon_color) = if node.is_dir() {
                    ("📁", theme.folder_icon)
                } else {
                    ("📄", theme.file_icon)
                };
                painter.text(
                    egui::pos2(text_x, text_y),
                    egui::Align2::LEFT_CENTER,
                    icon,
                    egui::FontId::proportional(13.0),
                    icon_color,
                );

                let name_x = text_x + 20.0;
                let right_area_start = row_rect.right() - RIGHT_COLUMNS_PX;
                let max_name_w = (right_area_start - name_x - 4.0).max(20.0);
                draw_clipped_name(
                    &mut painter,
                    node,
                    name_x,
                    text_y,
                    max_name_w,
                    color_normal,
                    color_weak,
                );

                let (right_text, date_text) = row_columns(state, &row.address, node);
                painter.text(
                    egui::pos2(right_area_start, text_y),
                    egui::Align2::LEFT_CENTER,
                    right_text,
                    egui::FontId::proportional(12.0),
                    color_weak,
                );
                painter.text(
                    egui::pos2(right_area_start + 80.0, text_y),
                    egui::Align2::LEFT_CENTER,
                    date_text,
                    egui::FontId::proportional(12.0),
                    color_weak,
                );
            }

            response
        });

    actions
}

/// Draw the node name, clipping it with an ellipsis when it does not fit.
fn draw_clipped_name(
    painter: &mut egui::Painter,
    node: &TreeNode,
    name_x: f32,
    text_y: f32,
    max_name_w: f32,
    color_normal: egui::Color32,
    color_weak: egui::Color32,
) {
    let name_galley = painter.layout_no_wrap(
        node.name.to_string(),
        egui::FontId::proportional(13.0),
        color_normal,
    );
    let pos = egui::pos2(name_x, text_y - name_galley.size().y / 2.0);

    if name_galley.size().x <= max_name_w {
        painter.galley(pos, name_galley, color_normal);
        return;
    }

    let clip = Rect::from_min_size(
        egui::pos2(name_x, text_y - ROW_HEIGHT / 2.0),
        Vec2::new(max_name_w - 12.0, ROW_HEIGHT),
    );
    let prev_clip = painter.clip_rect();
    painter.set_clip_rect(prev_clip.intersect(clip));
    painter.galley(pos, name_galley, color_normal);
    painter.set_clip_rect(prev_clip);

    painter.text(
        egui::pos2(name_x + max_name_w - 12.0, text_y),
        egui::Align2::LEFT_CENTER,
        "…",
        egui::FontId::proportional(13.0),
        color_weak,
    );
}

/// Right-hand column text: size and date for documents, a document count
/// for directories.
fn row_columns(state: &AppState, address: &[usize], node: &TreeNode) -> (String, String) {
    if node.is_dir() {
        let files = count_files(&node.children);
        let label = if files == 1 { "doc" } else { "docs" };
        return (format!("{} {label}", format_count(files as u64)), String::new());
    }

    match state.document_at(address) {
        Some(doc) => (
            format_size(doc.size),
            doc.modified.as_ref().map(format_local_date).unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    }
}
