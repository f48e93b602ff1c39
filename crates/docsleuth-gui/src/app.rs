/// Main `eframe::App` implementation for DocSleuth.
///
/// This is the top-level UI layout that composes all panels and widgets.
use crate::panels;
use crate::state::{AppPhase, AppState, CentralView};
use crate::theme::{DocSleuthTheme, ThemeMode};
use crate::widgets;
use docsleuth_core::LoaderConfig;

/// Keyboard controls listed in the help overlay.
const HELP_ROWS: &[(&str, &str)] = &[
    ("Click ▶ / ▼", "Expand or collapse a directory"),
    ("Click a document", "Open it in the document view"),
    ("↑ / ↓", "Previous / next document"),
    ("Ctrl+F", "Focus the filter box"),
    ("Ctrl+L", "Switch between document and listing views"),
    ("Ctrl+R", "Show rendered or raw Markdown"),
    ("Esc", "Clear the filter or close this help"),
    ("F1", "Toggle this help"),
];

/// Pre-built application state.
///
/// Construct this **before** calling `eframe::run_native` so the load is
/// already running when the window appears.
pub struct DocSleuthState {
    pub(crate) inner: AppState,
}

impl DocSleuthState {
    /// Start loading `config.root` in the background.
    pub fn build(config: LoaderConfig) -> Self {
        let mut state = AppState::new(config);
        state.start_load();
        Self { inner: state }
    }
}

/// The DocSleuth application.
pub struct DocSleuthApp {
    state: AppState,
    applied_theme: Option<ThemeMode>,
}

impl DocSleuthApp {
    /// Create a new application instance from pre-built state.
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: DocSleuthState) -> Self {
        let mode = state.inner.theme_mode;
        DocSleuthTheme::for_mode(mode).apply(&cc.egui_ctx);
        Self {
            state: state.inner,
            applied_theme: Some(mode),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (f1, esc, up, down, ctrl_l, ctrl_f, ctrl_r) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::F1),
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::ArrowUp),
                i.key_pressed(egui::Key::ArrowDown),
                i.modifiers.command && i.key_pressed(egui::Key::L),
                i.modifiers.command && i.key_pressed(egui::Key::F),
                i.modifiers.command && i.key_pressed(egui::Key::R),
            )
        });
        let typing = ctx.wants_keyboard_input();

        if f1 {
            self.state.show_help = !self.state.show_help;
        }
        if esc {
            if self.state.show_help {
                self.state.show_help = false;
            } else {
                self.state.set_filter("");
            }
        }
        if ctrl_f {
            ctx.memory_mut(|m| m.request_focus(egui::Id::new(widgets::toolbar::FILTER_ID)));
        }
        if self.state.phase != AppPhase::Ready {
            return;
        }
        if ctrl_l {
            self.state.view = match self.state.view {
                CentralView::Document => CentralView::Listing,
                CentralView::Listing => CentralView::Document,
            };
        }
        if ctrl_r {
            self.state.show_raw_body = !self.state.show_raw_body;
        }
        if !typing && (up || down) {
            self.state.step_selection(down);
        }
    }
}

impl eframe::App for DocSleuthApp {
    /// Override the GPU clear colour to match the active theme background,
    /// preventing a colour mismatch flash between frames.
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Apply theme ───────────────────────────────────────────────────
        if self.applied_theme != Some(self.state.theme_mode) {
            DocSleuthTheme::for_mode(self.state.theme_mode).apply(ctx);
            self.applied_theme = Some(self.state.theme_mode);
        }

        // ── Process background messages ───────────────────────────────────
        self.state.process_load_messages();
        if self.state.phase == AppPhase::Loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        self.handle_shortcuts(ctx);

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state);
                ui.add_space(4.0);
            });

        self.show_windows(ctx);

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &mut self.state);
                ui.add_space(2.0);
            });

        // ── Left sidebar (tree) ───────────────────────────────────────────
        egui::SidePanel::left("tree_panel")
            .default_width(420.0)
            .min_width(260.0)
            .max_width(800.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::tree_panel::tree_panel(ui, &mut self.state);
            });

        // ── Central panel ─────────────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| match self.state.phase {
            AppPhase::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            AppPhase::Failed => {
                let message = self.state.load_error.as_deref().unwrap_or("load failed");
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new(format!("Could not load documents\n\n{message}"))
                            .size(14.0)
                            .color(ui.visuals().error_fg_color),
                    );
                });
            }
            AppPhase::Ready => match self.state.view {
                CentralView::Document => panels::document_panel::document_panel(ui, &mut self.state),
                CentralView::Listing => panels::listing_panel::listing_panel(ui, &mut self.state),
            },
        });
    }
}

impl DocSleuthApp {
    /// About, help and skipped-files windows.
    fn show_windows(&mut self, ctx: &egui::Context) {
        let mut show_about = self.state.show_about;
        egui::Window::new("About DocSleuth")
            .open(&mut show_about)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .fixed_size([340.0, 0.0])
            .show(ctx, |ui| {
                let accent = ui.visuals().hyperlink_color;
                let muted = ui.visuals().weak_text_color();
                let normal = ui.visuals().text_color();

                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("🔍 DocSleuth")
                            .size(24.0)
                            .strong()
                            .color(accent),
                    );
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                            .size(13.0)
                            .color(muted),
                    );
                    ui.add_space(12.0);
                    ui.label(
                        egui::RichText::new(
                            "A read-only browser for Markdown documentation.\n\
                             Front-matter titles, a sorted document tree,\n\
                             and a flat listing of every page.",
                        )
                        .size(12.0)
                        .color(normal),
                    );
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("Built with Rust & egui")
                            .size(11.0)
                            .color(muted),
                    );
                    ui.add_space(8.0);
                });
            });
        self.state.show_about = show_about;

        let mut show_help = self.state.show_help;
        egui::Window::new("Help")
            .open(&mut show_help)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let muted = ui.visuals().weak_text_color();
                egui::Grid::new("help_grid")
                    .num_columns(2)
                    .spacing([16.0, 6.0])
                    .show(ui, |ui| {
                        for (keys, action) in HELP_ROWS {
                            ui.label(egui::RichText::new(*keys).strong());
                            ui.label(egui::RichText::new(*action).color(muted));
                            ui.end_row();
                        }
                    });
                ui.add_space(6.0);
                ui.label(
                    egui::RichText::new("The filter matches titles and paths, ignoring case.")
                        .size(11.0)
                        .italics()
                        .color(muted),
                );
            });
        self.state.show_help = show_help;

        let mut show_skipped = self.state.show_skipped;
        if let Some(catalog) = self.state.catalog.as_ref() {
            egui::Window::new("Skipped files")
                .open(&mut show_skipped)
                .default_size([520.0, 260.0])
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        egui::Grid::new("skipped_grid")
                            .num_columns(2)
                            .striped(true)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for entry in &catalog.skipped {
                                    ui.label(
                                        egui::RichText::new(entry.path.display().to_string())
                                            .monospace()
                                            .size(11.0),
                                    );
                                    ui.label(
                                        egui::RichText::new(entry.reason.to_string())
                                            .size(11.0)
                                            .color(ui.visuals().warn_fg_color),
                                    );
                                    ui.end_row();
                                }
                            });
                    });
                });
        }
        self.state.show_skipped = show_skipped;
    }
}
