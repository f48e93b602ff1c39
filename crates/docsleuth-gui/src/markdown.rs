/// Markdown body rendering.
///
/// A document body is parsed once into a flat list of display blocks,
/// which the document panel lays out with egui widgets. Nesting is
/// flattened: list items carry their depth and quoted paragraphs their
/// quote level.
use crate::theme::DocSleuthTheme;
use egui::{RichText, Ui};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Body text size in points.
const BODY_SIZE: f32 = 14.0;

/// A run of inline text sharing one style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    pub code: bool,
    /// Link target, for link text and image alt text.
    pub link: Option<String>,
}

impl Span {
    fn same_style(&self, other: &Span) -> bool {
        self.strong == other.strong
            && self.emphasis == other.emphasis
            && self.strikethrough == other.strikethrough
            && self.code == other.code
            && self.link == other.link
    }
}

/// One displayable block of a rendered body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        spans: Vec<Span>,
    },
    Paragraph {
        /// Block-quote nesting level, 0 outside quotes.
        quote: u8,
        spans: Vec<Span>,
    },
    ListItem {
        /// 0 for a top-level list.
        depth: u8,
        /// `•`, `3.`, or empty for an item's continuation paragraphs.
        marker: String,
        spans: Vec<Span>,
    },
    CodeBlock {
        language: Option<String>,
        text: String,
    },
    Table {
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Rule,
}

/// Parse a Markdown body (front-matter already removed) into blocks.
pub fn parse_blocks(source: &str) -> Vec<Block> {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;

    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(source, options) {
        match event {
            Event::Start(tag) => builder.start(tag),
            Event::End(tag) => builder.end(tag),
            Event::Text(text) => builder.push_text(&text, false),
            Event::Code(text) => builder.push_text(&text, true),
            Event::SoftBreak => builder.push_text(" ", false),
            Event::HardBreak => builder.push_text("\n", false),
            Event::TaskListMarker(done) => builder.push_text(if done { "☑ " } else { "☐ " }, false),
            Event::Rule => {
                builder.flush();
                builder.blocks.push(Block::Rule);
            }
            // Raw HTML and footnotes are not displayed.
            _ => {}
        }
    }
    builder.flush();
    builder.blocks
}

/// Accumulates inline spans and emits a block whenever one closes.
#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    spans: Vec<Span>,
    strong: u8,
    emphasis: u8,
    strikethrough: u8,
    link: Option<String>,
    quote: u8,
    /// One entry per open list: the next number for ordered lists.
    lists: Vec<Option<u64>>,
    item_marker: Option<String>,
    code: Option<(Option<String>, String)>,
    table: Option<(Vec<String>, Vec<Vec<String>>)>,
    row: Vec<String>,
    cell: Option<String>,
}

impl BlockBuilder {
    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } | Tag::Paragraph => self.flush(),
            Tag::BlockQuote { .. } => {
                self.flush();
                self.quote = self.quote.saturating_add(1);
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.trim().is_empty() => {
                        Some(lang.trim().to_string())
                    }
                    _ => None,
                };
                self.code = Some((language, String::new()));
            }
            Tag::List(start) => {
                // Text of a tight parent item ends where its sub-list begins.
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                self.item_marker = Some(self.next_marker());
            }
            Tag::Table { .. } => {
                self.flush();
                self.table = Some((Vec::new(), Vec::new()));
            }
            Tag::TableCell => self.cell = Some(String::new()),
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { dest_url, .. } => self.link = Some(dest_url.to_string()),
            Tag::Image { dest_url, .. } => {
                self.link = Some(dest_url.to_string());
                self.push_text("🖼 ", false);
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(level) => {
                let spans = std::mem::take(&mut self.spans);
                if !is_blank(&spans) {
                    self.blocks.push(Block::Heading {
                        level: heading_level(level),
                        spans,
                    });
                }
            }
            TagEnd::Paragraph => self.flush(),
            TagEnd::BlockQuote { .. } => {
                self.flush();
                self.quote = self.quote.saturating_sub(1);
            }
            TagEnd::CodeBlock { .. } => {
                if let Some((language, text)) = self.code.take() {
                    self.blocks.push(Block::CodeBlock {
                        language,
                        text: text.trim_end_matches('\n').to_string(),
                    });
                }
            }
            TagEnd::List { .. } => {
                self.flush();
                self.lists.pop();
            }
            TagEnd::Item => {
                self.flush();
                self.item_marker = None;
            }
            TagEnd::TableCell => {
                if let Some(cell) = self.cell.take() {
                    self.row.push(cell.trim().to_string());
                }
            }
            TagEnd::TableHead => {
                let row = std::mem::take(&mut self.row);
                if let Some((header, _)) = self.table.as_mut() {
                    *header = row;
                }
            }
            TagEnd::TableRow => {
                let row = std::mem::take(&mut self.row);
                if let Some((_, rows)) = self.table.as_mut() {
                    rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some((header, rows)) = self.table.take() {
                    self.blocks.push(Block::Table { header, rows });
                }
            }
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link | TagEnd::Image => self.link = None,
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str, code: bool) {
        if let Some(cell) = self.cell.as_mut() {
            cell.push_str(text);
            return;
        }
        if let Some((_, buffer)) = self.code.as_mut() {
            buffer.push_str(text);
            return;
        }

        let span = Span {
            text: text.to_string(),
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            strikethrough: self.strikethrough > 0,
            code,
            link: self.link.clone(),
        };
        match self.spans.last_mut() {
            Some(last) if last.same_style(&span) => last.text.push_str(text),
            _ => self.spans.push(span),
        }
    }

    /// Emit pending inline text as a paragraph or list item.
    fn flush(&mut self) {
        let spans = std::mem::take(&mut self.spans);
        if is_blank(&spans) {
            return;
        }
        if self.lists.is_empty() {
            self.blocks.push(Block::Paragraph {
                quote: self.quote,
                spans,
            });
        } else {
            self.blocks.push(Block::ListItem {
                depth: (self.lists.len() - 1).min(u8::MAX as usize) as u8,
                marker: self.item_marker.take().unwrap_or_default(),
                spans,
            });
        }
    }

    fn next_marker(&mut self) -> String {
        match self.lists.last_mut() {
            Some(Some(next)) => {
                let marker = format!("{next}.");
                *next += 1;
                marker
            }
            _ => "•".to_string(),
        }
    }
}

fn is_blank(spans: &[Span]) -> bool {
    spans.iter().all(|span| span.text.trim().is_empty())
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn heading_size(level: u8) -> f32 {
    match level {
        1 => 24.0,
        2 => 20.0,
        3 => 17.0,
        _ => 15.0,
    }
}

// ── Drawing ─────────────────────────────────────────────────────────────────

/// Lay out parsed blocks top to bottom.
pub fn show_blocks(ui: &mut Ui, blocks: &[Block], theme: &DocSleuthTheme) {
    for (idx, block) in blocks.iter().enumerate() {
        if idx > 0 {
            ui.add_space(6.0);
        }
        match block {
            Block::Heading { level, spans } => {
                if *level <= 2 && idx > 0 {
                    ui.add_space(4.0);
                }
                show_spans(ui, spans, heading_size(*level), true);
                if *level == 1 {
                    ui.separator();
                }
            }
            Block::Paragraph { quote: 0, spans } => show_spans(ui, spans, BODY_SIZE, false),
            Block::Paragraph { quote, spans } => {
                let indent = (12 * (*quote).min(4)) as i8;
                let response = egui::Frame::new()
                    .inner_margin(egui::Margin {
                        left: indent,
                        right: 0,
                        top: 2,
                        bottom: 2,
                    })
                    .show(ui, |ui| show_spans(ui, spans, BODY_SIZE, false))
                    .response;
                ui.painter().vline(
                    response.rect.left() + 3.0,
                    response.rect.y_range(),
                    egui::Stroke::new(3.0, theme.text_muted),
                );
            }
            Block::ListItem {
                depth,
                marker,
                spans,
            } => {
                ui.horizontal(|ui| {
                    ui.add_space(18.0 * *depth as f32);
                    ui.add_sized(
                        [22.0, BODY_SIZE + 4.0],
                        egui::Label::new(RichText::new(marker).size(BODY_SIZE).color(theme.accent)),
                    );
                    show_spans(ui, spans, BODY_SIZE, false);
                });
            }
            Block::CodeBlock { language, text } => {
                egui::Frame::new()
                    .fill(theme.surface)
                    .corner_radius(egui::CornerRadius::same(4))
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_min_width(ui.available_width());
                        if let Some(language) = language {
                            ui.label(RichText::new(language).size(10.0).color(theme.text_muted));
                        }
                        ui.add(
                            egui::Label::new(
                                RichText::new(text).monospace().color(theme.text_primary),
                            )
                            .wrap(),
                        );
                    });
            }
            Block::Table { header, rows } => {
                egui::Grid::new(("markdown_table", idx))
                    .striped(true)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        for cell in header {
                            ui.label(RichText::new(cell).strong());
                        }
                        ui.end_row();
                        for row in rows {
                            for cell in row {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            }
            Block::Rule => {
                ui.separator();
            }
        }
    }
}

fn show_spans(ui: &mut Ui, spans: &[Span], size: f32, heading: bool) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            let text = span_text(span, size, heading);
            match &span.link {
                Some(url) => {
                    ui.hyperlink_to(text, url).on_hover_text(url);
                }
                None => {
                    ui.label(text);
                }
            }
        }
    });
}

fn span_text(span: &Span, size: f32, heading: bool) -> RichText {
    let mut text = RichText::new(&span.text).size(size);
    if heading || span.strong {
        text = text.strong();
    }
    if span.emphasis {
        text = text.italics();
    }
    if span.strikethrough {
        text = text.strikethrough();
    }
    if span.code {
        text = text.code();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &str) -> Span {
        Span {
            text: text.to_string(),
            ..Span::default()
        }
    }

    fn texts(spans: &[Span]) -> String {
        spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let blocks = parse_blocks("# Guide\n\nFirst line\nsecond line.\n\n### Details\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    spans: vec![plain("Guide")],
                },
                Block::Paragraph {
                    quote: 0,
                    spans: vec![plain("First line second line.")],
                },
                Block::Heading {
                    level: 3,
                    spans: vec![plain("Details")],
                },
            ]
        );
    }

    #[test]
    fn test_inline_styles_split_spans() {
        let blocks = parse_blocks("Use **bold**, *it*, `code` and [docs](https://example.com).");
        let Block::Paragraph { spans, .. } = &blocks[0] else {
            panic!("expected a paragraph, got {blocks:?}");
        };
        assert_eq!(texts(spans), "Use bold, it, code and docs.");
        assert!(spans.iter().any(|s| s.strong && s.text == "bold"));
        assert!(spans.iter().any(|s| s.emphasis && s.text == "it"));
        assert!(spans.iter().any(|s| s.code && s.text == "code"));
        assert!(spans
            .iter()
            .any(|s| s.text == "docs" && s.link.as_deref() == Some("https://example.com")));
    }

    #[test]
    fn test_nested_and_ordered_lists() {
        let blocks = parse_blocks("- one\n  - inner\n- two\n\n3. third\n4. fourth\n");
        let items: Vec<(u8, &str, String)> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::ListItem {
                    depth,
                    marker,
                    spans,
                } => Some((*depth, marker.as_str(), texts(spans))),
                _ => None,
            })
            .collect();
        assert_eq!(
            items,
            vec![
                (0, "•", "one".to_string()),
                (1, "•", "inner".to_string()),
                (0, "•", "two".to_string()),
                (0, "3.", "third".to_string()),
                (0, "4.", "fourth".to_string()),
            ]
        );
    }

    #[test]
    fn test_code_block_keeps_text_verbatim() {
        let blocks = parse_blocks("```rust\nfn main() {\n    **not bold**\n}\n```\n");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: Some("rust".to_string()),
                text: "fn main() {\n    **not bold**\n}".to_string(),
            }]
        );
    }

    #[test]
    fn test_quote_table_and_rule() {
        let blocks = parse_blocks("> quoted\n\n---\n\n| Key | Value |\n|---|---|\n| a | 1 |\n");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    quote: 1,
                    spans: vec![plain("quoted")],
                },
                Block::Rule,
                Block::Table {
                    header: vec!["Key".to_string(), "Value".to_string()],
                    rows: vec![vec!["a".to_string(), "1".to_string()]],
                },
            ]
        );
    }

    #[test]
    fn test_task_list_and_blank_body() {
        let blocks = parse_blocks("- [x] done\n- [ ] open\n");
        let texts: Vec<String> = blocks
            .iter()
            .filter_map(|b| match b {
                Block::ListItem { spans, .. } => Some(texts(spans)),
                _ => None,
            })
            .collect();
        assert_eq!(texts, ["☑ done", "☐ open"]);

        assert!(parse_blocks("  \n\n").is_empty());
    }
}
