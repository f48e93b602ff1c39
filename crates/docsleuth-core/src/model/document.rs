/// A single discovered document.
///
/// Records are immutable snapshots produced by the loader. The tree
/// builder only reads `relative_path` and `title`; everything else is
/// carried through for the presentation layer.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Parsed front-matter: top-level YAML keys in sorted order.
pub type FrontMatter = BTreeMap<String, serde_yaml::Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Absolute location on disk.
    pub path: PathBuf,

    /// Slash-separated path relative to the indexed root. Unique key.
    pub relative_path: String,

    /// File name without its Markdown extension.
    pub name: String,

    /// Display title: front-matter `title`, or derived from `name`.
    pub title: String,

    /// Body text with the front-matter block removed.
    pub content: String,

    pub front_matter: FrontMatter,

    /// Last modification time, when the platform reports one.
    pub modified: Option<DateTime<Utc>>,

    /// Size of the whole file in bytes, front-matter included.
    pub size: u64,
}

impl DocumentRecord {
    /// Minimal record carrying only the fields the tree builder reads.
    ///
    /// Handy for callers that already know their layout and for tests.
    pub fn new(relative_path: impl Into<String>, title: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let name = relative_path
            .rsplit('/')
            .next()
            .map(|file| match file.rsplit_once('.') {
                Some((stem, _)) if !stem.is_empty() => stem.to_string(),
                _ => file.to_string(),
            })
            .unwrap_or_default();
        Self {
            path: PathBuf::from(&relative_path),
            relative_path,
            name,
            title: title.into(),
            content: String::new(),
            front_matter: FrontMatter::new(),
            modified: None,
            size: 0,
        }
    }

    /// Front-matter value rendered as display text, if the key is present.
    ///
    /// Scalars render bare; sequences and mappings render as compact YAML.
    pub fn front_matter_text(&self, key: &str) -> Option<String> {
        self.front_matter.get(key).map(yaml_display)
    }
}

/// Render a YAML value for a one-line display cell.
pub fn yaml_display(value: &serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items
            .iter()
            .map(yaml_display)
            .collect::<Vec<_>>()
            .join(", "),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().replace('\n', "; "))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_name_from_last_segment() {
        let doc = DocumentRecord::new("guide/getting-started.md", "Getting Started");
        assert_eq!(doc.name, "getting-started");
        assert_eq!(doc.relative_path, "guide/getting-started.md");
        assert!(doc.front_matter.is_empty());
    }

    #[test]
    fn test_new_keeps_extensionless_name() {
        assert_eq!(DocumentRecord::new("a", "A").name, "a");
        assert_eq!(DocumentRecord::new("docs/.hidden", "H").name, ".hidden");
    }

    #[test]
    fn test_front_matter_text_renders_scalars_and_lists() {
        let mut doc = DocumentRecord::new("a.md", "A");
        doc.front_matter
            .insert("draft".into(), serde_yaml::Value::Bool(true));
        doc.front_matter.insert(
            "tags".into(),
            serde_yaml::from_str("[intro, setup]").unwrap(),
        );

        assert_eq!(doc.front_matter_text("draft").as_deref(), Some("true"));
        assert_eq!(doc.front_matter_text("tags").as_deref(), Some("intro, setup"));
        assert_eq!(doc.front_matter_text("missing"), None);
    }
}
