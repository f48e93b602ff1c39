/// Front-matter extraction and title derivation.
///
/// A document may open with a YAML block fenced by `---` lines:
///
/// ```text
/// ---
/// title: Getting Started
/// tags: [intro]
/// ---
/// # Body starts here
/// ```
use crate::model::FrontMatter;
use serde_yaml::Value;

const FENCE: &str = "---";

/// A document split into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub front_matter: FrontMatter,
    pub body: String,
}

/// Split `raw` into front-matter and body.
///
/// Without an opening fence on the first line, or without a closing fence,
/// the whole text is the body and the metadata is empty. A block that is
/// not valid YAML, or whose top level is not a mapping, is an error.
pub fn parse_document(raw: &str) -> Result<ParsedDocument, String> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let Some((yaml, body)) = split_fenced(text) else {
        return Ok(ParsedDocument {
            front_matter: FrontMatter::new(),
            body: text.to_string(),
        });
    };

    Ok(ParsedDocument {
        front_matter: parse_yaml_block(yaml)?,
        body: body.to_string(),
    })
}

/// Locate the fenced block. Returns `(yaml, body)` slices of `text`.
fn split_fenced(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if trim_eol(first) != FENCE {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if trim_eol(line) == FENCE {
            let yaml = &text[yaml_start..offset];
            let body = &text[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

fn trim_eol(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn parse_yaml_block(yaml: &str) -> Result<FrontMatter, String> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::new());
    }

    let value: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    match value {
        Value::Null => Ok(FrontMatter::new()),
        Value::Mapping(mapping) => Ok(mapping
            .into_iter()
            .filter_map(|(key, value)| scalar_text(&key).map(|key| (key, value)))
            .collect()),
        _ => Err("front-matter is not a key/value mapping".to_string()),
    }
}

/// Text of a scalar YAML value; `None` for collections and null.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Display title for a document.
///
/// A non-empty front-matter `title` wins (numbers and booleans are
/// accepted as text); otherwise the title is derived from the file name.
pub fn document_title(front_matter: &FrontMatter, name: &str) -> String {
    front_matter
        .get("title")
        .and_then(scalar_text)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format_title(name))
}

/// Turn a file name into a title: `-` and `_` become spaces and the first
/// character of every word is upper-cased.
///
/// `getting-started` → `Getting Started`, `api_v2` → `Api V2`.
pub fn format_title(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;
    for ch in name.chars() {
        let ch = if ch == '-' || ch == '_' { ' ' } else { ch };
        if ch.is_alphanumeric() {
            if in_word {
                out.push(ch);
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}
