//! YAML text emission for compose documents
//!
//! `serde_yaml` writes the block structure and picks the style of every
//! scalar. On top of that, sequences under the keys in
//! [`EmitterConfig::flow_keys`] are written on one line, and the two-space
//! layout is widened when a larger indent is configured.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

const MIN_INDENT: usize = 2;
// Block scalar indentation indicators are a single digit.
const MAX_INDENT: usize = 9;

/// Plain scalars containing these are quoted inside `[...]`.
const FLOW_INDICATORS: [char; 7] = [',', '?', ':', '[', ']', '{', '}'];

/// Rendering options passed to [`to_yaml`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitterConfig {
    indent: usize,
    flow_keys: BTreeSet<String>,
    sort_keys: bool,
}

impl EmitterConfig {
    /// Spaces per nesting level, clamped to `2..=9`.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.clamp(MIN_INDENT, MAX_INDENT);
        self
    }

    /// Render sequences under `key` as `[a, b]`.
    pub fn with_flow_key(mut self, key: impl Into<String>) -> Self {
        self.flow_keys.insert(key.into());
        self
    }

    /// Sort mapping keys instead of keeping insertion order.
    pub fn with_sorted_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = sort_keys;
        self
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn flow_keys(&self) -> &BTreeSet<String> {
        &self.flow_keys
    }

    pub fn sort_keys(&self) -> bool {
        self.sort_keys
    }
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            indent: MIN_INDENT,
            flow_keys: BTreeSet::from(["command".to_string()]),
            sort_keys: false,
        }
    }
}

/// Serialize `value` as a YAML document.
pub fn to_yaml(value: &Value, config: &EmitterConfig) -> Result<String, serde_yaml::Error> {
    let mut tree = if config.sort_keys {
        sorted(value)
    } else {
        value.clone()
    };

    // Placeholders stand in for flow sequences until serde_yaml is done
    let source = value.to_string();
    let mut marker = String::from("flow-sequence");
    while source.contains(&marker) {
        marker.push('x');
    }
    let mut flows = Vec::new();
    extract_flow_sequences(&mut tree, config, &marker, &mut flows)?;

    let mut yaml = serde_yaml::to_string(&tree)?;
    for (index, flow) in flows.iter().enumerate() {
        yaml = yaml.replacen(&placeholder(&marker, index), flow, 1);
    }

    if config.indent != MIN_INDENT {
        yaml = reindent(&yaml, config.indent);
    }
    Ok(yaml)
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, child)| (key.clone(), sorted(child)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

fn placeholder(marker: &str, index: usize) -> String {
    format!("{marker}-{index}-")
}

fn extract_flow_sequences(
    value: &mut Value,
    config: &EmitterConfig,
    marker: &str,
    flows: &mut Vec<String>,
) -> Result<(), serde_yaml::Error> {
    match value {
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if config.flow_keys.contains(key.as_str()) {
                    if let Some(flow) = flow_sequence(child)? {
                        *child = Value::String(placeholder(marker, flows.len()));
                        flows.push(flow);
                        continue;
                    }
                }
                extract_flow_sequences(child, config, marker, flows)?;
            }
        }
        Value::Array(items) => {
            for item in items {
                extract_flow_sequences(item, config, marker, flows)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// `[a, b]` text for a non-empty sequence of single-line scalars.
fn flow_sequence(value: &Value) -> Result<Option<String>, serde_yaml::Error> {
    let Some(items) = value.as_array().filter(|items| !items.is_empty()) else {
        return Ok(None);
    };

    let mut rendered = Vec::with_capacity(items.len());
    for item in items {
        match flow_item(item)? {
            Some(text) => rendered.push(text),
            None => return Ok(None),
        }
    }
    Ok(Some(format!("[{}]", rendered.join(", "))))
}

fn flow_item(item: &Value) -> Result<Option<String>, serde_yaml::Error> {
    if item.is_array() || item.is_object() {
        return Ok(None);
    }
    let text = serde_yaml::to_string(item)?;
    let text = text.strip_suffix('\n').unwrap_or(&text);
    if text.contains('\n') {
        // block scalar
        return Ok(None);
    }

    Ok(Some(match item {
        Value::String(s) if text == s && s.contains(FLOW_INDICATORS) => {
            format!("'{}'", s.replace('\'', "''"))
        }
        _ => text.to_string(),
    }))
}

/// Widen serde_yaml's two-space layout to `indent` spaces per level.
///
/// Sequence dashes are padded so nested keys stay aligned, and literal
/// block scalars move with their parent.
fn reindent(yaml: &str, indent: usize) -> String {
    let scale = |column: usize| column / MIN_INDENT * indent;
    let mut out = String::with_capacity(yaml.len() * 2);
    // Content column of the block scalar being copied
    let mut block: Option<usize> = None;

    for line in yaml.split_terminator('\n') {
        let leading = line.len() - line.trim_start_matches(' ').len();

        if let Some(content) = block {
            if line.is_empty() {
                out.push('\n');
                continue;
            }
            if leading >= content {
                out.push_str(&" ".repeat(scale(content)));
                out.push_str(&line[content..]);
                out.push('\n');
                continue;
            }
            block = None;
        }

        out.push_str(&" ".repeat(scale(leading)));
        let mut rest = &line[leading..];
        let mut column = leading;
        while let Some(after) = rest.strip_prefix("- ") {
            out.push('-');
            out.push_str(&" ".repeat(indent - 1));
            rest = after;
            column += MIN_INDENT;
        }

        let header = if rest.starts_with('|') {
            Some(("", rest, column))
        } else {
            rest.rsplit_once(": ")
                .map(|(key, token)| (key, token, column + MIN_INDENT))
        };
        match header.and_then(|(key, token, content)| {
            Some((key, block_header(token, indent)?, content))
        }) {
            Some((key, token, content)) => {
                if !key.is_empty() {
                    out.push_str(key);
                    out.push_str(": ");
                }
                out.push_str(&token);
                block = Some(content);
            }
            None => out.push_str(rest),
        }
        out.push('\n');
    }
    out
}

/// Rewrite a `|`, `|-`, `|2+`... header so its indentation indicator
/// matches `indent`. `None` when `token` is not a block scalar header.
fn block_header(token: &str, indent: usize) -> Option<String> {
    let flags = token.strip_prefix('|')?;
    if flags.len() > 2 || !flags.chars().all(|c| c.is_ascii_digit() || c == '+' || c == '-') {
        return None;
    }
    let digit = char::from_digit(indent as u32, 10)?;
    Some(
        std::iter::once('|')
            .chain(flags.chars().map(|c| if c.is_ascii_digit() { digit } else { c }))
            .collect(),
    )
}
