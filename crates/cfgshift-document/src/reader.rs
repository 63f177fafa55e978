//! Text reader keeping comments
//!
//! `serde_yaml` parses the content; a line scan over the same text then finds
//! block-style mapping entries and attaches the comments around them to the
//! matching key and value nodes:
//! - comment and blank lines go before the next entry
//! - a trailing `# ...` on an entry line is inline
//! - leading comments separated from the first entry by a blank line form the
//!   document header
//! - comments after the last entry form the footer
//!
//! Lines inside block scalars and multi-line flow collections are skipped.
//! Comments within sequences attach to the next mapping entry.

use serde::Deserialize;
use serde_yaml::Value;

use crate::comments::Comment;
use crate::error::{DocumentError, DocumentResult};
use crate::node::{Node, NodeKind};

impl Node {
    /// Parse YAML text into a node graph, comments included
    ///
    /// Empty text gives a null node.
    ///
    /// # Errors
    /// - [`DocumentError::Yaml`] if the text is not valid YAML
    /// - [`DocumentError::Malformed`] for multiple documents
    pub fn parse(text: &str) -> DocumentResult<Self> {
        let mut documents = Vec::new();
        for document in serde_yaml::Deserializer::from_str(text) {
            documents.push(Value::deserialize(document)?);
        }
        if documents.len() > 1 {
            return Err(DocumentError::malformed(format!(
                "expected a single document, found {}",
                documents.len()
            )));
        }
        let mut node = Self::from_value(documents.pop().unwrap_or(Value::Null));
        attach(&mut node, scan(text));
        Ok(node)
    }
}

/// Comments found around one mapping entry
#[derive(Debug, Default, PartialEq)]
struct EntryComments {
    path: Vec<Value>,
    before: Vec<Comment>,
    inline: Option<Comment>,
    on_value: bool,
}

#[derive(Debug, Default, PartialEq)]
struct Scan {
    header: Vec<Comment>,
    entries: Vec<EntryComments>,
    footer: Vec<Comment>,
}

#[derive(Debug, Clone, Copy)]
enum Skip {
    BlockScalar { parent: usize },
    Flow { depth: i64 },
}

fn scan(text: &str) -> Scan {
    let mut result = Scan::default();
    let mut stack: Vec<(usize, Value)> = Vec::new();
    let mut pending: Vec<Comment> = Vec::new();
    let mut skip: Option<Skip> = None;

    for line in text.lines() {
        let line = line.trim_end();
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        match skip {
            Some(Skip::BlockScalar { parent }) if trimmed.is_empty() || indent > parent => {
                continue;
            }
            Some(Skip::Flow { depth }) => {
                let depth = depth + flow_balance(split_comment(trimmed).0);
                skip = (depth > 0).then_some(Skip::Flow { depth });
                continue;
            }
            _ => skip = None,
        }

        if trimmed.is_empty() {
            if !pending.is_empty() || !result.entries.is_empty() {
                pending.push(Comment::Blank);
            }
            continue;
        }
        if let Some(comment) = trimmed.strip_prefix('#') {
            pending.push(comment_line(comment));
            continue;
        }
        if trimmed == "---" || trimmed == "..." || trimmed.starts_with('%') {
            continue;
        }
        if let Some(item) = trimmed
            .strip_prefix('-')
            .filter(|rest| rest.is_empty() || rest.starts_with(' '))
        {
            skip = value_skip(indent, split_comment(item.trim_start()).0);
            continue;
        }
        let Some((key_text, rest)) = split_key(trimmed) else {
            continue;
        };

        while stack.last().is_some_and(|(level, _)| *level >= indent) {
            stack.pop();
        }
        let key = serde_yaml::from_str(key_text).unwrap_or_else(|_| Value::from(key_text));
        stack.push((indent, key));

        let (value, inline) = split_comment(rest);
        let mut before = std::mem::take(&mut pending);
        if result.entries.is_empty() {
            if let Some(split) = before.iter().rposition(|comment| *comment == Comment::Blank) {
                let rest = before.split_off(split + 1);
                result.header = std::mem::replace(&mut before, rest);
            }
        }
        result.entries.push(EntryComments {
            path: stack.iter().map(|(_, key)| key.clone()).collect(),
            before,
            inline,
            on_value: !value.is_empty(),
        });
        skip = value_skip(indent, value);
    }

    while pending.last() == Some(&Comment::Blank) {
        pending.pop();
    }
    if result.entries.is_empty() {
        result.header = pending;
    } else {
        result.footer = pending;
    }
    result
}

fn attach(root: &mut Node, scan: Scan) {
    let mut carried: Vec<Comment> = Vec::new();
    for entry in scan.entries {
        let mut before = std::mem::take(&mut carried);
        before.extend(entry.before);
        match locate(root, &entry.path) {
            Some((key, value)) => {
                key.comments.before.extend(before);
                if let Some(inline) = entry.inline {
                    let target = if entry.on_value { value } else { key };
                    target.comments.inline.push(inline);
                }
            }
            None => carried = before,
        }
    }
    root.comments.before = scan.header;
    carried.extend(scan.footer);
    root.comments.after = carried;
}

/// Key and value nodes of the mapping entry at `path`
fn locate<'n>(node: &'n mut Node, path: &[Value]) -> Option<(&'n mut Node, &'n mut Node)> {
    let (first, rest) = path.split_first()?;
    let NodeKind::Mapping(entries) = &mut node.kind else {
        return None;
    };
    let (key, value) = entries
        .iter_mut()
        .find(|(key, _)| key.clone().into_value() == *first)?;
    if rest.is_empty() {
        Some((key, value))
    } else {
        locate(value, rest)
    }
}

/// Lines following a value that belong to it
fn value_skip(indent: usize, value: &str) -> Option<Skip> {
    let mut value = value.trim_start();
    while value.starts_with(['&', '!']) {
        value = value
            .split_once(char::is_whitespace)
            .map_or("", |(_, rest)| rest.trim_start());
    }
    match value.chars().next() {
        Some('|' | '>') => Some(Skip::BlockScalar { parent: indent }),
        Some('[' | '{') => {
            let depth = flow_balance(value);
            (depth > 0).then_some(Skip::Flow { depth })
        }
        _ => None,
    }
}

/// Split `key: rest`, `None` for lines that are not mapping entries
fn split_key(line: &str) -> Option<(&str, &str)> {
    let end = match line.chars().next()? {
        quote @ ('"' | '\'') => quoted_end(line, quote)?,
        '[' | '{' | '#' => return None,
        _ => 0,
    };
    let bytes = line.as_bytes();
    let mut index = end;
    while index < bytes.len() {
        match bytes[index] {
            b':' if bytes.get(index + 1).map_or(true, |next| *next == b' ' || *next == b'\t') => {
                let key = line[..index].trim_end();
                return (!key.is_empty()).then(|| (key, &line[index + 1..]));
            }
            b'#' if index > 0 && bytes[index - 1] == b' ' => return None,
            _ => index += 1,
        }
    }
    None
}

/// Split a value from its trailing comment
fn split_comment(rest: &str) -> (&str, Option<Comment>) {
    let value = rest.trim_start();
    let offset = rest.len() - value.len();
    let start = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => quoted_end(value, quote).unwrap_or(value.len()),
        _ => 0,
    };
    let bytes = value.as_bytes();
    let found = (start..bytes.len())
        .find(|&index| bytes[index] == b'#' && (index == 0 || matches!(bytes[index - 1], b' ' | b'\t')));
    match found {
        Some(index) => (
            rest[offset..offset + index].trim_end(),
            Some(comment_line(&value[index + 1..])),
        ),
        None => (value, None),
    }
}

/// Byte index just past the closing quote of a quoted scalar at the start of
/// `text`
fn quoted_end(text: &str, quote: char) -> Option<usize> {
    let mut chars = text.char_indices().skip(1);
    while let Some((index, c)) = chars.next() {
        match c {
            '\\' if quote == '"' => {
                chars.next();
            }
            c if c == quote => {
                if quote == '\'' && text[index + 1..].starts_with('\'') {
                    chars.next();
                } else {
                    return Some(index + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Net count of opened flow brackets outside quotes
fn flow_balance(text: &str) -> i64 {
    let mut depth = 0;
    let mut quote: Option<char> = None;
    for c in text.chars() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[' | '{') => depth += 1,
            (None, ']' | '}') => depth -= 1,
            _ => {}
        }
    }
    depth
}

fn comment_line(text: &str) -> Comment {
    Comment::line(text.strip_prefix(' ').unwrap_or(text))
}
