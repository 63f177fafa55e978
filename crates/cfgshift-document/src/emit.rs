//! Comment-aware block-style writer
//!
//! Mappings are laid out here so every comment slot lands next to its entry;
//! leaf values (scalars, sequences, tagged values) are rendered by
//! `serde_yaml` and indented under their key.

use serde_yaml::Value;

use crate::block::Block;
use crate::codec::Codec;
use crate::comments::{Comment, Comments, NodeRole};
use crate::error::{DocumentError, DocumentResult};
use crate::route::{key_to_string, Key};
use crate::section::Section;
use crate::settings::DocumentSettings;

pub(crate) fn emit(root: &Section, settings: &DocumentSettings) -> DocumentResult<String> {
    let mut emitter = Emitter {
        codec: Codec::new(settings),
        step: settings.indent(),
        out: String::new(),
    };
    let header = root.comments().of(NodeRole::Value);
    emitter.comment_lines("", &header.before);
    if root.is_empty(false) {
        emitter.out.push_str("{}\n");
    } else {
        emitter.section(root, 0)?;
    }
    emitter.comment_lines("", &header.after);
    Ok(emitter.out)
}

struct Emitter<'a> {
    codec: Codec<'a>,
    step: usize,
    out: String,
}

impl Emitter<'_> {
    fn section(&mut self, section: &Section, depth: usize) -> DocumentResult<()> {
        let pad = " ".repeat(depth * self.step);
        for (key, block) in section.entries() {
            let comments = block.comments();
            self.comment_lines(&pad, &comments.of(NodeRole::Key).before);
            self.comment_lines(&pad, &comments.of(NodeRole::Value).before);

            let key = self.key(key)?;
            let inline = inline_comments(comments);
            match block {
                Block::Section(child) if child.is_empty(false) => {
                    self.out.push_str(&format!("{pad}{key}: {{}}{inline}\n"));
                }
                Block::Section(child) => {
                    self.out.push_str(&format!("{pad}{key}:{inline}\n"));
                    self.section(child, depth + 1)?;
                }
                Block::Terminal(terminal) => {
                    self.terminal(&pad, &key, terminal.value(), &inline, depth)?;
                }
            }

            self.comment_lines(&pad, &comments.of(NodeRole::Value).after);
            self.comment_lines(&pad, &comments.of(NodeRole::Key).after);
        }
        Ok(())
    }

    fn terminal(
        &mut self,
        pad: &str,
        key: &str,
        value: &Value,
        inline: &str,
        depth: usize,
    ) -> DocumentResult<()> {
        let rendered = self.render(value)?;
        let mut lines = rendered.lines();
        let first = lines.next().unwrap_or_default();
        if !rendered.contains('\n') {
            self.out.push_str(&format!("{pad}{key}: {first}{inline}\n"));
        } else if first.starts_with('|') || first.starts_with('>') {
            // block scalar: header stays on the key line, body re-indented under it
            self.out.push_str(&format!("{pad}{key}: {first}{inline}\n"));
            let body: Vec<&str> = lines.collect();
            let base = body
                .iter()
                .filter(|line| !line.trim().is_empty())
                .map(|line| line.len() - line.trim_start_matches(' ').len())
                .min()
                .unwrap_or(0);
            let nested = " ".repeat((depth + 1) * self.step);
            for line in body {
                if line.trim().is_empty() {
                    self.out.push('\n');
                } else {
                    self.out.push_str(&format!("{nested}{}\n", &line[base..]));
                }
            }
        } else {
            let nested = " ".repeat((depth + 1) * self.step);
            self.out.push_str(&format!("{pad}{key}:{inline}\n"));
            for line in rendered.lines() {
                self.out.push_str(&format!("{nested}{line}\n"));
            }
        }
        Ok(())
    }

    fn key(&self, key: &Key) -> DocumentResult<String> {
        let rendered = self.render(key)?;
        if rendered.contains('\n') {
            return Err(DocumentError::UnrepresentableKey(key_to_string(key)));
        }
        Ok(rendered)
    }

    fn render(&self, value: &Value) -> DocumentResult<String> {
        let plain = self.codec.represent_value(value)?.into_value();
        let text = serde_yaml::to_string(&plain)?;
        Ok(text.trim_end_matches('\n').to_string())
    }

    fn comment_lines(&mut self, pad: &str, comments: &[Comment]) {
        for comment in comments {
            match comment {
                Comment::Line(text) => self.out.push_str(&format!("{pad}# {text}\n")),
                Comment::Blank => self.out.push('\n'),
            }
        }
    }
}

fn inline_comments(comments: &Comments) -> String {
    comments
        .of(NodeRole::Key)
        .inline
        .iter()
        .chain(&comments.of(NodeRole::Value).inline)
        .filter_map(|comment| match comment {
            Comment::Line(text) => Some(format!(" # {text}")),
            Comment::Blank => None,
        })
        .collect()
}
