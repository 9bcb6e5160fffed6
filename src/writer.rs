//! Serialization backends for [`OutputDocument`]s.
//!
//! A [`DocumentWriter`] turns an assembled document into bytes.  The assembler only talks to
//! writers through this trait, so the PDF backend in [`crate::pdf`] and the plain-text preview
//! below are interchangeable.

use std::io::Write;

use crate::document::{Block, BlockContent, BlockKind, HorizontalAlignment, OutputDocument};
use crate::error::Result;
use crate::richtext;

/// Serializes an assembled document.
pub trait DocumentWriter {
    /// File extension (without the dot) of the produced format.
    fn extension(&self) -> &'static str;

    /// Writes the complete document to `sink`.
    fn write(&self, document: &OutputDocument, sink: &mut dyn Write) -> Result<()>;

    /// Convenience wrapper that collects the output in memory.
    fn write_to_vec(&self, document: &OutputDocument) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write(document, &mut bytes)?;
        Ok(bytes)
    }
}

const DEFAULT_TEXT_WIDTH: usize = 90;

/// Plain-text rendition of a resume, the way an applicant tracking system sees it.
///
/// Bold markup is dropped, left/right rows are padded to the line width and bullets wrap with a
/// hanging indent.
#[derive(Clone, Debug)]
pub struct PlainTextWriter {
    width: usize,
}

impl Default for PlainTextWriter {
    fn default() -> Self {
        Self {
            width: DEFAULT_TEXT_WIDTH,
        }
    }
}

impl PlainTextWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the line width in characters and returns the updated writer.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(20);
        self
    }

    /// Renders the document into a string.
    pub fn render_to_string(&self, document: &OutputDocument) -> String {
        let mut lines = Vec::new();
        for block in document.blocks() {
            self.render_block(block, document.bullet_glyph(), &mut lines);
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn render_block(&self, block: &Block, glyph: &str, lines: &mut Vec<String>) {
        match block.content() {
            BlockContent::Rule => lines.push("-".repeat(self.width)),
            BlockContent::LeftRight { left, right } => {
                let left = richtext::plain_text(left);
                let right = richtext::plain_text(right);
                lines.extend(self.left_right(&left, &right));
            }
            BlockContent::Runs(runs) => {
                let text = richtext::plain_text(runs);
                match block.kind() {
                    BlockKind::Bullet => {
                        let wrapped = wrap(&text, self.width.saturating_sub(4));
                        for (index, line) in wrapped.into_iter().enumerate() {
                            if index == 0 {
                                lines.push(format!("  {glyph} {line}"));
                            } else {
                                lines.push(format!("    {line}"));
                            }
                        }
                    }
                    _ if block.layout().alignment == HorizontalAlignment::Center => {
                        lines.extend(wrap(&text, self.width).iter().map(|line| self.center(line)));
                    }
                    _ => lines.extend(wrap(&text, self.width)),
                }
            }
        }
    }

    /// Left group flush left and right group flush right on the first line.  A long left group
    /// wraps in the column beside the right group, or above it when that column is too narrow.
    fn left_right(&self, left: &str, right: &str) -> Vec<String> {
        if right.is_empty() {
            return wrap(left, self.width);
        }
        let right_len = right.chars().count();
        let column = self.width.saturating_sub(right_len + 2);
        if column < self.width / 2 {
            let mut lines = wrap(left, self.width);
            lines.retain(|line| !line.is_empty());
            lines.push(self.pad(String::new(), right));
            return lines;
        }

        let mut lines = wrap(left, column);
        let first = std::mem::take(&mut lines[0]);
        lines[0] = self.pad(first, right);
        lines
    }

    fn pad(&self, left: String, right: &str) -> String {
        let used = left.chars().count() + right.chars().count();
        let gap = self.width.saturating_sub(used).max(2);
        format!("{left}{}{right}", " ".repeat(gap))
    }

    fn center(&self, line: &str) -> String {
        let len = line.chars().count();
        let pad = self.width.saturating_sub(len) / 2;
        format!("{}{line}", " ".repeat(pad))
    }
}

impl DocumentWriter for PlainTextWriter {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn write(&self, document: &OutputDocument, sink: &mut dyn Write) -> Result<()> {
        sink.write_all(self.render_to_string(document).as_bytes())?;
        Ok(())
    }
}

/// Greedy word wrap on character counts.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
