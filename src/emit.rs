//! Block emitters.
//!
//! Each method appends one block (or a fixed pair of blocks) to the document being assembled and
//! never revisits earlier blocks.  Text that may carry inline markup goes through
//! [`richtext::parse_runs`] with the configured marker.

use crate::config::RenderConfig;
use crate::document::{Block, BlockContent, BlockKind, BlockLayout, OutputDocument};
use crate::model::Header;
use crate::richtext::{self, StyledRun};

/// Appends formatted blocks to an [`OutputDocument`].
pub struct Emitter<'a> {
    document: &'a mut OutputDocument,
    config: &'a RenderConfig,
}

impl<'a> Emitter<'a> {
    pub fn new(document: &'a mut OutputDocument, config: &'a RenderConfig) -> Self {
        Self { document, config }
    }

    fn push(&mut self, kind: BlockKind, content: BlockContent) {
        self.push_with(kind, content, |_| {});
    }

    fn push_with<F>(&mut self, kind: BlockKind, content: BlockContent, adjust: F)
    where
        F: FnOnce(&mut BlockLayout),
    {
        let mut layout = self.config.layout.attributes_for(kind);
        adjust(&mut layout);
        self.document.push(Block::new(kind, content, layout));
    }

    fn markup(&self, text: &str) -> Vec<StyledRun> {
        richtext::parse_runs(text, &self.config.bold_marker)
    }

    /// Centered name line followed by a centered line of the present contact fields.
    pub fn header(&mut self, header: &Header) {
        let name = header.name.trim();
        if !name.is_empty() {
            self.push(
                BlockKind::HeaderName,
                BlockContent::Runs(vec![StyledRun::bold(name)]),
            );
        }

        let contacts = header.contact_fields();
        if !contacts.is_empty() {
            let line = contacts.join(&self.config.contact_separator);
            self.push(
                BlockKind::HeaderContact,
                BlockContent::Runs(vec![StyledRun::plain(line)]),
            );
        }
    }

    /// A divider rule followed by the cased section title.
    ///
    /// A blank label emits the divider alone.
    pub fn section_title(&mut self, label: &str) {
        self.divider();
        let label = label.trim();
        if label.is_empty() {
            return;
        }
        let title = self.config.heading(label);
        self.push(
            BlockKind::SectionTitle,
            BlockContent::Runs(vec![StyledRun::bold(title)]),
        );
    }

    /// One row with `left` flush left and `right` flush right.
    ///
    /// `bind_next` keeps the row on the same page as the following block, used for the first row
    /// of a pair and for rows that introduce bullets.  Nothing is emitted when both sides are
    /// blank.
    pub fn left_right(&mut self, left: &str, right: &str, bold_left: bool, bind_next: bool) {
        let left = left.trim();
        if left.is_empty() && right.trim().is_empty() {
            return;
        }
        let left = if bold_left {
            vec![StyledRun::bold(left)]
        } else {
            self.markup(left)
        };
        let right = match right.trim() {
            "" => Vec::new(),
            text => vec![StyledRun::plain(text)],
        };
        self.push_with(
            BlockKind::LeftRight,
            BlockContent::LeftRight { left, right },
            |layout| layout.keep_with_next = bind_next,
        );
    }

    /// A bulleted line with a hanging indent.
    pub fn bullet(&mut self, text: &str) {
        let runs = self.markup(strip_bullet_glyph(text));
        self.push(BlockKind::Bullet, BlockContent::Runs(runs));
    }

    /// A bold project or role title that binds to its bullets.
    pub fn item_title(&mut self, title: &str) {
        self.push(
            BlockKind::ItemTitle,
            BlockContent::Runs(vec![StyledRun::bold(title.trim())]),
        );
    }

    /// A thin horizontal rule.
    pub fn divider(&mut self) {
        self.push(BlockKind::Divider, BlockContent::Rule);
    }

    /// Body text with inline markup.
    pub fn paragraph(&mut self, text: &str) {
        let runs = self.markup(text.trim());
        self.push(BlockKind::Paragraph, BlockContent::Runs(runs));
    }

    /// Body text introduced by a bold label, e.g. `Languages: Rust, Go`.
    pub fn labeled_paragraph(&mut self, label: &str, text: &str) {
        let label = label.trim();
        let mut runs = Vec::new();
        if !label.is_empty() {
            runs.push(StyledRun::bold(format!("{label}: ")));
        }
        runs.extend(self.markup(text.trim()));
        self.push(BlockKind::Paragraph, BlockContent::Runs(runs));
    }
}

/// Bullets typed into the form or returned by the model often carry their own glyph.
fn strip_bullet_glyph(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix('\u{2022}')
        .or_else(|| trimmed.strip_prefix("- "))
        .map(str::trim_start)
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HorizontalAlignment;

    fn document(config: &RenderConfig) -> OutputDocument {
        let layout = &config.layout;
        OutputDocument::new(
            layout.paper,
            layout.margins,
            layout.font_family.clone(),
            layout.base_font_size,
        )
    }

    #[test]
    fn header_skips_absent_contacts() {
        let config = RenderConfig::default();
        let mut doc = document(&config);
        let header = Header::new("Jane Doe")
            .with_phone("555-0100")
            .with_github("github.com/jane");
        Emitter::new(&mut doc, &config).header(&header);

        assert_eq!(
            doc.kinds(),
            [BlockKind::HeaderName, BlockKind::HeaderContact]
        );
        assert_eq!(doc.blocks()[1].text(), "555-0100 | github.com/jane");
        assert_eq!(
            doc.blocks()[0].layout().alignment,
            HorizontalAlignment::Center
        );
    }

    #[test]
    fn section_title_is_preceded_by_divider() {
        let config = RenderConfig::default();
        let mut doc = document(&config);
        Emitter::new(&mut doc, &config).section_title("Experience");

        assert_eq!(doc.kinds(), [BlockKind::Divider, BlockKind::SectionTitle]);
        assert_eq!(doc.section_titles(), ["EXPERIENCE"]);
        assert!(doc.blocks().iter().all(|block| block.layout().keep_with_next));
    }

    #[test]
    fn blank_section_label_leaves_only_divider() {
        let config = RenderConfig::default();
        let mut doc = document(&config);
        Emitter::new(&mut doc, &config).section_title("   ");

        assert_eq!(doc.kinds(), [BlockKind::Divider]);
        assert!(doc.section_titles().is_empty());
    }

    #[test]
    fn bullet_parses_markup_and_strips_glyph() {
        let config = RenderConfig::default();
        let mut doc = document(&config);
        Emitter::new(&mut doc, &config).bullet("\u{2022} Cut **p99** latency");

        let block = &doc.blocks()[0];
        assert_eq!(
            block.content(),
            &BlockContent::Runs(vec![
                StyledRun::plain("Cut "),
                StyledRun::bold("p99"),
                StyledRun::plain(" latency"),
            ])
        );
        assert!(block.layout().keep_together);
    }

    #[test]
    fn left_right_binding_is_explicit() {
        let config = RenderConfig::default();
        let mut doc = document(&config);
        let mut emitter = Emitter::new(&mut doc, &config);
        emitter.left_right("B.S. CS", "2019-2023", true, true);
        emitter.left_right("MIT", "", false, false);

        assert!(doc.blocks()[0].layout().keep_with_next);
        assert!(!doc.blocks()[1].layout().keep_with_next);
        assert_eq!(
            doc.blocks()[1].content(),
            &BlockContent::LeftRight {
                left: vec![StyledRun::plain("MIT")],
                right: Vec::new(),
            }
        );
    }

    #[test]
    fn blank_left_right_row_is_skipped() {
        let config = RenderConfig::default();
        let mut doc = document(&config);
        let mut emitter = Emitter::new(&mut doc, &config);
        emitter.left_right("  ", "", true, true);
        emitter.left_right("", "3.9", false, false);

        assert_eq!(doc.kinds(), [BlockKind::LeftRight]);
        assert_eq!(doc.blocks()[0].text(), "\t3.9");
    }

    #[test]
    fn labeled_paragraph_bolds_label() {
        let config = RenderConfig::default();
        let mut doc = document(&config);
        Emitter::new(&mut doc, &config).labeled_paragraph("Languages", "Rust, Go");
        assert_eq!(
            doc.blocks()[0].content(),
            &BlockContent::Runs(vec![
                StyledRun::bold("Languages: "),
                StyledRun::plain("Rust, Go"),
            ])
        );
    }
}
