//! The in-memory output document produced by the assembler.
//!
//! These types describe what ends up on the page, independent of the writer that serializes it.
//! No backend types appear here, so tests and the plain-text writer
//! ([`crate::writer::PlainTextWriter`]) can inspect a document without loading fonts.

use serde::{Deserialize, Serialize};

use crate::richtext::{self, StyledRun};

/// Horizontal alignment of a block's text.
///
/// The variants map directly to [`genpdf::Alignment`]; justified text falls back to left
/// alignment in backends that do not support it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
    /// Fully justified paragraphs.
    Justified,
}

/// An sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Paper formats supported by the writers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaperSize {
    #[default]
    Letter,
    A4,
}

impl PaperSize {
    /// Width and height in millimetres.
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::A4 => (210.0, 297.0),
        }
    }
}

/// Page margins in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl PageMargins {
    /// Creates margins from top, right, bottom and left values.
    pub fn trbl(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Uses the same margin on all four sides.
    pub fn all(value: f64) -> Self {
        Self::trbl(value, value, value, value)
    }
}

impl Default for PageMargins {
    fn default() -> Self {
        Self::trbl(12.7, 15.0, 12.7, 15.0)
    }
}

/// The role a block plays in the resume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// The candidate's name.
    HeaderName,
    /// The joined contact line under the name.
    HeaderContact,
    /// A section heading such as "EDUCATION".
    SectionTitle,
    /// A row with a left-aligned and a right-aligned group.
    LeftRight,
    /// A bulleted line with a hanging indent.
    Bullet,
    /// A project or role title line.
    ItemTitle,
    /// A thin horizontal rule.
    Divider,
    /// Plain body text.
    Paragraph,
}

impl BlockKind {
    /// Headings and titles bind to the block that follows them.
    pub fn is_heading_like(self) -> bool {
        matches!(
            self,
            BlockKind::HeaderName | BlockKind::SectionTitle | BlockKind::ItemTitle
        )
    }
}

/// Layout attributes attached to every block.
///
/// Spacing is in points, indents in millimetres.  `first_line_indent_mm` is relative to
/// `indent_left_mm`, so a negative value produces a hanging indent.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockLayout {
    pub space_before_pt: f64,
    pub space_after_pt: f64,
    pub line_spacing: f64,
    pub indent_left_mm: f64,
    pub first_line_indent_mm: f64,
    pub keep_together: bool,
    pub keep_with_next: bool,
    pub alignment: HorizontalAlignment,
    pub font_size: u8,
    pub bold: bool,
    pub color: Option<Rgb>,
}

impl Default for BlockLayout {
    fn default() -> Self {
        Self {
            space_before_pt: 0.0,
            space_after_pt: 0.0,
            line_spacing: 1.0,
            indent_left_mm: 0.0,
            first_line_indent_mm: 0.0,
            keep_together: false,
            keep_with_next: false,
            alignment: HorizontalAlignment::Left,
            font_size: 10,
            bold: false,
            color: None,
        }
    }
}

/// What a block displays.
#[derive(Clone, Debug, PartialEq)]
pub enum BlockContent {
    /// A single flow of styled runs.
    Runs(Vec<StyledRun>),
    /// Two independently aligned groups on one line.
    LeftRight {
        left: Vec<StyledRun>,
        right: Vec<StyledRun>,
    },
    /// A horizontal rule drawn as the block's bottom border.
    Rule,
}

/// One paragraph-equivalent unit of the output document.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    kind: BlockKind,
    content: BlockContent,
    layout: BlockLayout,
}

impl Block {
    pub fn new(kind: BlockKind, content: BlockContent, layout: BlockLayout) -> Self {
        Self {
            kind,
            content,
            layout,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn content(&self) -> &BlockContent {
        &self.content
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Plain text of the block; left/right groups are joined by a tab.
    pub fn text(&self) -> String {
        match &self.content {
            BlockContent::Runs(runs) => richtext::plain_text(runs),
            BlockContent::LeftRight { left, right } => {
                format!(
                    "{}\t{}",
                    richtext::plain_text(left),
                    richtext::plain_text(right)
                )
            }
            BlockContent::Rule => String::new(),
        }
    }
}

/// A fully assembled resume ready to be serialized by a writer.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputDocument {
    title: Option<String>,
    paper: PaperSize,
    margins: PageMargins,
    font_family: String,
    base_font_size: u8,
    bullet_glyph: String,
    blocks: Vec<Block>,
}

impl OutputDocument {
    /// Creates an empty document with the given page setup.
    pub fn new(
        paper: PaperSize,
        margins: PageMargins,
        font_family: impl Into<String>,
        base_font_size: u8,
    ) -> Self {
        Self {
            title: None,
            paper,
            margins,
            font_family: font_family.into(),
            base_font_size,
            bullet_glyph: "\u{2022}".to_owned(),
            blocks: Vec::new(),
        }
    }

    /// Document title used for PDF metadata.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn paper(&self) -> PaperSize {
        self.paper
    }

    pub fn margins(&self) -> PageMargins {
        self.margins
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn base_font_size(&self) -> u8 {
        self.base_font_size
    }

    /// Glyph printed in front of bullet blocks.
    pub fn bullet_glyph(&self) -> &str {
        &self.bullet_glyph
    }

    pub fn set_bullet_glyph(&mut self, glyph: impl Into<String>) {
        self.bullet_glyph = glyph.into();
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Appends a block.  Earlier blocks are never touched.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Block kinds in document order.
    pub fn kinds(&self) -> Vec<BlockKind> {
        self.blocks.iter().map(Block::kind).collect()
    }

    /// Texts of all section-title blocks in document order.
    pub fn section_titles(&self) -> Vec<String> {
        self.blocks
            .iter()
            .filter(|block| block.kind() == BlockKind::SectionTitle)
            .map(Block::text)
            .collect()
    }
}
