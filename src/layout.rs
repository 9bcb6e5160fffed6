//! Page setup and per-block typography.
//!
//! The policy is fixed for a render: margins, paper and base font never depend on content.  Each
//! [`BlockKind`] gets a [`BlockStyle`] that overrides size, weight, colour and spacing.  Keep flags
//! are not configurable; they are derived from the block kind in [`LayoutPolicy::attributes_for`].

use serde::{Deserialize, Serialize};

use crate::document::{BlockKind, BlockLayout, HorizontalAlignment, PageMargins, PaperSize, Rgb};
use crate::fonts::DEFAULT_FONT_FAMILY_NAME;

/// Typography overrides for one block kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStyle {
    /// Font size in points; `None` uses the base size.
    pub font_size: Option<u8>,
    pub bold: bool,
    pub color: Option<Rgb>,
    pub space_before_pt: f64,
    pub space_after_pt: f64,
    pub line_spacing: f64,
}

impl Default for BlockStyle {
    fn default() -> Self {
        Self {
            font_size: None,
            bold: false,
            color: None,
            space_before_pt: 0.0,
            space_after_pt: 2.0,
            line_spacing: 1.0,
        }
    }
}

impl BlockStyle {
    fn sized(font_size: u8) -> Self {
        Self {
            font_size: Some(font_size),
            ..Self::default()
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn colored(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    fn spaced(mut self, before: f64, after: f64) -> Self {
        self.space_before_pt = before;
        self.space_after_pt = after;
        self
    }
}

/// Styles for every block kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockStyles {
    pub header_name: BlockStyle,
    pub header_contact: BlockStyle,
    pub section_title: BlockStyle,
    pub left_right: BlockStyle,
    pub bullet: BlockStyle,
    pub item_title: BlockStyle,
    pub divider: BlockStyle,
    pub paragraph: BlockStyle,
}

impl Default for BlockStyles {
    fn default() -> Self {
        Self {
            header_name: BlockStyle::sized(18).bold().spaced(0.0, 2.0),
            header_contact: BlockStyle::default().spaced(0.0, 4.0),
            section_title: BlockStyle::sized(12)
                .bold()
                .colored(Rgb(0x1f, 0x38, 0x64))
                .spaced(2.0, 3.0),
            left_right: BlockStyle::default().spaced(0.0, 1.0),
            bullet: BlockStyle::default().spaced(0.0, 1.0),
            item_title: BlockStyle::default().bold().spaced(2.0, 1.0),
            divider: BlockStyle::default().spaced(6.0, 2.0),
            paragraph: BlockStyle::default().spaced(0.0, 4.0),
        }
    }
}

impl BlockStyles {
    pub fn get(&self, kind: BlockKind) -> &BlockStyle {
        match kind {
            BlockKind::HeaderName => &self.header_name,
            BlockKind::HeaderContact => &self.header_contact,
            BlockKind::SectionTitle => &self.section_title,
            BlockKind::LeftRight => &self.left_right,
            BlockKind::Bullet => &self.bullet,
            BlockKind::ItemTitle => &self.item_title,
            BlockKind::Divider => &self.divider,
            BlockKind::Paragraph => &self.paragraph,
        }
    }
}

/// Page layout and typography shared by every block of a document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    pub paper: PaperSize,
    pub margins: PageMargins,
    pub font_family: String,
    pub base_font_size: u8,
    /// Left indent of bullet text in millimetres.
    pub bullet_indent_mm: f64,
    /// How far the bullet glyph hangs to the left of the bullet text.
    pub bullet_hang_mm: f64,
    pub bullet_glyph: String,
    pub styles: BlockStyles,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            paper: PaperSize::Letter,
            margins: PageMargins::default(),
            font_family: DEFAULT_FONT_FAMILY_NAME.to_owned(),
            base_font_size: 10,
            bullet_indent_mm: 6.0,
            bullet_hang_mm: 4.0,
            bullet_glyph: "\u{2022}".to_owned(),
            styles: BlockStyles::default(),
        }
    }
}

impl LayoutPolicy {
    /// Sets the margins and returns the updated policy.
    pub fn with_margins(mut self, margins: PageMargins) -> Self {
        self.margins = margins;
        self
    }

    /// Sets the paper size and returns the updated policy.
    pub fn with_paper(mut self, paper: PaperSize) -> Self {
        self.paper = paper;
        self
    }

    /// Resolves the layout attributes for a block of `kind`.
    pub fn attributes_for(&self, kind: BlockKind) -> BlockLayout {
        let style = self.styles.get(kind);
        let mut layout = BlockLayout {
            space_before_pt: style.space_before_pt,
            space_after_pt: style.space_after_pt,
            line_spacing: style.line_spacing,
            font_size: style.font_size.unwrap_or(self.base_font_size),
            bold: style.bold,
            color: style.color,
            keep_with_next: kind.is_heading_like(),
            keep_together: matches!(kind, BlockKind::Bullet | BlockKind::LeftRight),
            ..BlockLayout::default()
        };

        match kind {
            BlockKind::HeaderName | BlockKind::HeaderContact => {
                layout.alignment = HorizontalAlignment::Center;
            }
            BlockKind::Bullet => {
                layout.indent_left_mm = self.bullet_indent_mm;
                layout.first_line_indent_mm = -self.bullet_hang_mm;
            }
            BlockKind::Divider => {
                layout.keep_with_next = true;
            }
            _ => {}
        }

        layout
    }
}
