//! `genpdf` elements for the blocks of an [`OutputDocument`](crate::document::OutputDocument).
//!
//! `genpdf` ships paragraphs but no hanging indents, two-sided rows or keep rules, so every
//! block is wrapped in a [`BlockElement`] that renders its body with the upstream primitives and
//! can estimate its own height for the [`FlowLayout`](super::flow::FlowLayout).

use genpdf::elements::Paragraph;
use genpdf::error::Error;
use genpdf::style::{Color, Style, StyledString};
use genpdf::{render, Alignment, Context, Element, Margins, Position, RenderResult, Size};

use crate::document::{Block, BlockContent, BlockKind, BlockLayout, HorizontalAlignment, Rgb};
use crate::richtext::{self, StyledRun};

use super::{mm_from_f64, mm_to_f64};

const MM_PER_POINT: f64 = 25.4 / 72.0;
const RULE_GREY: u8 = 150;
const MIN_RIGHT_GAP_MM: f64 = 3.0;
/// Share of the text width the left group keeps when the right group sits beside it.
const MIN_LEFT_SHARE: f64 = 0.5;

fn alignment(value: HorizontalAlignment) -> Alignment {
    match value {
        HorizontalAlignment::Left | HorizontalAlignment::Justified => Alignment::Left,
        HorizontalAlignment::Center => Alignment::Center,
        HorizontalAlignment::Right => Alignment::Right,
    }
}

fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn paragraph(runs: &[StyledRun], align: Alignment) -> Paragraph {
    let mut paragraph = Paragraph::default();
    for string in richtext::runs_to_styled_strings(runs, Style::new()) {
        paragraph.push(string);
    }
    paragraph.set_alignment(align);
    paragraph
}

fn styled_strings(runs: &[StyledRun], style: Style) -> Vec<StyledString> {
    runs.iter()
        .map(|run| {
            let mut string = run.to_styled_string(Style::new());
            string.style = style.and(string.style);
            string
        })
        .collect()
}

fn total_width(strings: &[StyledString], context: &Context) -> f64 {
    strings
        .iter()
        .map(|string| mm_to_f64(string.width(&context.font_cache)))
        .sum()
}

/// Where the right group of a left/right row goes.
#[derive(Clone, Copy, Debug, PartialEq)]
enum RightPlacement {
    /// Top line, flush right; the left group wraps in the remaining column.
    Beside,
    /// Own line, flush right, after the wrapped left group.
    Below,
}

fn right_placement(text_width: f64, left_width: f64, right_width: f64) -> RightPlacement {
    if right_width <= 0.0 || left_width + MIN_RIGHT_GAP_MM + right_width <= text_width {
        return RightPlacement::Beside;
    }
    if text_width - right_width - MIN_RIGHT_GAP_MM >= text_width * MIN_LEFT_SHARE {
        RightPlacement::Beside
    } else {
        RightPlacement::Below
    }
}

/// Width reserved at the right edge for the right group.
fn right_reserve(placement: RightPlacement, right_width: f64) -> f64 {
    match placement {
        RightPlacement::Beside if right_width > 0.0 => right_width + MIN_RIGHT_GAP_MM,
        _ => 0.0,
    }
}

/// Prints `strings` on one line at `x`; returns `false` if the area has no room left.
fn print_line(
    context: &Context,
    area: &render::Area<'_>,
    style: Style,
    x: f64,
    strings: &[StyledString],
) -> Result<bool, Error> {
    match area.text_section(&context.font_cache, Position::new(mm_from_f64(x), 0), style) {
        Some(mut section) => {
            for string in strings {
                section.print_str(&string.s, string.style)?;
            }
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Greedy line count for `runs` wrapped to `width` millimetres.
fn estimate_lines(runs: &[StyledRun], style: Style, context: &Context, width: f64) -> usize {
    let space = mm_to_f64(StyledString::new(" ", style).width(&context.font_cache));
    let mut lines = 1;
    let mut line_width = 0.0;

    for run in runs {
        let mut run_style = style;
        if run.bold {
            run_style.set_bold();
        }
        for word in run.text.split_whitespace() {
            let word = StyledString::new(word, run_style);
            let word_width = mm_to_f64(word.width(&context.font_cache));
            if line_width > 0.0 && line_width + space + word_width > width {
                lines += 1;
                line_width = word_width;
            } else if line_width > 0.0 {
                line_width += space + word_width;
            } else {
                line_width = word_width;
            }
        }
    }

    lines
}

enum Body {
    Text(Paragraph),
    Bullet { paragraph: Paragraph, glyph_printed: bool },
    LeftRight {
        left: Paragraph,
        right: Vec<StyledRun>,
        placement: Option<RightPlacement>,
        right_printed: bool,
    },
    Rule,
}

/// One block of the output document, rendered with its layout attributes.
pub struct BlockElement {
    kind: BlockKind,
    layout: BlockLayout,
    runs: Vec<StyledRun>,
    body: Body,
    bullet_glyph: String,
    started: bool,
    skip_space_before: bool,
}

impl BlockElement {
    /// Prepares `block` for rendering; bullets are prefixed with `bullet_glyph`.
    pub fn new(block: &Block, bullet_glyph: &str) -> Self {
        let layout = block.layout().clone();
        let align = alignment(layout.alignment);
        let (runs, body) = match block.content() {
            BlockContent::Runs(runs) if block.kind() == BlockKind::Bullet => (
                runs.clone(),
                Body::Bullet {
                    paragraph: paragraph(runs, Alignment::Left),
                    glyph_printed: false,
                },
            ),
            BlockContent::Runs(runs) => (runs.clone(), Body::Text(paragraph(runs, align))),
            BlockContent::LeftRight { left, right } => (
                left.clone(),
                Body::LeftRight {
                    left: paragraph(left, Alignment::Left),
                    right: right.clone(),
                    placement: None,
                    right_printed: false,
                },
            ),
            BlockContent::Rule => (Vec::new(), Body::Rule),
        };

        Self {
            kind: block.kind(),
            layout,
            runs,
            body,
            bullet_glyph: bullet_glyph.to_owned(),
            started: false,
            skip_space_before: false,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    /// Whether any part of the block has been rendered.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Drops the leading space, used when the block opens a page.
    pub fn suppress_space_before(&mut self) {
        self.skip_space_before = true;
    }

    fn text_style(&self, style: Style) -> Style {
        let mut block_style = Style::new()
            .with_font_size(self.layout.font_size)
            .with_line_spacing(self.layout.line_spacing);
        if self.layout.bold {
            block_style.set_bold();
        }
        if let Some(rgb) = self.layout.color {
            block_style = block_style.with_color(color(rgb));
        }
        style.and(block_style)
    }

    fn space_before(&self) -> f64 {
        if self.skip_space_before {
            0.0
        } else {
            self.layout.space_before_pt * MM_PER_POINT
        }
    }

    fn space_after(&self) -> f64 {
        self.layout.space_after_pt * MM_PER_POINT
    }

    fn line_height(&self, context: &Context, style: Style) -> f64 {
        mm_to_f64(self.text_style(style).line_height(&context.font_cache))
    }

    fn body_lines(&self, context: &Context, width: f64, style: Style) -> usize {
        let style = self.text_style(style);
        let text_width = (width - self.layout.indent_left_mm).max(1.0);
        match &self.body {
            Body::Text(_) | Body::Bullet { .. } => {
                estimate_lines(&self.runs, style, context, text_width)
            }
            Body::LeftRight { right, .. } => {
                let left_width = total_width(&styled_strings(&self.runs, style), context);
                let right_width = total_width(&styled_strings(right, style), context);
                let placement = right_placement(text_width, left_width, right_width);
                let column = text_width - right_reserve(placement, right_width);
                let left_lines = estimate_lines(&self.runs, style, context, column.max(1.0));
                match placement {
                    RightPlacement::Beside => left_lines,
                    RightPlacement::Below => left_lines + 1,
                }
            }
            Body::Rule => 0,
        }
    }

    /// Estimated height of the whole block in millimetres.
    pub fn full_height(&self, context: &Context, width: f64, style: Style) -> f64 {
        let lines = self.body_lines(context, width, style) as f64;
        self.space_before() + lines * self.line_height(context, style) + self.space_after()
    }

    /// Estimated height up to and including the first line of the block.
    pub fn first_line_height(&self, context: &Context, style: Style) -> f64 {
        match self.body {
            Body::Rule => self.space_before() + self.space_after(),
            _ => self.space_before() + self.line_height(context, style),
        }
    }
}

impl Element for BlockElement {
    fn render(
        &mut self,
        context: &Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let text_style = self.text_style(style);
        let mut result = RenderResult::default();

        if !self.started {
            let before = self.space_before().min(mm_to_f64(area.size().height)).max(0.0);
            if before > 0.0 {
                area.add_offset(Position::new(0, mm_from_f64(before)));
                result.size = result.size.stack_vertical(Size::new(0, mm_from_f64(before)));
            }
            self.started = true;
        }

        let indent = self.layout.indent_left_mm.max(0.0);
        let width = area.size().width;

        match &mut self.body {
            Body::Text(paragraph) => {
                area.add_margins(Margins::trbl(0, 0, 0, mm_from_f64(indent)));
                let body = paragraph.render(context, area.clone(), text_style)?;
                result.size = result.size.stack_vertical(body.size);
                area.add_offset(Position::new(0, body.size.height));
                if body.has_more {
                    result.has_more = true;
                    return Ok(result);
                }
            }
            Body::Bullet {
                paragraph,
                glyph_printed,
            } => {
                if !*glyph_printed {
                    if text_style.line_height(&context.font_cache) > area.size().height {
                        result.has_more = true;
                        return Ok(result);
                    }
                    let glyph_x = (indent + self.layout.first_line_indent_mm).max(0.0);
                    match area.text_section(
                        &context.font_cache,
                        Position::new(mm_from_f64(glyph_x), 0),
                        text_style,
                    ) {
                        Some(mut section) => section.print_str(&self.bullet_glyph, text_style)?,
                        None => {
                            result.has_more = true;
                            return Ok(result);
                        }
                    }
                    *glyph_printed = true;
                }

                let mut text_area = area.clone();
                text_area.add_margins(Margins::trbl(0, 0, 0, mm_from_f64(indent)));
                let body = paragraph.render(context, text_area, text_style)?;
                result.size = result.size.stack_vertical(body.size);
                area.add_offset(Position::new(0, body.size.height));
                if body.has_more {
                    result.has_more = true;
                    return Ok(result);
                }
            }
            Body::LeftRight {
                left,
                right,
                placement,
                right_printed,
            } => {
                let line_height = text_style.line_height(&context.font_cache);
                let right = styled_strings(right, text_style);
                let right_width = total_width(&right, context);
                let text_width = mm_to_f64(width) - indent;
                let placement = *placement.get_or_insert_with(|| {
                    let left_width = total_width(&styled_strings(&self.runs, text_style), context);
                    right_placement(text_width, left_width, right_width)
                });
                let right_x = (mm_to_f64(width) - right_width).max(indent);

                let mut printed_beside = false;
                if placement == RightPlacement::Beside && !*right_printed {
                    if line_height > area.size().height
                        || !print_line(context, &area, text_style, right_x, &right)?
                    {
                        result.has_more = true;
                        return Ok(result);
                    }
                    *right_printed = true;
                    printed_beside = true;
                }

                let mut left_area = area.clone();
                left_area.add_margins(Margins::trbl(
                    0,
                    mm_from_f64(right_reserve(placement, right_width)),
                    0,
                    mm_from_f64(indent),
                ));
                let body = left.render(context, left_area, text_style)?;
                let mut height = body.size.height;
                if printed_beside && height < line_height {
                    height = line_height;
                }
                result.size = result.size.stack_vertical(Size::new(width, height));
                area.add_offset(Position::new(0, height));
                if body.has_more {
                    result.has_more = true;
                    return Ok(result);
                }

                if placement == RightPlacement::Below && !*right_printed {
                    if line_height > area.size().height
                        || !print_line(context, &area, text_style, right_x, &right)?
                    {
                        result.has_more = true;
                        return Ok(result);
                    }
                    *right_printed = true;
                    result.size = result.size.stack_vertical(Size::new(width, line_height));
                    area.add_offset(Position::new(0, line_height));
                }
            }
            Body::Rule => {
                let line_style = Style::new().with_color(
                    self.layout
                        .color
                        .map(color)
                        .unwrap_or(Color::Greyscale(RULE_GREY)),
                );
                area.draw_line(
                    vec![
                        Position::new(mm_from_f64(indent), 0),
                        Position::new(width, 0),
                    ],
                    line_style,
                );
            }
        }

        let after = self.space_after().min(mm_to_f64(area.size().height)).max(0.0);
        if after > 0.0 {
            result.size = result.size.stack_vertical(Size::new(0, mm_from_f64(after)));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_row_keeps_right_group_beside() {
        assert_eq!(right_placement(180.0, 60.0, 25.0), RightPlacement::Beside);
        assert_eq!(right_reserve(RightPlacement::Beside, 25.0), 25.0 + MIN_RIGHT_GAP_MM);
    }

    #[test]
    fn long_left_group_wraps_beside_a_short_right_group() {
        assert_eq!(right_placement(180.0, 400.0, 25.0), RightPlacement::Beside);
    }

    #[test]
    fn wide_right_group_moves_below() {
        assert_eq!(right_placement(180.0, 150.0, 100.0), RightPlacement::Below);
        assert_eq!(right_reserve(RightPlacement::Below, 100.0), 0.0);
    }

    #[test]
    fn missing_right_group_reserves_nothing() {
        assert_eq!(right_placement(180.0, 400.0, 0.0), RightPlacement::Beside);
        assert_eq!(right_reserve(RightPlacement::Beside, 0.0), 0.0);
    }
}
