//! Vertical flow of block elements that honours keep-together and keep-with-next.

use genpdf::error::Error;
use genpdf::style::Style;
use genpdf::{render, Context, Element, Position, RenderResult};
use log::trace;

use super::elements::BlockElement;
use super::mm_to_f64;

/// Height figures of one block as used by the keep rules, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockMetrics {
    pub full_height: f64,
    pub first_line_height: f64,
    pub keep_together: bool,
    pub keep_with_next: bool,
}

/// Height that has to fit on the current page before the block at `start` may begin.
///
/// Blocks flagged keep-with-next pull in their successor; the chain ends in the first line of the
/// last block, or in all of it when that block is keep-together.
pub fn required_height(metrics: &[BlockMetrics], start: usize) -> f64 {
    let mut total = 0.0;
    let mut index = start;
    while let Some(block) = metrics.get(index) {
        if block.keep_with_next && index + 1 < metrics.len() {
            total += block.full_height;
            index += 1;
            continue;
        }
        total += if block.keep_together {
            block.full_height
        } else {
            block.first_line_height
        };
        break;
    }
    total
}

/// Root element of a rendered resume.
pub struct FlowLayout {
    blocks: Vec<BlockElement>,
    next: usize,
}

impl FlowLayout {
    pub fn new(blocks: Vec<BlockElement>) -> Self {
        Self { blocks, next: 0 }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    fn metrics(&self, context: &Context, width: f64, style: Style) -> Vec<BlockMetrics> {
        let mut metrics = Vec::new();
        for block in &self.blocks[self.next..] {
            let layout = block.layout();
            metrics.push(BlockMetrics {
                full_height: block.full_height(context, width, style),
                first_line_height: block.first_line_height(context, style),
                keep_together: layout.keep_together,
                keep_with_next: layout.keep_with_next,
            });
            if !layout.keep_with_next {
                break;
            }
        }
        metrics
    }
}

impl Element for FlowLayout {
    fn render(
        &mut self,
        context: &Context,
        mut area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        let mut result = RenderResult::default();
        let mut at_page_top = true;

        while self.next < self.blocks.len() {
            if !self.blocks[self.next].is_started() {
                if at_page_top {
                    self.blocks[self.next].suppress_space_before();
                } else {
                    let width = mm_to_f64(area.size().width);
                    let required = required_height(&self.metrics(context, width, style), 0);
                    let remaining = mm_to_f64(area.size().height);
                    if required > remaining {
                        trace!(
                            "moving {:?} block {} to the next page ({:.1}mm needed, {:.1}mm left)",
                            self.blocks[self.next].kind(),
                            self.next,
                            required,
                            remaining
                        );
                        result.has_more = true;
                        return Ok(result);
                    }
                }
            }

            let block = self.blocks[self.next].render(context, area.clone(), style)?;
            result.size = result.size.stack_vertical(block.size);
            area.add_offset(Position::new(0, block.size.height));
            if block.has_more {
                result.has_more = true;
                return Ok(result);
            }

            at_page_top = false;
            self.next += 1;
        }

        Ok(result)
    }
}
