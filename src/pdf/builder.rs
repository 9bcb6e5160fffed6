//! Construction of the `genpdf::Document` a resume is rendered into.

use std::cell::Cell;
use std::rc::Rc;

use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use genpdf::style;
use genpdf::{self, Margins, PageDecorator, Size};
use log::debug;

#[cfg(feature = "hyphenation")]
use genpdf::hyphenation;

use crate::document::{PageMargins, PaperSize};

use super::mm_from_f64;

/// Number of pages started while a document renders.
///
/// Clones share the count, so a copy kept by the caller reads what the page decorator recorded.
#[derive(Clone, Debug, Default)]
pub struct PageCounter(Rc<Cell<usize>>);

impl PageCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> usize {
        self.0.get()
    }

    fn start_page(&self) -> usize {
        let page = self.0.get() + 1;
        self.0.set(page);
        page
    }
}

/// Builder for `genpdf::Document` instances sized and margined for a resume.
#[derive(Default)]
pub struct DocumentBuilder {
    title: Option<String>,
    paper_size: Option<Size>,
    margins: Option<Margins>,
    font_size: Option<u8>,
    page_counter: PageCounter,
    #[cfg(feature = "hyphenation")]
    hyphenator: Option<hyphenation::Standard>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the paper size used for every page.
    pub fn with_paper(mut self, paper: PaperSize) -> Self {
        let (width, height) = paper.dimensions_mm();
        self.paper_size = Some(Size::new(mm_from_f64(width), mm_from_f64(height)));
        self
    }

    /// Sets the page margins applied through the page decorator.
    pub fn with_margins(mut self, margins: PageMargins) -> Self {
        self.margins = Some(Margins::trbl(
            mm_from_f64(margins.top),
            mm_from_f64(margins.right),
            mm_from_f64(margins.bottom),
            mm_from_f64(margins.left),
        ));
        self
    }

    /// Sets the base font size in points.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Records started pages in `counter`.
    pub fn with_page_counter(mut self, counter: PageCounter) -> Self {
        self.page_counter = counter;
        self
    }

    /// Enables hyphenation using the provided dictionary.
    #[cfg(feature = "hyphenation")]
    pub fn with_hyphenator(mut self, hyphenator: hyphenation::Standard) -> Self {
        self.hyphenator = Some(hyphenator);
        self
    }

    /// Builds the document around an already loaded font family.
    pub fn build(self, font_family: FontFamily<FontData>) -> genpdf::Document {
        let mut document = genpdf::Document::new(font_family);

        if let Some(title) = self.title {
            document.set_title(title);
        }
        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }
        if let Some(font_size) = self.font_size {
            document.set_font_size(font_size);
        }

        document.set_page_decorator(ResumePageDecorator::new(self.margins, self.page_counter));

        #[cfg(feature = "hyphenation")]
        if let Some(hyphenator) = self.hyphenator {
            document.set_hyphenator(hyphenator);
        }

        document
    }
}

/// Applies the page margins and counts the pages as they are started.
struct ResumePageDecorator {
    pages: PageCounter,
    margins: Option<Margins>,
}

impl ResumePageDecorator {
    fn new(margins: Option<Margins>, pages: PageCounter) -> Self {
        Self { pages, margins }
    }
}

impl PageDecorator for ResumePageDecorator {
    fn decorate_page<'a>(
        &mut self,
        _context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        _style: style::Style,
    ) -> Result<genpdf::render::Area<'a>, Error> {
        let page = self.pages.start_page();
        debug!("starting page {}", page);

        if let Some(margins) = self.margins {
            area.add_margins(margins);
        }

        Ok(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_counter_clones_share_the_count() {
        let counter = PageCounter::new();
        let shared = counter.clone();
        assert_eq!(shared.start_page(), 1);
        assert_eq!(shared.start_page(), 2);
        assert_eq!(counter.pages(), 2);
    }
}
