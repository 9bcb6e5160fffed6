//! PDF backend built on `genpdf`.
//!
//! [`PdfWriter`] loads the font family named by the document, builds a `genpdf::Document` with
//! the document's paper size and margins, and renders every block through a [`FlowLayout`] so the
//! keep-together and keep-with-next flags survive pagination.

pub mod builder;
pub mod elements;
pub mod flow;

use std::io::Write;

use genpdf::fonts::{FontData, FontFamily};
use genpdf::Mm;
use log::debug;

#[cfg(feature = "hyphenation")]
use genpdf::hyphenation;

use crate::document::OutputDocument;
use crate::error::{RenderError, Result};
use crate::fonts;
use crate::writer::DocumentWriter;

pub use builder::{DocumentBuilder, PageCounter};
pub use elements::BlockElement;
pub use flow::FlowLayout;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

pub(crate) fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Writes documents as PDF.
#[derive(Default)]
pub struct PdfWriter {
    font_family: Option<FontFamily<FontData>>,
    #[cfg(feature = "hyphenation")]
    hyphenator: Option<hyphenation::Standard>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an already loaded font family instead of looking one up for every document.
    pub fn with_font_family(mut self, font_family: FontFamily<FontData>) -> Self {
        self.font_family = Some(font_family);
        self
    }

    /// Enables hyphenation of wrapped body text.
    #[cfg(feature = "hyphenation")]
    pub fn with_hyphenator(mut self, hyphenator: hyphenation::Standard) -> Self {
        self.hyphenator = Some(hyphenator);
        self
    }

    fn load_fonts(&self, document: &OutputDocument) -> Result<FontFamily<FontData>> {
        match &self.font_family {
            Some(family) => Ok(family.clone()),
            None => fonts::font_family(document.font_family()).map_err(RenderError::FontLoad),
        }
    }

    /// Builds the `genpdf` document without rendering it.
    pub fn build(&self, document: &OutputDocument) -> Result<genpdf::Document> {
        self.build_counted(document, PageCounter::new())
    }

    fn build_counted(
        &self,
        document: &OutputDocument,
        pages: PageCounter,
    ) -> Result<genpdf::Document> {
        let font_family = self.load_fonts(document)?;

        let mut builder = DocumentBuilder::new()
            .with_page_counter(pages)
            .with_paper(document.paper())
            .with_margins(document.margins())
            .with_font_size(document.base_font_size());
        if let Some(title) = document.title() {
            builder = builder.with_title(title);
        }
        #[cfg(feature = "hyphenation")]
        if let Some(hyphenator) = &self.hyphenator {
            builder = builder.with_hyphenator(hyphenator.clone());
        }

        let mut pdf = builder.build(font_family);
        let blocks = document
            .blocks()
            .iter()
            .map(|block| BlockElement::new(block, document.bullet_glyph()))
            .collect();
        pdf.push(FlowLayout::new(blocks));
        Ok(pdf)
    }

    /// Renders `document` to `sink` and returns the number of pages written.
    pub fn write_pages(&self, document: &OutputDocument, sink: &mut dyn Write) -> Result<usize> {
        let pages = PageCounter::new();
        let pdf = self.build_counted(document, pages.clone())?;
        debug!("rendering {} blocks to PDF", document.blocks().len());
        pdf.render(sink).map_err(RenderError::Pdf)?;
        debug!("rendered {} page(s)", pages.pages());
        Ok(pages.pages())
    }
}

impl DocumentWriter for PdfWriter {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn write(&self, document: &OutputDocument, sink: &mut dyn Write) -> Result<()> {
        self.write_pages(document, sink).map(|_| ())
    }
}
