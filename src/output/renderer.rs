//! PDF rendering of laid-out pages with printpdf's built-in fonts

use crate::error::{Result, ResumeBuilderError};
use crate::output::layout::{layout, PageGeometry, PageLayout};
use crate::output::metrics::FontFace;
use crate::processing::blocks::ContentBlock;
use crate::processing::markup::Color;
use log::debug;
use printpdf::{BuiltinFont, Color as PdfColor, IndirectFontRef, Mm, PdfDocument, Rgb};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// The rating glyph's code in the dingbat font's built-in encoding
const DINGBAT_STAR: char = 'H';

const MM_PER_PT: f32 = 25.4 / 72.0;

fn mm(points: f32) -> Mm {
    Mm(points * MM_PER_PT)
}

fn render_error(context: &str, err: impl std::fmt::Display) -> ResumeBuilderError {
    ResumeBuilderError::Render(format!("{}: {}", context, err))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    symbol: IndirectFontRef,
}

impl Fonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::Regular => &self.regular,
            FontFace::Bold => &self.bold,
            FontFace::Symbol => &self.symbol,
        }
    }
}

pub struct PdfRenderer {
    title: String,
    geometry: PageGeometry,
}

impl PdfRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            geometry: PageGeometry::a4(),
        }
    }

    /// Lay out and serialise `blocks`. Either the whole document is produced or an error.
    pub fn render(&self, blocks: &[ContentBlock]) -> Result<Vec<u8>> {
        let pages = layout(blocks, &self.geometry)?;
        debug!("Laid out {} blocks on {} page(s)", blocks.len(), pages.len());

        let width = mm(self.geometry.width);
        let height = mm(self.geometry.height);
        let (doc, first_page, first_layer) =
            PdfDocument::new(self.title.as_str(), width, height, "Layer 1");

        let fonts = Fonts {
            regular: doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| render_error("Failed to load Helvetica", e))?,
            bold: doc
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| render_error("Failed to load Helvetica-Bold", e))?,
            symbol: doc
                .add_builtin_font(BuiltinFont::ZapfDingbats)
                .map_err(|e| render_error("Failed to load ZapfDingbats", e))?,
        };

        for (index, page) in pages.iter().enumerate() {
            let (page_index, layer_index) = if index == 0 {
                (first_page, first_layer)
            } else {
                doc.add_page(width, height, "Layer 1")
            };
            let layer = doc.get_page(page_index).get_layer(layer_index);
            emit_page(&layer, page, &fonts);
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|e| render_error("Failed to serialise PDF", e))?;
        debug!("Rendered PDF of {} bytes", bytes.len());
        Ok(bytes)
    }
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new("Resume")
    }
}

fn pdf_color(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(color.r, color.g, color.b, None))
}

fn emit_page(layer: &printpdf::PdfLayerReference, page: &PageLayout, fonts: &Fonts) {
    for fragment in &page.fragments {
        let text: String = match fragment.face {
            FontFace::Symbol => fragment.text.chars().map(|_| DINGBAT_STAR).collect(),
            _ => fragment.text.clone(),
        };
        layer.set_fill_color(pdf_color(fragment.color));
        layer.use_text(
            text,
            fragment.font_size,
            mm(fragment.x),
            mm(fragment.y),
            fonts.get(fragment.face),
        );
    }
}
