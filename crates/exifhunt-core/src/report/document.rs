//! PDF reports.
//!
//! Rendering happens in two passes. [`DocumentLayout::build`] turns the
//! entries into an ordered list of [`Block`]s, generating thumbnails and
//! reading file sizes and timestamps along the way. [`DocumentLayout::write_pdf`]
//! then paints those blocks onto A4 pages with printpdf, wrapping long lines
//! and breaking pages as needed. Text is set in an embedded TrueType face (see
//! [`FontSet`]).

use chrono::{DateTime, Local};
use printpdf::{
    Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::font::FontSet;
use super::ReportOptions;
use crate::error::ReportError;
use crate::pipeline::ThumbnailGenerator;
use crate::types::MediaEntry;

pub const TITLE: &str = "EXIFHunt Report";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;

const TITLE_SIZE: f32 = 14.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

const TITLE_HEIGHT: f32 = 10.0;
const HEADING_HEIGHT: f32 = 10.0;
const LINE_HEIGHT: f32 = 6.0;

const THUMBNAIL_WIDTH: f32 = 60.0;
const THUMBNAIL_MAX_HEIGHT: f32 = 120.0;

const GAP_AFTER_THUMBNAIL: f32 = 5.0;
const GAP_AFTER_ENTRY: f32 = 10.0;

/// Average DejaVu Sans glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.6;
const MM_PER_POINT: f32 = 25.4 / 72.0;

/// One unit of PDF content, in reading order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Bold file-name heading
    Heading(String),
    /// Regular body line; wrapped when painted
    Line(String),
    /// A generated thumbnail on disk
    Thumbnail(PathBuf),
    /// Vertical space in millimetres
    Gap(f32),
}

/// The ordered content of a PDF report.
#[derive(Debug, Clone, Default)]
pub struct DocumentLayout {
    blocks: Vec<Block>,
}

impl DocumentLayout {
    /// Lay out one section per entry, in order.
    ///
    /// Thumbnails are written through `thumbnails`; when one cannot be made the
    /// section gets a placeholder line carrying the reason instead.
    pub fn build(
        entries: &[MediaEntry],
        options: &ReportOptions,
        thumbnails: &ThumbnailGenerator,
    ) -> Self {
        let mut layout = Self::default();
        for entry in entries {
            layout.push_section(entry, options, thumbnails);
        }
        layout
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Thumbnail files referenced by this layout, in order.
    pub fn thumbnails(&self) -> Vec<PathBuf> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Thumbnail(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn push_section(
        &mut self,
        entry: &MediaEntry,
        options: &ReportOptions,
        thumbnails: &ThumbnailGenerator,
    ) {
        self.blocks.push(Block::Heading(entry.file_name.clone()));

        let fs_meta = std::fs::metadata(&entry.path);
        if options.include_file_size {
            let line = match &fs_meta {
                Ok(meta) => format!("File Size: {:.2} KB", meta.len() as f64 / 1024.0),
                Err(_) => "File Size: unavailable".to_string(),
            };
            self.blocks.push(Block::Line(line));
        }
        if options.include_timestamps {
            let (created, modified) = match &fs_meta {
                Ok(meta) => (
                    format_system_time(meta.created()),
                    format_system_time(meta.modified()),
                ),
                Err(_) => ("unavailable".to_string(), "unavailable".to_string()),
            };
            self.blocks.push(Block::Line(format!("Created: {created}")));
            self.blocks.push(Block::Line(format!("Modified: {modified}")));
        }

        match thumbnails.generate(&entry.path, entry.kind) {
            Ok(path) => self.blocks.push(Block::Thumbnail(path)),
            Err(e) => {
                tracing::warn!("No thumbnail for {}: {e}", entry.file_name);
                self.blocks.push(Block::Line(placeholder(&e)));
            }
        }
        self.blocks.push(Block::Gap(GAP_AFTER_THUMBNAIL));

        for line in entry.metadata_lines() {
            self.blocks.push(Block::Line(line));
        }
        self.blocks.push(Block::Gap(GAP_AFTER_ENTRY));
    }

    /// Paint the layout as a PDF and return the number of pages written.
    ///
    /// Characters `fonts` has no glyph for are written as `<U+XXXX>`.
    pub fn write_pdf<W: Write>(&self, fonts: &FontSet, writer: W) -> Result<usize, ReportError> {
        let (doc, page, layer) = PdfDocument::new(
            TITLE,
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Layer 1",
        );
        let regular = doc
            .add_external_font(fonts.regular.bytes())
            .map_err(pdf_error)?;
        let bold = doc
            .add_external_font(fonts.bold.bytes())
            .map_err(pdf_error)?;

        let (pages, replaced) = {
            let first = doc.get_page(page).get_layer(layer);
            let mut painter = Painter::start(&doc, fonts, first, regular, bold);
            for block in &self.blocks {
                painter.paint(block);
            }
            (painter.pages, painter.replaced)
        };
        if replaced > 0 {
            tracing::warn!(
                "{replaced} character(s) have no glyph in the report font and were written as <U+XXXX>; \
                 set report.font to a font that covers them"
            );
        }

        doc.save(&mut BufWriter::new(writer)).map_err(pdf_error)?;
        Ok(pages)
    }
}

/// Cursor over the current page. `cursor` is the distance from the bottom
/// edge in millimetres.
struct Painter<'a> {
    doc: &'a PdfDocumentReference,
    fonts: &'a FontSet,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
    pages: usize,
    /// Characters swapped for `<U+XXXX>` so far
    replaced: usize,
}

impl<'a> Painter<'a> {
    fn start(
        doc: &'a PdfDocumentReference,
        fonts: &'a FontSet,
        layer: PdfLayerReference,
        regular: IndirectFontRef,
        bold: IndirectFontRef,
    ) -> Self {
        let mut painter = Self {
            doc,
            fonts,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT - MARGIN,
            pages: 1,
            replaced: 0,
        };
        painter.header();
        painter
    }

    fn paint(&mut self, block: &Block) {
        match block {
            Block::Heading(text) => self.text(text, HEADING_SIZE, HEADING_HEIGHT, true),
            Block::Line(text) => self.text(text, BODY_SIZE, LINE_HEIGHT, false),
            Block::Thumbnail(path) => self.thumbnail(path),
            Block::Gap(height) => self.cursor = (self.cursor - height).max(MARGIN),
        }
    }

    fn header(&mut self) {
        let width = text_width(TITLE, TITLE_SIZE);
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.layer.use_text(
            TITLE,
            TITLE_SIZE,
            Mm(x),
            Mm(self.cursor - TITLE_HEIGHT * 0.75),
            &self.bold,
        );
        self.cursor -= TITLE_HEIGHT + 5.0;
    }

    /// Break to a new page unless `height` more millimetres fit on this one.
    fn reserve(&mut self, height: f32) {
        if self.cursor - height >= MARGIN {
            return;
        }
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT - MARGIN;
        self.pages += 1;
        self.header();
    }

    fn text(&mut self, text: &str, size: f32, line_height: f32, bold: bool) {
        let fonts = self.fonts;
        let face = if bold { &fonts.bold } else { &fonts.regular };
        let (text, replaced) = face.printable(text);
        self.replaced += replaced;
        for line in wrap(&text, chars_per_line(size)) {
            self.reserve(line_height);
            let font = if bold { &self.bold } else { &self.regular };
            self.layer.use_text(
                line,
                size,
                Mm(MARGIN),
                Mm(self.cursor - line_height * 0.75),
                font,
            );
            self.cursor -= line_height;
        }
    }

    fn thumbnail(&mut self, path: &Path) {
        let (image, width_px, height_px) = match load_pdf_image(path) {
            Ok(loaded) => loaded,
            Err(reason) => {
                self.text(&placeholder(&reason), BODY_SIZE, LINE_HEIGHT, false);
                return;
            }
        };

        let mut width = THUMBNAIL_WIDTH;
        let mut height = width * height_px as f32 / width_px as f32;
        if height > THUMBNAIL_MAX_HEIGHT {
            width *= THUMBNAIL_MAX_HEIGHT / height;
            height = THUMBNAIL_MAX_HEIGHT;
        }

        self.reserve(height);
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN)),
                translate_y: Some(Mm(self.cursor - height)),
                dpi: Some(width_px as f32 * 25.4 / width),
                ..Default::default()
            },
        );
        self.cursor -= height;
    }
}

/// Decode a thumbnail from disk into printpdf's image type.
fn load_pdf_image(path: &Path) -> Result<(Image, u32, u32), String> {
    let rgb = image::open(path).map_err(|e| e.to_string())?.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err("empty image".to_string());
    }
    let buffer = printpdf::image_crate::RgbImage::from_raw(width, height, rgb.into_raw())
        .ok_or_else(|| "pixel buffer size mismatch".to_string())?;
    let image = Image::from_dynamic_image(&printpdf::image_crate::DynamicImage::ImageRgb8(buffer));
    Ok((image, width, height))
}

fn placeholder(reason: &impl std::fmt::Display) -> String {
    format!("[Thumbnail not available: {reason}]")
}

fn format_system_time(time: std::io::Result<SystemTime>) -> String {
    match time {
        Ok(t) => DateTime::<Local>::from(t)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Err(_) => "unavailable".to_string(),
    }
}

fn pdf_error(e: printpdf::Error) -> ReportError {
    ReportError::Pdf(format!("{e:?}"))
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_WIDTH * MM_PER_POINT
}

fn chars_per_line(size: f32) -> usize {
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    ((usable / (size * AVG_GLYPH_WIDTH * MM_PER_POINT)) as usize).max(1)
}

/// Greedy word wrap to at most `width` characters per line. Words longer than
/// a line are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split(' ') {
        let mut chars: Vec<char> = word.chars().collect();
        let needed = if current_len == 0 {
            chars.len()
        } else {
            current_len + 1 + chars.len()
        };

        if needed <= width {
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars.iter());
            current_len += chars.len();
            continue;
        }

        if current_len > 0 {
            lines.push(std::mem::take(&mut current));
        }
        while chars.len() > width {
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        current = chars.iter().collect();
        current_len = chars.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}
