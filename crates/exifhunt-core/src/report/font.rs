//! TrueType faces embedded in PDF reports.
//!
//! printpdf drops every character its font has no glyph for, so text goes
//! through [`Typeface::printable`] first and uncovered characters are written
//! as a visible `<U+XXXX>` marker instead.

use owned_ttf_parser::{AsFaceRef, OwnedFace};
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::Path;

use crate::error::ReportError;

const DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const DEJAVU_SANS_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// A parsed font file.
pub struct Typeface {
    face: OwnedFace,
}

impl Typeface {
    fn parse(data: Vec<u8>) -> Result<Self, owned_ttf_parser::FaceParsingError> {
        OwnedFace::from_vec(data, 0).map(|face| Self { face })
    }

    /// Load a TrueType or OpenType file from disk.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let font_error = |message: String| ReportError::Font {
            path: path.to_path_buf(),
            message,
        };
        let data = std::fs::read(path).map_err(|e| font_error(e.to_string()))?;
        Self::parse(data).map_err(|e| font_error(e.to_string()))
    }

    /// Raw font file, as embedded in the PDF.
    pub fn bytes(&self) -> &[u8] {
        self.face.as_slice()
    }

    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face.as_face_ref().glyph_index(c).map(|id| id.0)
    }

    pub fn covers(&self, c: char) -> bool {
        self.glyph_id(c).is_some()
    }

    /// Return `text` with every uncovered character replaced by `<U+XXXX>`,
    /// and how many were replaced.
    pub fn printable<'t>(&self, text: &'t str) -> (Cow<'t, str>, usize) {
        if text.chars().all(|c| self.covers(c)) {
            return (Cow::Borrowed(text), 0);
        }
        let mut out = String::with_capacity(text.len() + 8);
        let mut replaced = 0;
        for c in text.chars() {
            if self.covers(c) {
                out.push(c);
            } else {
                let _ = write!(out, "<U+{:04X}>", c as u32);
                replaced += 1;
            }
        }
        (Cow::Owned(out), replaced)
    }
}

/// Body and heading faces for one document.
pub struct FontSet {
    pub regular: Typeface,
    pub bold: Typeface,
}

impl FontSet {
    /// DejaVu Sans, shipped with the crate. Covers Latin, Greek, Cyrillic and
    /// most symbols, but no CJK.
    pub fn bundled() -> Result<Self, ReportError> {
        let parse = |data: &[u8]| {
            Typeface::parse(data.to_vec())
                .map_err(|e| ReportError::Pdf(format!("bundled font is unreadable: {e}")))
        };
        Ok(Self {
            regular: parse(DEJAVU_SANS)?,
            bold: parse(DEJAVU_SANS_BOLD)?,
        })
    }

    /// One user-supplied file for both body and headings.
    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        Ok(Self {
            regular: Typeface::load(path)?,
            bold: Typeface::load(path)?,
        })
    }

    /// The configured font if there is one, otherwise the bundled faces.
    pub fn select(font: Option<&Path>) -> Result<Self, ReportError> {
        match font {
            Some(path) => Self::from_file(path),
            None => Self::bundled(),
        }
    }
}
