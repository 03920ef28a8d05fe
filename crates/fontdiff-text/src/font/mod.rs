//! Fonts and font collections.
//!
//! The layout core only talks to fonts through the [`Font`] and
//! [`FontCollection`] traits. [`FontFace`] and [`FontSet`] implement them on
//! top of real font files.

pub mod face;
pub mod loader;
pub mod metrics;

pub use face::FontFace;
pub use loader::FontSet;
pub use metrics::{FontMetrics, ScaledFontMetrics};

use core::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::raster::GlyphMask;
use crate::shaping::{ShapeOutput, ShapeRequest};
use crate::style::Style;

/// Glyph index within a font.
pub type GlyphId = u16;

/// A font able to cover, shape and rasterize text.
pub trait Font: fmt::Debug {
    /// Human readable name used in diagnostics.
    fn name(&self) -> &str;

    /// True if the font has a glyph for `ch`.
    fn covers(&self, ch: char) -> bool;

    /// Shape `request.text[request.range]` with this font.
    ///
    /// Glyph clusters in the output are absolute byte offsets into
    /// `request.text`.
    fn shape(&self, request: &ShapeRequest<'_>) -> ShapeOutput;

    /// Coverage mask for `glyph_id` at `font_size` pixels per em.
    fn glyph_mask(&self, glyph_id: GlyphId, font_size: f32) -> Option<Arc<GlyphMask>>;
}

/// Shared handle to a font.
pub type FontHandle = Arc<dyn Font>;

/// True if both handles refer to the same font object.
pub fn same_font(a: &FontHandle, b: &FontHandle) -> bool {
    core::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Resolves the font used for each character of styled text.
pub trait FontCollection {
    /// Find a font that renders `ch` under `style`.
    ///
    /// `previous` is the font chosen for the preceding character; returning it
    /// when it covers `ch` keeps segments long. `None` means no font in the
    /// collection can render the character.
    fn find_font(
        &self,
        ch: char,
        style: &Style,
        previous: Option<&FontHandle>,
    ) -> Option<FontHandle>;
}

/// Font changed between two consecutive characters.
pub(crate) fn font_changed(previous: Option<&FontHandle>, current: Option<&FontHandle>) -> bool {
    match (previous, current) {
        (Some(a), Some(b)) => !same_font(a, b),
        (None, None) => false,
        _ => true,
    }
}

/// Errors that can occur while loading fonts.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("font I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid font data")]
    InvalidFont,
    #[error("no usable font faces in {0}")]
    NoFaces(PathBuf),
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;
