//! fontdiff-text: paragraph layout and visual line comparison for two
//! versions of a font.
//!
//! - `font`: font traits, font files through swash and fontdb
//! - `shaping`: shaped runs, harfrust shaping
//! - `bidi`: paragraph direction, logical and visual level runs
//! - `layout`: paragraphs, line breaking, lines and the line differ
//! - `document`: pagination of finished lines

pub mod bidi;
pub mod document;
pub mod error;
pub mod font;
pub mod layout;
pub mod raster;
pub mod shaping;
pub mod style;

#[cfg(test)]
pub(crate) mod testing;

pub use document::{Document, Page, PageGeometry, Pagination, PlacedLine};
pub use error::LayoutError;
pub use font::{Font, FontCollection, FontError, FontFace, FontHandle, FontSet};
pub use layout::{
    DeltaRange, DiffOptions, LayoutOptions, Line, LineDeltas, Paragraph, PerVersion, Version,
};
pub use raster::{CoverageBitmap, GlyphMask, RasterTarget, Rect};
pub use style::{FontFeature, Language, Style};
