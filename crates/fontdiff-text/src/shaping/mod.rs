//! Shaped runs: positioned glyphs for one font, script, style and bidi
//! level.

pub mod shaped_run;
pub mod shaper;

pub use shaped_run::{ShapeOutput, ShapeRequest, ShapedGlyph, ShapedRun};
pub use shaper::TextShaper;
