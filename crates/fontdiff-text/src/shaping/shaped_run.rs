use core::ops::Range;
use std::sync::Arc;

use unicode_script::Script;

use crate::font::{FontHandle, GlyphId};
use crate::layout::Bounded;
use crate::raster::RasterTarget;
use crate::style::Style;

/// Input to a shaping engine: one segment of paragraph text.
#[derive(Debug, Clone)]
pub struct ShapeRequest<'a> {
    /// Whole paragraph text; shaping covers `range` only.
    pub text: &'a str,
    /// Byte range of the segment.
    pub range: Range<usize>,
    /// Bidi embedding level; odd levels are right-to-left.
    pub bidi_level: u8,
    pub script: Script,
    pub style: &'a Style,
}

impl ShapeRequest<'_> {
    pub fn segment(&self) -> &str {
        &self.text[self.range.clone()]
    }

    pub fn is_rtl(&self) -> bool {
        self.bidi_level & 1 == 1
    }
}

/// One positioned glyph in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: GlyphId,
    /// Byte offset into the paragraph text of the first character this glyph
    /// belongs to.
    pub cluster: usize,
    pub x_advance: f32,
    pub x_offset: f32,
    /// Vertical offset, positive upwards.
    pub y_offset: f32,
}

/// Output of a shaping engine, glyphs in visual order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeOutput {
    pub glyphs: Vec<ShapedGlyph>,
    pub ascender: f32,
    /// Non-positive offset of the lowest extent below the baseline.
    pub descender: f32,
}

/// A run of text shaped with a single font, script, style and bidi level.
///
/// Immutable once created.
#[derive(Debug, Clone)]
pub struct ShapedRun {
    text_range: Range<usize>,
    bidi_level: u8,
    script: Script,
    font: FontHandle,
    style: Arc<Style>,
    glyphs: Vec<ShapedGlyph>,
    ascender: f32,
    descender: f32,
}

impl ShapedRun {
    /// Shape `text[range]` with `font`.
    pub fn shape(
        text: &str,
        range: Range<usize>,
        bidi_level: u8,
        script: Script,
        font: FontHandle,
        style: Arc<Style>,
    ) -> Self {
        let output = font.shape(&ShapeRequest {
            text,
            range: range.clone(),
            bidi_level,
            script,
            style: &style,
        });
        Self {
            text_range: range,
            bidi_level,
            script,
            font,
            style,
            glyphs: output.glyphs,
            ascender: output.ascender.max(0.0),
            descender: output.descender.min(0.0),
        }
    }

    pub fn start(&self) -> usize {
        self.text_range.start
    }

    pub fn limit(&self) -> usize {
        self.text_range.end
    }

    pub fn text_range(&self) -> Range<usize> {
        self.text_range.clone()
    }

    pub fn bidi_level(&self) -> u8 {
        self.bidi_level
    }

    pub fn is_rtl(&self) -> bool {
        self.bidi_level & 1 == 1
    }

    pub fn script(&self) -> Script {
        self.script
    }

    pub fn font(&self) -> &FontHandle {
        &self.font
    }

    pub fn style(&self) -> &Arc<Style> {
        &self.style
    }

    pub fn glyphs(&self) -> &[ShapedGlyph] {
        &self.glyphs
    }

    pub fn ascender(&self) -> f32 {
        self.ascender
    }

    pub fn descender(&self) -> f32 {
        self.descender
    }

    /// Clamp `range` to the text covered by this run.
    pub fn clamp(&self, range: Range<usize>) -> Range<usize> {
        range.start.max(self.text_range.start)..range.end.min(self.text_range.end)
    }

    /// True if this run shares at least one character with `range`.
    pub fn is_covering(&self, range: Range<usize>) -> bool {
        range.start < self.text_range.end && range.end > self.text_range.start
    }

    /// Advance of the glyphs whose cluster lies in `range`.
    pub fn x_advance(&self, range: Range<usize>) -> f32 {
        let range = self.clamp(range);
        if range.start >= range.end {
            return 0.0;
        }
        self.glyphs_in(range).map(|g| g.x_advance).sum()
    }

    fn glyphs_in(&self, range: Range<usize>) -> impl Iterator<Item = &ShapedGlyph> {
        self.glyphs
            .iter()
            .filter(move |g| range.contains(&g.cluster))
    }

    /// Paint the glyphs of `range` with the pen starting at `x` on the
    /// baseline `baseline_y`. Coordinates are in line pixels and get
    /// multiplied by `scale` on the target.
    pub fn render(
        &self,
        range: Range<usize>,
        target: &mut dyn RasterTarget,
        x: f32,
        baseline_y: f32,
        scale: f32,
    ) {
        let range = self.clamp(range);
        if range.start >= range.end {
            return;
        }
        let size = self.style.font_size * scale;
        let mut pen_x = x;
        for glyph in self.glyphs_in(range) {
            if let Some(mask) = self.font.glyph_mask(glyph.glyph_id, size) {
                let origin_x = ((pen_x + glyph.x_offset) * scale).round() as i32;
                let origin_y = ((baseline_y - glyph.y_offset) * scale).round() as i32;
                target.draw_mask(&mask, origin_x, origin_y);
            }
            pen_x += glyph.x_advance;
        }
    }
}

impl Bounded for ShapedRun {
    fn limit(&self) -> usize {
        self.text_range.end
    }
}
