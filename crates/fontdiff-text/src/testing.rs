//! Synthetic fonts for unit tests: every glyph is a solid box.

use core::ops::Range;
use std::sync::Arc;

use unicode_script::Script;

use crate::font::{Font, FontCollection, FontHandle, GlyphId};
use crate::layout::RunArena;
use crate::raster::GlyphMask;
use crate::shaping::{ShapeOutput, ShapeRequest, ShapedGlyph, ShapedRun};
use crate::style::Style;

#[derive(Debug, Clone)]
pub struct BoxFont {
    name: String,
    advance: f32,
    ascender: f32,
    descender: f32,
    /// Box height as a fraction of the font size.
    ink: f32,
    coverage: Option<String>,
}

impl BoxFont {
    pub fn new(name: &str, advance: f32) -> Self {
        Self {
            name: name.to_string(),
            advance,
            ascender: 12.0,
            descender: -4.0,
            ink: 0.5,
            coverage: None,
        }
    }

    pub fn with_extent(mut self, ascender: f32, descender: f32) -> Self {
        self.ascender = ascender;
        self.descender = descender;
        self
    }

    pub fn with_ink(mut self, ink: f32) -> Self {
        self.ink = ink;
        self
    }

    /// Restrict coverage to the characters of `chars`.
    pub fn covering(mut self, chars: &str) -> Self {
        self.coverage = Some(chars.to_string());
        self
    }

    pub fn handle(&self) -> FontHandle {
        Arc::new(self.clone())
    }
}

impl Font for BoxFont {
    fn name(&self) -> &str {
        &self.name
    }

    fn covers(&self, ch: char) -> bool {
        self.coverage.as_ref().is_none_or(|chars| chars.contains(ch))
    }

    fn shape(&self, request: &ShapeRequest<'_>) -> ShapeOutput {
        let mut glyphs: Vec<ShapedGlyph> = request
            .segment()
            .char_indices()
            .map(|(offset, ch)| ShapedGlyph {
                glyph_id: (ch as u32 & 0xffff) as GlyphId,
                cluster: request.range.start + offset,
                x_advance: self.advance,
                x_offset: 0.0,
                y_offset: 0.0,
            })
            .collect();
        if request.is_rtl() {
            glyphs.reverse();
        }
        ShapeOutput {
            glyphs,
            ascender: self.ascender,
            descender: self.descender,
        }
    }

    fn glyph_mask(&self, glyph_id: GlyphId, font_size: f32) -> Option<Arc<GlyphMask>> {
        if glyph_id == u16::from(b' ') {
            return None;
        }
        let width = (font_size * 0.5) as u32;
        let height = (font_size * self.ink) as u32;
        Some(Arc::new(GlyphMask {
            left: 0,
            top: height as i32,
            width,
            height,
            data: vec![255; (width * height) as usize],
        }))
    }
}

/// Collection picking the first listed font that matches the style weight
/// (when given) and covers the character.
#[derive(Debug, Default, Clone)]
pub struct BoxFonts {
    fonts: Vec<(Option<u16>, FontHandle)>,
}

impl BoxFonts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, font: &BoxFont) -> Self {
        self.fonts.push((None, font.handle()));
        self
    }

    pub fn with_for_weight(mut self, weight: u16, font: &BoxFont) -> Self {
        self.fonts.push((Some(weight), font.handle()));
        self
    }
}

impl FontCollection for BoxFonts {
    fn find_font(
        &self,
        ch: char,
        style: &Style,
        previous: Option<&FontHandle>,
    ) -> Option<FontHandle> {
        if let Some(previous) = previous {
            if previous.covers(ch) {
                return Some(previous.clone());
            }
        }
        self.fonts
            .iter()
            .find(|(weight, font)| weight.is_none_or(|w| w == style.weight) && font.covers(ch))
            .map(|(_, font)| font.clone())
    }
}

/// Shape `text` into runs, one per (range, font) pair, at level 0.
pub fn arena(text: &str, runs: &[(Range<usize>, &BoxFont)]) -> RunArena {
    let style = Arc::new(Style::default());
    runs.iter()
        .map(|(range, font)| {
            ShapedRun::shape(
                text,
                range.clone(),
                0,
                Script::Latin,
                font.handle(),
                style.clone(),
            )
        })
        .collect()
}
