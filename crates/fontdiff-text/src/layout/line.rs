use core::ops::Range;
use std::sync::Arc;

use crate::layout::Version;
use crate::raster::{RasterTarget, Rect};
use crate::shaping::ShapedRun;

/// Immutable run sequence shared by a paragraph and the lines built from it.
pub type RunArena = Arc<[ShapedRun]>;

/// A sub-range of one shaped run placed on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Index of the run in the line's arena.
    pub run: usize,
    /// Line-local x of the pen at the start of the placement.
    pub x: f32,
    /// Byte range of the run's text drawn here; never empty.
    pub range: Range<usize>,
}

/// Rectangle painted behind part of a line, spanning the line height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub x: f32,
    pub width: f32,
    /// `0xRRGGBB`.
    pub color: u32,
}

/// One visual line of shaped text.
///
/// Placements are appended in visual order; the line tracks its cumulative
/// advance and the vertical extent of everything placed on it.
#[derive(Debug, Clone)]
pub struct Line {
    version: Version,
    runs: RunArena,
    width: f32,
    x_advance: f32,
    ascender: f32,
    descender: f32,
    placements: Vec<Placement>,
    highlights: Vec<Highlight>,
    background: Option<u32>,
}

impl Line {
    /// Empty line with a fixed width budget, placing runs from `runs`.
    pub fn new(width: f32, version: Version, runs: RunArena) -> Self {
        Self {
            version,
            runs,
            width,
            x_advance: 0.0,
            ascender: 0.0,
            descender: 0.0,
            placements: Vec::new(),
            highlights: Vec::new(),
            background: None,
        }
    }

    /// Place `range` of the run at index `run` after everything placed so
    /// far. The range is clamped to the run; an empty result is ignored.
    pub fn add_shaped_text(&mut self, run: usize, range: Range<usize>) {
        let Some(shaped) = self.runs.get(run) else {
            return;
        };
        let range = shaped.clamp(range);
        if range.start >= range.end {
            return;
        }
        let advance = shaped.x_advance(range.clone());
        let (ascender, descender) = (shaped.ascender(), shaped.descender());
        self.placements.push(Placement {
            run,
            x: self.x_advance,
            range,
        });
        self.x_advance += advance;
        self.ascender = self.ascender.max(ascender);
        self.descender = self.descender.min(descender);
    }

    /// Add a highlight rectangle in line-local coordinates.
    pub fn add_highlight(&mut self, x: f32, width: f32, color: u32) {
        self.highlights.push(Highlight { x, width, color });
    }

    pub fn set_background_color(&mut self, rgb: u32) {
        self.background = Some(rgb);
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Width budget the line was laid out against.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Sum of the advances of everything placed on the line.
    pub fn x_advance(&self) -> f32 {
        self.x_advance
    }

    pub fn ascender(&self) -> f32 {
        self.ascender
    }

    pub fn descender(&self) -> f32 {
        self.descender
    }

    pub fn height(&self) -> f32 {
        self.ascender - self.descender
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    pub fn background_color(&self) -> Option<u32> {
        self.background
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// The shaped run behind a placement of this line.
    pub fn run(&self, placement: &Placement) -> &ShapedRun {
        &self.runs[placement.run]
    }

    /// Smallest byte range containing every placement.
    pub fn text_range(&self) -> Option<Range<usize>> {
        let start = self.placements.iter().map(|p| p.range.start).min()?;
        let end = self.placements.iter().map(|p| p.range.end).max()?;
        Some(start..end)
    }

    /// Paint the glyphs with the line's top-left corner at (`x`, `y`).
    pub fn render(&self, target: &mut dyn RasterTarget, x: f32, y: f32, scale: f32) {
        let baseline = y + self.ascender;
        for placement in &self.placements {
            self.run(placement).render(
                placement.range.clone(),
                target,
                x + placement.x,
                baseline,
                scale,
            );
        }
    }

    /// Paint the background tint and highlight rectangles.
    pub fn render_highlights(&self, target: &mut dyn RasterTarget, x: f32, y: f32, scale: f32) {
        let height = self.height();
        if let Some(rgb) = self.background {
            target.fill_rect(
                Rect {
                    x: (x - 1.0) * scale,
                    y: y * scale,
                    width: (self.width + 2.0) * scale,
                    height: height * scale,
                },
                rgb,
            );
        }
        for highlight in &self.highlights {
            target.fill_rect(
                Rect {
                    x: (x + highlight.x) * scale,
                    y: y * scale,
                    width: highlight.width * scale,
                    height: height * scale,
                },
                highlight.color,
            );
        }
    }
}
