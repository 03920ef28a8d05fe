//! Paragraph layout against two font versions.
//!
//! A paragraph accumulates styled text, shapes it once with the "before"
//! fonts and once with the "after" fonts, breaks it into lines that fit both
//! renderings, and hands each line pair to pagination after comparing the
//! two renderings.

use core::fmt;
use core::iter::Peekable;
use core::ops::Range;
use std::sync::Arc;

use unicode_script::{Script, UnicodeScript};

use crate::bidi::{BaseDirection, ParagraphBidi};
use crate::document::Pagination;
use crate::error::{LayoutError, Result};
use crate::font::{font_changed, FontCollection, FontHandle};
use crate::layout::line_differ::{find_deltas, DiffOptions};
use crate::layout::{find_bound, Bounded, Line, PerVersion, RunArena, Version};
use crate::shaping::ShapedRun;
use crate::style::{Language, Style};

type BreakIter<'a> = Box<dyn Iterator<Item = usize> + 'a>;

/// Fill color of removal highlights on before-lines.
pub const REMOVAL_HIGHLIGHT_COLOR: u32 = 0xe5e5e5;

/// A stretch of paragraph text sharing one style.
///
/// A span starts where the previous one ends.
#[derive(Debug, Clone)]
pub struct Span {
    limit: usize,
    style: Arc<Style>,
}

impl Span {
    /// Exclusive end offset.
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn style(&self) -> &Arc<Style> {
        &self.style
    }
}

impl Bounded for Span {
    fn limit(&self) -> usize {
        self.limit
    }
}

/// Knobs for line construction and comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub base_direction: BaseDirection,
    pub diff: DiffOptions,
    /// `0xRRGGBB` of removal highlights.
    pub removal_color: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            base_direction: BaseDirection::Auto,
            diff: DiffOptions::default(),
            removal_color: REMOVAL_HIGHLIGHT_COLOR,
        }
    }
}

pub struct Paragraph {
    text: String,
    spans: Vec<Span>,
    fonts: PerVersion<Arc<dyn FontCollection>>,
    runs: PerVersion<RunArena>,
    options: LayoutOptions,
}

impl fmt::Debug for Paragraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paragraph")
            .field("text", &self.text)
            .field("spans", &self.spans)
            .field("before_runs", &self.runs.before.len())
            .field("after_runs", &self.runs.after.len())
            .field("options", &self.options)
            .finish()
    }
}

impl Paragraph {
    pub fn new(before: Arc<dyn FontCollection>, after: Arc<dyn FontCollection>) -> Self {
        Self {
            text: String::new(),
            spans: Vec::new(),
            fonts: PerVersion::new(before, after),
            runs: PerVersion::from_fn(|_| RunArena::from(Vec::new())),
            options: LayoutOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Runs produced by the last shaping pass for `version`, in text order.
    pub fn runs(&self, version: Version) -> &[ShapedRun] {
        &self.runs[version]
    }

    /// Append `text` with `style`. Line feeds and carriage returns become
    /// spaces.
    pub fn append_span(&mut self, text: &str, style: Arc<Style>) {
        self.text.extend(
            text.chars()
                .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch }),
        );
        self.spans.push(Span {
            limit: self.text.len(),
            style,
        });
    }

    /// Index of the span containing `pos`, or the span count past the end.
    pub fn find_span(&self, pos: usize) -> usize {
        find_bound(&self.spans, pos)
    }

    /// Shape the paragraph with both font versions.
    pub fn shape(&mut self) {
        let bidi = ParagraphBidi::new(&self.text, self.options.base_direction);
        self.runs = self.shape_versions(&bidi);
    }

    /// Offsets where lines end when laid out within `width`, the last one
    /// being the text length.
    pub fn line_breaks(&mut self, width: f32) -> Result<Vec<usize>> {
        check_width(width)?;
        self.shape();
        Ok(self.hard_breaks(width))
    }

    /// Lay the paragraph out within `width` and hand the resulting lines to
    /// `pagination`.
    pub fn layout(&mut self, width: f32, pagination: &mut dyn Pagination) -> Result<()> {
        check_width(width)?;
        let bidi = ParagraphBidi::new(&self.text, self.options.base_direction);
        self.runs = self.shape_versions(&bidi);

        let mut line_start = 0;
        let mut pairs = 0;
        let mut differing = 0;
        for line_limit in self.hard_breaks(width) {
            if line_start < line_limit {
                pairs += 1;
                if self.add_line(&bidi, line_start..line_limit, width, pagination)? {
                    differing += 1;
                }
            }
            line_start = line_limit;
        }
        log::debug!(
            "laid out {} bytes into {pairs} lines, {differing} with differences",
            self.text.len()
        );
        Ok(())
    }

    fn shape_versions(&self, bidi: &ParagraphBidi<'_>) -> PerVersion<RunArena> {
        let levels = bidi.logical_runs();
        PerVersion::from_fn(|version| {
            let mut runs = Vec::new();
            for run in &levels {
                self.shape_bidi_run(version, run.range.clone(), run.level, &mut runs);
            }
            RunArena::from(runs)
        })
    }

    /// Shape one same-level stretch, split at span boundaries.
    fn shape_bidi_run(
        &self,
        version: Version,
        range: Range<usize>,
        level: u8,
        out: &mut Vec<ShapedRun>,
    ) {
        let limit = range.end.min(self.text.len());
        let mut start = range.start;
        let mut index = self.find_span(start);
        while start < limit && index < self.spans.len() {
            let span = &self.spans[index];
            let end = span.limit.min(limit);
            if start < end {
                self.shape_span(version, start..end, level, &span.style, out);
            }
            start = start.max(end);
            index += 1;
        }
    }

    /// Split a single-style, single-level range wherever the font or the
    /// script changes, and shape each piece.
    fn shape_span(
        &self,
        version: Version,
        range: Range<usize>,
        level: u8,
        style: &Arc<Style>,
        out: &mut Vec<ShapedRun>,
    ) {
        if range.start >= range.end {
            return;
        }
        let fonts = &self.fonts[version];
        let mut segment_start = range.start;
        let mut segment_font: Option<FontHandle> = None;
        let mut segment_script = Script::Unknown;
        let mut last_script = Script::Unknown;

        for (offset, ch) in self.text[range.clone()].char_indices() {
            let pos = range.start + offset;
            let script = match ch.script() {
                Script::Common | Script::Inherited => last_script,
                script => script,
            };
            let font = fonts.find_font(ch, style, segment_font.as_ref());
            if pos > segment_start
                && (font_changed(segment_font.as_ref(), font.as_ref()) || script != segment_script)
            {
                self.emit_segment(
                    version,
                    segment_start..pos,
                    level,
                    segment_script,
                    segment_font.take(),
                    style,
                    out,
                );
                segment_start = pos;
            }
            segment_font = font;
            segment_script = script;
            last_script = script;
        }
        self.emit_segment(
            version,
            segment_start..range.end,
            level,
            segment_script,
            segment_font,
            style,
            out,
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_segment(
        &self,
        version: Version,
        range: Range<usize>,
        level: u8,
        script: Script,
        font: Option<FontHandle>,
        style: &Arc<Style>,
        out: &mut Vec<ShapedRun>,
    ) {
        if range.start >= range.end {
            return;
        }
        match font {
            Some(font) => {
                log::trace!("shaping {range:?} with {} ({version:?})", font.name());
                out.push(ShapedRun::shape(
                    &self.text,
                    range,
                    level,
                    script,
                    font,
                    style.clone(),
                ));
            }
            None => log::warn!(
                "no {version:?} font renders {:?}; skipping",
                &self.text[range]
            ),
        }
    }

    /// Candidate break offsets from the line breaker of each same-language
    /// stretch of spans, in increasing order.
    ///
    /// Each language keeps one cursor over the whole text, resumed at every
    /// stretch of that language.
    fn potential_breaks(&self) -> Vec<usize> {
        let mut breaks = Vec::new();
        let mut cursors: Vec<(&Language, Peekable<BreakIter<'_>>)> = Vec::new();
        let mut start = 0;
        let mut index = 0;
        while index < self.spans.len() {
            let language = self.spans[index].style.language();
            let mut next = index + 1;
            while next < self.spans.len() && self.spans[next].style.language() == language {
                next += 1;
            }
            let limit = self.spans[next - 1].limit;
            if let Some(language) = language {
                let slot = match cursors.iter().position(|(known, _)| *known == language) {
                    Some(slot) => slot,
                    None => {
                        let iter: BreakIter<'_> = match language.line_breaker() {
                            Some(breaker) => breaker.following(&self.text, 0),
                            None => Box::new(core::iter::empty()),
                        };
                        cursors.push((language, iter.peekable()));
                        cursors.len() - 1
                    }
                };
                let cursor = &mut cursors[slot].1;
                let from = start.max(1);
                while cursor.next_if(|&pos| pos < from).is_some() {}
                while let Some(pos) = cursor.next_if(|&pos| pos < limit) {
                    breaks.push(pos);
                }
            }
            start = limit;
            index = next;
        }
        breaks
    }

    /// Greedy line breaking with one break of lookback, measuring every
    /// candidate line with the wider of the two renderings. The paragraph
    /// end is always the final break.
    fn hard_breaks(&self, width: f32) -> Vec<usize> {
        let mut breaks = Vec::new();
        let mut line_start = 0;
        let mut last_break = None;
        for pos in self.potential_breaks() {
            if self.line_width(line_start..pos) > width {
                if let Some(prev) = last_break {
                    breaks.push(prev);
                    line_start = prev;
                }
            }
            last_break = Some(pos);
        }
        breaks.push(self.text.len());
        breaks
    }

    /// Width of `range` in the wider of the two renderings.
    fn line_width(&self, range: Range<usize>) -> f32 {
        Version::ALL
            .iter()
            .map(|&version| self.measure(version, range.clone()))
            .fold(0.0, f32::max)
    }

    /// Advance of `range` when rendered with `version`.
    pub fn measure(&self, version: Version, range: Range<usize>) -> f32 {
        if range.start >= range.end {
            return 0.0;
        }
        let runs = &self.runs[version];
        runs[find_bound(runs, range.start)..]
            .iter()
            .take_while(|run| run.start() < range.end)
            .filter(|run| run.is_covering(range.clone()))
            .map(|run| run.x_advance(range.clone()))
            .sum()
    }

    /// Build the line of `range` for `version`, runs in visual order.
    fn build_line(
        &self,
        bidi: &ParagraphBidi<'_>,
        version: Version,
        range: Range<usize>,
        width: f32,
    ) -> Line {
        let runs = &self.runs[version];
        let mut line = Line::new(width, version, runs.clone());
        for visual in bidi.visual_runs(range) {
            let first = find_bound(runs, visual.range.start);
            let count = runs[first..]
                .iter()
                .take_while(|run| run.start() < visual.range.end)
                .count();
            let indices = first..first + count;
            if visual.is_rtl() {
                for index in indices.rev() {
                    line.add_shaped_text(index, visual.range.clone());
                }
            } else {
                for index in indices {
                    line.add_shaped_text(index, visual.range.clone());
                }
            }
        }
        line
    }

    /// Compare the two renderings of `range` and place them. Returns whether
    /// they differ.
    fn add_line(
        &self,
        bidi: &ParagraphBidi<'_>,
        range: Range<usize>,
        width: f32,
        pagination: &mut dyn Pagination,
    ) -> Result<bool> {
        let mut lines =
            PerVersion::from_fn(|version| self.build_line(bidi, version, range.clone(), width));
        let deltas = find_deltas(&lines.before, &lines.after, &self.options.diff)?;

        if !deltas.has_deltas() {
            let after = lines.after;
            if after.height() >= pagination.remaining_height() {
                pagination.add_page();
            }
            pagination.place_line(after);
            return Ok(false);
        }

        pagination.set_has_diffs();
        for removal in &deltas.removals {
            lines
                .before
                .add_highlight(removal.x, removal.width, self.options.removal_color);
        }
        let height = lines.before.height() + lines.after.height();
        if height >= pagination.remaining_height() {
            pagination.add_page();
        }
        pagination.place_line(lines.before);
        pagination.place_line(lines.after);
        Ok(true)
    }
}

fn check_width(width: f32) -> Result<()> {
    if width.is_finite() && width >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::InvalidWidth(width))
    }
}
