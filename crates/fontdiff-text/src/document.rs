//! Pages that receive finished lines.

use crate::layout::Line;

/// Receiver of the line pairs produced by paragraph layout.
pub trait Pagination {
    /// Record that at least one line pair differs. Idempotent.
    fn set_has_diffs(&mut self);

    /// Vertical space left on the current page.
    fn remaining_height(&self) -> f32;

    /// Start a new page; following lines go there.
    fn add_page(&mut self);

    /// Place `line` below the previous line of the current page.
    fn place_line(&mut self, line: Line);
}

/// Page size and margin, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// Width available to lines between the left and right margins.
    pub fn content_width(&self) -> f32 {
        (self.width - 2.0 * self.margin).max(0.0)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        // A4 at 72 dpi.
        Self {
            width: 595.0,
            height: 842.0,
            margin: 36.0,
        }
    }
}

/// A line with the position of its top-left corner on the page.
#[derive(Debug, Clone)]
pub struct PlacedLine {
    pub line: Line,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct Page {
    lines: Vec<PlacedLine>,
    cursor: f32,
}

impl Page {
    fn new(geometry: &PageGeometry) -> Self {
        Self {
            lines: Vec::new(),
            cursor: geometry.margin,
        }
    }

    pub fn lines(&self) -> &[PlacedLine] {
        &self.lines
    }

    /// Top of the next line.
    pub fn cursor(&self) -> f32 {
        self.cursor
    }
}

/// In-memory document: a list of pages plus the job-wide diff flag.
#[derive(Debug, Clone)]
pub struct Document {
    geometry: PageGeometry,
    pages: Vec<Page>,
    has_diffs: bool,
}

impl Document {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            pages: vec![Page::new(&geometry)],
            geometry,
            has_diffs: false,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn content_width(&self) -> f32 {
        self.geometry.content_width()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn has_diffs(&self) -> bool {
        self.has_diffs
    }

    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    fn current_page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::new(&self.geometry));
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(PageGeometry::default())
    }
}

impl Pagination for Document {
    fn set_has_diffs(&mut self) {
        self.has_diffs = true;
    }

    fn remaining_height(&self) -> f32 {
        let cursor = self.pages.last().map_or(self.geometry.margin, |p| p.cursor);
        self.geometry.height - self.geometry.margin - cursor
    }

    fn add_page(&mut self) {
        log::trace!("starting page {}", self.pages.len() + 1);
        self.pages.push(Page::new(&self.geometry));
    }

    fn place_line(&mut self, line: Line) {
        let x = self.geometry.margin;
        let page = self.current_page();
        let y = page.cursor;
        page.cursor += line.height();
        page.lines.push(PlacedLine { line, x, y });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Version;
    use crate::testing::{arena, BoxFont};

    fn line(text: &str) -> Line {
        let font = BoxFont::new("f", 10.0);
        let mut line = Line::new(100.0, Version::After, arena(text, &[(0..text.len(), &font)]));
        line.add_shaped_text(0, 0..text.len());
        line
    }

    fn geometry() -> PageGeometry {
        PageGeometry {
            width: 200.0,
            height: 100.0,
            margin: 10.0,
        }
    }

    #[test]
    fn lines_stack_from_the_top_margin() {
        let mut doc = Document::new(geometry());
        assert_eq!(doc.pages().len(), 1);
        assert_eq!(doc.remaining_height(), 80.0);

        doc.place_line(line("ab"));
        doc.place_line(line("cd"));
        let placed = doc.pages()[0].lines();
        assert_eq!((placed[0].x, placed[0].y), (10.0, 10.0));
        assert_eq!((placed[1].x, placed[1].y), (10.0, 26.0));
        assert_eq!(doc.remaining_height(), 48.0);
        assert_eq!(doc.line_count(), 2);
    }

    #[test]
    fn add_page_resets_the_cursor() {
        let mut doc = Document::new(geometry());
        doc.place_line(line("ab"));
        doc.add_page();
        assert_eq!(doc.pages().len(), 2);
        assert_eq!(doc.remaining_height(), 80.0);
        doc.place_line(line("cd"));
        assert_eq!(doc.pages()[1].lines()[0].y, 10.0);
    }

    #[test]
    fn has_diffs_is_sticky() {
        let mut doc = Document::default();
        assert!(!doc.has_diffs());
        doc.set_has_diffs();
        doc.set_has_diffs();
        assert!(doc.has_diffs());
    }

    #[test]
    fn content_width_excludes_margins() {
        assert_eq!(geometry().content_width(), 180.0);
    }
}
