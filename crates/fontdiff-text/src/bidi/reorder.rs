use core::ops::Range;

use super::{BidiRun, ParagraphBidi};

impl ParagraphBidi<'_> {
    /// Level runs of `line` in the order they are displayed.
    ///
    /// A line crossing a paragraph separator is reordered per paragraph;
    /// paragraphs stay in text order.
    pub fn visual_runs(&self, line: Range<usize>) -> Vec<BidiRun> {
        let mut result = Vec::new();
        for para in &self.info.paragraphs {
            let start = line.start.max(para.range.start);
            let end = line.end.min(para.range.end);
            if start >= end {
                continue;
            }
            let (levels, runs) = self.info.visual_runs(para, start..end);
            result.extend(runs.into_iter().map(|run| BidiRun {
                level: levels[run.start].number(),
                range: run,
            }));
        }
        result
    }
}
