use core::ops::Range;

use unicode_bidi::{BidiInfo, Level, LTR_LEVEL, RTL_LEVEL};

/// Base direction hint for paragraph analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BaseDirection {
    /// Detect paragraph base direction from text (first strong char),
    /// falling back to left-to-right.
    #[default]
    Auto,
    /// Force overall left-to-right base direction.
    Ltr,
    /// Force overall right-to-left base direction.
    Rtl,
}

impl BaseDirection {
    pub fn to_level(self) -> Option<Level> {
        match self {
            BaseDirection::Auto => None,
            BaseDirection::Ltr => Some(LTR_LEVEL),
            BaseDirection::Rtl => Some(RTL_LEVEL),
        }
    }
}

/// A run of text at a single bidi embedding level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiRun {
    /// Byte range in the original text.
    pub range: Range<usize>,
    /// Embedding level for this run.
    pub level: u8,
}

impl BidiRun {
    pub fn is_rtl(&self) -> bool {
        self.level & 1 == 1
    }
}

/// Bidi analysis of one paragraph of text (UAX #9).
///
/// Created once per layout pass and dropped with it.
#[derive(Debug)]
pub struct ParagraphBidi<'text> {
    pub(super) info: BidiInfo<'text>,
}

impl<'text> ParagraphBidi<'text> {
    pub fn new(text: &'text str, base_dir: BaseDirection) -> Self {
        Self {
            info: BidiInfo::new(text, base_dir.to_level()),
        }
    }

    /// Maximal same-level runs in logical (text) order.
    pub fn logical_runs(&self) -> Vec<BidiRun> {
        let mut runs: Vec<BidiRun> = Vec::new();
        for (pos, level) in self.info.levels.iter().enumerate() {
            let level = level.number();
            match runs.last_mut() {
                Some(run) if run.level == level && run.range.end == pos => run.range.end = pos + 1,
                _ => runs.push(BidiRun {
                    range: pos..pos + 1,
                    level,
                }),
            }
        }
        runs
    }
}
