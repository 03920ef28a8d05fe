//! Visual comparison of a before-line and an after-line.
//!
//! Both lines are rasterized into oversampled coverage bitmaps. Each pixel
//! column is reduced to a hash, and a shortest edit script between the two
//! column sequences tells which horizontal stretches were removed from the
//! before rendering and which were added in the after rendering.

use crate::error::{LayoutError, Result};
use crate::layout::Line;
use crate::raster::CoverageBitmap;

/// Largest canvas edge, in pixels, the differ is willing to allocate.
const MAX_CANVAS_EDGE: f32 = 65_536.0;
/// Largest canvas area, in pixels.
const MAX_CANVAS_AREA: f32 = 256.0 * 1024.0 * 1024.0;

/// Horizontal stretch of a line, in line-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaRange {
    pub x: f32,
    pub width: f32,
}

/// Differences found between two renderings of the same text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineDeltas {
    /// Stretches of the before-line that have no counterpart after.
    pub removals: Vec<DeltaRange>,
    /// Stretches of the after-line that have no counterpart before.
    pub additions: Vec<DeltaRange>,
}

impl LineDeltas {
    pub fn has_deltas(&self) -> bool {
        !self.removals.is_empty() || !self.additions.is_empty()
    }
}

/// Tuning of the raster comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffOptions {
    /// Canvas pixels per line pixel.
    pub oversample: u32,
    /// Ranges separated by fewer columns than this are merged.
    pub merge_threshold: usize,
    /// Edit distance above which the changed middle of a line is reported
    /// as a single removal and a single addition.
    pub max_edit_distance: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            oversample: 8,
            merge_threshold: 2,
            max_edit_distance: 2048,
        }
    }
}

/// Compare two lines built from the same logical text range.
pub fn find_deltas(before: &Line, after: &Line, options: &DiffOptions) -> Result<LineDeltas> {
    let differ = LineDiffer::new(before, after, options)?;
    let deltas = differ.find_diffs();
    log::trace!(
        "line diff: {} removals, {} additions",
        deltas.removals.len(),
        deltas.additions.len()
    );
    Ok(deltas)
}

struct LineDiffer {
    options: DiffOptions,
    before: CoverageBitmap,
    after: CoverageBitmap,
}

impl LineDiffer {
    fn new(before: &Line, after: &Line, options: &DiffOptions) -> Result<Self> {
        let scale = options.oversample.max(1) as f32;
        let width = before.width().max(after.width()) * scale;
        let height = before.height().max(after.height()) * scale;
        if !width.is_finite()
            || !height.is_finite()
            || width > MAX_CANVAS_EDGE
            || height > MAX_CANVAS_EDGE
            || width * height > MAX_CANVAS_AREA
        {
            return Err(LayoutError::CanvasTooLarge { width, height });
        }
        // Flooring the width keeps every column inside both lines' width.
        let columns = width.max(0.0).floor() as usize;
        let rows = height.max(0.0).ceil() as usize;

        let mut before_bitmap = CoverageBitmap::new(columns, rows);
        before.render(&mut before_bitmap, 0.0, 0.0, scale);
        let mut after_bitmap = CoverageBitmap::new(columns, rows);
        after.render(&mut after_bitmap, 0.0, 0.0, scale);

        Ok(Self {
            options: *options,
            before: before_bitmap,
            after: after_bitmap,
        })
    }

    fn find_diffs(&self) -> LineDeltas {
        if self.before.same_ink(&self.after) {
            return LineDeltas::default();
        }

        let before = column_hashes(&self.before);
        let after = column_hashes(&self.after);
        let edits = edit_script(&before, &after, self.options.max_edit_distance);

        let mut removals = Vec::new();
        let mut additions = Vec::new();
        let mut last: Option<Side> = None;
        let (mut start, mut end) = (0, 0);
        for edit in edits {
            let (side, pos) = match edit {
                Edit::Common => (None, None),
                Edit::Delete(i) => (Some(Side::Removal), Some(i)),
                Edit::Insert(j) => (Some(Side::Addition), Some(j)),
            };
            if side != last {
                if let Some(last) = last {
                    let ranges = match last {
                        Side::Removal => &mut removals,
                        Side::Addition => &mut additions,
                    };
                    self.merge_range(start, end, ranges);
                }
                if let Some(pos) = pos {
                    start = pos;
                }
                last = side;
            }
            if let Some(pos) = pos {
                end = pos;
            }
        }
        if let Some(last) = last {
            let ranges = match last {
                Side::Removal => &mut removals,
                Side::Addition => &mut additions,
            };
            self.merge_range(start, end, ranges);
        }

        let scale = self.options.oversample.max(1) as f32;
        let to_delta = |range: &ColumnRange| DeltaRange {
            x: range.start as f32 / scale,
            width: (range.end - range.start) as f32 / scale,
        };
        LineDeltas {
            removals: removals.iter().map(to_delta).collect(),
            additions: additions.iter().map(to_delta).collect(),
        }
    }

    /// Append the columns `first..=last`, merging with the previous range
    /// when the gap between them is below the threshold.
    fn merge_range(&self, first: usize, last: usize, ranges: &mut Vec<ColumnRange>) {
        let range = ColumnRange {
            start: first,
            end: last + 1,
        };
        if let Some(prev) = ranges.last_mut() {
            if range.start.saturating_sub(prev.end) < self.options.merge_threshold {
                prev.end = prev.end.max(range.end);
                return;
            }
        }
        ranges.push(range);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Removal,
    Addition,
}

/// Half-open range of canvas columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnRange {
    start: usize,
    end: usize,
}

/// Jenkins one-at-a-time hash of each column's ink bits, top to bottom.
fn column_hashes(bitmap: &CoverageBitmap) -> Vec<u32> {
    (0..bitmap.width())
        .map(|x| {
            let mut h: u32 = 0;
            for y in 0..bitmap.height() {
                h = h.wrapping_add(u32::from(bitmap.is_ink(x, y)));
                h = h.wrapping_add(h << 10);
                h ^= h >> 6;
            }
            h = h.wrapping_add(h << 3);
            h ^= h >> 11;
            h.wrapping_add(h << 15)
        })
        .collect()
}

/// One step of an edit script from `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Common,
    /// `a[i]` is removed.
    Delete(usize),
    /// `b[j]` is inserted.
    Insert(usize),
}

/// Shortest edit script from `a` to `b`.
///
/// The common prefix and suffix are matched directly; the middle goes
/// through Myers' O(ND) search. When the middle needs more than
/// `max_distance` edits it is reported as deleted and reinserted wholesale.
fn edit_script(a: &[u32], b: &[u32], max_distance: usize) -> Vec<Edit> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let a_mid = &a[prefix..a.len() - suffix];
    let b_mid = &b[prefix..b.len() - suffix];

    let mut edits = vec![Edit::Common; prefix];
    match myers(a_mid, b_mid, max_distance) {
        Some(middle) => edits.extend(middle.into_iter().map(|edit| match edit {
            Edit::Delete(i) => Edit::Delete(prefix + i),
            Edit::Insert(j) => Edit::Insert(prefix + j),
            Edit::Common => Edit::Common,
        })),
        None => {
            edits.extend((0..a_mid.len()).map(|i| Edit::Delete(prefix + i)));
            edits.extend((0..b_mid.len()).map(|j| Edit::Insert(prefix + j)));
        }
    }
    edits.extend(std::iter::repeat_n(Edit::Common, suffix));
    edits
}

fn myers(a: &[u32], b: &[u32], max_distance: usize) -> Option<Vec<Edit>> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = n + m;
    if max == 0 {
        return Some(Vec::new());
    }
    let offset = max + 1;
    let mut v = vec![0isize; (2 * offset + 1) as usize];
    // trace[d] holds v for diagonals -d..=d as it was before round d.
    let mut trace: Vec<Vec<isize>> = Vec::new();

    let limit = max.min(isize::try_from(max_distance).unwrap_or(isize::MAX));
    for d in 0..=limit {
        trace.push(v[(offset - d) as usize..=(offset + d) as usize].to_vec());
        let mut k = -d;
        while k <= d {
            let i = (offset + k) as usize;
            let mut x = if k == -d || (k != d && v[i - 1] < v[i + 1]) {
                v[i + 1]
            } else {
                v[i - 1] + 1
            };
            let mut y = x - k;
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[i] = x;
            if x >= n && y >= m {
                return Some(backtrack(&trace, n, m));
            }
            k += 2;
        }
    }
    None
}

fn backtrack(trace: &[Vec<isize>], n: isize, m: isize) -> Vec<Edit> {
    let mut edits = Vec::new();
    let (mut x, mut y) = (n, m);
    for (d, v) in trace.iter().enumerate().rev() {
        let d = d as isize;
        if d == 0 {
            while x > 0 && y > 0 {
                edits.push(Edit::Common);
                x -= 1;
                y -= 1;
            }
            break;
        }
        let at = |k: isize| v[(k + d) as usize];
        let k = x - y;
        let prev_k = if k == -d || (k != d && at(k - 1) < at(k + 1)) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = at(prev_k);
        let prev_y = prev_x - prev_k;
        while x > prev_x && y > prev_y {
            edits.push(Edit::Common);
            x -= 1;
            y -= 1;
        }
        if x == prev_x {
            edits.push(Edit::Insert((y - 1) as usize));
        } else {
            edits.push(Edit::Delete((x - 1) as usize));
        }
        x = prev_x;
        y = prev_y;
    }
    edits.reverse();
    edits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Version;
    use crate::testing::{arena, BoxFont};

    fn apply(a: &[u32], b: &[u32], edits: &[Edit]) -> Vec<u32> {
        let (mut i, mut out) = (0, Vec::new());
        for edit in edits {
            match *edit {
                Edit::Common => {
                    out.push(a[i]);
                    i += 1;
                }
                Edit::Delete(at) => {
                    assert_eq!(at, i);
                    i += 1;
                }
                Edit::Insert(j) => out.push(b[j]),
            }
        }
        assert_eq!(i, a.len());
        out
    }

    fn distance(edits: &[Edit]) -> usize {
        edits.iter().filter(|e| **e != Edit::Common).count()
    }

    #[test]
    fn edit_script_transforms_a_into_b() {
        let a = [1, 2, 3, 4, 5, 6, 7];
        let b = [1, 2, 9, 4, 6, 7, 8];
        let edits = edit_script(&a, &b, 100);
        assert_eq!(apply(&a, &b, &edits), b);
        // Replace 3 by 9, drop 5, append 8.
        assert_eq!(distance(&edits), 4);
    }

    #[test]
    fn edit_script_of_identical_sequences_is_all_common() {
        let a = [4, 4, 2, 1];
        let edits = edit_script(&a, &a, 10);
        assert_eq!(edits, vec![Edit::Common; 4]);
    }

    #[test]
    fn edit_script_handles_empty_sides() {
        let edits = edit_script(&[], &[1, 2], 10);
        assert_eq!(edits, vec![Edit::Insert(0), Edit::Insert(1)]);
        let edits = edit_script(&[1, 2], &[], 10);
        assert_eq!(edits, vec![Edit::Delete(0), Edit::Delete(1)]);
    }

    #[test]
    fn edit_script_falls_back_past_the_budget() {
        let a = [0, 1, 2, 3, 9];
        let b = [0, 5, 6, 7, 9];
        let edits = edit_script(&a, &b, 1);
        assert_eq!(apply(&a, &b, &edits), b);
        assert_eq!(
            edits,
            vec![
                Edit::Common,
                Edit::Delete(1),
                Edit::Delete(2),
                Edit::Delete(3),
                Edit::Insert(1),
                Edit::Insert(2),
                Edit::Insert(3),
                Edit::Common,
            ]
        );
    }

    fn line(version: Version, text: &str, fonts: &[(core::ops::Range<usize>, &BoxFont)]) -> Line {
        let runs = arena(text, fonts);
        let mut line = Line::new(200.0, version, runs.clone());
        for (index, run) in runs.iter().enumerate() {
            line.add_shaped_text(index, run.text_range());
        }
        line
    }

    #[test]
    fn identical_lines_have_no_deltas() {
        let font = BoxFont::new("f", 10.0);
        let before = line(Version::Before, "abc def", &[(0..7, &font)]);
        let after = line(Version::After, "abc def", &[(0..7, &font)]);
        let deltas = find_deltas(&before, &after, &DiffOptions::default()).unwrap();
        assert!(!deltas.has_deltas());
        assert_eq!(deltas, LineDeltas::default());
    }

    #[test]
    fn changed_glyphs_are_localized() {
        let regular = BoxFont::new("regular", 10.0);
        let tall = BoxFont::new("tall", 10.0).with_ink(0.7);
        let before = line(
            Version::Before,
            "abcdefgh",
            &[(0..4, &regular), (4..8, &regular)],
        );
        let after = line(
            Version::After,
            "abcdefgh",
            &[(0..4, &regular), (4..8, &tall)],
        );
        let deltas = find_deltas(&before, &after, &DiffOptions::default()).unwrap();
        assert!(deltas.has_deltas());
        assert!(!deltas.removals.is_empty());
        for range in deltas.removals.iter().chain(&deltas.additions) {
            assert!(range.x >= 40.0, "{range:?} starts inside the unchanged half");
            assert!(range.x + range.width <= 80.0);
        }
    }

    #[test]
    fn shifted_text_is_flagged() {
        let narrow = BoxFont::new("narrow", 10.0);
        let wide = BoxFont::new("wide", 12.0);
        let before = line(Version::Before, "abcd", &[(0..4, &narrow)]);
        let after = line(Version::After, "abcd", &[(0..4, &wide)]);
        let deltas = find_deltas(&before, &after, &DiffOptions::default()).unwrap();
        assert!(deltas.has_deltas());
        for range in deltas.removals.iter().chain(&deltas.additions) {
            assert!(range.x >= 0.0);
            assert!(range.x + range.width <= before.width());
        }
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let font = BoxFont::new("f", 10.0);
        let runs = arena("a", &[(0..1, &font)]);
        let before = Line::new(1.0e9, Version::Before, runs.clone());
        let after = Line::new(1.0e9, Version::After, runs);
        let err = find_deltas(&before, &after, &DiffOptions::default()).unwrap_err();
        assert!(matches!(err, LayoutError::CanvasTooLarge { .. }));
    }
}
