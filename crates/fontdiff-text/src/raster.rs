//! Glyph coverage masks and the raster targets lines are painted onto.

/// Alpha coverage image of one glyph, positioned relative to its origin on
/// the baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMask {
    /// Offset from the glyph origin to the left edge of the image.
    pub left: i32,
    /// Offset from the baseline up to the top edge of the image.
    pub top: i32,
    pub width: u32,
    pub height: u32,
    /// Row-major coverage, one byte per pixel.
    pub data: Vec<u8>,
}

impl GlyphMask {
    pub fn coverage(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[(y * self.width + x) as usize]
    }
}

/// Axis-aligned rectangle in target pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Surface that glyph masks and highlight rectangles can be painted onto.
pub trait RasterTarget {
    /// Paint `mask` with its origin at (`origin_x`, `origin_y`); the origin
    /// is on the baseline.
    fn draw_mask(&mut self, mask: &GlyphMask, origin_x: i32, origin_y: i32);

    /// Fill `rect` with an opaque `0xRRGGBB` color.
    fn fill_rect(&mut self, rect: Rect, rgb: u32);
}

/// Coverage below this value does not count as ink.
pub const INK_THRESHOLD: u8 = 128;

/// Single-channel coverage canvas used to compare renderings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageBitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl CoverageBitmap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn coverage(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y * self.width + x]
    }

    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        self.coverage(x, y) >= INK_THRESHOLD
    }

    /// True if both bitmaps have the same size and the same ink pixels.
    pub fn same_ink(&self, other: &CoverageBitmap) -> bool {
        self.width == other.width
            && self.height == other.height
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (*a >= INK_THRESHOLD) == (*b >= INK_THRESHOLD))
    }

    fn accumulate(&mut self, x: i64, y: i64, value: u8) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        self.data[idx] = self.data[idx].saturating_add(value);
    }
}

impl RasterTarget for CoverageBitmap {
    fn draw_mask(&mut self, mask: &GlyphMask, origin_x: i32, origin_y: i32) {
        let left = origin_x as i64 + mask.left as i64;
        let top = origin_y as i64 - mask.top as i64;
        for row in 0..mask.height {
            for col in 0..mask.width {
                let value = mask.coverage(col, row);
                if value > 0 {
                    self.accumulate(left + col as i64, top + row as i64, value);
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, _rgb: u32) {
        let x0 = rect.x.floor().max(0.0) as i64;
        let y0 = rect.y.floor().max(0.0) as i64;
        let x1 = (rect.x + rect.width).ceil() as i64;
        let y1 = (rect.y + rect.height).ceil() as i64;
        for y in y0..y1 {
            for x in x0..x1 {
                self.accumulate(x, y, u8::MAX);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: u32) -> GlyphMask {
        GlyphMask {
            left: 0,
            top: size as i32,
            width: size,
            height: size,
            data: vec![255; (size * size) as usize],
        }
    }

    #[test]
    fn mask_is_placed_above_baseline() {
        let mut bitmap = CoverageBitmap::new(8, 8);
        bitmap.draw_mask(&square(2), 1, 6);
        assert!(bitmap.is_ink(1, 4));
        assert!(bitmap.is_ink(2, 5));
        assert!(!bitmap.is_ink(1, 6));
        assert!(!bitmap.is_ink(0, 4));
    }

    #[test]
    fn out_of_bounds_pixels_are_clipped() {
        let mut bitmap = CoverageBitmap::new(4, 4);
        bitmap.draw_mask(&square(3), -2, 2);
        assert!(bitmap.is_ink(0, 0));
        assert!(!bitmap.is_ink(1, 0));
    }

    #[test]
    fn overlapping_coverage_saturates() {
        let mut bitmap = CoverageBitmap::new(2, 2);
        let faint = GlyphMask {
            left: 0,
            top: 1,
            width: 1,
            height: 1,
            data: vec![100],
        };
        bitmap.draw_mask(&faint, 0, 1);
        assert!(!bitmap.is_ink(0, 0));
        bitmap.draw_mask(&faint, 0, 1);
        bitmap.draw_mask(&faint, 0, 1);
        assert_eq!(bitmap.coverage(0, 0), 255);
    }

    #[test]
    fn same_ink_ignores_faint_differences() {
        let mut a = CoverageBitmap::new(2, 1);
        let b = CoverageBitmap::new(2, 1);
        a.fill_rect(
            Rect {
                x: 0.0,
                y: 0.0,
                width: 0.0,
                height: 0.0,
            },
            0,
        );
        assert!(a.same_ink(&b));
        a.fill_rect(
            Rect {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 1.0,
            },
            0,
        );
        assert!(!a.same_ink(&b));
    }
}
