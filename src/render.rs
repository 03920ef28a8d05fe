//! Page rasterization with tiny-skia.

use std::path::Path;

use anyhow::{Context, Result};
use fontdiff_text::{GlyphMask, Page, PageGeometry, RasterTarget, Rect};
use tiny_skia::{Color, Paint, Pixmap, Transform};

/// White RGBA page that lines are painted onto in black.
pub struct PageCanvas {
    pixmap: Pixmap,
    scale: f32,
}

impl PageCanvas {
    pub fn new(geometry: &PageGeometry, scale: f32) -> Result<Self> {
        let width = (geometry.width * scale).ceil().max(1.0) as u32;
        let height = (geometry.height * scale).ceil().max(1.0) as u32;
        let mut pixmap = Pixmap::new(width, height)
            .with_context(|| format!("cannot allocate a {width}x{height} page"))?;
        pixmap.fill(Color::WHITE);
        Ok(Self { pixmap, scale })
    }

    /// Paint every line of `page`, highlights first.
    pub fn draw_page(&mut self, page: &Page) {
        let scale = self.scale;
        for placed in page.lines() {
            placed.line.render_highlights(self, placed.x, placed.y, scale);
            placed.line.render(self, placed.x, placed.y, scale);
        }
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.pixmap
            .save_png(path)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    #[cfg(test)]
    fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let px = self.pixmap.pixel(x, y)?;
        Some([px.red(), px.green(), px.blue(), px.alpha()])
    }
}

impl RasterTarget for PageCanvas {
    fn draw_mask(&mut self, mask: &GlyphMask, origin_x: i32, origin_y: i32) {
        let (width, height) = (self.pixmap.width() as i64, self.pixmap.height() as i64);
        let left = origin_x as i64 + mask.left as i64;
        let top = origin_y as i64 - mask.top as i64;
        let data = self.pixmap.data_mut();
        for row in 0..mask.height {
            let y = top + row as i64;
            if y < 0 || y >= height {
                continue;
            }
            for col in 0..mask.width {
                let x = left + col as i64;
                let coverage = mask.coverage(col, row) as u32;
                if x < 0 || x >= width || coverage == 0 {
                    continue;
                }
                // Opaque black over an opaque page: scale the color down.
                let idx = ((y * width + x) * 4) as usize;
                for channel in &mut data[idx..idx + 3] {
                    *channel = (*channel as u32 * (255 - coverage) / 255) as u8;
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, rgb: u32) {
        let Some(rect) = tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
        else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color_rgba8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255);
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }
}

/// Render `page` and write it to `path` as PNG.
pub fn render_page(page: &Page, geometry: &PageGeometry, scale: f32, path: &Path) -> Result<()> {
    let mut canvas = PageCanvas::new(geometry, scale)?;
    canvas.draw_page(page);
    canvas.save_png(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> PageGeometry {
        PageGeometry {
            width: 20.0,
            height: 10.0,
            margin: 1.0,
        }
    }

    #[test]
    fn canvas_starts_white() {
        let canvas = PageCanvas::new(&geometry(), 2.0).unwrap();
        assert_eq!(canvas.pixmap.width(), 40);
        assert_eq!(canvas.pixel(5, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn masks_darken_the_page() {
        let mut canvas = PageCanvas::new(&geometry(), 1.0).unwrap();
        let mask = GlyphMask {
            left: 0,
            top: 2,
            width: 2,
            height: 2,
            data: vec![255, 255, 128, 0],
        };
        canvas.draw_mask(&mask, 3, 5);
        assert_eq!(canvas.pixel(3, 3), Some([0, 0, 0, 255]));
        assert_eq!(canvas.pixel(3, 4), Some([127, 127, 127, 255]));
        assert_eq!(canvas.pixel(4, 4), Some([255, 255, 255, 255]));
        // Clipped at the edges.
        canvas.draw_mask(&mask, -1, 1);
        canvas.draw_mask(&mask, 19, 11);
    }

    #[test]
    fn highlights_use_their_color() {
        let mut canvas = PageCanvas::new(&geometry(), 1.0).unwrap();
        canvas.fill_rect(
            Rect {
                x: 2.0,
                y: 2.0,
                width: 4.0,
                height: 3.0,
            },
            0xe5e5e5,
        );
        assert_eq!(canvas.pixel(3, 3), Some([0xe5, 0xe5, 0xe5, 255]));
        assert_eq!(canvas.pixel(7, 3), Some([255, 255, 255, 255]));
    }
}
