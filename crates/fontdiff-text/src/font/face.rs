use std::sync::{Arc, Mutex};

use hashbrown::HashMap;
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::Format;
use swash::{FontRef, Metrics};

use crate::font::{Font, FontError, FontMetrics, GlyphId, Result, ScaledFontMetrics};
use crate::raster::GlyphMask;
use crate::shaping::{ShapeOutput, ShapeRequest, TextShaper};

type MaskCache = HashMap<(GlyphId, u32), Option<Arc<GlyphMask>>>;

/// Loaded font face backed by a font file (TTF/OTF).
///
/// This is a thin wrapper around `swash::FontRef` that owns the
/// underlying font data and exposes metrics, coverage and glyph masks.
/// Shaping goes through harfrust on the same bytes.
#[derive(Debug)]
pub struct FontFace {
    name: String,
    /// Full font data.
    data: Arc<[u8]>,
    /// Face index within the file (for collections).
    index: u32,
    /// Offset to the table directory for this font.
    offset: u32,
    /// Cache key used internally by swash.
    key: swash::CacheKey,
    /// Extracted font metrics in font units.
    metrics: FontMetrics,
    masks: Mutex<MaskCache>,
}

impl FontFace {
    /// Create a font face from raw bytes and a font index within the file.
    pub fn from_bytes(name: impl Into<String>, data: Arc<[u8]>, index: u32) -> Result<Self> {
        let font = FontRef::from_index(&data, index as usize).ok_or(FontError::InvalidFont)?;
        let metrics = Self::metrics_from_swash(&font);
        let (offset, key) = (font.offset, font.key);
        Ok(Self {
            name: name.into(),
            data,
            index,
            offset,
            key,
            metrics,
            masks: Mutex::new(HashMap::new()),
        })
    }

    /// Create a font face from a font file on disk.
    pub fn from_path(path: impl AsRef<std::path::Path>, index: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(name, Arc::from(data), index)
    }

    /// Raw font bytes, shared with the shaper.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Return a transient `FontRef` for interacting with swash APIs.
    fn as_swash_ref(&self) -> FontRef<'_> {
        FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        }
    }

    fn metrics_from_swash(font: &FontRef<'_>) -> FontMetrics {
        // Use default (no variation) coordinates.
        let Metrics {
            units_per_em,
            ascent,
            descent,
            leading,
            ..
        } = font.metrics(&[]);

        FontMetrics {
            ascent,
            descent,
            line_gap: leading,
            units_per_em,
        }
    }

    /// Font metrics in font units.
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Font metrics scaled to the requested pixel size (px per em).
    pub fn scaled_metrics(&self, font_size: f32) -> ScaledFontMetrics {
        self.metrics.scale_to_pixels(font_size)
    }

    fn render_mask(&self, glyph_id: GlyphId, font_size: f32) -> Option<GlyphMask> {
        let mut context = ScaleContext::new();
        let mut scaler = context
            .builder(self.as_swash_ref())
            .size(font_size)
            .hint(false)
            .build();
        let image = Render::new(&[
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
            Source::Bitmap(StrikeWith::BestFit),
        ])
        .format(Format::Alpha)
        .render(&mut scaler, glyph_id)?;

        let data = match image.content {
            Content::Mask => image.data,
            Content::Color => image.data.chunks_exact(4).map(|px| px[3]).collect(),
            Content::SubpixelMask => image
                .data
                .chunks_exact(4)
                .map(|px| px[0].max(px[1]).max(px[2]))
                .collect(),
        };
        Some(GlyphMask {
            left: image.placement.left,
            top: image.placement.top,
            width: image.placement.width,
            height: image.placement.height,
            data,
        })
    }
}

impl Font for FontFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn covers(&self, ch: char) -> bool {
        self.as_swash_ref().charmap().map(ch) != 0
    }

    fn shape(&self, request: &ShapeRequest<'_>) -> ShapeOutput {
        TextShaper::shape(self, request)
    }

    fn glyph_mask(&self, glyph_id: GlyphId, font_size: f32) -> Option<Arc<GlyphMask>> {
        let key = (glyph_id, font_size.to_bits());
        if let Ok(cache) = self.masks.lock() {
            if let Some(mask) = cache.get(&key) {
                return mask.clone();
            }
        }
        let mask = self.render_mask(glyph_id, font_size).map(Arc::new);
        if let Ok(mut cache) = self.masks.lock() {
            cache.insert(key, mask.clone());
        }
        mask
    }
}
