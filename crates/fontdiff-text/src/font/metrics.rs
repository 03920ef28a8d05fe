/// Font-level metrics in font units.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    /// Ascent above baseline (positive).
    pub ascent: f32,
    /// Descent below baseline (positive).
    pub descent: f32,
    /// Line gap (leading).
    pub line_gap: f32,
    /// Units per em.
    pub units_per_em: u16,
}

impl FontMetrics {
    /// Pixels per font unit at `font_size` px per em.
    pub fn scale(&self, font_size: f32) -> f32 {
        if self.units_per_em != 0 {
            font_size / self.units_per_em as f32
        } else {
            1.0
        }
    }

    /// Scale metrics to pixel size, where `font_size` is in pixels per em.
    pub fn scale_to_pixels(&self, font_size: f32) -> ScaledFontMetrics {
        let scale = self.scale(font_size);
        ScaledFontMetrics {
            ascender: self.ascent * scale,
            descender: -self.descent * scale,
            line_gap: self.line_gap * scale,
            font_size,
        }
    }
}

/// Scaled font metrics in pixels.
///
/// The descender follows the line convention: it is the signed offset of the
/// lowest extent from the baseline and therefore never positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledFontMetrics {
    pub ascender: f32,
    pub descender: f32,
    pub line_gap: f32,
    pub font_size: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_to_signed_descender() {
        let metrics = FontMetrics {
            ascent: 800.0,
            descent: 200.0,
            line_gap: 0.0,
            units_per_em: 1000,
        };
        let scaled = metrics.scale_to_pixels(20.0);
        assert_eq!(scaled.ascender, 16.0);
        assert_eq!(scaled.descender, -4.0);
    }

    #[test]
    fn zero_units_per_em_does_not_divide() {
        let metrics = FontMetrics {
            ascent: 10.0,
            descent: 2.0,
            line_gap: 0.0,
            units_per_em: 0,
        };
        assert_eq!(metrics.scale(12.0), 1.0);
    }
}
