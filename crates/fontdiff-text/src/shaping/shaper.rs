use harfrust::{
    Direction as HbDirection,
    Feature as HbFeature,
    FontRef as HbFontRef,
    Language as HbLanguage,
    Script as HbScript,
    ShaperData,
    ShaperInstance,
    Tag as HbTag,
    UnicodeBuffer as HbUnicodeBuffer,
};
use unicode_script::Script;

use crate::font::FontFace;

use super::{ShapeOutput, ShapeRequest, ShapedGlyph};

/// Text shaper built on harfrust (pure-Rust HarfBuzz port).
pub struct TextShaper;

impl TextShaper {
    /// Shape one segment of text with `font`.
    ///
    /// Direction follows the bidi level, script and language come from the
    /// request, and style features are applied to the whole segment.
    pub fn shape(font: &FontFace, request: &ShapeRequest<'_>) -> ShapeOutput {
        let scaled = font.scaled_metrics(request.style.font_size);
        let mut output = ShapeOutput {
            glyphs: Vec::new(),
            ascender: scaled.ascender,
            descender: scaled.descender,
        };
        if request.range.start >= request.range.end {
            return output;
        }

        let font_ref = match HbFontRef::from_index(font.data(), font.index()) {
            Ok(font_ref) => font_ref,
            Err(err) => {
                log::warn!("harfrust rejected font data: {err:?}");
                return output;
            }
        };

        // Shaper configuration with default (no variations) instance.
        let data = ShaperData::new(&font_ref);
        let instance = ShaperInstance::from_variations(
            &font_ref,
            core::iter::empty::<harfrust::Variation>(),
        );
        let shaper = data
            .shaper(&font_ref)
            .instance(Some(&instance))
            .point_size(None)
            .build();

        let mut buffer = HbUnicodeBuffer::new();
        buffer.push_str(request.segment());
        buffer.set_direction(if request.is_rtl() {
            HbDirection::RightToLeft
        } else {
            HbDirection::LeftToRight
        });
        if let Some(script) = harfrust_script(request.script) {
            buffer.set_script(script);
        }
        if let Some(language) = request
            .style
            .language()
            .and_then(|lang| lang.tag().parse::<HbLanguage>().ok())
        {
            buffer.set_language(language);
        }
        // Let harfrust fill in any remaining segment properties.
        buffer.guess_segment_properties();

        let features: Vec<HbFeature> = request
            .style
            .features
            .iter()
            .map(|f| HbFeature::new(HbTag::new(&f.tag), f.value, ..))
            .collect();

        let glyph_buffer = shaper.shape(buffer, &features);
        let infos = glyph_buffer.glyph_infos();
        let positions = glyph_buffer.glyph_positions();

        // harfrust uses design units; convert to pixels.
        let scale = font.metrics().scale(request.style.font_size);
        output.glyphs = infos
            .iter()
            .zip(positions.iter())
            .map(|(info, pos)| ShapedGlyph {
                glyph_id: info.glyph_id as u16,
                cluster: request.range.start + info.cluster as usize,
                x_advance: pos.x_advance as f32 * scale,
                x_offset: pos.x_offset as f32 * scale,
                y_offset: pos.y_offset as f32 * scale,
            })
            .collect();
        output
    }
}

/// Map a Unicode script to harfrust's script through its ISO 15924 tag.
fn harfrust_script(script: Script) -> Option<HbScript> {
    let tag: [u8; 4] = script.short_name().as_bytes().try_into().ok()?;
    HbScript::from_iso15924_tag(HbTag::new(&tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_common_scripts() {
        assert!(harfrust_script(Script::Latin).is_some());
        assert!(harfrust_script(Script::Arabic).is_some());
        assert!(harfrust_script(Script::Hebrew).is_some());
    }
}
