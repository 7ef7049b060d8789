use crate::error::LayoutError;
use owned_ttf_parser::{AsFaceRef, GlyphId, OwnedFace};
use std::fmt;

/// Horizontal advance and bounding box of a single glyph, in 1/1000 of an em
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    pub width: f32,
    /// `[x_min, y_min, x_max, y_max]`, if the glyph has an outline
    pub bbox: Option<[f32; 4]>,
}

/// The metrics text layout needs from a font. All values are in glyph space,
/// i.e. in 1/1000 of an em, and get scaled by `font_size / 1000` when used.
pub trait FontMetrics: fmt::Debug {
    fn glyph(&self, ch: char) -> GlyphMetrics;

    /// Distance from the baseline to the top of the font
    fn ascender(&self) -> f32;

    /// Distance from the baseline to the bottom of the font. Note: this is usually negative
    fn descender(&self) -> f32;

    /// The name of the font in the resource dictionary of the page it is used on
    fn resource_name(&self) -> &str;

    /// Append the bytes that select the glyph for `ch` in a content stream
    fn encode(&self, ch: char, out: &mut Vec<u8>);
}

/// A parsed TrueType or OpenType font. Text using it is encoded with 2-byte glyph
/// ids, as expected by a Type0 font with the `Identity-H` encoding
pub struct Font {
    pub face: OwnedFace,
    resource_name: String,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load<S: Into<String>>(bytes: Vec<u8>, resource_name: S) -> Result<Font, LayoutError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font {
            face,
            resource_name: resource_name.into(),
        })
    }

    /// Obtain the full name of the font, if it has one
    pub fn name(&self) -> Option<String> {
        self.face
            .as_face_ref()
            .names()
            .into_iter()
            .find(|name| name.name_id == owned_ttf_parser::name_id::FULL_NAME && name.is_unicode())
            .and_then(|name| name.to_string())
    }

    fn scaling(&self) -> f32 {
        1000.0 / self.face.as_face_ref().units_per_em() as f32
    }

    /// The glyph for `ch`, falling back to the replacement character or `?` when the
    /// font doesn't cover it
    fn glyph_id(&self, ch: char) -> GlyphId {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .unwrap_or(GlyphId(0))
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("resource_name", &self.resource_name)
            .field("name", &self.name())
            .finish()
    }
}

impl FontMetrics for Font {
    fn glyph(&self, ch: char) -> GlyphMetrics {
        let face = self.face.as_face_ref();
        let id = self.glyph_id(ch);
        let scaling = self.scaling();
        GlyphMetrics {
            width: face.glyph_hor_advance(id).unwrap_or_default() as f32 * scaling,
            bbox: face.glyph_bounding_box(id).map(|r| {
                [
                    r.x_min as f32 * scaling,
                    r.y_min as f32 * scaling,
                    r.x_max as f32 * scaling,
                    r.y_max as f32 * scaling,
                ]
            }),
        }
    }

    fn ascender(&self) -> f32 {
        self.face.as_face_ref().ascender() as f32 * self.scaling()
    }

    fn descender(&self) -> f32 {
        self.face.as_face_ref().descender() as f32 * self.scaling()
    }

    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn encode(&self, ch: char, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.glyph_id(ch).0.to_be_bytes());
    }
}

/// A font where every glyph has the same advance, like the standard Courier font.
/// Text is encoded with one byte per character, characters outside of Latin-1
/// become `?`
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPitchFont {
    pub advance: f32,
    pub ascender: f32,
    pub descender: f32,
    pub resource_name: String,
}

impl FixedPitchFont {
    /// The metrics of the standard 14 Courier font
    pub fn courier() -> FixedPitchFont {
        FixedPitchFont {
            advance: 600.0,
            ascender: 629.0,
            descender: -157.0,
            resource_name: "Courier".to_string(),
        }
    }
}

impl FontMetrics for FixedPitchFont {
    fn glyph(&self, ch: char) -> GlyphMetrics {
        let bbox = (!ch.is_whitespace()).then_some([0.0, self.descender, self.advance, self.ascender]);
        GlyphMetrics {
            width: self.advance,
            bbox,
        }
    }

    fn ascender(&self) -> f32 {
        self.ascender
    }

    fn descender(&self) -> f32 {
        self.descender
    }

    fn resource_name(&self) -> &str {
        &self.resource_name
    }

    fn encode(&self, ch: char, out: &mut Vec<u8>) {
        out.push(u8::try_from(u32::from(ch)).unwrap_or(b'?'));
    }
}
