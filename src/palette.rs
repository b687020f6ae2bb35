use crate::config::{ColorScheme, GlyphSet, Rgb};
use crate::error::TreeError;
use rand::prelude::*;

/// What a glyph represents on the tree
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlyphClass {
    Star,
    Body,
    Light,
    Stump,
    Unknown,  // Padding and anything not configured
}

/// Maps glyphs to colors. Lights get a fresh random color on every lookup.
#[derive(Clone, Debug)]
pub struct ColorMapper {
    glyphs: GlyphSet,
    colors: ColorScheme,
}

impl ColorMapper {
    pub fn new(glyphs: GlyphSet, colors: ColorScheme) -> Result<Self, TreeError> {
        colors.validate()?;
        Ok(Self { glyphs, colors })
    }

    /// First match wins: star, body, light, stump
    pub fn classify(&self, ch: char) -> GlyphClass {
        if ch == self.glyphs.star() {
            GlyphClass::Star
        } else if self.glyphs.is_body(ch) {
            GlyphClass::Body
        } else if self.glyphs.is_light(ch) {
            GlyphClass::Light
        } else if ch == self.glyphs.stump() {
            GlyphClass::Stump
        } else {
            GlyphClass::Unknown
        }
    }

    pub fn color_of(&self, ch: char, rng: &mut StdRng) -> Rgb {
        match self.classify(ch) {
            GlyphClass::Star => self.colors.star,
            GlyphClass::Body => self.colors.body,
            GlyphClass::Light => {
                let lights = &self.colors.lights;
                lights[rng.gen_range(0..lights.len())]
            }
            GlyphClass::Stump => self.colors.stump,
            GlyphClass::Unknown => self.colors.unknown,
        }
    }
}
