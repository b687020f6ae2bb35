use crate::error::TreeError;
use crate::shape::ShapeParams;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HEIGHT: usize = 20;
pub const DEFAULT_SEGMENTS: usize = 4;
pub const DEFAULT_INDENT: usize = 2;
pub const DEFAULT_FPS: f32 = 2.0;
pub const DEFAULT_BACKGROUND: Rgb = Rgb::new(0x26, 0x26, 0x26);
pub const DEFAULT_TITLE: &str = "Happy Christmas";

/// Fully resolved configuration for one run
#[derive(Clone, Debug)]
pub struct TreeConfig {
    pub shape: ShapeParams,
    pub glyphs: GlyphSet,
    pub colors: ColorScheme,
    pub fps: f32,
    pub background: Rgb,
    pub title: String,
    pub seed: Option<u64>,
    pub print: bool,
}

impl TreeConfig {
    /// Time budget of a single animation tick
    pub fn tick_interval(&self) -> Result<Duration, TreeError> {
        tick_interval(self.fps)
    }
}

pub fn tick_interval(fps: f32) -> Result<Duration, TreeError> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(TreeError::InvalidTickRate(fps));
    }
    Duration::try_from_secs_f32(1.0 / fps).map_err(|_| TreeError::InvalidTickRate(fps))
}

/// 24-bit color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Result<Self, TreeError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TreeError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| TreeError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl FromStr for Rgb {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = TreeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Characters the tree is built from, one set per glyph class.
///
/// `body` and `lights` also form the fill alphabet for the tree body, so a
/// character repeated in either string is drawn proportionally more often.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphSet {
    star: char,
    body: String,
    lights: String,
    stump: char,
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self {
            star: '+',
            body: "#####".to_string(),
            lights: "oO".to_string(),
            stump: 'H',
        }
    }
}

impl GlyphSet {
    /// Build a glyph set, rejecting whitespace and characters shared between classes
    pub fn new(
        star: char,
        body: impl Into<String>,
        lights: impl Into<String>,
        stump: char,
    ) -> Result<Self, TreeError> {
        let body = body.into();
        let lights = lights.into();

        let classes: [(&'static str, Vec<char>); 4] = [
            ("star", vec![star]),
            ("body", body.chars().collect()),
            ("lights", lights.chars().collect()),
            ("stump", vec![stump]),
        ];

        let mut owner: HashMap<char, &'static str> = HashMap::new();
        for (name, chars) in classes {
            for ch in chars {
                if ch.is_whitespace() {
                    return Err(TreeError::WhitespaceGlyph(name));
                }
                match owner.get(&ch) {
                    Some(&first) if first != name => {
                        return Err(TreeError::OverlappingGlyphs {
                            ch,
                            first,
                            second: name,
                        });
                    }
                    Some(_) => {}
                    None => {
                        owner.insert(ch, name);
                    }
                }
            }
        }

        if body.is_empty() && lights.is_empty() {
            return Err(TreeError::EmptyFill);
        }

        Ok(Self {
            star,
            body,
            lights,
            stump,
        })
    }

    pub fn star(&self) -> char {
        self.star
    }

    pub fn stump(&self) -> char {
        self.stump
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn lights(&self) -> &str {
        &self.lights
    }

    pub fn is_body(&self, ch: char) -> bool {
        self.body.contains(ch)
    }

    pub fn is_light(&self, ch: char) -> bool {
        self.lights.contains(ch)
    }

    /// Weighted alphabet for the tree body: body glyphs first, then lights
    pub fn fill_alphabet(&self) -> Vec<char> {
        self.body.chars().chain(self.lights.chars()).collect()
    }

    /// Every character that can appear in a generated tree, padding included
    pub fn all_glyphs(&self) -> impl Iterator<Item = char> + '_ {
        [self.star, self.stump, ' ']
            .into_iter()
            .chain(self.body.chars())
            .chain(self.lights.chars())
    }
}

/// Color scheme for rendering
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorScheme {
    pub star: Rgb,
    pub body: Rgb,
    pub stump: Rgb,
    pub unknown: Rgb,
    pub lights: Vec<Rgb>,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            star: Rgb::new(232, 189, 32),  // Gold
            body: Rgb::new(50, 150, 50),   // Pine green
            stump: Rgb::new(150, 80, 10),  // Brown
            unknown: Rgb::new(255, 255, 255),
            lights: vec![
                Rgb::new(255, 0, 0),
                Rgb::new(128, 255, 0),
                Rgb::new(0, 128, 255),
                Rgb::new(255, 0, 255),
            ],
        }
    }
}

impl ColorScheme {
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.lights.is_empty() {
            return Err(TreeError::EmptyLightPalette);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_glyphs_pass_validation() {
        let d = GlyphSet::default();
        let built = GlyphSet::new(d.star(), "#####", "oO", d.stump()).unwrap();
        assert_eq!(built, d);
        assert_eq!(d.fill_alphabet(), vec!['#', '#', '#', '#', '#', 'o', 'O']);
    }

    #[test]
    fn overlapping_glyphs_are_rejected() {
        let err = GlyphSet::new('+', "#o", "oO", 'H').unwrap_err();
        match err {
            TreeError::OverlappingGlyphs { ch, first, second } => {
                assert_eq!(ch, 'o');
                assert_eq!(first, "body");
                assert_eq!(second, "lights");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(GlyphSet::new('H', "#", "o", 'H').is_err());
        assert!(GlyphSet::new('+', "#+", "o", 'H').is_err());
    }

    #[test]
    fn repeated_glyph_within_a_class_is_a_weight() {
        let glyphs = GlyphSet::new('*', "^^^", "@", '|').unwrap();
        assert_eq!(glyphs.fill_alphabet(), vec!['^', '^', '^', '@']);
    }

    #[test]
    fn whitespace_and_empty_fill_are_rejected() {
        assert!(matches!(
            GlyphSet::new(' ', "#", "o", 'H'),
            Err(TreeError::WhitespaceGlyph("star"))
        ));
        assert!(matches!(
            GlyphSet::new('+', "# ", "o", 'H'),
            Err(TreeError::WhitespaceGlyph("body"))
        ));
        assert!(matches!(GlyphSet::new('+', "", "", 'H'), Err(TreeError::EmptyFill)));
        assert!(GlyphSet::new('+', "", "o", 'H').is_ok());
    }

    #[test]
    fn parse_hex_colors() {
        assert_eq!(Rgb::from_hex("#262626").unwrap(), DEFAULT_BACKGROUND);
        assert_eq!("e8bd20".parse::<Rgb>().unwrap(), Rgb::new(232, 189, 32));
        assert_eq!(Rgb::new(0, 128, 255).to_string(), "#0080ff");
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn tick_interval_from_fps() {
        assert_eq!(tick_interval(2.0).unwrap(), Duration::from_millis(500));
        assert!(tick_interval(0.0).is_err());
        assert!(tick_interval(-1.0).is_err());
        assert!(tick_interval(f32::NAN).is_err());
        assert!(tick_interval(1e-30).is_err());
    }

    #[test]
    fn empty_light_palette_is_rejected() {
        let mut colors = ColorScheme::default();
        assert!(colors.validate().is_ok());
        colors.lights.clear();
        assert!(matches!(colors.validate(), Err(TreeError::EmptyLightPalette)));
    }
}
