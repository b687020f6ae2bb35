use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop the tree from being drawn.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("tree height must be at least 1")]
    ZeroHeight,

    #[error("segment count must be at least 1")]
    ZeroSegments,

    #[error("tick rate must be a positive number of frames per second, got {0}")]
    InvalidTickRate(f32),

    /// The same character was configured for two glyph classes.
    #[error("glyph '{ch}' is used for both {first} and {second}")]
    OverlappingGlyphs {
        ch: char,
        first: &'static str,
        second: &'static str,
    },

    #[error("glyph for {0} must not be whitespace")]
    WhitespaceGlyph(&'static str),

    #[error("body and light glyphs are both empty, nothing to fill the tree with")]
    EmptyFill,

    #[error("light palette must contain at least one color")]
    EmptyLightPalette,

    #[error("invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
