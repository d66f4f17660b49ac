use crate::model::OverflowAxis;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlyphPackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid atlas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Atlas of {width}x{height} exceeds the maximum dimension {max}")]
    AtlasTooLarge { width: u32, height: u32, max: u32 },
    #[error(
        "Atlas {width}x{height} overflowed along {axis} after placing {placed} of {total} glyphs"
    )]
    PackingOverflow {
        placed: usize,
        total: usize,
        width: u32,
        height: u32,
        axis: OverflowAxis,
    },
    #[error("Palette needs {colors} colors but the bit depth holds only {capacity}")]
    PaletteOverflow { colors: usize, capacity: usize },
    #[error("No glyphs found in the sprite sheet")]
    Empty,
    #[error("Encoding error: {0}")]
    Encode(String),
}

impl From<png::EncodingError> for GlyphPackerError {
    fn from(e: png::EncodingError) -> Self {
        match e {
            png::EncodingError::IoError(io) => GlyphPackerError::Io(io),
            other => GlyphPackerError::Encode(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GlyphPackerError>;
