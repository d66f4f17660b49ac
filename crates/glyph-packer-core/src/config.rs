use crate::error::{GlyphPackerError, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Border thickness in pixels written around every packed glyph.
pub const BORDER: u32 = 1;

/// Reserved background color separating glyphs in the source and padding them in the atlas.
/// Parses from `rrggbb` or `rrggbbaa` hex (leading `#` optional); serialized as `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyColor(pub [u8; 4]);

impl KeyColor {
    /// Opaque magenta, `(255, 0, 255, 255)`.
    pub const MAGENTA: KeyColor = KeyColor([255, 0, 255, 255]);

    #[inline]
    pub fn rgba(self) -> Rgba<u8> {
        Rgba(self.0)
    }

    #[inline]
    pub fn matches(self, px: &Rgba<u8>) -> bool {
        px.0 == self.0
    }
}

impl Default for KeyColor {
    fn default() -> Self {
        Self::MAGENTA
    }
}

impl FromStr for KeyColor {
    type Err = GlyphPackerError;
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GlyphPackerError::InvalidInput(format!(
                "key color must be rrggbb or rrggbbaa hex, got {s:?}"
            )));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| GlyphPackerError::InvalidInput(format!("key color {s:?}: {e}")))
        };
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(KeyColor([byte(0)?, byte(2)?, byte(4)?, a]))
    }
}

impl fmt::Display for KeyColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

impl TryFrom<String> for KeyColor {
    type Error = GlyphPackerError;
    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<KeyColor> for String {
    fn from(c: KeyColor) -> Self {
        c.to_string()
    }
}

/// Order in which glyphs are fed to the shelf packer.
/// Every order is stable: ties keep extraction order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    HeightDesc,
    AreaDesc,
    MaxSideDesc,
    None,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "height_desc" => Ok(Self::HeightDesc),
            "area_desc" => Ok(Self::AreaDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

/// What to do when the estimated atlas cannot hold every glyph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Return `PackingOverflow`.
    Fail,
    /// Double the overflowing side and lay out again, up to `max_dimension`.
    Grow,
}

impl FromStr for OverflowPolicy {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "grow" => Ok(Self::Grow),
            _ => Err(()),
        }
    }
}

/// What to do when the sprite sheet holds no glyph at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPolicy {
    /// Return `Empty`.
    Fail,
    /// Produce a 1x1 atlas filled with the key color.
    Blank,
}

impl FromStr for EmptyPolicy {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "blank" => Ok(Self::Blank),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackerConfig {
    /// Background color in the source and border color in the atlas.
    #[serde(default)]
    pub key_color: KeyColor,
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
    #[serde(default = "default_overflow_policy")]
    pub overflow_policy: OverflowPolicy,
    #[serde(default = "default_empty_policy")]
    pub empty_policy: EmptyPolicy,
    /// Largest side (power of two) the atlas may reach, estimate or growth alike.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            key_color: KeyColor::default(),
            sort_order: default_sort_order(),
            overflow_policy: default_overflow_policy(),
            empty_policy: default_empty_policy(),
            max_dimension: default_max_dimension(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if `max_dimension` is zero or not a power of two.
    pub fn validate(&self) -> Result<()> {
        if self.max_dimension == 0 {
            return Err(GlyphPackerError::InvalidDimensions {
                width: self.max_dimension,
                height: self.max_dimension,
            });
        }
        if !self.max_dimension.is_power_of_two() {
            return Err(GlyphPackerError::InvalidConfig(format!(
                "max_dimension ({}) must be a power of two",
                self.max_dimension
            )));
        }
        Ok(())
    }

    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

fn default_sort_order() -> SortOrder {
    SortOrder::HeightDesc
}
fn default_overflow_policy() -> OverflowPolicy {
    OverflowPolicy::Grow
}
fn default_empty_policy() -> EmptyPolicy {
    EmptyPolicy::Fail
}
fn default_max_dimension() -> u32 {
    16384
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn key_color(mut self, v: KeyColor) -> Self {
        self.cfg.key_color = v;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn overflow_policy(mut self, v: OverflowPolicy) -> Self {
        self.cfg.overflow_policy = v;
        self
    }
    pub fn empty_policy(mut self, v: EmptyPolicy) -> Self {
        self.cfg.empty_policy = v;
        self
    }
    pub fn max_dimension(mut self, v: u32) -> Self {
        self.cfg.max_dimension = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}
