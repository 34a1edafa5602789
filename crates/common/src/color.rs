use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Linear-ish RGB colour with components in `[0, 1]`.
///
/// Parsed from and printed as `#rrggbb` so configuration files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Errors from parsing a hex colour string.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("colour must look like #rrggbb, got {0:?}")]
    Format(String),
}

impl Rgb {
    pub const BLACK: Self = Self::from_hex(0x000000);

    /// Build from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }

    /// RGBA array with the given alpha, as GPU uniforms expect.
    pub fn with_alpha(self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }

    pub fn scaled(self, k: f32) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
        }
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .filter(|d| d.len() == 6)
            .ok_or_else(|| ColorParseError::Format(s.to_string()))?;
        let hex =
            u32::from_str_radix(digits, 16).map_err(|_| ColorParseError::Format(s.to_string()))?;
        Ok(Self::from_hex(hex))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

/// Named colours used by the scene.
pub struct Palette;

impl Palette {
    pub const NIGHT_OWL_BLUE: Rgb = Rgb::from_hex(0x011627);
    pub const LIGHT_CREAM: Rgb = Rgb::from_hex(0xfffdd0);
    pub const CLASSIC_BLUE: Rgb = Rgb::from_hex(0x0f4c81);
    pub const BLACK: Rgb = Rgb::BLACK;
}
