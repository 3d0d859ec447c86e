use std::fmt;
use std::str::FromStr;

use anyhow::{Result, ensure};
use image::Rgba;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::UnknownVariant;

pub const MIN_LOGO_SIZE: u8 = 10;
pub const MAX_LOGO_SIZE: u8 = 30;

/// Opaque 8-bit RGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Self = Self([0x00, 0x00, 0x00]);
    pub const WHITE: Self = Self([0xFF, 0xFF, 0xFF]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.0[0], self.0[1], self.0[2], 255])
    }

    /// Linear interpolation in sRGB space, `t` in `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self([
            mix(self.0[0], other.0[0]),
            mix(self.0[1], other.0[1]),
            mix(self.0[2], other.0[2]),
        ])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid color `{0}`, expected #RRGGBB or #RGB")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        // from_str_radix alone would accept a sign
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
        match hex.len() {
            6 => Ok(Self([
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            ])),
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Self([short(0)?, short(1)?, short(2)?]))
            }
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderKind {
    None,
    #[default]
    Solid,
    Dashed,
    /// Fixed blue-purple-pink gradient; the configured border color is not
    /// used.
    Gradient,
}

impl BorderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Gradient => "gradient",
        }
    }
}

impl fmt::Display for BorderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BorderKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "gradient" => Ok(Self::Gradient),
            _ => Err(UnknownVariant {
                kind: "border style",
                value: s.to_string(),
                expected: "none, solid, dashed, gradient",
            }),
        }
    }
}

/// Cosmetic settings for one render. All fields are independent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StyleConfig {
    pub foreground: Color,
    pub background: Color,
    /// Logo edge length as a percentage of the QR bitmap width.
    pub logo_size: u8,
    pub border: BorderKind,
    pub border_color: Color,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: Color::WHITE,
            logo_size: 20,
            border: BorderKind::Solid,
            border_color: Color::rgb(0x3B, 0x82, 0xF6),
        }
    }
}

impl StyleConfig {
    /// Sets the logo size, clamped to the supported range.
    pub fn set_logo_size(&mut self, percent: u8) {
        let clamped = percent.clamp(MIN_LOGO_SIZE, MAX_LOGO_SIZE);
        if clamped != percent {
            warn!(requested = percent, used = clamped, "logo size out of range");
        }
        self.logo_size = clamped;
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            (MIN_LOGO_SIZE..=MAX_LOGO_SIZE).contains(&self.logo_size),
            "logo-size must be between {MIN_LOGO_SIZE} and {MAX_LOGO_SIZE}, got {}",
            self.logo_size
        );
        Ok(())
    }
}
