//! PNG and SVG-wrapped PNG output.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::UnknownVariant;

pub const DEFAULT_FILE_NAME: &str = "qrcode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Png,
    /// The PNG embedded in an SVG `<image>`; not a vector re-encoding.
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            _ => Err(UnknownVariant {
                kind: "export format",
                value: s.to_string(),
                expected: "png, svg",
            }),
        }
    }
}

/// Replaces every character outside ASCII `[A-Za-z0-9]` with `_` and
/// lowercases the result. Empty input falls back to [`DEFAULT_FILE_NAME`].
pub fn sanitize_file_name(name: &str) -> String {
    let clean: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if clean.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else {
        clean
    }
}

pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            surface.as_raw(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .context("encoding PNG")?;
    Ok(bytes)
}

pub fn svg_wrapper(surface: &RgbaImage) -> Result<String> {
    let png = encode_png(surface)?;
    let (w, h) = surface.dimensions();
    Ok(format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\">\n  \
         <image href=\"data:image/png;base64,{}\" width=\"{w}\" height=\"{h}\"/>\n</svg>\n",
        STANDARD.encode(png)
    ))
}

pub fn render(surface: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Png => encode_png(surface),
        ExportFormat::Svg => svg_wrapper(surface).map(String::into_bytes),
    }
}

/// Writes `<dir>/<sanitized name>.<ext>`, creating `dir` if needed.
pub fn write(surface: &RgbaImage, dir: &Path, name: &str, format: ExportFormat) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output dir {}", dir.display()))?;
    let path = dir.join(format!("{}.{}", sanitize_file_name(name), format.extension()));
    let bytes = render(surface, format)?;
    std::fs::write(&path, &bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), %format, "exported");
    Ok(path)
}
