//! Adapter over the `qrcode` crate: text in, rasterized matrix out.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::error::EncodeError;
use crate::style::{Color, StyleConfig};

/// Edge length of the rasterized code, before compositor padding.
pub const DEFAULT_WIDTH: u32 = 400;
/// Quiet zone, in modules.
pub const DEFAULT_MARGIN: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeRequest {
    pub width: u32,
    pub margin: u32,
    pub dark: Color,
    pub light: Color,
}

impl EncodeRequest {
    pub fn for_style(style: &StyleConfig) -> Self {
        Self {
            width: DEFAULT_WIDTH,
            margin: DEFAULT_MARGIN,
            dark: style.foreground,
            light: style.background,
        }
    }
}

pub trait MatrixEncoder {
    /// Produces a `width × width` bitmap of a scannable code for `text`.
    fn encode(&self, text: &str, request: &EncodeRequest) -> Result<RgbaImage, EncodeError>;
}

/// Production encoder. Always requests the highest error correction level
/// so a centred logo can cover part of the matrix.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrMatrixEncoder;

impl MatrixEncoder for QrMatrixEncoder {
    fn encode(&self, text: &str, request: &EncodeRequest) -> Result<RgbaImage, EncodeError> {
        if request.width == 0 {
            return Err(EncodeError::EmptyCanvas);
        }
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::H)?;
        debug!(
            modules = code.width(),
            bytes = text.len(),
            "encoded payload"
        );
        Ok(rasterize(&code, request))
    }
}

/// Renders one pixel per module, surrounds it with `request.margin` light
/// modules and scales the result to exactly `request.width` pixels.
///
/// The renderer's own quiet zone is fixed at four modules and its sizing
/// only yields whole multiples of the grid, so both are done here.
pub fn rasterize(code: &QrCode, request: &EncodeRequest) -> RgbaImage {
    let light: Rgba<u8> = request.light.to_rgba();
    let modules = code
        .render::<Rgba<u8>>()
        .quiet_zone(false)
        .module_dimensions(1, 1)
        .dark_color(request.dark.to_rgba())
        .light_color(light)
        .build();

    let span = modules.width() + 2 * request.margin;
    let mut grid = RgbaImage::from_pixel(span, span, light);
    imageops::replace(
        &mut grid,
        &modules,
        i64::from(request.margin),
        i64::from(request.margin),
    );
    imageops::resize(&grid, request.width, request.width, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(width: u32) -> EncodeRequest {
        EncodeRequest {
            width,
            margin: DEFAULT_MARGIN,
            dark: Color::BLACK,
            light: Color::WHITE,
        }
    }

    #[test]
    fn bitmap_has_requested_width() {
        let img = QrMatrixEncoder
            .encode("tel:0901234567", &request(DEFAULT_WIDTH))
            .unwrap();
        assert_eq!(img.dimensions(), (DEFAULT_WIDTH, DEFAULT_WIDTH));
        // Quiet zone corner stays light; the finder pattern corner is dark.
        assert_eq!(img.get_pixel(0, 0), &Color::WHITE.to_rgba());
        let inset = DEFAULT_WIDTH / 10;
        assert_eq!(img.get_pixel(inset, inset), &Color::BLACK.to_rgba());
    }

    #[test]
    fn uses_configured_colors() {
        let req = EncodeRequest {
            dark: Color::rgb(10, 20, 30),
            light: Color::rgb(240, 230, 220),
            ..request(200)
        };
        let img = QrMatrixEncoder.encode("hello", &req).unwrap();
        for p in img.pixels() {
            assert!(*p == req.dark.to_rgba() || *p == req.light.to_rgba());
        }
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let text = "x".repeat(3000);
        let err = QrMatrixEncoder.encode(&text, &request(DEFAULT_WIDTH)).unwrap_err();
        assert!(matches!(err, EncodeError::Capacity(_)));
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = QrMatrixEncoder.encode("hello", &request(0)).unwrap_err();
        assert!(matches!(err, EncodeError::EmptyCanvas));
    }

    #[test]
    fn rasterize_maps_modules_onto_pixels() {
        // One pixel per module: the grid shows through unscaled.
        let code = QrCode::with_error_correction_level(b"hello", EcLevel::H).unwrap();
        let modules = code.width() as u32;
        let req = EncodeRequest {
            width: modules + 2,
            margin: 1,
            ..request(0)
        };
        let img = rasterize(&code, &req);
        assert_eq!(img.dimensions(), (modules + 2, modules + 2));
        for (i, color) in code.to_colors().iter().enumerate() {
            let (x, y) = (i as u32 % modules + 1, i as u32 / modules + 1);
            let expected = match color {
                qrcode::Color::Dark => Color::BLACK,
                qrcode::Color::Light => Color::WHITE,
            };
            assert_eq!(img.get_pixel(x, y), &expected.to_rgba(), "module {x},{y}");
        }
        for edge in 0..modules + 2 {
            assert_eq!(img.get_pixel(edge, 0), &Color::WHITE.to_rgba());
            assert_eq!(img.get_pixel(0, edge), &Color::WHITE.to_rgba());
        }
    }

    #[test]
    fn scaling_keeps_modules_square() {
        // 21 modules plus a 2-module margin is 25; 400 / 25 = 16px per module.
        let code = QrCode::with_error_correction_level(b"a", EcLevel::H).unwrap();
        assert_eq!(code.width(), 21);
        let img = rasterize(&code, &request(DEFAULT_WIDTH));
        let dark = Color::BLACK.to_rgba();
        let light = Color::WHITE.to_rgba();
        // Top-left finder: outer ring starts at module 2 and spans 7 modules.
        assert_eq!(img.get_pixel(31, 31), &light);
        assert_eq!(img.get_pixel(32, 32), &dark);
        assert_eq!(img.get_pixel(32 + 7 * 16 - 1, 32), &dark);
        assert_eq!(img.get_pixel(32 + 7 * 16, 32), &light);
    }
}
