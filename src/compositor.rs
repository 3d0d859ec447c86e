//! Layers background, code bitmap, decorative border and logo onto one
//! output surface.
//!
//! The border is stroked entirely inside the padding ring. Pixels of the
//! code bitmap are never written after step 3, so decoration cannot affect
//! scannability.

use std::f32::consts::{FRAC_PI_2, PI};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::style::{BorderKind, Color, StyleConfig};

/// Free space on every side of the code that hosts the border.
pub const PADDING: u32 = 40;
pub const BORDER_WIDTH: f32 = 8.0;
pub const BORDER_RADIUS: f32 = 15.0;
/// On/off lengths of the dashed border, in pixels along the outline.
pub const DASH_PATTERN: [f32; 2] = [15.0, 10.0];
pub const GRADIENT_STOPS: [(f32, Color); 3] = [
    (0.0, Color::rgb(0x3B, 0x82, 0xF6)),
    (0.5, Color::rgb(0x8B, 0x5C, 0xF6)),
    (1.0, Color::rgb(0xEC, 0x48, 0x99)),
];
/// Extra background around the logo, per side.
pub const LOGO_PATCH_MARGIN: u32 = 8;
const SHADOW_BLUR: f32 = 10.0;
const SHADOW_ALPHA: u8 = 51;

/// Steps 1-4: background, bitmap, border.
pub fn compose(bitmap: &RgbaImage, style: &StyleConfig) -> RgbaImage {
    let (bw, bh) = bitmap.dimensions();
    let mut surface = RgbaImage::from_pixel(
        bw + 2 * PADDING,
        bh + 2 * PADDING,
        style.background.to_rgba(),
    );
    imageops::replace(&mut surface, bitmap, PADDING as i64, PADDING as i64);
    if style.border != BorderKind::None {
        stroke_border(&mut surface, bw, bh, style);
    }
    debug!(
        width = surface.width(),
        height = surface.height(),
        border = %style.border,
        "composited surface"
    );
    surface
}

/// Rectangle of the code bitmap inside a composited surface.
pub fn bitmap_rect(surface: &RgbaImage) -> (u32, u32, u32, u32) {
    (
        PADDING,
        PADDING,
        surface.width().saturating_sub(2 * PADDING),
        surface.height().saturating_sub(2 * PADDING),
    )
}

fn stroke_border(surface: &mut RgbaImage, bw: u32, bh: u32, style: &StyleConfig) {
    let (sw, sh) = surface.dimensions();
    let half = BORDER_WIDTH / 2.0;
    let outline = RoundedRect {
        cx: PADDING as f32 + bw as f32 / 2.0,
        cy: PADDING as f32 + bh as f32 / 2.0,
        hx: (bw as f32 + BORDER_WIDTH) / 2.0,
        hy: (bh as f32 + BORDER_WIDTH) / 2.0,
        r: BORDER_RADIUS,
    };

    let x0 = PADDING.saturating_sub(BORDER_WIDTH as u32 + 1);
    let y0 = x0;
    let x1 = (PADDING + bw + BORDER_WIDTH as u32 + 1).min(sw);
    let y1 = (PADDING + bh + BORDER_WIDTH as u32 + 1).min(sh);
    let inside_bitmap =
        |x: u32, y: u32| x >= PADDING && x < PADDING + bw && y >= PADDING && y < PADDING + bh;

    for y in y0..y1 {
        for x in x0..x1 {
            if inside_bitmap(x, y) {
                continue;
            }
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let coverage = (half + 0.5 - outline.distance(px, py).abs()).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let color = match style.border {
                BorderKind::None => return,
                BorderKind::Solid => style.border_color,
                BorderKind::Dashed => {
                    let period = DASH_PATTERN[0] + DASH_PATTERN[1];
                    if outline.position(px, py) % period >= DASH_PATTERN[0] {
                        continue;
                    }
                    style.border_color
                }
                BorderKind::Gradient => gradient_at(px, py, sw as f32, sh as f32),
            };
            blend(surface.get_pixel_mut(x, y), color, coverage);
        }
    }
}

/// Linear gradient along the surface diagonal from (0,0) to (w,h).
fn gradient_at(x: f32, y: f32, w: f32, h: f32) -> Color {
    let t = ((x * w + y * h) / (w * w + h * h)).clamp(0.0, 1.0);
    let mut prev = GRADIENT_STOPS[0];
    for stop in GRADIENT_STOPS.iter().skip(1) {
        if t <= stop.0 {
            let span = (stop.0 - prev.0).max(f32::EPSILON);
            return prev.1.lerp(stop.1, (t - prev.0) / span);
        }
        prev = *stop;
    }
    prev.1
}

fn blend(dst: &mut Rgba<u8>, src: Color, alpha: f32) {
    for c in 0..3 {
        let d = dst[c] as f32;
        dst[c] = (d + (src.0[c] as f32 - d) * alpha).round() as u8;
    }
    dst[3] = 255;
}

/// Rounded rectangle centred on (cx, cy) with half extents (hx, hy).
#[derive(Debug, Clone, Copy)]
struct RoundedRect {
    cx: f32,
    cy: f32,
    hx: f32,
    hy: f32,
    r: f32,
}

impl RoundedRect {
    /// Signed distance to the outline, negative inside.
    fn distance(&self, px: f32, py: f32) -> f32 {
        let dx = (px - self.cx).abs() - (self.hx - self.r);
        let dy = (py - self.cy).abs() - (self.hy - self.r);
        let outside = dx.max(0.0).hypot(dy.max(0.0));
        let inside = dx.max(dy).min(0.0);
        outside + inside - self.r
    }

    /// Arc length along the outline of the point nearest to (px, py).
    /// Starts at the top edge just right of the top-left corner and runs
    /// clockwise.
    fn position(&self, px: f32, py: f32) -> f32 {
        let qx = px - self.cx;
        let qy = py - self.cy;
        let ix = self.hx - self.r;
        let iy = self.hy - self.r;
        let edge_x = 2.0 * ix;
        let edge_y = 2.0 * iy;
        let arc = FRAC_PI_2 * self.r;

        if qx.abs() > ix && qy.abs() > iy {
            let (ccx, ccy) = (ix.copysign(qx), iy.copysign(qy));
            let theta = (qy - ccy).atan2(qx - ccx);
            return match (qx > 0.0, qy > 0.0) {
                (true, false) => edge_x + self.r * (theta + FRAC_PI_2).clamp(0.0, FRAC_PI_2),
                (true, true) => edge_x + arc + edge_y + self.r * theta.clamp(0.0, FRAC_PI_2),
                (false, true) => {
                    2.0 * edge_x + 2.0 * arc + edge_y
                        + self.r * (theta - FRAC_PI_2).clamp(0.0, FRAC_PI_2)
                }
                (false, false) => {
                    2.0 * edge_x + 3.0 * arc + 2.0 * edge_y
                        + self.r * (theta + PI).clamp(0.0, FRAC_PI_2)
                }
            };
        }

        let horizontal = qx.abs() <= ix && (qy.abs() > iy || self.hy - qy.abs() <= self.hx - qx.abs());
        if horizontal {
            if qy < 0.0 {
                qx + ix
            } else {
                edge_x + 2.0 * arc + edge_y + (ix - qx)
            }
        } else if qx > 0.0 {
            edge_x + arc + (qy + iy)
        } else {
            2.0 * edge_x + 3.0 * arc + edge_y + (iy - qy)
        }
    }
}

/// Where the logo and its background patch land on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl LogoPlacement {
    pub fn new(surface_w: u32, surface_h: u32, bitmap_width: u32, logo_size: u8) -> Self {
        let size = (bitmap_width * logo_size as u32 / 100).max(1);
        let x = surface_w.saturating_sub(size) / 2;
        let y = surface_h.saturating_sub(size) / 2;
        Self { x, y, size }
    }

    /// Background patch under the logo.
    pub fn patch(&self) -> (i64, i64, u32) {
        let m = LOGO_PATCH_MARGIN;
        (
            self.x as i64 - m as i64,
            self.y as i64 - m as i64,
            self.size + 2 * m,
        )
    }
}

/// Step 5: shadowed background patch, then the logo scaled to size. Only
/// the patch, its shadow and the logo area are written.
pub fn stamp_logo(
    surface: &mut RgbaImage,
    bitmap_width: u32,
    logo: &RgbaImage,
    style: &StyleConfig,
) -> LogoPlacement {
    let placement = LogoPlacement::new(
        surface.width(),
        surface.height(),
        bitmap_width,
        style.logo_size,
    );
    let (patch_x, patch_y, patch_size) = placement.patch();

    let spread = SHADOW_BLUR as u32;
    let mut shadow = RgbaImage::new(patch_size + 2 * spread, patch_size + 2 * spread);
    for y in spread..spread + patch_size {
        for x in spread..spread + patch_size {
            shadow.put_pixel(x, y, Rgba([0, 0, 0, SHADOW_ALPHA]));
        }
    }
    let shadow = imageops::blur(&shadow, SHADOW_BLUR / 2.0);
    imageops::overlay(
        surface,
        &shadow,
        patch_x - spread as i64,
        patch_y - spread as i64,
    );

    let patch = RgbaImage::from_pixel(patch_size, patch_size, style.background.to_rgba());
    imageops::replace(surface, &patch, patch_x, patch_y);

    let scaled = imageops::resize(logo, placement.size, placement.size, FilterType::Triangle);
    imageops::overlay(surface, &scaled, placement.x as i64, placement.y as i64);
    debug!(size = placement.size, x = placement.x, y = placement.y, "stamped logo");
    placement
}
