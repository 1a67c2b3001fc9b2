//! Logo placement and pasting onto a rendered QR code

use crate::logo::Logo;
use image::{Rgb, RgbImage, RgbaImage};
use serde::Serialize;

/// Where the logo lands on the QR image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Side length of the (square) logo in pixels
    pub size: u32,
}

/// Centered square of side `floor(width * ratio)`.
pub fn logo_placement(width: u32, height: u32, ratio: f64) -> Placement {
    let size = (f64::from(width) * ratio).floor() as u32;
    Placement {
        x: width.saturating_sub(size) / 2,
        y: height.saturating_sub(size) / 2,
        size,
    }
}

/// Paste `top` onto `base` with its top-left corner at `(x, y)`.
///
/// With `masked` set, `top`'s alpha channel weights each pixel against the
/// base; otherwise color channels are copied as is and alpha is ignored.
/// Pixels falling outside `base` are clipped.
pub fn paste(base: &mut RgbImage, top: &RgbaImage, x: u32, y: u32, masked: bool) {
    for (dx, dy, pixel) in top.enumerate_pixels() {
        let (tx, ty) = (x + dx, y + dy);
        if tx >= base.width() || ty >= base.height() {
            continue;
        }

        let [r, g, b, a] = pixel.0;
        if !masked || a == 255 {
            base.put_pixel(tx, ty, Rgb([r, g, b]));
        } else if a > 0 {
            let bg = base.get_pixel(tx, ty).0;
            base.put_pixel(
                tx,
                ty,
                Rgb([blend(r, bg[0], a), blend(g, bg[1], a), blend(b, bg[2], a)]),
            );
        }
    }
}

/// Resize `logo` relative to `qr` and paste it in the center.
pub fn overlay_logo(qr: &mut RgbImage, logo: &Logo, ratio: f64) -> Placement {
    let placement = logo_placement(qr.width(), qr.height(), ratio);
    if placement.size == 0 {
        return placement;
    }

    let resized = logo.resized(placement.size);
    paste(qr, &resized, placement.x, placement.y, logo.has_alpha());
    placement
}

fn blend(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(fg) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba};

    #[test]
    fn placement_is_centered_with_floor_division() {
        let p = logo_placement(330, 330, 0.25);
        assert_eq!(p, Placement { x: 124, y: 124, size: 82 });

        let p = logo_placement(490, 490, 0.25);
        assert_eq!(p.size, 122);
        assert_eq!((p.x, p.y), (184, 184));

        let p = logo_placement(3, 3, 0.25);
        assert_eq!(p.size, 0);
    }

    #[test]
    fn opaque_paste_ignores_alpha() {
        let mut base = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        let top = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 0]));
        paste(&mut base, &top, 1, 1, false);
        assert_eq!(*base.get_pixel(1, 1), Rgb([10, 20, 30]));
        assert_eq!(*base.get_pixel(2, 2), Rgb([10, 20, 30]));
        assert_eq!(*base.get_pixel(0, 0), Rgb([255, 255, 255]));
        assert_eq!(*base.get_pixel(3, 3), Rgb([255, 255, 255]));
    }

    #[test]
    fn masked_paste_blends_by_alpha() {
        let mut base = RgbImage::from_pixel(3, 1, Rgb([0, 0, 0]));
        let mut top = RgbaImage::new(3, 1);
        top.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
        top.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        top.put_pixel(2, 0, Rgba([255, 255, 255, 128]));
        paste(&mut base, &top, 0, 0, true);

        assert_eq!(*base.get_pixel(0, 0), Rgb([0, 0, 0]));
        assert_eq!(*base.get_pixel(1, 0), Rgb([255, 255, 255]));
        assert_eq!(*base.get_pixel(2, 0), Rgb([128, 128, 128]));
    }

    #[test]
    fn paste_clips_to_base() {
        let mut base = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        let top = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        paste(&mut base, &top, 1, 1, true);
        assert_eq!(*base.get_pixel(1, 1), Rgb([9, 9, 9]));
        assert_eq!(*base.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn overlay_covers_center_square() {
        let mut qr = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        let logo = Logo::from_image(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            7,
            7,
            Rgb([200, 0, 0]),
        )));
        let p = overlay_logo(&mut qr, &logo, 0.25);

        assert_eq!(p, Placement { x: 37, y: 37, size: 25 });
        assert_eq!(*qr.get_pixel(50, 50), Rgb([200, 0, 0]));
        assert_eq!(*qr.get_pixel(36, 36), Rgb([255, 255, 255]));
        assert_eq!(*qr.get_pixel(62, 62), Rgb([255, 255, 255]));
    }
}
