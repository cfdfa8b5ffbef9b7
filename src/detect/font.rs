//! A tiny fixed 5x7 bitmap font covering the glyphs the overlays need.
//! Unknown characters render as a hollow box.

use image::{Rgb, RgbImage};

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance per character, including a one-column gap.
pub const ADVANCE: u32 = GLYPH_WIDTH + 1;

const FALLBACK: [u8; 7] = [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F];

/// Row bitmaps, most significant of the low five bits on the left.
fn glyph(c: char) -> [u8; 7] {
    match c {
        ' ' => [0x00; 7],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'a' => [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
        'g' => [0x00, 0x00, 0x0F, 0x11, 0x0F, 0x01, 0x0E],
        'i' => [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
        'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
        'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        _ => FALLBACK,
    }
}

/// Rasterize `text` with its top-left corner at (x, y), scaled up by
/// `scale`. Pixels falling outside the image are clipped.
pub fn draw_text(image: &mut RgbImage, text: &str, x: i32, y: i32, color: Rgb<u8>, scale: u32) {
    let (width, height) = image.dimensions();
    let mut cx = x;
    for c in text.chars() {
        let rows = glyph(c);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    for sx in 0..scale {
                        let px = cx + (col * scale + sx) as i32;
                        let py = y + (row as u32 * scale + sy) as i32;
                        if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                            image.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
        cx += (ADVANCE * scale) as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lands_within_its_nominal_box() {
        let mut image = RgbImage::new(100, 20);
        let color = Rgb([255, 0, 0]);
        draw_text(&mut image, "Warning", 2, 3, color, 1);

        let lit: Vec<(u32, u32)> = image
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == color)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!lit.is_empty());
        let width = ADVANCE * 7;
        assert!(lit.iter().all(|&(x, y)| {
            x >= 2 && x < 2 + width && y >= 3 && y < 3 + GLYPH_HEIGHT
        }));
    }

    #[test]
    fn offscreen_text_is_clipped_not_panicking() {
        let mut image = RgbImage::new(10, 10);
        draw_text(&mut image, "W", -3, -4, Rgb([1, 2, 3]), 2);
        draw_text(&mut image, "W", 8, 8, Rgb([1, 2, 3]), 2);
    }
}
