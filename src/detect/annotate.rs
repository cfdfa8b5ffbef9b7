use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

use super::font;
use super::regions::{Band, Region};

pub const TRACKER_COLOR: Rgb<u8> = Rgb([0, 128, 255]);
pub const WARNING_COLOR: Rgb<u8> = Rgb([255, 201, 24]);
pub const TEXT_COLOR: Rgb<u8> = Rgb([255, 201, 24]);
pub const LABEL_BACKGROUND: Rgb<u8> = Rgb([49, 49, 49]);
const HIGHLIGHT: Rgb<u8> = Rgb([255, 255, 255]);
const CAPTION_OUTLINE: Rgb<u8> = Rgb([32, 32, 32]);

const TRACK_THICKNESS: i32 = 10;
const WARNING_THICKNESS: i32 = 2;
const LABEL_WIDTH: u32 = 120;
const LABEL_HEIGHT: u32 = 13;
/// Caption baseline position on the masked composite.
const CAPTION_ANCHOR: (i32, i32) = (10, 50);
const CAPTION_SCALE: u32 = 2;

/// Draw the overlays one classified region earns, in place.
pub fn draw_region(frame: &mut RgbImage, region: &Region, band: Band) {
    if band == Band::Ignored {
        return;
    }

    // bordered look: thick tracker pass, thin white highlight
    draw_outline(frame, &region.boundary, TRACKER_COLOR, TRACK_THICKNESS);
    draw_outline(frame, &region.boundary, HIGHLIGHT, 1);

    if band == Band::Warning {
        let x = region.bounding_box.left();
        let y = region.bounding_box.top();
        draw_filled_rect_mut(
            frame,
            Rect::at(x, y - LABEL_HEIGHT as i32).of_size(LABEL_WIDTH, LABEL_HEIGHT),
            LABEL_BACKGROUND,
        );
        font::draw_text(frame, "Warning", x + 2, y - 11, TEXT_COLOR, 1);
        draw_outline(frame, &region.boundary, WARNING_COLOR, WARNING_THICKNESS);
        draw_outline(frame, &region.boundary, WARNING_COLOR, 1);
    }
}

/// Per-pixel AND of the annotated frame with the cleaned mask: pixels the
/// mask rejects go black, the rest keep their annotated color.
pub fn composite(frame: &RgbImage, mask: &GrayImage) -> RgbImage {
    let mut out = frame.clone();
    for (x, y, pixel) in out.enumerate_pixels_mut() {
        if mask.get_pixel(x, y)[0] == 0 {
            *pixel = Rgb([0, 0, 0]);
        }
    }
    out
}

/// Two-pass caption naming the active algorithm: a dark outline pass for
/// legibility, then the colored fill.
pub fn draw_caption(image: &mut RgbImage, label: &str) {
    let (x, baseline) = CAPTION_ANCHOR;
    let y = baseline - (font::GLYPH_HEIGHT * CAPTION_SCALE) as i32;
    for (dx, dy) in [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ] {
        font::draw_text(image, label, x + dx, y + dy, CAPTION_OUTLINE, CAPTION_SCALE);
    }
    font::draw_text(image, label, x, y, TEXT_COLOR, CAPTION_SCALE);
}

/// Trace a closed polygon through the boundary points. Thickness above one
/// stamps a disc along each edge; one draws plain line segments.
fn draw_outline(frame: &mut RgbImage, boundary: &[Point<i32>], color: Rgb<u8>, thickness: i32) {
    let n = boundary.len();
    if n == 0 {
        return;
    }
    if n == 1 {
        let p = boundary[0];
        draw_filled_circle_mut(frame, (p.x, p.y), (thickness / 2).max(0), color);
        return;
    }
    for i in 0..n {
        let a = boundary[i];
        let b = boundary[(i + 1) % n];
        if thickness <= 1 {
            draw_line_segment_mut(
                frame,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                color,
            );
        } else {
            stamp_edge(frame, a, b, color, thickness / 2);
        }
    }
}

fn stamp_edge(frame: &mut RgbImage, a: Point<i32>, b: Point<i32>, color: Rgb<u8>, radius: i32) {
    let dx = (b.x - a.x) as f32;
    let dy = (b.y - a.y) as f32;
    let steps = dx.abs().max(dy.abs()).ceil() as i32;
    for s in 0..=steps {
        let t = if steps == 0 { 0.0 } else { s as f32 / steps as f32 };
        let x = a.x as f32 + t * dx;
        let y = a.y as f32 + t * dy;
        draw_filled_circle_mut(frame, (x.round() as i32, y.round() as i32), radius, color);
    }
}
