//! 3x5 bitmap font for timestep labels.

use image::{Rgba, RgbaImage};

pub const GLYPH_WIDTH: u32 = 3;
pub const GLYPH_HEIGHT: u32 = 5;

/// Rows top to bottom, most significant of the low three bits is the left column.
fn glyph(c: char) -> Option<[u8; 5]> {
    let rows = match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        _ => return None,
    };
    Some(rows)
}

/// Pixel extent of `text` at the given block scale (one blank column between glyphs).
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    let n = text.chars().count() as u32;
    if n == 0 {
        return (0, 0);
    }
    let width = (n * GLYPH_WIDTH + (n - 1)) * scale;
    (width, GLYPH_HEIGHT * scale)
}

/// Draw `text` centred on `(cx, cy)`. Pixels falling outside the canvas are
/// clipped; unknown characters leave a blank cell.
pub fn draw_text_centered(
    canvas: &mut RgbaImage,
    text: &str,
    cx: f64,
    cy: f64,
    scale: u32,
    color: Rgba<u8>,
) {
    let scale = scale.max(1);
    let (width, height) = text_size(text, scale);
    let left = (cx - width as f64 / 2.0).round() as i64;
    let top = (cy - height as f64 / 2.0).round() as i64;

    for (index, c) in text.chars().enumerate() {
        let Some(rows) = glyph(c) else { continue };
        let glyph_left = left + (index as i64) * ((GLYPH_WIDTH + 1) * scale) as i64;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let x0 = glyph_left + (col * scale) as i64;
                let y0 = top + (row as u32 * scale) as i64;
                fill_block(canvas, x0, y0, scale, color);
            }
        }
    }
}

fn fill_block(canvas: &mut RgbaImage, x0: i64, y0: i64, size: u32, color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();
    for y in y0..y0 + size as i64 {
        for x in x0..x0 + size as i64 {
            if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}
