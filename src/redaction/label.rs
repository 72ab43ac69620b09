//! 区域中央的 "REDACTED" 标签
//!
//! 用 5x7 点阵字模绘制，按目标字号最近邻缩放。

use image::RgbImage;

use super::effects::{blend, ACCENT};
use super::geometry::PixelRect;

pub const LABEL_TEXT: &str = "REDACTED";
pub const LABEL_ALPHA: f32 = 0.8;
pub const LABEL_MAX_SIZE: f32 = 12.0;
/// 基线距离区域底边
pub const LABEL_BASELINE_OFFSET: u32 = 5;

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// 只收录标签用到的字母，每行低 5 位，最高位在左
fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        _ => return None,
    };
    Some(rows)
}

/// 区域够大才画标签
pub fn fits(rect: PixelRect) -> bool {
    rect.width > 40 && rect.height > 20
}

/// 字高：区域宽度的 15%，不超过 12px
pub fn label_size(rect: PixelRect) -> f32 {
    (rect.width as f32 * 0.15).min(LABEL_MAX_SIZE)
}

/// 水平居中，字底落在基线上，超出区域的部分被裁掉
pub fn draw_label(image: &mut RgbImage, rect: PixelRect) {
    if !fits(rect) {
        return;
    }

    let scale = label_size(rect) / GLYPH_HEIGHT as f32;
    let glyph_w = ((GLYPH_WIDTH as f32 * scale).round() as u32).max(1);
    let glyph_h = ((GLYPH_HEIGHT as f32 * scale).round() as u32).max(1);
    let advance = ((GLYPH_WIDTH + 1) as f32 * scale).round().max(1.0) as u32;

    let count = LABEL_TEXT.chars().count() as u32;
    let text_w = advance * count - (advance - glyph_w);

    let center_x = rect.x + rect.width / 2;
    let start_x = center_x.saturating_sub(text_w / 2);
    let baseline = rect.bottom().saturating_sub(LABEL_BASELINE_OFFSET);
    let top = baseline.saturating_sub(glyph_h);

    for (i, c) in LABEL_TEXT.chars().enumerate() {
        let Some(rows) = glyph(c) else {
            continue;
        };
        let origin_x = start_x + advance * i as u32;

        for dy in 0..glyph_h {
            let row = rows[((dy as f32 / scale) as u32).min(GLYPH_HEIGHT - 1) as usize];
            for dx in 0..glyph_w {
                let col = ((dx as f32 / scale) as u32).min(GLYPH_WIDTH - 1);
                if row & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let (px, py) = (origin_x + dx, top + dy);
                if rect.contains(px, py) {
                    blend(image.get_pixel_mut(px, py), ACCENT, LABEL_ALPHA);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(width: u32, height: u32) -> PixelRect {
        PixelRect {
            x: 10,
            y: 10,
            width,
            height,
        }
    }

    fn lit_pixels(img: &RgbImage) -> Vec<(u32, u32)> {
        img.enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [0, 0, 0])
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_every_label_char_has_glyph() {
        assert!(LABEL_TEXT.chars().all(|c| glyph(c).is_some()));
    }

    #[test]
    fn test_label_size_capped() {
        assert!((label_size(rect(60, 30)) - 9.0).abs() < 1e-6);
        assert_eq!(label_size(rect(400, 30)), LABEL_MAX_SIZE);
    }

    #[test]
    fn test_small_regions_get_no_label() {
        let mut img = RgbImage::new(100, 100);
        draw_label(&mut img, rect(40, 60));
        draw_label(&mut img, rect(60, 20));
        assert!(lit_pixels(&img).is_empty());
    }

    #[test]
    fn test_label_sits_on_baseline_inside_region() {
        let mut img = RgbImage::new(200, 100);
        let r = rect(120, 50);
        draw_label(&mut img, r);

        let lit = lit_pixels(&img);
        assert!(!lit.is_empty());
        assert!(lit.iter().all(|(x, y)| r.contains(*x, *y)));

        let lowest = lit.iter().map(|(_, y)| *y).max().unwrap();
        assert_eq!(lowest, r.bottom() - LABEL_BASELINE_OFFSET - 1);
        let tallest = lowest - lit.iter().map(|(_, y)| *y).min().unwrap() + 1;
        assert_eq!(tallest, 12);

        // 大致居中
        let min_x = lit.iter().map(|(x, _)| *x).min().unwrap();
        let max_x = lit.iter().map(|(x, _)| *x).max().unwrap();
        let mid = (min_x + max_x) / 2;
        let center = r.x + r.width / 2;
        assert!(mid.abs_diff(center) <= 2);
    }
}
