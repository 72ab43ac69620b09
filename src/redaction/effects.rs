use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

use super::geometry::PixelRect;

/// 战术黄
pub const ACCENT: [u8; 3] = [234, 179, 8];
pub const TINT_ALPHA: f32 = 0.1;
pub const SCANLINE_ALPHA: f32 = 0.2;
pub const SCANLINE_SPACING: u32 = 4;

/// 马赛克缩放系数：强度 100 → 0.05（约 20px 一块），强度 0 → 0.55
pub fn pixel_scale(intensity: u8) -> f32 {
    let normalized = intensity.min(100) as f32 / 100.0;
    0.05 + (1.0 - normalized) * 0.5
}

/// 先平滑缩小再最近邻放大回原尺寸
pub fn pixelate(image: &mut RgbImage, rect: PixelRect, scale: f32) {
    let small_w = ((rect.width as f32 * scale) as u32).max(1);
    let small_h = ((rect.height as f32 * scale) as u32).max(1);

    let region = imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image();
    let small = imageops::resize(&region, small_w, small_h, FilterType::Triangle);
    let blocky = imageops::resize(&small, rect.width, rect.height, FilterType::Nearest);

    imageops::replace(image, &blocky, rect.x as i64, rect.y as i64);
}

pub fn blend(pixel: &mut Rgb<u8>, color: [u8; 3], alpha: f32) {
    for (channel, c) in pixel.0.iter_mut().zip(color) {
        let mixed = c as f32 * alpha + *channel as f32 * (1.0 - alpha);
        *channel = mixed.round().clamp(0.0, 255.0) as u8;
    }
}

pub fn tint(image: &mut RgbImage, rect: PixelRect) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            blend(image.get_pixel_mut(x, y), ACCENT, TINT_ALPHA);
        }
    }
}

/// 从区域顶部开始每 4 行一条扫描线
pub fn scanlines(image: &mut RgbImage, rect: PixelRect) {
    for y in (rect.y..rect.bottom()).step_by(SCANLINE_SPACING as usize) {
        for x in rect.x..rect.right() {
            blend(image.get_pixel_mut(x, y), ACCENT, SCANLINE_ALPHA);
        }
    }
}
