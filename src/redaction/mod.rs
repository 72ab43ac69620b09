//! 本地打码渲染
//!
//! 对检测到的每个敏感区域：马赛克 → 黄色色调 → 扫描线 → 标签，
//! 最后整图重新编码为 JPEG。任何一步无法进行时原样返回输入字节，
//! 宁可不打码也不能让流水线中断。

use image::{ImageOutputFormat, RgbImage};
use log::{debug, info, warn};
use std::io::Cursor;

pub mod effects;
pub mod geometry;
pub mod label;

use crate::api::models::SensitiveRegion;
use geometry::PixelRect;

pub const REDACTION_JPEG_QUALITY: u8 = 80;
pub const DEFAULT_INTENSITY: u8 = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct RedactionResult {
    pub jpeg_data: Vec<u8>,
    /// 实际处理的区域数，0 表示 `jpeg_data` 就是输入
    pub redacted_regions: u32,
}

impl RedactionResult {
    fn passthrough(image: &[u8]) -> Self {
        Self {
            jpeg_data: image.to_vec(),
            redacted_regions: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Redactor {
    intensity: u8,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_INTENSITY)
    }
}

impl Redactor {
    /// 强度 0-100，超出按 100 处理
    pub fn new(intensity: u8) -> Self {
        Self {
            intensity: intensity.min(100),
        }
    }

    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    pub fn redact(&self, image: &[u8], regions: &[SensitiveRegion]) -> RedactionResult {
        if self.intensity == 0 || regions.is_empty() {
            return RedactionResult::passthrough(image);
        }

        let mut rgb = match image::load_from_memory(image) {
            Ok(decoded) => decoded.to_rgb8(),
            Err(e) => {
                warn!("⚠️ Cannot decode image for redaction, passing through: {}", e);
                return RedactionResult::passthrough(image);
            }
        };

        let rects = self.pixel_rects(&rgb, regions);
        if rects.is_empty() {
            debug!("No usable regions out of {}", regions.len());
            return RedactionResult::passthrough(image);
        }

        self.apply(&mut rgb, &rects);

        let mut buffer = Cursor::new(Vec::new());
        if let Err(e) = rgb.write_to(&mut buffer, ImageOutputFormat::Jpeg(REDACTION_JPEG_QUALITY)) {
            warn!("⚠️ Re-encoding redacted image failed, passing through: {}", e);
            return RedactionResult::passthrough(image);
        }

        info!(
            "🛡️ Redacted {}/{} regions ({}x{})",
            rects.len(),
            regions.len(),
            rgb.width(),
            rgb.height()
        );
        RedactionResult {
            jpeg_data: buffer.into_inner(),
            redacted_regions: rects.len() as u32,
        }
    }

    fn pixel_rects(&self, image: &RgbImage, regions: &[SensitiveRegion]) -> Vec<PixelRect> {
        regions
            .iter()
            .filter_map(|r| PixelRect::from_region(r, image.width(), image.height()))
            .collect()
    }

    /// 按顺序处理每个区域，区域外的像素不动
    pub fn apply(&self, image: &mut RgbImage, rects: &[PixelRect]) {
        let scale = effects::pixel_scale(self.intensity);
        for &rect in rects {
            effects::pixelate(image, rect, scale);
            effects::tint(image, rect);
            effects::scanlines(image, rect);
            label::draw_label(image, rect);
        }
    }
}
