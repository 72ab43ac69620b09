use crate::api::models::{SensitiveRegion, NORMALIZED_SCALE};

/// 小于等于这个像素宽/高的区域直接忽略
pub const MIN_REGION_PX: f32 = 5.0;

/// 图片像素坐标下的矩形，已裁剪到图片范围内
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// 归一化坐标换算成像素矩形。退化（宽或高 ≤ 5px）或完全落在图外的返回 `None`
    pub fn from_region(region: &SensitiveRegion, image_width: u32, image_height: u32) -> Option<Self> {
        if !region.is_well_formed() {
            return None;
        }

        let w = image_width as f32;
        let h = image_height as f32;
        let x = region.xmin / NORMALIZED_SCALE * w;
        let y = region.ymin / NORMALIZED_SCALE * h;
        let width = (region.xmax - region.xmin) / NORMALIZED_SCALE * w;
        let height = (region.ymax - region.ymin) / NORMALIZED_SCALE * h;

        if width <= MIN_REGION_PX || height <= MIN_REGION_PX {
            return None;
        }

        let x0 = x.round().clamp(0.0, w) as u32;
        let y0 = y.round().clamp(0.0, h) as u32;
        let x1 = (x + width).round().clamp(0.0, w) as u32;
        let y1 = (y + height).round().clamp(0.0, h) as u32;

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some(Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}
