//! 相机帧处理：YUV420 → RGB，居中裁成正方形，编码 JPEG

use image::imageops::{self, FilterType};
use image::{ImageOutputFormat, RgbImage};
use log::{debug, warn};
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;

use super::i18n::{self, TextKey};
use crate::api::models::NextView;

pub const CAPTURE_JPEG_QUALITY: u8 = 90;
pub const MAX_ZOOM: f32 = 5.0;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("帧尺寸无效: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("{plane} 平面长度不足: 需要 {expected}, 实际 {actual}")]
    PlaneTooShort {
        plane: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("JPEG 编码失败: {0}")]
    Encode(#[from] image::ImageError),
}

/// 从原生层传递的原始帧数据（I420，UV 平面宽高各为一半）
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub y_plane: Vec<u8>,
    pub u_plane: Vec<u8>,
    pub v_plane: Vec<u8>,
}

impl RawFrame {
    fn invalid(&self) -> CaptureError {
        CaptureError::InvalidDimensions {
            width: self.width,
            height: self.height,
        }
    }

    /// 尺寸为 0 或面积溢出 `usize` 都视为无效帧
    fn validate(&self) -> Result<(), CaptureError> {
        if self.width == 0 || self.height == 0 {
            return Err(self.invalid());
        }
        let luma = (self.width as usize)
            .checked_mul(self.height as usize)
            .ok_or_else(|| self.invalid())?;
        let chroma = (self.width.div_ceil(2) as usize)
            .checked_mul(self.height.div_ceil(2) as usize)
            .ok_or_else(|| self.invalid())?;
        for (plane, data, expected) in [
            ("Y", &self.y_plane, luma),
            ("U", &self.u_plane, chroma),
            ("V", &self.v_plane, chroma),
        ] {
            if data.len() < expected {
                return Err(CaptureError::PlaneTooShort {
                    plane,
                    expected,
                    actual: data.len(),
                });
            }
        }
        Ok(())
    }

    pub fn to_rgb(&self) -> Result<RgbImage, CaptureError> {
        self.validate()?;

        let width = self.width as usize;
        let uv_width = self.width.div_ceil(2) as usize;
        let mut rgb = RgbImage::new(self.width, self.height);

        for (x, y, pixel) in rgb.enumerate_pixels_mut() {
            let (x, y) = (x as usize, y as usize);
            let y_idx = y * width + x;
            let uv_idx = (y / 2) * uv_width + x / 2;

            let y_val = self.y_plane[y_idx] as f32;
            let u_val = self.u_plane[uv_idx] as f32 - 128.0;
            let v_val = self.v_plane[uv_idx] as f32 - 128.0;

            let r = (y_val + 1.402 * v_val).clamp(0.0, 255.0) as u8;
            let g = (y_val - 0.344136 * u_val - 0.714136 * v_val).clamp(0.0, 255.0) as u8;
            let b = (y_val + 1.772 * u_val).clamp(0.0, 255.0) as u8;
            *pixel = image::Rgb([r, g, b]);
        }

        Ok(rgb)
    }
}

/// 以短边为输出尺寸，取中心 `size / zoom` 的正方形区域放大回去
pub fn square_crop(image: &RgbImage, zoom: f32) -> RgbImage {
    let zoom = if zoom.is_finite() {
        zoom.clamp(1.0, MAX_ZOOM)
    } else {
        1.0
    };
    let (w, h) = image.dimensions();
    let size = w.min(h);
    if size == 0 {
        return image.clone();
    }
    let source = ((size as f32 / zoom).round() as u32).clamp(1, size);
    let x = (w - source) / 2;
    let y = (h - source) / 2;

    let cropped = imageops::crop_imm(image, x, y, source, source).to_image();
    if source == size {
        cropped
    } else {
        imageops::resize(&cropped, size, size, FilterType::Triangle)
    }
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, CaptureError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageOutputFormat::Jpeg(quality))?;
    Ok(buffer.into_inner())
}

/// 完整的拍照流程：转换、裁剪、编码
pub fn capture_square_jpeg(frame: &RawFrame, zoom: f32) -> Result<Vec<u8>, CaptureError> {
    let rgb = frame.to_rgb()?;
    let square = square_crop(&rgb, zoom);
    let jpeg = encode_jpeg(&square, CAPTURE_JPEG_QUALITY)?;
    debug!(
        "📸 Captured {}x{} → {}px square, {} bytes",
        frame.width,
        frame.height,
        square.width(),
        jpeg.len()
    );
    Ok(jpeg)
}

/// 相机不可用的原因，由宿主上报
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CaptureFailureKind {
    PermissionDenied,
    InsecureContext,
    Unavailable,
}

/// 给用户看的补救提示，以及应该退回到的页面
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureFailure {
    pub kind: CaptureFailureKind,
    pub message: String,
    pub fallback_view: NextView,
}

impl CaptureFailure {
    pub fn new(kind: CaptureFailureKind, for_profile: bool, language: &str) -> Self {
        let key = match kind {
            CaptureFailureKind::PermissionDenied => TextKey::CameraPermissionDenied,
            CaptureFailureKind::InsecureContext => TextKey::CameraInsecureContext,
            CaptureFailureKind::Unavailable => TextKey::CameraUnavailable,
        };
        let fallback_view = if for_profile {
            NextView::Profile
        } else {
            NextView::Home
        };
        warn!("📷 Camera unavailable: {:?}, falling back to {:?}", kind, fallback_view);

        Self {
            kind,
            message: i18n::text(language, key).to_string(),
            fallback_view,
        }
    }
}
