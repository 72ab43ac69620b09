use serde::{Deserialize, Serialize};

/// 坐标归一化尺度：模型返回的坐标在 0-1000 之间
pub const NORMALIZED_SCALE: f32 = 1000.0;

/// 敏感区域类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionLabel {
    /// 车牌
    Plate,
    /// 人脸（包括可辨认的动物脸）
    Face,
    /// 广告、品牌、车身文字
    Ad,
    /// 模型返回了未知标签
    #[default]
    #[serde(other)]
    Other,
}

/// 需要打码的矩形区域，坐标按图片宽高归一化到 0-1000
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitiveRegion {
    #[serde(default)]
    pub label: RegionLabel,
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

impl SensitiveRegion {
    pub fn new(label: RegionLabel, xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self {
            label,
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// 归一化坐标是否构成一个非空矩形
    pub fn is_well_formed(&self) -> bool {
        [self.xmin, self.ymin, self.xmax, self.ymax]
            .iter()
            .all(|v| v.is_finite())
            && self.xmin < self.xmax
            && self.ymin < self.ymax
    }
}
