//! 包围盒与单位盒归一化
//!
//! `BoundingBox` 在打包过程中累积原始（焊接前、归一化前）的角点位置。
//! `UnitBoxTransform` 把包围盒的最长轴映射到 [-1, 1]，并保持比例。

use crate::core::error::MeshLoadError;

/// 轴对齐包围盒
///
/// 第一次 `merge` 之前为空；之后每个轴都满足 lower <= upper。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoundingBox {
    corners: Option<([f32; 3], [f32; 3])>,
}

impl BoundingBox {
    /// 创建空包围盒
    pub fn new() -> Self {
        Self { corners: None }
    }

    /// 由两个角点直接构造
    pub fn from_corners(lower: [f32; 3], upper: [f32; 3]) -> Self {
        let mut bounds = Self::new();
        bounds.merge(lower);
        bounds.merge(upper);
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.corners.is_none()
    }

    /// 合并一个点：第一次调用时初始化两个角点，之后按分量扩展
    pub fn merge(&mut self, point: [f32; 3]) {
        self.corners = Some(match self.corners {
            None => (point, point),
            Some((mut lower, mut upper)) => {
                for k in 0..3 {
                    lower[k] = lower[k].min(point[k]);
                    upper[k] = upper[k].max(point[k]);
                }
                (lower, upper)
            }
        });
    }

    /// 合并另一个包围盒，空包围盒不产生影响
    pub fn merge_box(&mut self, other: &BoundingBox) {
        if let Some((lower, upper)) = other.corners {
            self.merge(lower);
            self.merge(upper);
        }
    }

    pub fn lower(&self) -> Option<[f32; 3]> {
        self.corners.map(|(lower, _)| lower)
    }

    pub fn upper(&self) -> Option<[f32; 3]> {
        self.corners.map(|(_, upper)| upper)
    }

    /// 各轴长度，空包围盒返回 `None`
    pub fn extent(&self) -> Option<[f32; 3]> {
        self.corners
            .map(|(lower, upper)| [upper[0] - lower[0], upper[1] - lower[1], upper[2] - lower[2]])
    }
}

/// 单位盒变换：`(p - lower) / half_extent - 1`
///
/// `half_extent` 是包围盒最长轴长度的一半。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitBoxTransform {
    lower: [f32; 3],
    half_extent: f32,
}

impl UnitBoxTransform {
    /// 根据包围盒构造变换
    ///
    /// # 错误
    ///
    /// 包围盒为空、所有位置重合（最长轴为零）或长度非有限时，
    /// 返回 `MeshLoadError::DegenerateNormalization`，不会产生除零。
    pub fn from_bounds(bounds: &BoundingBox) -> Result<Self, MeshLoadError> {
        let (lower, extent) = match (bounds.lower(), bounds.extent()) {
            (Some(lower), Some(extent)) => (lower, extent),
            _ => return Err(MeshLoadError::DegenerateNormalization { extent: 0.0 }),
        };

        let max_length = extent[0].max(extent[1]).max(extent[2]);
        let half_extent = max_length / 2.0;

        if half_extent <= 0.0 || !half_extent.is_finite() {
            return Err(MeshLoadError::DegenerateNormalization { extent: max_length });
        }

        Ok(Self { lower, half_extent })
    }

    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// 变换单个点
    #[inline]
    pub fn apply(&self, point: [f32; 3]) -> [f32; 3] {
        [
            (point[0] - self.lower[0]) / self.half_extent - 1.0,
            (point[1] - self.lower[1]) / self.half_extent - 1.0,
            (point[2] - self.lower[2]) / self.half_extent - 1.0,
        ]
    }

    /// 把包围盒映射到变换后的坐标空间
    pub fn apply_to_bounds(&self, bounds: &BoundingBox) -> BoundingBox {
        match (bounds.lower(), bounds.upper()) {
            (Some(lower), Some(upper)) => BoundingBox::from_corners(self.apply(lower), self.apply(upper)),
            _ => BoundingBox::new(),
        }
    }
}
