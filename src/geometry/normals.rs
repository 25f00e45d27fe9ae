//! 法线推导模块
//!
//! 提供两种从位置推导法线的方式：
//! - 单个三角面的面法线（带退化检测）
//! - 按平滑组对整个形状做的顶点法线平均
//!
//! 显式法线、平滑法线、面法线三者的选择顺序由 `packer` 模块决定。

use std::collections::BTreeMap;

use crate::core::error::{AttributeKind, MeshLoadError};
use crate::core::math::{normalize_or_zero, to_array3, vec3, Vector3};
use crate::geometry::model::{invalid_reference, RawAttributes, Shape};

/// 三角面在 XY 平面投影上是否退化（三点共线）
///
/// 只比较 X/Y 分量，Z 轴完全不参与判断。
/// 因此一个立在 XZ 平面上的三角形也会被视为退化。
#[inline]
pub fn is_degenerate_xy(v1: [f32; 3], v2: [f32; 3], v3: [f32; 3]) -> bool {
    (v2[0] - v1[0]) * (v3[1] - v2[1]) == (v3[0] - v2[0]) * (v2[1] - v1[1])
}

/// 计算三角面的单位法线
///
/// 绕序约定：`normalize(cross(v2 - v1, v3 - v2))`。
/// 退化三角面（见 [`is_degenerate_xy`]）返回零向量，不是错误也不会产生 NaN。
///
/// # 示例
///
/// ```rust
/// use mesh_packer::geometry::normals::face_normal;
///
/// let n = face_normal([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
/// assert_eq!(n, [0.0, 0.0, 1.0]);
/// ```
pub fn face_normal(v1: [f32; 3], v2: [f32; 3], v3: [f32; 3]) -> [f32; 3] {
    if is_degenerate_xy(v1, v2, v3) {
        return [0.0, 0.0, 0.0];
    }

    to_array3(&normalize_or_zero(&face_cross(v1, v2, v3)))
}

/// 未归一化的面法线，长度等于三角形面积的两倍
#[inline]
fn face_cross(v1: [f32; 3], v2: [f32; 3], v3: [f32; 3]) -> Vector3 {
    let (p1, p2, p3) = (vec3(v1), vec3(v2), vec3(v3));
    let edge1 = p2 - p1;
    let edge2 = p3 - p2;
    edge1.cross(&edge2)
}

/// 一个形状的平滑顶点法线
///
/// 以原始位置索引为键。只在处理单个形状期间存在，处理完即丢弃。
#[derive(Debug, Clone, Default)]
pub struct SmoothingNormals {
    normals: BTreeMap<usize, Vector3>,
}

impl SmoothingNormals {
    /// 对整个形状计算平滑法线
    ///
    /// 形状中的每个面（不论其平滑组 ID 是多少）都把未归一化的面法线
    /// 累加到三个角点的位置索引上，最后逐个归一化。
    /// 累加结果为零向量时保持为零向量。
    ///
    /// # 错误
    ///
    /// 位置索引越界时返回 `MeshLoadError::InvalidIndexReference`。
    pub fn compute(
        attributes: &RawAttributes,
        shape: &Shape,
        shape_index: usize,
    ) -> Result<Self, MeshLoadError> {
        let mut sums: BTreeMap<usize, Vector3> = BTreeMap::new();

        for (face_index, face) in shape.faces.iter().enumerate() {
            let mut positions = [[0.0f32; 3]; 3];
            for (corner_index, corner) in face.corners.iter().enumerate() {
                positions[corner_index] = attributes.position(corner.position).ok_or_else(|| {
                    invalid_reference(
                        attributes,
                        shape_index,
                        face_index,
                        corner_index,
                        AttributeKind::Position,
                        corner.position,
                    )
                })?;
            }

            let normal = face_cross(positions[0], positions[1], positions[2]);
            for corner in &face.corners {
                *sums.entry(corner.position).or_insert_with(Vector3::zeros) += normal;
            }
        }

        for sum in sums.values_mut() {
            *sum = normalize_or_zero(sum);
        }

        Ok(Self { normals: sums })
    }

    /// 查询某个原始位置索引的平滑法线
    pub fn get(&self, position_index: usize) -> Option<[f32; 3]> {
        self.normals.get(&position_index).map(to_array3)
    }

    /// 参与平滑的不同位置索引个数
    pub fn position_count(&self) -> usize {
        self.normals.len()
    }
}
