/// 解析后模型数据模块
///
/// 外部解析器交付给打包器的输入：共享的扁平属性数组，
/// 加上按形状组织的三角面，每个面的角点携带属性索引。
/// 打包器只读这些数据。

use crate::core::error::{AttributeKind, MeshLoadError};

/// 一个模型所有形状共享的扁平属性数组
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAttributes {
    /// 位置，每 3 个浮点数一个
    pub positions: Vec<f32>,
    /// 法线，每 3 个浮点数一个，可以为空
    pub normals: Vec<f32>,
    /// 纹理坐标，每 2 个浮点数一个，可以为空
    pub texcoords: Vec<f32>,
}

impl RawAttributes {
    #[inline]
    pub fn position_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn normal_count(&self) -> usize {
        self.normals.len() / 3
    }

    #[inline]
    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len() / 2
    }

    #[inline]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    #[inline]
    pub fn has_texcoords(&self) -> bool {
        !self.texcoords.is_empty()
    }

    /// 读取第 `index` 个位置，越界返回 `None`
    pub fn position(&self, index: usize) -> Option<[f32; 3]> {
        read3(&self.positions, index)
    }

    /// 读取第 `index` 个法线，越界返回 `None`
    pub fn normal(&self, index: usize) -> Option<[f32; 3]> {
        read3(&self.normals, index)
    }

    /// 读取第 `index` 个纹理坐标，越界返回 `None`
    pub fn texcoord(&self, index: usize) -> Option<[f32; 2]> {
        let base = index.checked_mul(2)?;
        let slice = self.texcoords.get(base..base.checked_add(2)?)?;
        Some([slice[0], slice[1]])
    }

    /// 可用元素个数，用于错误上下文
    pub fn count_of(&self, attribute: AttributeKind) -> usize {
        match attribute {
            AttributeKind::Position => self.position_count(),
            AttributeKind::Normal => self.normal_count(),
            AttributeKind::Texcoord => self.texcoord_count(),
        }
    }
}

fn read3(data: &[f32], index: usize) -> Option<[f32; 3]> {
    let base = index.checked_mul(3)?;
    let slice = data.get(base..base.checked_add(3)?)?;
    Some([slice[0], slice[1], slice[2]])
}

/// 三角面的一个角点
///
/// `None` 表示该属性缺失（解析器中的负索引）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corner {
    pub position: usize,
    pub normal: Option<usize>,
    pub texcoord: Option<usize>,
}

impl Corner {
    /// 只有位置索引的角点
    pub fn position_only(position: usize) -> Self {
        Self {
            position,
            normal: None,
            texcoord: None,
        }
    }

    pub fn new(position: usize, normal: Option<usize>, texcoord: Option<usize>) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }
}

/// 三角面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub corners: [Corner; 3],
    /// 平滑组 ID，0 表示无
    pub smoothing_group: u32,
}

impl Face {
    pub fn new(corners: [Corner; 3]) -> Self {
        Self {
            corners,
            smoothing_group: 0,
        }
    }

    /// 由三个位置索引构造面（无法线、无纹理坐标）
    pub fn from_positions(a: usize, b: usize, c: usize) -> Self {
        Self::new([
            Corner::position_only(a),
            Corner::position_only(b),
            Corner::position_only(c),
        ])
    }

    pub fn with_smoothing_group(mut self, group: u32) -> Self {
        self.smoothing_group = group;
        self
    }
}

/// 形状：有序的三角面列表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub name: String,
    pub faces: Vec<Face>,
}

impl Shape {
    pub fn new(name: impl Into<String>, faces: Vec<Face>) -> Self {
        Self {
            name: name.into(),
            faces,
        }
    }

    /// 是否有任意一个面带非零平滑组
    pub fn has_smoothing_group(&self) -> bool {
        self.faces.iter().any(|face| face.smoothing_group > 0)
    }
}

/// 解析器的完整输出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedModel {
    /// 模型名称（通常是文件名）
    pub name: Option<String>,
    pub attributes: RawAttributes,
    pub shapes: Vec<Shape>,
}

impl ParsedModel {
    pub fn new(attributes: RawAttributes, shapes: Vec<Shape>) -> Self {
        Self {
            name: None,
            attributes,
            shapes,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 所有形状的三角面总数
    pub fn face_count(&self) -> usize {
        self.shapes.iter().map(|shape| shape.faces.len()).sum()
    }
}

/// 角点索引越界时构造带上下文的错误
pub(crate) fn invalid_reference(
    attributes: &RawAttributes,
    shape: usize,
    face: usize,
    corner: usize,
    attribute: AttributeKind,
    index: usize,
) -> MeshLoadError {
    MeshLoadError::InvalidIndexReference {
        shape,
        face,
        corner,
        attribute,
        index,
        available: attributes.count_of(attribute),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes() -> RawAttributes {
        RawAttributes {
            positions: vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0],
            normals: vec![0.0, 0.0, 1.0],
            texcoords: vec![0.25, 0.75],
        }
    }

    #[test]
    fn test_attribute_counts() {
        let attrib = attributes();

        assert_eq!(attrib.position_count(), 2);
        assert_eq!(attrib.normal_count(), 1);
        assert_eq!(attrib.texcoord_count(), 1);
        assert!(attrib.has_normals());
        assert!(attrib.has_texcoords());
    }

    #[test]
    fn test_checked_reads() {
        let attrib = attributes();

        assert_eq!(attrib.position(1), Some([1.0, 2.0, 3.0]));
        assert_eq!(attrib.position(2), None);
        assert_eq!(attrib.normal(0), Some([0.0, 0.0, 1.0]));
        assert_eq!(attrib.normal(1), None);
        assert_eq!(attrib.texcoord(0), Some([0.25, 0.75]));
        assert_eq!(attrib.texcoord(usize::MAX), None);
    }

    #[test]
    fn test_smoothing_detection() {
        let flat = Shape::new("flat", vec![Face::from_positions(0, 1, 2)]);
        assert!(!flat.has_smoothing_group());

        let smooth = Shape::new(
            "smooth",
            vec![
                Face::from_positions(0, 1, 2),
                Face::from_positions(0, 2, 3).with_smoothing_group(4),
            ],
        );
        assert!(smooth.has_smoothing_group());
    }

    #[test]
    fn test_face_count() {
        let model = ParsedModel::new(
            attributes(),
            vec![
                Shape::new("a", vec![Face::from_positions(0, 1, 0)]),
                Shape::new("b", vec![Face::from_positions(0, 1, 0); 2]),
            ],
        );
        assert_eq!(model.face_count(), 3);
    }
}
