//! 顶点焊接模块
//!
//! 把每个角点的 (位置, 纹理坐标, 法线) 元组按近似相等去重，
//! 生成规范顶点列表和索引流。
//!
//! # 比较规则
//!
//! 按固定优先级逐个比较 8 个分量：
//!
//! | 分量 | 阈值 |
//! |---|---|
//! | position.x / y / z | 0.001 |
//! | texcoord.x / y | 0.1 |
//! | normal.x / y / z | 0.3 |
//!
//! 第一个差值绝对值 `>=` 阈值的分量决定先后顺序；若所有分量都在阈值内，
//! 两个顶点视为相等并焊接到一起。
//!
//! 该比较不满足传递性（A≈B、B≈C 不代表 A≈C），因此焊接结果依赖插入顺序。
//! 对固定的输入和固定的插入顺序，结果是确定的。

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::geometry::vertex::PackedVertex;

/// 位置分量的焊接阈值
pub const POSITION_TOLERANCE: f32 = 0.001;
/// 纹理坐标分量的焊接阈值
pub const TEXCOORD_TOLERANCE: f32 = 0.1;
/// 法线分量的焊接阈值
pub const NORMAL_TOLERANCE: f32 = 0.3;

/// 按 `PackedVertex::fields` 顺序排列的各分量阈值
const FIELD_TOLERANCES: [f32; 8] = [
    POSITION_TOLERANCE,
    POSITION_TOLERANCE,
    POSITION_TOLERANCE,
    TEXCOORD_TOLERANCE,
    TEXCOORD_TOLERANCE,
    NORMAL_TOLERANCE,
    NORMAL_TOLERANCE,
    NORMAL_TOLERANCE,
];

/// 带容差的字典序比较
///
/// 返回 `Ordering::Equal` 表示两个顶点会被焊接。
pub fn weld_cmp(a: &PackedVertex, b: &PackedVertex) -> Ordering {
    let (lhs, rhs) = (a.fields(), b.fields());

    for ((x, y), tolerance) in lhs.iter().zip(rhs.iter()).zip(FIELD_TOLERANCES) {
        if (x - y).abs() >= tolerance {
            return if x < y { Ordering::Less } else { Ordering::Greater };
        }
    }

    Ordering::Equal
}

/// 焊接表的键：用容差比较实现排序
#[derive(Debug, Clone, Copy)]
struct WeldKey(PackedVertex);

impl PartialEq for WeldKey {
    fn eq(&self, other: &Self) -> bool {
        weld_cmp(&self.0, &other.0) == Ordering::Equal
    }
}

impl Eq for WeldKey {}

impl PartialOrd for WeldKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for WeldKey {
    fn cmp(&self, other: &Self) -> Ordering {
        weld_cmp(&self.0, &other.0)
    }
}

/// 顶点焊接器
///
/// 新顶点追加到借用的顶点数组末尾，分配的索引就是追加前的数组长度。
/// 与已有顶点近似相等的角点直接复用已有索引，自身的属性值被丢弃。
/// 输出顶点顺序是首次插入顺序，而不是比较器的排序顺序。
///
/// # 示例
///
/// ```rust
/// use mesh_packer::geometry::vertex::PackedVertex;
/// use mesh_packer::geometry::weld::VertexWelder;
///
/// let mut vertices = Vec::new();
/// let mut welder = VertexWelder::new(&mut vertices);
///
/// let a = welder.insert(PackedVertex::new([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]));
/// let b = welder.insert(PackedVertex::new([0.0005, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]));
///
/// assert_eq!(a, b);
/// assert_eq!(vertices.len(), 1);
/// ```
pub struct VertexWelder<'a> {
    table: BTreeMap<WeldKey, u32>,
    vertices: &'a mut Vec<PackedVertex>,
    inserted: usize,
}

impl<'a> VertexWelder<'a> {
    /// 创建焊接器，新顶点写入 `vertices`
    pub fn new(vertices: &'a mut Vec<PackedVertex>) -> Self {
        Self {
            table: BTreeMap::new(),
            vertices,
            inserted: 0,
        }
    }

    /// 插入一个角点，返回它在顶点数组中的索引
    pub fn insert(&mut self, vertex: PackedVertex) -> u32 {
        self.inserted += 1;

        debug_assert!(self.vertices.len() < u32::MAX as usize, "顶点数超出 u32 索引范围");
        let next_index = self.vertices.len() as u32;
        let index = *self.table.entry(WeldKey(vertex)).or_insert(next_index);

        if index == next_index {
            self.vertices.push(vertex);
        }

        index
    }

    /// 当前焊接表中唯一顶点的个数
    pub fn unique_count(&self) -> usize {
        self.table.len()
    }

    /// 已插入的角点总数
    pub fn inserted_count(&self) -> usize {
        self.inserted
    }
}
