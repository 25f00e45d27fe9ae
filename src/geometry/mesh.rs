/// 网格缓冲区模块
///
/// 定义焊接后的输出容器：交错顶点数组、32 位索引数组和按形状划分的子网格。
/// 调用方拿到后拥有全部数据，可直接上传到 GPU。

use super::bounds::{BoundingBox, UnitBoxTransform};
use super::vertex::PackedVertex;
use crate::core::error::MeshLoadError;

/// 子网格描述符
///
/// 每个形状对应一个子网格。形状之间不共享顶点，
/// 所以每个子网格的顶点在顶点数组中是连续的一段。
///
/// 绘制某个子网格时，索引范围是 `face_start * 3` 起的 `face_count * 3` 个索引。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subset {
    /// 子网格ID（形状在模型中的序号）
    pub id: u32,

    /// 起始顶点索引
    pub vertex_start: u32,

    /// 顶点数量
    pub vertex_count: u32,

    /// 起始面索引（以三角形为单位）
    pub face_start: u32,

    /// 面数量（三角形数量）
    pub face_count: u32,
}

impl Subset {
    /// 创建一个新的子网格描述符
    #[inline]
    pub fn new(
        id: u32,
        vertex_start: u32,
        vertex_count: u32,
        face_start: u32,
        face_count: u32,
    ) -> Self {
        Self {
            id,
            vertex_start,
            vertex_count,
            face_start,
            face_count,
        }
    }
}

/// 焊接后的网格缓冲区
///
/// # 不变量
///
/// - `indices.len() == 3 * 三角形数`
/// - 每个索引都小于 `vertices.len()`
///
/// 每个顶点 8 个 f32（位置 3 + 纹理坐标 2 + 法线 3），
/// 绘制时的元素个数就是 `indices.len()`。
#[derive(Debug, Clone, Default)]
pub struct MeshBuffer {
    /// 顶点数组，按首次焊接顺序排列
    pub vertices: Vec<PackedVertex>,

    /// 索引数组，每3个索引定义一个三角形
    pub indices: Vec<u32>,

    /// 子网格列表，每个形状一个
    pub subsets: Vec<Subset>,

    /// 网格名称（可选）
    pub name: Option<String>,
}

impl MeshBuffer {
    /// 创建一个带容量预分配的网格缓冲区
    pub fn with_capacity(vertex_capacity: usize, index_capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(index_capacity),
            ..Self::default()
        }
    }

    /// 获取顶点数量
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 获取索引数量
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// 获取三角形数量
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 顶点数组的原始字节，可直接写入顶点缓冲区
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// 索引数组的原始字节（u32）
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// 把所有顶点位置缩放到单位盒
    ///
    /// `bounds` 是原始坐标下的包围盒。返回实际使用的变换，
    /// 调用方可以用它把包围盒映射到新的坐标空间。
    ///
    /// # 错误
    ///
    /// 包围盒没有体积时返回 `MeshLoadError::DegenerateNormalization`，
    /// 此时顶点数据保持不变。
    pub fn normalize_to_unit_box(&mut self, bounds: &BoundingBox) -> Result<UnitBoxTransform, MeshLoadError> {
        let transform = UnitBoxTransform::from_bounds(bounds)?;

        for vertex in &mut self.vertices {
            vertex.position = transform.apply(vertex.position);
        }

        Ok(transform)
    }

    /// 验证网格数据的有效性
    ///
    /// 检查：
    /// - 索引数量是3的倍数（每个三角形3个顶点）
    /// - 所有索引都在有效范围内
    /// - 子网格描述符的范围有效
    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "索引数量必须是3的倍数，当前为: {}",
                self.indices.len()
            ));
        }

        let vertex_count = self.vertices.len() as u32;
        for (i, &index) in self.indices.iter().enumerate() {
            if index >= vertex_count {
                return Err(format!(
                    "索引 {} 处的值 {} 超出顶点范围 (顶点数 {})",
                    i, index, vertex_count
                ));
            }
        }

        let triangle_count = self.triangle_count() as u32;
        for (i, subset) in self.subsets.iter().enumerate() {
            if subset.vertex_start + subset.vertex_count > vertex_count {
                return Err(format!(
                    "子网格 {} 的顶点范围超出边界: start={}, count={}, total={}",
                    i, subset.vertex_start, subset.vertex_count, vertex_count
                ));
            }

            if subset.face_start + subset.face_count > triangle_count {
                return Err(format!(
                    "子网格 {} 的面范围超出边界: start={}, count={}, total={}",
                    i, subset.face_start, subset.face_count, triangle_count
                ));
            }
        }

        Ok(())
    }
}
