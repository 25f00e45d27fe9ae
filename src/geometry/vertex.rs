/// 打包顶点定义模块
///
/// 定义焊接后输出给 GPU 的交错顶点结构：位置、纹理坐标、法线。
/// 同一个结构既是焊接表的键，也是最终写入顶点缓冲区的记录。

use bytemuck::{Pod, Zeroable};
use std::mem::{offset_of, size_of};

/// 打包顶点结构
///
/// 内存布局与GPU兼容，使用 `#[repr(C)]` 保证顺序和对齐。
///
/// # 内存布局
///
/// - position: 12 bytes (3 * f32)，偏移 0
/// - texcoord: 8 bytes (2 * f32)，偏移 12
/// - normal: 12 bytes (3 * f32)，偏移 20
/// - **总计**: 32 bytes（8 个 f32）
///
/// # 示例
///
/// ```rust
/// use mesh_packer::geometry::vertex::PackedVertex;
///
/// let vertex = PackedVertex::new([0.0, 1.0, 0.0], [0.5, 0.5], [0.0, 0.0, 1.0]);
/// assert_eq!(bytemuck::bytes_of(&vertex).len(), PackedVertex::STRIDE);
/// ```
#[repr(C)]
#[derive(Default, Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PackedVertex {
    /// 顶点位置 (x, y, z)
    pub position: [f32; 3],

    /// 纹理坐标 (u, v)，V 轴已翻转
    pub texcoord: [f32; 2],

    /// 法线向量 (nx, ny, nz)
    pub normal: [f32; 3],
}

/// 顶点属性描述
///
/// 下游上传代码按此表绑定顶点属性，无需再做转换。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// 属性绑定槽位
    pub slot: u32,
    /// 分量个数（f32）
    pub components: u32,
    /// 在顶点中的字节偏移
    pub offset: usize,
}

impl PackedVertex {
    /// 每个顶点的字节步长
    pub const STRIDE: usize = size_of::<PackedVertex>();

    /// 每个顶点的标量个数（3 + 2 + 3）
    pub const SCALARS: usize = 8;

    /// 属性绑定约定：槽位 0 位置，槽位 1 纹理坐标，槽位 2 法线
    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute { slot: 0, components: 3, offset: offset_of!(PackedVertex, position) },
        VertexAttribute { slot: 1, components: 2, offset: offset_of!(PackedVertex, texcoord) },
        VertexAttribute { slot: 2, components: 3, offset: offset_of!(PackedVertex, normal) },
    ];

    /// 创建一个新的顶点
    #[inline]
    pub fn new(position: [f32; 3], texcoord: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            texcoord,
            normal,
        }
    }

    /// 按焊接比较的优先级顺序展开全部 8 个分量
    #[inline]
    pub fn fields(&self) -> [f32; 8] {
        [
            self.position[0],
            self.position[1],
            self.position[2],
            self.texcoord[0],
            self.texcoord[1],
            self.normal[0],
            self.normal[1],
            self.normal[2],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_size() {
        // 3*4 + 2*4 + 3*4 = 32 bytes
        assert_eq!(size_of::<PackedVertex>(), 32);
        assert_eq!(PackedVertex::STRIDE, PackedVertex::SCALARS * size_of::<f32>());
    }

    #[test]
    fn test_vertex_alignment() {
        assert_eq!(std::mem::align_of::<PackedVertex>(), 4);
    }

    #[test]
    fn test_attribute_layout() {
        let [position, texcoord, normal] = PackedVertex::ATTRIBUTES;

        assert_eq!((position.slot, position.components, position.offset), (0, 3, 0));
        assert_eq!((texcoord.slot, texcoord.components, texcoord.offset), (1, 2, 12));
        assert_eq!((normal.slot, normal.components, normal.offset), (2, 3, 20));
    }

    #[test]
    fn test_interleaved_bytes() {
        let vertex = PackedVertex::new([1.0, 2.0, 3.0], [4.0, 5.0], [6.0, 7.0, 8.0]);
        let scalars: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&vertex));

        assert_eq!(scalars, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(vertex.fields().as_slice(), scalars);
    }

    #[test]
    fn test_vertex_default() {
        let vertex = PackedVertex::default();

        assert_eq!(vertex.position, [0.0, 0.0, 0.0]);
        assert_eq!(vertex.texcoord, [0.0, 0.0]);
        assert_eq!(vertex.normal, [0.0, 0.0, 0.0]);
    }
}
