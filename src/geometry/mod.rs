/// 几何体加载和处理模块
///
/// 把解析器输出的未焊接面数据转换为可直接上传 GPU 的交错顶点缓冲区和索引缓冲区。
///
/// # 模块结构
///
/// - `vertex`: 打包后的顶点布局
/// - `model`: 解析器输出的中间表示（属性数组、形状、面）
/// - `normals`: 面法线与平滑组法线
/// - `bounds`: 包围盒与单位盒变换
/// - `weld`: 带容差的顶点焊接
/// - `mesh`: 输出缓冲区和子网格结构
/// - `packer`: 打包流程入口
/// - `loaders`: 各种格式的模型解析器
///
/// # 架构设计
///
/// ```text
/// 文件 (OBJ)
///     ↓
/// Loader (ObjLoader)
///     ↓
/// ParsedModel (未焊接的面)
///     ↓
/// pack_model (法线选择 / 焊接 / 归一化)
///     ↓
/// LoadedMesh (MeshBuffer + BoundingBox)
/// ```
///
/// # 使用示例
///
/// ```rust,no_run
/// use mesh_packer::geometry::loaders::load_model_from_path;
/// use std::path::Path;
///
/// let loaded = load_model_from_path(Path::new("model.obj"), false)?;
///
/// println!("顶点数: {}", loaded.buffer.vertex_count());
/// println!("三角形数: {}", loaded.buffer.triangle_count());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```

pub mod vertex;
pub mod model;
pub mod normals;
pub mod bounds;
pub mod weld;
pub mod mesh;
pub mod packer;
pub mod loaders;

// 重新导出常用类型
pub use vertex::PackedVertex;
pub use model::{Corner, Face, ParsedModel, RawAttributes, Shape};
pub use bounds::{BoundingBox, UnitBoxTransform};
pub use mesh::{MeshBuffer, Subset};
pub use packer::{load_model, pack_model, LoadedMesh};
