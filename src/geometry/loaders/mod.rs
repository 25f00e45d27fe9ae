/// 模型加载器模块
///
/// 提供统一的模型解析接口和具体格式的实现。解析器只负责把文件变成
/// `ParsedModel`，焊接和归一化统一由 `geometry::packer` 完成。
///
/// # 支持的格式
///
/// - **OBJ**: Wavefront OBJ 格式（使用 tobj crate）
///
/// # 使用示例
///
/// ```rust,no_run
/// use mesh_packer::geometry::loaders::load_model_from_path;
/// use std::path::Path;
///
/// let loaded = load_model_from_path(Path::new("model.obj"), true)?;
/// println!("{} 个顶点", loaded.buffer.vertex_count());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::model::ParsedModel;
use crate::geometry::packer::{load_model, LoadedMesh};
use std::path::{Path, PathBuf};

pub mod obj_loader;

// 重新导出加载器
pub use obj_loader::ObjLoader;

/// 网格加载器 trait
///
/// 所有格式的加载器都实现此 trait，返回未焊接的 `ParsedModel`。
///
/// # 实现要求
///
/// - 加载器应该是无状态的（使用静态方法）
/// - 索引保持解析器原样输出，不在这里做范围检查
///
/// # 示例实现
///
/// ```rust,ignore
/// use mesh_packer::geometry::loaders::MeshLoader;
///
/// pub struct MyLoader;
///
/// impl MeshLoader for MyLoader {
///     fn load_from_file(path: &Path) -> Result<ParsedModel> {
///         todo!()
///     }
///
///     fn load_from_memory(data: &[u8]) -> Result<ParsedModel> {
///         todo!()
///     }
///
///     fn supported_extensions() -> &'static [&'static str] {
///         &["myformat"]
///     }
/// }
/// ```
pub trait MeshLoader {
    /// 从文件路径解析模型
    ///
    /// # 错误
    ///
    /// - 文件不存在或无法读取
    /// - 文件格式错误或损坏
    fn load_from_file(path: &Path) -> Result<ParsedModel>;

    /// 从内存数据解析模型
    fn load_from_memory(data: &[u8]) -> Result<ParsedModel>;

    /// 支持的文件扩展名（小写，不含点号）
    fn supported_extensions() -> &'static [&'static str];
}

/// 模型来源
///
/// `load_model` 的输入：任何能产出 `ParsedModel` 的东西。
/// 文件路径、内存中的 OBJ 文本以及已经解析好的模型都实现了它。
pub trait ModelSource {
    /// 解析出未焊接的模型
    fn parse(&self) -> Result<ParsedModel>;

    /// 用于日志的简短描述
    fn describe(&self) -> String;
}

impl ModelSource for ParsedModel {
    fn parse(&self) -> Result<ParsedModel> {
        Ok(self.clone())
    }

    fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("parsed model '{}'", name),
            None => "parsed model".to_string(),
        }
    }
}

impl ModelSource for Path {
    fn parse(&self) -> Result<ParsedModel> {
        parse_model_file(self)
    }

    fn describe(&self) -> String {
        self.display().to_string()
    }
}

impl ModelSource for PathBuf {
    fn parse(&self) -> Result<ParsedModel> {
        parse_model_file(self)
    }

    fn describe(&self) -> String {
        self.display().to_string()
    }
}

/// 内存中的 OBJ 文本
#[derive(Debug, Clone, Copy)]
pub struct ObjBuffer<'a>(pub &'a [u8]);

impl ModelSource for ObjBuffer<'_> {
    fn parse(&self) -> Result<ParsedModel> {
        ObjLoader::load_from_memory(self.0)
    }

    fn describe(&self) -> String {
        format!("in-memory OBJ ({} bytes)", self.0.len())
    }
}

/// 根据文件扩展名选择合适的加载器并解析
///
/// # 示例
///
/// ```rust,no_run
/// use mesh_packer::geometry::loaders::parse_model_file;
/// use std::path::Path;
///
/// let model = parse_model_file(Path::new("model.obj"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_model_file(path: &Path) -> Result<ParsedModel> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| MeshLoadError::UnsupportedFormat("无法确定文件扩展名".to_string()))?;

    if ObjLoader::supported_extensions().contains(&extension.as_str()) {
        return ObjLoader::load_from_file(path);
    }

    Err(MeshLoadError::UnsupportedFormat(format!("不支持的文件格式: .{}", extension)).into())
}

/// 解析文件并打包为焊接后的网格
///
/// 等价于 `load_model(path, scale_to_unit_box)`。
pub fn load_model_from_path(path: &Path, scale_to_unit_box: bool) -> Result<LoadedMesh> {
    load_model(path, scale_to_unit_box)
}
