//! MeshPacker - 模型几何打包库
//!
//! 把 OBJ 等格式解析出的多索引面数据转换为单索引的交错顶点缓冲区，
//! 供 GPU 直接使用。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（数学、日志、配置、错误处理）
//! - `geometry`: 几何处理模块（解析、法线生成、顶点焊接、单位盒归一化）
//!
//! # 使用示例
//!
//! ```no_run
//! use mesh_packer::geometry::loaders::load_model_from_path;
//! use std::path::Path;
//!
//! let loaded = load_model_from_path(Path::new("bunny.obj"), true)?;
//!
//! // 每个顶点 8 个 f32：位置、纹理坐标、法线
//! let vertex_bytes = loaded.buffer.vertex_bytes();
//! let index_bytes = loaded.buffer.index_bytes();
//! println!("{} / {} 字节", vertex_bytes.len(), index_bytes.len());
//! # Ok::<(), mesh_packer::core::MeshPackError>(())
//! ```

pub mod core;
pub mod geometry;
