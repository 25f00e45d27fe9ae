//! 错误处理模块
//!
//! 定义了打包器中使用的统一错误类型，使用 `thiserror` 提供友好的错误消息。
//!
//! # 设计原则
//!
//! - 每种错误对单次加载调用都是终止性的，不做重试，也不返回部分结果
//! - 为每种错误类型提供清晰的上下文信息（形状、面、角点、索引）
//! - 批量加载时跳过还是中止由调用方决定，本模块不做策略选择

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// 打包器统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, MeshPackError>;

/// 打包器的顶层错误类型
#[derive(Debug, Error)]
pub enum MeshPackError {
    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 网格加载错误
    #[error("Mesh loading error: {0}")]
    MeshLoading(#[from] MeshLoadError),

    /// IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 日志系统错误
    #[error("Log error: {0}")]
    Log(String),
}

/// 配置相关的错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件未找到
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    /// 配置文件解析失败
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// 配置值无效
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 角点引用的属性种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Position,
    Normal,
    Texcoord,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Position => "position",
            AttributeKind::Normal => "normal",
            AttributeKind::Texcoord => "texcoord",
        };
        f.write_str(name)
    }
}

/// 网格加载相关的错误
#[derive(Debug, Error)]
pub enum MeshLoadError {
    /// 文件不存在
    #[error("Mesh file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    #[error("Unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    /// 外部解析器报告失败
    #[error("Failed to parse mesh: {0}")]
    ParseFailure(String),

    /// 模型不包含任何形状
    #[error("Model contains no shapes: {0}")]
    EmptyModel(String),

    /// 角点索引超出属性数组范围
    #[error(
        "Shape {shape} face {face} corner {corner}: {attribute} index {index} out of range ({available} available)"
    )]
    InvalidIndexReference {
        shape: usize,
        face: usize,
        corner: usize,
        attribute: AttributeKind,
        index: usize,
        available: usize,
    },

    /// 单位盒归一化时包围盒没有体积（所有位置重合）
    #[error("Cannot scale to unit box: bounding box extent is {extent}")]
    DegenerateNormalization { extent: f32 },

    /// 角点数超出 32 位索引能表示的范围
    #[error("Model has {corners} corners, more than 32-bit indices can address")]
    IndexOverflow { corners: usize },
}

impl MeshLoadError {
    /// 创建解析失败错误
    pub fn parse_failure(details: impl Into<String>) -> Self {
        Self::ParseFailure(details.into())
    }

    /// 创建空模型错误
    pub fn empty_model(source: impl Into<String>) -> Self {
        Self::EmptyModel(source.into())
    }
}
