//! 核心功能模块
//!
//! 本模块提供了打包器的基础功能，包括数学类型、日志系统、配置管理和错误处理。
//! 这些模块与具体的几何处理流程解耦。
//!
//! # 模块组织
//!
//! - `math`：数学类型，基于 nalgebra 的向量别名
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `config`：配置管理，支持从配置文件加载打包设置
//! - `error`：错误处理，定义统一的错误类型

pub mod math;
pub mod log;
pub mod config;
pub mod error;

// 重新导出常用类型，方便使用
pub use math::Vector3;
pub use error::{Result, MeshPackError, MeshLoadError};
pub use config::Config;
