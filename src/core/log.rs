//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能。
//!
//! # 特性
//!
//! - 结构化日志：支持键值对
//! - 灵活输出：支持控制台和文件输出
//! - 日志级别：trace, debug, info, warn, error
//!
//! # 使用示例
//!
//! ```no_run
//! use mesh_packer::core::log;
//! use mesh_packer::core::config::LogLevel;
//!
//! log::init_logger(LogLevel::Info, false, None).unwrap();
//! mesh_packer::packer_info!(vertices = 24, "Mesh packed");
//! ```

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::path::Path;

use super::config::LogLevel;
use super::error::{MeshPackError, Result};

/// 默认日志文件名
const DEFAULT_LOG_FILE: &str = "mesh_packer.log";

/// 初始化日志系统
///
/// 必须在程序开始时调用一次。重复初始化会返回 `MeshPackError::Log`。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否额外输出到文件（每天滚动）
/// * `log_file_path` - 日志文件路径（可选，默认为 "mesh_packer.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) -> Result<()> {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true);

    // 为 None 时不输出到文件
    let file_layer = file_output.then(|| {
        let path = Path::new(log_file_path.unwrap_or(DEFAULT_LOG_FILE));
        let directory = path.parent().unwrap_or(Path::new("."));
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(DEFAULT_LOG_FILE);

        fmt::layer()
            .with_target(true)
            .with_ansi(false) // 文件不需要 ANSI 颜色
            .with_writer(RollingFileAppender::new(Rotation::DAILY, directory, filename))
    });

    tracing_subscriber::registry()
        .with(EnvFilter::new(level.as_filter()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| MeshPackError::Log(e.to_string()))
}

/// 打包器日志 - Debug 级别
#[macro_export]
macro_rules! packer_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "mesh_packer::packer", $($arg)*)
    };
}

/// 打包器日志 - Info 级别
#[macro_export]
macro_rules! packer_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "mesh_packer::packer", $($arg)*)
    };
}

/// 打包器日志 - Warn 级别
#[macro_export]
macro_rules! packer_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "mesh_packer::packer", $($arg)*)
    };
}

/// 打包器日志 - Error 级别
#[macro_export]
macro_rules! packer_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "mesh_packer::packer", $($arg)*)
    };
}

/// 性能追踪宏
///
/// 创建一个 TRACE 级别的 span，进入后在离开作用域时记录耗时。
#[macro_export]
macro_rules! span_trace {
    ($name:expr) => {
        tracing::span!(tracing::Level::TRACE, $name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_reported() {
        // 第一次可能因其他测试已初始化而失败，第二次一定失败
        let _ = init_logger(LogLevel::Warn, false, None);
        assert!(init_logger(LogLevel::Warn, false, None).is_err());
    }
}
