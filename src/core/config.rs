//! 配置管理模块
//!
//! 提供打包器配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (mesh_packer.toml)
//!
//! ```toml
//! [loading]
//! scale_to_unit_box = true
//!
//! [batch]
//! on_error = "skip"   # 或 "abort"
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! log_file = "mesh_packer.log"
//! ```

use serde::Deserialize;
use std::path::Path;

use super::error::{ConfigError, Result};

/// 打包器配置
///
/// 可以从配置文件加载，也可以通过代码构建。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// 加载配置
    #[serde(default)]
    pub loading: LoadingConfig,

    /// 批量加载配置
    #[serde(default)]
    pub batch: BatchConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 加载配置
#[derive(Debug, Clone, Deserialize)]
pub struct LoadingConfig {
    /// 是否把顶点位置缩放到 [-1, 1] 单位盒
    #[serde(default = "default_scale_to_unit_box")]
    pub scale_to_unit_box: bool,
}

/// 批量加载配置
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// 单个模型加载失败时的处理策略
    #[serde(default = "default_on_error")]
    pub on_error: FailurePolicy,
}

/// 批量加载中单个模型失败时的策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 立即中止整个批次
    Abort,
    /// 记录错误并继续下一个模型
    Skip,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_scale_to_unit_box() -> bool { false }
fn default_on_error() -> FailurePolicy { FailurePolicy::Abort }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "mesh_packer.log".to_string() }

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            scale_to_unit_box: default_scale_to_unit_box(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            on_error: default_on_error(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    ///
    /// 成功返回 `Config` 实例，失败返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 文本解析配置
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::from_file(path).unwrap_or_default()
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--unit-box`: 缩放到单位盒
    /// - `--skip-failed`: 批量加载时跳过失败的模型
    /// - `--log-level <level>`: 设置日志级别
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        if args.iter().any(|a| a == "--unit-box") {
            self.loading.scale_to_unit_box = true;
        }

        if args.iter().any(|a| a == "--skip-failed") {
            self.batch.on_error = FailurePolicy::Skip;
        }

        if let Some(idx) = args.iter().position(|a| a == "--log-level") {
            if let Some(level) = args.get(idx + 1).and_then(|s| LogLevel::parse(s)) {
                self.logging.level = level;
            }
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        if self.logging.file_output && self.logging.log_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "logging.log_file".to_string(),
                reason: "A log file path is required when file_output is enabled".to_string(),
            }.into());
        }

        Ok(())
    }
}

impl LogLevel {
    /// 从字符串解析日志级别（不区分大小写）
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// 对应的 `EnvFilter` 指令
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
