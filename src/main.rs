//! MeshPacker - 模型打包命令行工具
//!
//! 逐个加载命令行给出的模型文件，打包为焊接后的顶点/索引缓冲区并输出统计信息。
//!
//! # 使用方法
//!
//! ```bash
//! # 打包单个模型
//! cargo run -- bunny.obj
//!
//! # 缩放到单位盒，并跳过失败的模型
//! cargo run -- --unit-box --skip-failed a.obj b.obj
//! ```
//!
//! # 命令行参数
//!
//! - `--unit-box`: 把顶点位置缩放到 [-1, 1]
//! - `--skip-failed`: 某个模型失败时继续处理其余模型
//! - `--log-level <level>`: 覆盖配置文件中的日志级别
//!
//! 其余参数都视为模型文件路径。

use anyhow::{bail, Context};
use mesh_packer::core::config::FailurePolicy;
use mesh_packer::core::{log, Config};
use mesh_packer::geometry::loaders::load_model_from_path;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// 从命令行参数中取出模型路径
///
/// 跳过程序名、所有 `--` 开头的选项以及 `--log-level` 的取值。
fn model_paths(args: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        if arg == "--log-level" {
            iter.next();
        } else if !arg.starts_with("--") {
            paths.push(PathBuf::from(arg));
        }
    }

    paths
}

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（mesh_packer.toml）
/// 2. 应用命令行参数覆盖
/// 3. 初始化日志系统
/// 4. 逐个打包模型
fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // 1. 加载配置（在初始化日志之前）
    let mut config = Config::from_file_or_default("mesh_packer.toml");

    // 2. 应用命令行参数
    config.apply_args(&args);

    // 3. 验证配置
    config.validate().context("Invalid configuration")?;

    // 4. 初始化日志系统
    let log_file = config
        .logging
        .file_output
        .then_some(config.logging.log_file.as_str());
    log::init_logger(config.logging.level, config.logging.file_output, log_file)
        .context("Failed to initialize logger")?;

    info!(version = env!("CARGO_PKG_VERSION"), "MeshPacker 启动");

    let paths = model_paths(&args);
    if paths.is_empty() {
        bail!("No model files given. Usage: mesh_packer [--unit-box] [--skip-failed] [--log-level <level>] <model.obj>...");
    }

    let scale = config.loading.scale_to_unit_box;
    let mut failed = 0usize;

    for path in &paths {
        match load_model_from_path(path, scale) {
            Ok(loaded) => {
                let buffer = &loaded.buffer;
                println!(
                    "{}: {} vertices, {} triangles, {} subsets, {} + {} bytes",
                    path.display(),
                    buffer.vertex_count(),
                    buffer.triangle_count(),
                    buffer.subsets.len(),
                    buffer.vertex_bytes().len(),
                    buffer.index_bytes().len(),
                );
                if let (Some(lower), Some(upper)) = (loaded.bounds.lower(), loaded.bounds.upper()) {
                    println!("    bounds: {:?} .. {:?}", lower, upper);
                }
            }
            Err(e) => match config.batch.on_error {
                FailurePolicy::Abort => {
                    error!(path = %path.display(), error = %e, "模型加载失败，终止");
                    return Err(e).with_context(|| format!("Failed to load {}", path.display()));
                }
                FailurePolicy::Skip => {
                    warn!(path = %path.display(), error = %e, "模型加载失败，跳过");
                    failed += 1;
                }
            },
        }
    }

    info!(total = paths.len(), failed, "处理完成");

    if failed == paths.len() {
        bail!("All {} model(s) failed to load", failed);
    }

    Ok(())
}
