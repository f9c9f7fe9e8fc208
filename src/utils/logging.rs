//! 日志工具模块
//!
//! 提供日志初始化、输出文件记录和格式化辅助函数

use std::fs::{self, OpenOptions};
use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::ExtractionResult;
use crate::workflow::QuestionCtx;

/// 初始化 tracing
///
/// 优先使用 `RUST_LOG`，否则按 verbose 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 日志写到 stderr，stdout 只留给提取结果
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 初始化输出文件
///
/// # 参数
/// - `log_file_path`: 输出文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n题目复制日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入输出文件: {}", log_file_path))?;
    Ok(())
}

/// 追加一次提取结果
///
/// # 参数
/// - `log_file_path`: 输出文件路径
/// - `run_index`: 第几次提取
/// - `text`: 提取出的文本
pub fn append_output(log_file_path: &str, run_index: usize, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开输出文件: {}", log_file_path))?;

    let entry = format!(
        "{}\n#{} {}\n{}\n{}\n\n",
        "─".repeat(60),
        run_index,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "─".repeat(60),
        text
    );
    file.write_all(entry.as_bytes())?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 复制当前题目");
    match (&config.snapshot_path, config.headless) {
        (Some(path), _) => info!("📄 离线模式，快照文件: {}", path),
        (None, true) => info!("🌐 无头浏览器模式"),
        (None, false) => info!("🔌 连接浏览器调试端口: {}", config.browser_debug_port),
    }
    if let Some(ms) = config.poll_interval_ms {
        info!("🔁 轮询间隔: {} ms", ms);
    }
    info!("{}", "=".repeat(60));
}

/// 记录一次提取的摘要
pub fn log_extraction(ctx: &QuestionCtx, result: &ExtractionResult) {
    if result.is_empty() {
        warn!("{} ⚠️ 页面上没有找到任何题目内容", ctx);
        return;
    }
    info!(
        "{} 题号: {} | 选项 {} 个",
        ctx,
        result.question_number_or_placeholder(),
        result.options.len()
    );
    if !result.passage.is_empty() {
        info!("{} 材料: {}", ctx, truncate_text(&result.passage, 60));
    }
    info!("{} 题干: {}", ctx, truncate_text(result.stimulus_or_placeholder(), 80));
}

/// 打印最终统计信息
///
/// # 参数
/// - `runs`: 提取次数
/// - `changes`: 输出变化次数
/// - `log_file_path`: 输出文件路径
pub fn print_final_stats(runs: usize, changes: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 提取完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("✅ 提取次数: {}", runs);
    info!("📝 输出变化: {}", changes);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    let single_line = text.replace('\n', " ⏎ ");
    if single_line.chars().count() > max_len {
        single_line.chars().take(max_len).collect::<String>() + "..."
    } else {
        single_line
    }
}
