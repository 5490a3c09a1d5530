//! 日志工具模块
//!
//! 提供 tracing 初始化和批处理任务的日志辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 默认 info 级别（verbose 时 debug），可通过 RUST_LOG 环境变量覆盖。
/// 重复调用无副作用
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录批处理任务启动信息
pub fn log_startup(job_name: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 {} - {}", job_name, chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(60));
}

/// 打印提取任务的最终统计信息
pub fn log_extraction_stats(success: usize, failed: usize, output_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 提取完成统计");
    info!("✅ 成功: {}/{}", success, success + failed);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n结果已保存至: {}", output_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
