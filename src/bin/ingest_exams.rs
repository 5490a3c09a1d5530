//! Extractor 入口：截图目录 → database.json

use anyhow::Result;
use exam_question_bank::clients::LlmClient;
use exam_question_bank::config::Config;
use exam_question_bank::{extractor, logging};
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    logging::log_startup("试题提取");

    // 构建模型客户端并注入提取流程
    let llm = LlmClient::new(&config);

    let report =
        extractor::run_extraction(&llm, &config.screenshots_dir, &config.database_json).await?;

    // 汇报失败的图片（输出文档里对应的是缺口）
    for failure in &report.failures {
        warn!("❌ {}: {}", failure.file_name, failure.reason);
    }

    logging::log_extraction_stats(
        report.records.len(),
        report.failures.len(),
        &config.database_json,
    );

    Ok(())
}
