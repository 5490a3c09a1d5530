//! Loader 入口：database.json → 远程表

use anyhow::Result;
use exam_question_bank::clients::SupabaseClient;
use exam_question_bank::config::Config;
use exam_question_bank::{loader, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    logging::log_startup("试题入库");

    // 构建远程表客户端并注入入库流程
    let store = SupabaseClient::new(&config);

    loader::run_upload(&store, &config.database_json).await?;

    Ok(())
}
