//! Service 入口：HTTP API 服务

use std::sync::Arc;

use anyhow::Result;
use exam_question_bank::api::{self, AppState};
use exam_question_bank::clients::{LlmClient, SupabaseClient};
use exam_question_bank::config::Config;
use exam_question_bank::logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 两个客户端只在启动时构建一次，所有请求复用
    let state = AppState {
        store: Arc::new(SupabaseClient::new(&config)),
        llm: Arc::new(LlmClient::new(&config)),
    };

    api::serve(state, &config.bind_addr).await
}
