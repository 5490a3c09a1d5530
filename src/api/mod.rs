//! HTTP API 服务
//!
//! 两个无状态接口：按条件查询试题、AI 辅导回复。进程内不持有
//! 除两个客户端句柄以外的任何状态，跨请求的一致性完全依赖远程表
//! 自身的并发控制。

pub mod handlers;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::clients::{LlmClient, SupabaseClient};

/// 服务共享状态
///
/// 两个客户端在启动时构建一次，由所有请求复用
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SupabaseClient>,
    pub llm: Arc<LlmClient>,
}

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    // CORS 全开（*），前端部署在哪都能调
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/get-questions/", get(handlers::get_questions))
        .route("/explain-solution/", post(handlers::explain_solution))
        .layer(cors)
        .with_state(state)
}

/// 启动服务并阻塞运行
pub async fn serve(state: AppState, bind_addr: &str) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("无法监听地址: {}", bind_addr))?;

    info!("🚀 API 服务已启动: {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("服务运行失败")?;

    Ok(())
}
